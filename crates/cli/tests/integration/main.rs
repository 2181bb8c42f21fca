//! End-to-end tests running nixrb against stand-in system tools.

#![cfg(unix)]

mod common;
mod rebuild_tests;
