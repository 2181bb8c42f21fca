//! nixrb-lib: Rebuild workflow for declaratively configured NixOS machines
//!
//! This crate holds everything between the settings document and the external tools:
//! - `settings`: the YAML settings document and where to find it
//! - `paths`: resolving `~`-relative path fragments against required files
//! - `collect`: the ordered prompt groups that complete the settings
//! - `runner`: spawning external commands with a progress indicator
//! - `changes`: detecting whether tracked files differ from the last commit
//! - `pipeline`: the ordered, fail-fast rebuild stages and the commit stage

pub mod changes;
pub mod collect;
pub mod consts;
pub mod paths;
pub mod pipeline;
pub mod prompt;
pub mod runner;
pub mod settings;

#[cfg(test)]
pub(crate) mod testutil;
