//! Log subscriber setup.
//!
//! Log lines go to stderr and are shaped by the `LoggingSettings` section of the
//! settings document. `RUST_LOG` overrides the level chosen by `--verbose`.

use std::fmt::{self, Write as _};
use std::io::{self, IsTerminal};

use tracing::{Event, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{ChronoLocal, FormatTime, SystemTime};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

use nixrb_lib::settings::LoggingSettings;

/// Writes a fixed prefix in front of every event.
struct Prefixed<F> {
  prefix: String,
  inner: F,
}

impl<S, N, F> FormatEvent<S, N> for Prefixed<F>
where
  S: Subscriber + for<'a> LookupSpan<'a>,
  N: for<'a> FormatFields<'a> + 'static,
  F: FormatEvent<S, N>,
{
  fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
    if !self.prefix.is_empty() {
      write!(writer, "{} ", self.prefix)?;
    }
    self.inner.format_event(ctx, writer, event)
  }
}

fn default_filter(verbose: bool) -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

fn install<T>(timer: T, settings: &LoggingSettings, verbose: bool)
where
  T: FormatTime + Send + Sync + 'static,
{
  let format = tracing_subscriber::fmt::format()
    .with_timer(timer)
    .with_target(false)
    .with_file(settings.report_caller)
    .with_line_number(settings.report_caller);

  let layer = tracing_subscriber::fmt::layer()
    .with_writer(io::stderr)
    .with_ansi(io::stderr().is_terminal())
    .event_format(Prefixed {
      prefix: settings.prefix.clone(),
      inner: format,
    });

  // An already installed subscriber stays in place.
  let _ = tracing_subscriber::registry()
    .with(default_filter(verbose))
    .with(layer)
    .try_init();
}

/// Install the global subscriber.
pub fn init(settings: &LoggingSettings, verbose: bool) {
  if !settings.report_timestamp {
    install((), settings, verbose);
  } else if settings.time_format.trim().is_empty() {
    install(SystemTime, settings, verbose);
  } else {
    install(ChronoLocal::new(settings.time_format.clone()), settings, verbose);
  }
}
