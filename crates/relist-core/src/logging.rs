#![forbid(unsafe_code)]

//! Structured logging glue.
//!
//! Library code logs through [`tracing`] directly. This module re-exports the
//! macros for downstream crates and, behind the `tracing-json` feature,
//! installs a JSON subscriber for hosts that have no subscriber of their own.
//!
//! Event names follow a `relist.<area>` convention so that logs can be
//! filtered by prefix, for example `relist.transition` or `relist.ignored`.

pub use tracing::{debug, debug_span, error, info, info_span, trace, warn};

/// Environment variable holding the JSON subscriber's filter directive.
pub const LOG_ENV_VAR: &str = "RELIST_LOG";

/// Filter used when `RELIST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "relist=debug";

/// Build a JSON subscriber writing to `writer`, filtered by `RELIST_LOG`
/// (default: [`DEFAULT_FILTER`]).
#[cfg(feature = "tracing-json")]
pub fn json_subscriber<W>(writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .with_writer(writer)
        .finish()
}

/// Install [`json_subscriber`] as the global default.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json<W>(writer: W) -> bool
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    tracing::subscriber::set_global_default(json_subscriber(writer)).is_ok()
}

#[cfg(all(test, feature = "tracing-json"))]
mod tests {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'w> tracing_subscriber::fmt::MakeWriter<'w> for SharedBuf {
        type Writer = Self;

        fn make_writer(&'w self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn json_subscriber_writes_relist_events() {
        let buf = SharedBuf::default();
        let subscriber = json_subscriber(buf.clone());
        tracing::subscriber::with_default(subscriber, || {
            debug!(target: "relist::test", message = "relist.transition", kind = "moved");
            trace!(target: "relist::test", message = "relist.too_verbose");
            debug!(target: "other", message = "other.event");
        });

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 1, "{out}");
        assert!(lines[0].starts_with('{'));
        assert!(lines[0].contains("\"relist.transition\""));
        assert!(lines[0].contains("\"kind\":\"moved\""));
    }
}
