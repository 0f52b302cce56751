//! Tracing subscriber setup for the CLI.
//!
//! Logs go to stderr so stdout stays reserved for operation results.
//! `RUST_LOG` takes precedence over the `-v` count.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Maps the number of `-v` flags to a filter directive.
pub fn filter_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info,gwadmin_cli=info,gwadmin_directory=info",
        2 => "info,gwadmin_cli=debug,gwadmin_directory=debug",
        _ => "trace",
    }
}

/// Initialize the tracing subscriber.
pub fn init_logging(verbose: u8) {
    let filter = filter_for_verbosity(verbose);
    let filter_layer =
        match EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(filter)) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Failed to create log filter: {e}");
                EnvFilter::new("warn")
            }
        };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_for_verbosity() {
        assert_eq!(filter_for_verbosity(0), "warn");
        assert!(filter_for_verbosity(1).contains("gwadmin_directory=info"));
        assert!(filter_for_verbosity(2).contains("gwadmin_cli=debug"));
        assert_eq!(filter_for_verbosity(7), "trace");
    }

    #[test]
    fn test_filters_parse() {
        for verbose in 0..4 {
            assert!(EnvFilter::try_new(filter_for_verbosity(verbose)).is_ok());
        }
    }
}
