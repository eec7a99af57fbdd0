//! Logging setup utilities for the Hiroba relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Crate names are normalized the way rustc names them (`-` becomes `_`), so
/// `hiroba-server` and `hiroba_server` produce the same directive.
pub fn default_directive(target: &str, default_log_level: &str) -> String {
    format!(
        "{}={},tower_http={}",
        target.replace('-', "_"),
        default_log_level,
        default_log_level
    )
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `target` - The crate whose events should be shown (e.g., "hiroba-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use hiroba_shared::logger::setup_logger;
///
/// setup_logger("hiroba-server", "debug");
/// ```
pub fn setup_logger(target: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(target, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_normalizes_crate_name() {
        // テスト項目: クレート名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let target = "hiroba-server";

        // when (操作):
        let directive = default_directive(target, "info");

        // then (期待する結果):
        assert_eq!(directive, "hiroba_server=info,tower_http=info");
    }
}
