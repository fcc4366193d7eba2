//! Logging setup utilities for the Parlor binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are enabled by the default filter.
const PARLOR_CRATES: [&str; 3] = ["parlor_shared", "parlor_server", "parlor_client"];

/// Build the default filter directive, e.g. `parlor_server=info,parlor=info`.
fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    PARLOR_CRATES
        .iter()
        .copied()
        .chain(std::iter::once(binary_name))
        .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// Events from every Parlor crate and from the binary itself are enabled at
/// `default_log_level`. The filter can be overridden with `RUST_LOG`.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "parlor", "parlor-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn")
///
/// # Examples
///
/// ```no_run
/// use parlor_shared::logger::setup_logger;
///
/// setup_logger("parlor-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_covers_all_crates_and_binary() {
        // テスト項目: 全クレートとバイナリに対するフィルタ指定が生成される
        // given (前提条件):
        let binary_name = "parlor";

        // when (操作):
        let directive = default_directive(binary_name, "debug");

        // then (期待する結果):
        assert_eq!(
            directive,
            "parlor_shared=debug,parlor_server=debug,parlor_client=debug,parlor=debug"
        );
    }
}
