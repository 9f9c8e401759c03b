use tracing_subscriber::EnvFilter;

/// Checked before `RUST_LOG`.
pub const LOG_ENV: &str = "DG_LOG";

/// Installs the stderr subscriber. Stdout carries the agent protocol, so
/// log lines must never go there. Repeated calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod logging_tests {
    use super::*;

    #[test]
    fn init_tracing_can_be_called_twice() {
        init_tracing();
        init_tracing();
        tracing::debug!("subscriber installed");
    }
}
