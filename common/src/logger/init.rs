use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the human-readable subscriber. Later calls are no-ops.
pub fn init_logger(service_name: &'static str) {
    LOGGER_INIT.get_or_init(|| {
        let installed = fmt()
            .with_env_filter(env_filter())
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_line_number(true)
            .with_span_events(fmt::format::FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok();

        if installed {
            tracing::info!(service = service_name, "logger initialized");
        }
    });
}

/// Installs the JSON subscriber used for machine-read logs.
pub fn init_logger_json(service_name: &'static str) {
    LOGGER_INIT.get_or_init(|| {
        let installed = fmt()
            .json()
            .with_env_filter(env_filter())
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .with_span_events(fmt::format::FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok();

        if installed {
            tracing::info!(service = service_name, "logger initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_logger("test");
        init_logger("test");
        init_logger_json("test");
    }
}
