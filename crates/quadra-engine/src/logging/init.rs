use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` names one.
///
/// wgpu and naga are chatty at `info`.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "quadra_engine=trace,wgpu=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        builder.format_timestamp_millis();

        if let Err(e) = builder.try_init() {
            eprintln!("logger already installed: {e}");
            return;
        }

        log::debug!("logging initialized ({filter})");
    });
}

fn resolve_filter(configured: Option<String>, env: Option<String>) -> String {
    configured
        .or(env)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned())
}
