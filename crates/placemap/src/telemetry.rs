use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "info";

/// Filter from `RUST_LOG`, falling back to `info`. Read after `.env` is
/// loaded so values from the file apply.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

pub fn init(json: bool) {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
