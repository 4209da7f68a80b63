use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "content_listing=info";
const VERBOSE_DIRECTIVES: &str = "content_listing=debug,info";

/// `RUST_LOG` wins over the built-in directives.
fn listing_filter(verbose: bool) -> EnvFilter {
    let directives = if verbose {
        VERBOSE_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

pub fn init_cli_logger(verbose: bool) {
    // 日誌輸出到 stderr，stdout 保留給列表結果
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(listing_filter(verbose))
        .with(layer)
        .init();
}

/// Structured output for hosted request handlers.
pub fn init_json_logger() {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .json();

    tracing_subscriber::registry()
        .with(listing_filter(false))
        .with(layer)
        .init();
}
