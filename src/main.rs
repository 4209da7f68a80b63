use clap::Parser;
use content_listing::utils::error::ErrorSeverity;
use content_listing::utils::{logger, validation::Validate};
use content_listing::{
    ContentListingService, FileViewStore, ListingConfig, ListingMode, ListingRequest,
    ListingResult, ListingSettings,
};

#[derive(Debug, Parser)]
#[command(name = "content-listing")]
#[command(about = "Run a content listing view with tag and author filters")]
struct Args {
    /// Path to a TOML listing configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Directory holding view definitions (overrides the config file)
    #[arg(long)]
    views_dir: Option<String>,

    /// View name (overrides the config file)
    #[arg(long)]
    view: Option<String>,

    /// Display id (overrides the config file)
    #[arg(long)]
    display: Option<String>,

    #[arg(long, value_delimiter = ',')]
    tags: Option<Vec<String>>,

    #[arg(long, value_delimiter = ',')]
    authors: Option<Vec<String>>,

    /// "result" for paged JSON rows, anything else renders markup
    #[arg(long, default_value = "")]
    mode: String,

    /// Zero-indexed page, only used in result mode
    #[arg(long, default_value = "0")]
    page: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn load_settings(args: &Args) -> content_listing::Result<ListingSettings> {
    let mut settings = match &args.config {
        Some(path) => ListingSettings::from_file(path)?,
        None => ListingSettings::default(),
    };

    // 套用命令列覆蓋設定
    if let Some(views_dir) = &args.views_dir {
        settings.store.views_dir = views_dir.clone();
    }
    if let Some(view) = &args.view {
        settings.listing.view = Some(view.clone());
    }
    if let Some(display) = &args.display {
        settings.listing.display = Some(display.clone());
    }

    settings.validate()?;
    Ok(settings)
}

fn listing_config(args: &Args, settings: &ListingSettings) -> ListingConfig {
    let block = settings.block();
    ListingConfig::new(
        args.tags.clone().or(block.tags),
        args.authors.clone().or(block.authors),
    )
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(e.severity()));
        }
    };

    // 初始化日誌
    let verbose = args.verbose || settings.verbose();
    if args.log_json || settings.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!(
        "Running view '{}' display '{}' from {}",
        settings.view_name(),
        settings.display_id(),
        settings.views_dir()
    );
    if verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let config = listing_config(&args, &settings);
    let request = ListingRequest {
        mode: ListingMode::from(args.mode.as_str()),
        page: args.page,
    };

    let store = FileViewStore::new(settings.views_dir());
    let service = ContentListingService::from_settings(store, &settings);

    match service.get_content_listing(&config, &request).await {
        Ok(ListingResult::Rendered { fragment }) => {
            println!("{}", fragment);
        }
        Ok(result) => {
            if result == ListingResult::Empty {
                tracing::warn!("Listing is empty: view or display could not be resolved");
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Err(e) => {
            tracing::error!(
                "❌ Listing failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(e.severity()));
        }
    }

    Ok(())
}
