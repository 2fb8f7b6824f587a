use anyhow::Context;
use clap::Parser;
use grocery_route::config::LogFormat;
use grocery_route::core::catalog::resolve_selection;
use grocery_route::utils::{logger, validation::Validate};
use grocery_route::{app, sequence, ApiItem, CliArgs, Command, GroceryError, SelectionRequest, StoredItem};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    if let Err(e) = run(args).await {
        tracing::error!("❌ {:#}", e);
        eprintln!("❌ {:#}", e);

        let exit_code = e
            .downcast_ref::<GroceryError>()
            .map(GroceryError::exit_code)
            .unwrap_or(1);
        std::process::exit(exit_code);
    }
}

async fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = args.load_config()?;

    // 初始化日誌
    logger::init_logger(
        config.logging.verbose,
        config.logging.format == LogFormat::Json,
    );

    match args.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!("Starting grocery-route service");
            tracing::debug!(
                "Storage: {:?} at {}",
                config.storage.backend,
                config.storage.path
            );

            if let Err(e) = config.validate() {
                tracing::error!("❌ Configuration validation failed: {}", e);
                return Err(e.into());
            }

            app::run(config).await?;
        }
        Command::HashPassword { password, cost } => {
            let hash = grocery_route::core::auth::hash_password(&password, cost)?;
            println!("{}", hash);
        }
        Command::Route { catalog, ids } => {
            let data = std::fs::read(&catalog)
                .with_context(|| format!("reading catalog {}", catalog.display()))?;
            let items: Vec<StoredItem> = serde_json::from_slice(&data)
                .with_context(|| format!("parsing catalog {}", catalog.display()))?;

            let selected = resolve_selection(items, &SelectionRequest::new(ids));
            let route: Vec<ApiItem> = sequence(&selected).iter().map(ApiItem::from).collect();

            tracing::info!("📍 Route with {} stops", route.len());
            println!("{}", serde_json::to_string_pretty(&route)?);
        }
    }

    Ok(())
}
