use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contact_manager::infrastructure::AppState;
use contact_manager::{config, db, seed, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contact_manager=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize database
    let db = match db::init_db(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Database connected and synchronized");

    let state = AppState::from_config(db, &config);

    if let Err(e) = state.uploads.ensure_root().await {
        tracing::error!(
            "Failed to create upload directory {:?}: {}",
            config.upload_dir,
            e
        );
        std::process::exit(1);
    }

    // Check for seed flag
    if config.seed_demo {
        tracing::info!("Seeding demo data...");
        match seed::seed_demo_data(state.contact_repo.as_ref()).await {
            Ok(count) => tracing::info!("Seeded {} demo contacts.", count),
            Err(e) => tracing::error!("Failed to seed data: {}", e),
        }
    }

    if let Err(e) = server::serve(state, config.port).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
