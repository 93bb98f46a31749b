use standings::datasource::{HttpScoreFeed, ScoreFeed, StoreScoreFeed};
use standings::orchestration::{PageLimits, StandingsService};
use standings::{api, config::Config, db::init_db, LeaderboardRegistry, Repository, SystemClock};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let registry = match LeaderboardRegistry::from_json_file(&config.leaderboards_path) {
        Ok(r) => Arc::new(r),
        Err(e) => {
            eprintln!("Failed to load leaderboard definitions: {}", e);
            std::process::exit(1);
        }
    };

    let feed: Arc<dyn ScoreFeed> = match &config.feed_url {
        Some(url) => {
            tracing::info!(url = %url, "Using HTTP score feed");
            Arc::new(HttpScoreFeed::new(url.clone()))
        }
        None => {
            let pool = match init_db(&config.database_path).await {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Failed to initialize database: {}", e);
                    std::process::exit(1);
                }
            };
            tracing::info!(path = %config.database_path, "Using SQLite score feed");
            Arc::new(StoreScoreFeed::new(Arc::new(Repository::new(pool))))
        }
    };

    let service = Arc::new(StandingsService::new(
        registry,
        feed,
        Arc::new(SystemClock),
        config.feed_timeout,
        PageLimits {
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        },
    ));

    let app = api::create_router(api::AppState::new(service));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
