use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bankroll_bot::access::AccessList;
use bankroll_bot::config::Config;
use bankroll_bot::dispatch::Dispatcher;
use bankroll_bot::persistence::{AccountStore, RetryConfig};
use bankroll_bot::server::{self, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bankroll_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().unwrap();
    let access_path = config.access_list_path();
    let access = AccessList::load_or_create(&access_path, config.admin_account).unwrap();
    let dispatcher = Dispatcher::new(AccountStore::new(&config.state_dir), RetryConfig::DEFAULT);

    let app = server::router(AppState::new(dispatcher, access, access_path));

    tracing::info!("listening on {}", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
