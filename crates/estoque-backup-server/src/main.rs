use estoque_backup_server::{build_router, AppState};
use std::env;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_list(name: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let allowed_origins = env_list("BACKUP_ALLOWED_ORIGINS");
    let bind = env_string("BACKUP_BIND", "0.0.0.0:8787");

    let state = AppState::new(allowed_origins);
    let listener = TcpListener::bind(&bind)
        .await
        .expect("failed to bind listener");
    info!(%bind, "backup server listening");

    axum::serve(listener, build_router(state))
        .await
        .expect("server error");
}
