use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "9000".to_string());
    let seed = std::env::var("SEED_CASES")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0);

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, seed, "listening");
    mock_server::run(listener, mock_server::AppState::with_cases(mock_server::seed_cases(seed))).await
}
