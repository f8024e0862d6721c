use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let accounts = match std::env::var("MOCK_ACCOUNTS") {
        Ok(raw) => mock_server::parse_accounts(&raw),
        Err(_) => mock_server::default_accounts(),
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, accounts = accounts.len(), "listening");
    mock_server::run_with_accounts(listener, accounts).await
}
