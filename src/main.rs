use anyhow::Result;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quick_translate::build_app;
use quick_translate::config::Config;
use quick_translate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quick_translate=debug,tower_http=debug")),
        )
        .init();

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut config = None;
    for path in &config_paths {
        if !std::path::Path::new(path).exists() {
            tracing::debug!("No config at {}", path);
            continue;
        }
        // A file that exists but does not parse is a hard error
        config = Some(Config::load(path)?);
        info!("Loaded configuration from: {}", path);
        break;
    }

    let mut config = config.unwrap_or_else(|| {
        info!("No config file found (tried {:?}); using defaults", config_paths);
        Config::default()
    });
    config.apply_env_overrides();
    config.validate()?;

    let app_state = AppState::new(config.clone())?;
    let app = build_app(app_state);

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("server.host must be an IP address: {}", e))?;
    let addr = SocketAddr::new(host, config.server.port);
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
