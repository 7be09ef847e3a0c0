use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use linguaspeak_backend::{build_app, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("linguaspeak_backend=debug,tower_http=debug")),
        )
        .init();

    // Load configuration - try multiple paths
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
        exe_dir.join("conf.yaml").to_str().map(|s| s.to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut config = None;
    let mut loaded_path = String::new();

    for path in &config_paths {
        match Config::load(path) {
            Ok(cfg) => {
                config = Some(cfg);
                loaded_path = path.clone();
                break;
            }
            Err(e) => {
                tracing::debug!("Failed to load config from {}: {}", path, e);
            }
        }
    }

    let config = config
        .ok_or_else(|| anyhow::anyhow!("Could not find config file. Tried: {:?}", config_paths))?
        .install();
    info!("Loaded configuration from: {}", loaded_path);

    std::fs::create_dir_all(&config.system_config.cache_dir)?;

    let app_state = AppState::from_installed()?;
    app_state.spawn_voice_refresh();

    let app = build_app(app_state);

    let addr = config.system_config.socket_addr()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
