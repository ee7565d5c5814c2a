use std::process;

use erdgen::config::AppConfig;
use erdgen::errors::ErdError;
use erdgen::viewer;
use log::info;
use tokio::net::TcpListener;

async fn run() -> Result<(), ErdError> {
    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    let listener = TcpListener::bind(&addr).await?;
    info!("Serving ERD viewer on http://{}/erd", addr);

    axum::serve(listener, viewer::router(config)).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
