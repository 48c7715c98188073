use ecfr_dashboard::app;
use ecfr_dashboard::config::DashboardConfig;
use env_logger::Env;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut config = DashboardConfig::from_env();

    // Optional bind address, e.g. `ecfr-dashboard 0.0.0.0:8080`
    if let Some(addr) = env::args().nth(1) {
        config.bind_addr = addr;
    }

    // Start the web application
    app::run(config).await?;

    Ok(())
}
