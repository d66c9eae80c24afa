use dine_server::utils::logger;
use dine_server::{Config, Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    logger::init_logger_with_file(
        &config.log_level,
        config.log_json,
        config.log_dir.as_deref(),
    )?;

    tracing::info!(
        port = config.http_port,
        environment = %config.environment,
        webhook_secret = config.webhook_secret.is_some(),
        auto_confirm_items = config.auto_confirm_items_on_approve,
        "Starting dine-server"
    );

    Server::new(config).run().await?;
    Ok(())
}
