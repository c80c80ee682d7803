use std::sync::Arc;

use anyhow::{Context, Result};
use weatherbot_bot::{dispatch, Conversation};
use weatherbot_weather::WeatherProvider;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    weatherbot_core::init()?;

    let (config, _validation) = weatherbot_core::Config::load_validated()
        .map_err(|e| anyhow::anyhow!("{} ({})", e, e.user_message()))
        .context("Failed to load configuration")?;

    tracing::info!(
        "Loaded configuration, city routing: {:?}",
        config.conversation.city_routing
    );

    let provider =
        WeatherProvider::new(&config.weather).context("Failed to create weather provider")?;
    let app = Arc::new(Conversation::new(provider, config.conversation.city_routing));

    let bot = teloxide::Bot::new(&config.telegram.bot_token);

    tracing::info!("Weatherbot started");
    dispatch::run(bot, app).await;

    Ok(())
}
