//! Bot initialization and command definitions

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Я умею:")]
pub enum Command {
    #[command(description = "начать регистрацию или показать приветствие")]
    Start,
    #[command(description = "информация о возможностях сервиса")]
    Help,
}

/// Creates a Bot instance with custom or default API URL
///
/// The token comes from the configuration layer, so both `BOT_TOKEN` and
/// `TELOXIDE_TOKEN` work.
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Failed to create bot (missing token, invalid URL, etc.)
pub fn create_bot() -> anyhow::Result<Bot> {
    create_bot_with_token(&config::BOT_TOKEN)
}

fn create_bot_with_token(token: &str) -> anyhow::Result<Bot> {
    if token.is_empty() {
        anyhow::bail!("Bot token is not set (BOT_TOKEN or TELOXIDE_TOKEN)");
    }

    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(token, client);

    // Check if local Bot API server is configured
    if let Ok(bot_api_url) = std::env::var("BOT_API_URL") {
        log::info!("Using custom Bot API URL: {}", bot_api_url);
        let url = url::Url::parse(&bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
        return Ok(bot.set_api_url(url));
    }

    Ok(bot)
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    use teloxide::types::BotCommand;

    bot.set_my_commands(vec![
        BotCommand::new("start", "начать регистрацию или показать приветствие"),
        BotCommand::new("help", "информация о возможностях сервиса"),
    ])
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_descriptions() {
        let commands = Command::descriptions();
        let command_list = format!("{}", commands);

        assert!(command_list.contains("Я умею"));
        assert!(command_list.contains("start"));
        assert!(command_list.contains("help"));
    }

    #[test]
    fn test_create_bot_rejects_empty_token() {
        let err = create_bot_with_token("").unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn test_create_bot_accepts_configured_token() {
        assert!(create_bot_with_token("123456:TEST-token").is_ok());
    }
}
