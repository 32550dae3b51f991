//! Command handlers (/start, /help)

use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::storage::db;
use crate::telegram::state::RegistrationState;
use crate::telegram::texts;

/// Effect of a /start command, split out from the sending side so the
/// decision is testable without a live bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartAction {
    /// Chat is already registered: greet by name, do not enter the flow
    Greet(String),
    /// Chat is not registered: the flow has been (re)entered at the
    /// full-name step
    BeginRegistration,
}

/// Решает, что делать по /start, и переводит незарегистрированный чат в
/// начало диалога регистрации. Повторный /start в середине диалога
/// перезапускает его с первого шага.
pub fn start_action(deps: &HandlerDeps, chat_id: i64) -> StartAction {
    if db::is_registered(&deps.db_pool, chat_id) {
        StartAction::Greet(db::greeting_name(&deps.db_pool, chat_id))
    } else {
        deps.tracker.set(chat_id, RegistrationState::WaitingFullName);
        StartAction::BeginRegistration
    }
}

/// Сообщения, отправляемые в ответ на /start. Новый пользователь сначала
/// видит меню сервиса, затем уведомление о согласии и запрос ФИО.
pub fn start_replies(action: &StartAction) -> Vec<String> {
    match action {
        StartAction::Greet(name) => vec![texts::registered_greeting(name)],
        StartAction::BeginRegistration => vec![
            texts::SERVICE_MENU.to_string(),
            texts::consent_notice(),
            texts::PROMPT_FULL_NAME.to_string(),
        ],
    }
}

/// Handles the /start command (also the first contact with the bot).
pub async fn handle_start_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let chat_id = msg.chat.id.0;
    log::info!("/start from chat {}", chat_id);

    let action = start_action(deps, chat_id);
    for reply in start_replies(&action) {
        bot.send_message(msg.chat.id, reply).await?;
    }
    Ok(())
}

/// Handles the /help command.
pub async fn handle_help_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, texts::SERVICE_MENU).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_user_sees_menu_before_consent_and_prompt() {
        let replies = start_replies(&StartAction::BeginRegistration);
        assert_eq!(
            replies,
            vec![
                texts::SERVICE_MENU.to_string(),
                texts::consent_notice(),
                texts::PROMPT_FULL_NAME.to_string(),
            ]
        );
    }

    #[test]
    fn test_registered_user_gets_a_single_greeting() {
        let replies = start_replies(&StartAction::Greet("Иван Иванович".to_string()));
        assert_eq!(replies, vec![texts::registered_greeting("Иван Иванович")]);
    }
}
