//! Registration conversation state machine
//!
//! The transition core ([`advance`]) is a plain function from the current
//! tracker state and the incoming text to the reply, so the whole flow can
//! be exercised in tests without Telegram I/O. The teloxide endpoint around
//! it only extracts the text and sends the reply back.

use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::core::validation::{validate_birth_date, validate_full_name, validate_phone};
use crate::storage::db::{self, RegisterOutcome};
use crate::telegram::state::RegistrationState;
use crate::telegram::texts;

/// Продвигает диалог регистрации на один шаг.
///
/// Возвращает текст ответа пользователю, либо `None`, если сообщение не
/// относится к машине состояний и ответа не требуется. Невалидный ввод
/// оставляет состояние на месте; дубликат телефона и сбой хранилища
/// сбрасывают состояние, чтобы пользователь мог начать заново.
pub fn advance(deps: &HandlerDeps, chat_id: i64, text: &str) -> Option<String> {
    match deps.tracker.get(chat_id) {
        Some(RegistrationState::WaitingFullName) => Some(on_full_name(deps, chat_id, text)),
        Some(RegistrationState::WaitingPhone { full_name }) => Some(on_phone(deps, chat_id, full_name, text)),
        Some(RegistrationState::WaitingBirthDate { full_name, phone }) => {
            Some(on_birth_date(deps, chat_id, full_name, phone, text))
        }
        None => {
            if db::is_registered(&deps.db_pool, chat_id) {
                // Registered chats with no active flow are routed to the menu
                Some(texts::SERVICE_MENU.to_string())
            } else {
                // An unregistered chat with no active flow: happens after a
                // process restart mid-registration. Such chats get no reply
                // until the next /start.
                // TODO: product decision pending on whether this should
                // implicitly restart the registration instead.
                log::warn!("Ignoring message from unregistered chat {} with no active flow", chat_id);
                None
            }
        }
    }
}

fn on_full_name(deps: &HandlerDeps, chat_id: i64, text: &str) -> String {
    if !validate_full_name(text) {
        return texts::BAD_FULL_NAME.to_string();
    }

    deps.tracker.set(
        chat_id,
        RegistrationState::WaitingPhone {
            full_name: text.to_string(),
        },
    );
    texts::PROMPT_PHONE.to_string()
}

fn on_phone(deps: &HandlerDeps, chat_id: i64, full_name: String, text: &str) -> String {
    if !validate_phone(text) {
        return texts::BAD_PHONE.to_string();
    }

    deps.tracker.set(
        chat_id,
        RegistrationState::WaitingBirthDate {
            full_name,
            phone: text.to_string(),
        },
    );
    texts::PROMPT_BIRTH_DATE.to_string()
}

fn on_birth_date(deps: &HandlerDeps, chat_id: i64, full_name: String, phone: String, text: &str) -> String {
    if !validate_birth_date(text) {
        return texts::BAD_BIRTH_DATE.to_string();
    }

    let outcome = db::register(&deps.db_pool, chat_id, &full_name, &phone, text);
    // Terminal either way: the flow is restarted from /start after a failure
    deps.tracker.clear(chat_id);

    match outcome {
        RegisterOutcome::Registered => {
            let name = db::greeting_name(&deps.db_pool, chat_id);
            texts::registration_done(&name)
        }
        RegisterOutcome::Duplicate => texts::duplicate_phone(),
        RegisterOutcome::Failed => texts::GENERIC_ERROR.to_string(),
    }
}

/// Endpoint body for plain-text messages during registration.
pub async fn handle_registration_message(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(text) = msg.text() else { return Ok(()) };

    if let Some(reply) = advance(deps, msg.chat.id.0, text) {
        bot.send_message(msg.chat.id, reply).await?;
    }
    Ok(())
}
