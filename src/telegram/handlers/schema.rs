//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::{handle_help_command, handle_start_command};
use super::registration::handle_registration_message;
use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::Command;
use crate::telegram::texts;

/// Creates the main dispatcher schema for the bot.
///
/// Returns a handler tree usable with teloxide's Dispatcher; the same
/// schema serves production and integration tests. Commands are routed
/// first so they always short-circuit the registration state machine.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_messages = deps.clone();

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(message_handler(deps_messages))
}

/// Handler for bot commands (/start, /help)
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);

                let result = match cmd {
                    Command::Start => handle_start_command(&bot, &msg, &deps).await,
                    Command::Help => handle_help_command(&bot, &msg).await,
                };

                if let Err(e) = result {
                    log::error!("Command {:?} failed for chat {}: {:?}", cmd, msg.chat.id, e);
                    let _ = bot.send_message(msg.chat.id, texts::GENERIC_ERROR).await;
                }
                Ok(())
            }
        },
    ))
}

/// Handler for plain text messages (registration flow input)
///
/// Anything that starts with a command prefix is never fed to the state
/// machine; unknown commands simply fall through the tree.
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().map(|text| !text.starts_with('/')).unwrap_or(false))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                if let Err(e) = handle_registration_message(&bot, &msg, &deps).await {
                    // A fault in one chat's flow must not affect others:
                    // log, reset the chat and apologize, never propagate.
                    log::error!("Registration handler failed for chat {}: {:?}", msg.chat.id, e);
                    deps.tracker.clear(msg.chat.id.0);
                    let _ = bot.send_message(msg.chat.id, texts::GENERIC_ERROR).await;
                }
                Ok(())
            }
        })
}
