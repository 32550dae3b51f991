use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use tokio::time::sleep;

use miacbot::cli::{Cli, Commands};
use miacbot::core::{config, init_logger, log_startup_configuration};
use miacbot::storage::create_pool;
use miacbot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps, RegistrationTracker};

/// Main entry point for the registration bot
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Catch panics from the dispatcher so they are logged instead of
    // silently terminating a worker task
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    init_logger(&config::LOG_FILE_PATH)?;

    // Load environment variables from .env if present
    let _ = dotenv();

    match cli.command {
        Some(Commands::Run { webhook }) => {
            log::info!("Running bot (webhook: {})", webhook);
            run_bot(webhook).await
        }
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot(false).await
        }
    }
}

async fn run_bot(use_webhook: bool) -> Result<()> {
    log::info!("Starting bot...");
    log_startup_configuration();

    let bot = create_bot()?;

    let bot_info = bot.get_me().await.map_err(|e| anyhow::anyhow!("Failed to connect to Bot API: {}", e))?;
    log::info!("Bot username: {:?}, Bot ID: {}", bot_info.username, bot_info.id);

    setup_bot_commands(&bot).await?;

    // Create database connection pool; a failure here (including a failed
    // schema migration) is fatal to startup
    let db_pool = Arc::new(
        create_pool(&config::DATABASE_PATH).map_err(|e| anyhow::anyhow!("Failed to create database pool: {}", e))?,
    );

    // Conversation state lives only in this process and starts empty;
    // registrations that were mid-flow before a restart are lost
    let tracker = Arc::new(RegistrationTracker::new());

    let handler = schema(HandlerDeps::new(Arc::clone(&db_pool), Arc::clone(&tracker)));

    let webhook_url = if use_webhook { config::WEBHOOK_URL.clone() } else { None };

    if let Some(url) = webhook_url {
        // Webhook mode: an axum listener receives updates from Telegram
        log::info!("Starting bot in webhook mode at {}", url);

        let addr = SocketAddr::from(([0, 0, 0, 0], *config::WEBHOOK_PORT));
        let listener = webhooks::axum(bot.clone(), webhooks::Options::new(addr, url::Url::parse(&url)?))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to set up webhook listener: {}", e))?;

        Dispatcher::builder(bot, handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    } else {
        // Long polling mode (default)
        log::info!("Starting bot in long polling mode");

        let mut retry_count = 0;
        let max_retries = config::retry::MAX_DISPATCHER_RETRIES;

        loop {
            let bot_clone = bot.clone();
            let handler_clone = handler.clone();

            // Run the dispatcher in a separate task to isolate panics;
            // they surface through the JoinHandle instead of taking the
            // process down
            let handle = tokio::spawn(async move {
                use teloxide::update_listeners::Polling;

                let listener = Polling::builder(bot_clone.clone()).drop_pending_updates().build();

                Dispatcher::builder(bot_clone, handler_clone)
                    .enable_ctrlc_handler()
                    .build()
                    .dispatch_with_listener(
                        listener,
                        LoggingErrorHandler::with_custom_text("An error from the update listener"),
                    )
                    .await
            });

            match handle.await {
                Ok(()) => {
                    log::info!("Dispatcher shutdown gracefully");
                    break;
                }
                Err(join_err) => {
                    if join_err.is_panic() {
                        log::error!("Dispatcher panicked: {}", join_err);

                        if retry_count < max_retries {
                            retry_count += 1;
                            log::info!(
                                "Retrying dispatcher connection after panic (attempt {}/{})...",
                                retry_count,
                                max_retries
                            );
                            sleep(config::retry::dispatcher_delay()).await;
                        } else {
                            log::error!("Max retries reached after panic. Exiting...");
                            break;
                        }
                    } else {
                        log::warn!("Dispatcher task was cancelled: {}", join_err);
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
