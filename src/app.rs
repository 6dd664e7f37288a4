//! Application wiring: configuration, the generation client and the
//! Telegram dispatcher.

use crate::ai::{ImageGenerationService, StabilityImageClient};
use crate::bot::handlers::{self, Command};
use crate::bot::TelegramTransport;
use crate::models::Config;
use crate::Result;
use std::sync::Arc;
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::types::Me;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, info_span, warn, Instrument};

/// Generation client shared read-only by every handler invocation.
pub type SharedImageService = Arc<dyn ImageGenerationService>;

/// Owns the bot handle and the generation client for the process lifetime.
pub struct App {
    bot: Bot,
    service: SharedImageService,
}

impl App {
    /// Build an app from an existing bot and generation service.
    ///
    /// Lets harnesses swap in a mock service.
    pub fn with_services(bot: Bot, service: SharedImageService) -> Self {
        Self { bot, service }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        info!(
            engine = %config.stability_engine,
            host = %config.stability_api_host,
            "Image provider: Stability AI"
        );

        let service = StabilityImageClient::new(
            config.stability_key.clone(),
            config.stability_engine.clone(),
            config.stability_timeout,
        )?
        .with_base_url(config.stability_api_host.clone());

        Ok(Self::with_services(
            Bot::new(config.telegram_token.clone()),
            Arc::new(service),
        ))
    }

    /// Long-poll Telegram until ctrl-c.
    pub async fn run(self) -> Result<()> {
        let me = self.bot.get_me().await?;
        info!(username = %me.username(), "Bot initialized successfully");

        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!(error = %e, "Failed to register command list");
        }

        info!("Bot is running! Send /start to begin.");

        Dispatcher::builder(self.bot, schema())
            .dependencies(dptree::deps![self.service])
            .default_handler(|upd| async move {
                debug!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Bot stopped");
        Ok(())
    }
}

/// Update routing: known commands, then unknown `/...` messages.
/// Plain text falls through to the default handler.
///
/// Expects `Bot`, `Me` and [`SharedImageService`] in the dependency map.
pub fn schema() -> UpdateHandler<crate::Error> {
    let commands = Update::filter_message()
        .filter_map(|msg: Message, me: Me| {
            msg.text()
                .and_then(|text| handlers::parse_command(text, me.username()))
        })
        .endpoint(on_command);

    let unknown_commands = Update::filter_message()
        .filter(|msg: Message| msg.text().is_some_and(|t| t.starts_with('/')))
        .endpoint(on_unknown_command);

    dptree::entry().branch(commands).branch(unknown_commands)
}

fn describe_update(msg: &Message) -> String {
    format!(
        "message {} in chat {}: {:?}",
        msg.id.0,
        msg.chat.id,
        msg.text().unwrap_or_default()
    )
}

async fn on_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    service: SharedImageService,
) -> Result<()> {
    let transport = TelegramTransport::new(bot, msg.chat.id);
    let span = info_span!("update", chat_id = %msg.chat.id);

    async {
        info!("Command matched: {:?}", cmd);
        if let Err(e) = handlers::handle_command(&transport, service.as_ref(), cmd).await {
            handlers::report_failure(&transport, &describe_update(&msg), &e).await;
        }
    }
    .instrument(span)
    .await;

    Ok(())
}

async fn on_unknown_command(bot: Bot, msg: Message) -> Result<()> {
    let transport = TelegramTransport::new(bot, msg.chat.id);
    let text = msg.text().unwrap_or_default();

    if let Err(e) = handlers::handle_unknown_command(&transport, text)
        .instrument(info_span!("update", chat_id = %msg.chat.id))
        .await
    {
        handlers::report_failure(&transport, &describe_update(&msg), &e).await;
    }

    Ok(())
}
