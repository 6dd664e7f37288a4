//! Telegram front-end for text-to-image generation.
//!
//! Relays `/generate <prompt>` messages to the Stability AI REST API and
//! sends the first generated image back to the chat it came from.
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_TOKEN`: Bot token from @BotFather
//! - `STABILITY_KEY`: Stability AI API key
//!
//! Optional:
//! - `STABILITY_API_HOST`: API base URL (default: https://api.stability.ai)
//! - `STABILITY_ENGINE`: Engine ID (default: stable-diffusion-v1-6)
//! - `STABILITY_TIMEOUT_SECS`: HTTP timeout for generation calls (default: 120)
//! - `RUST_LOG`: Log filter (default: dreamweaver_bot=info,teloxide=warn)
//!
//! # Commands
//!
//! - `/start` - Welcome message
//! - `/help` - Commands and prompt tips
//! - `/generate <description>` - Generate an image

pub mod ai;
pub mod app;
pub mod bot;
pub mod error;
pub mod messages;
pub mod models;

pub use error::{Error, Result};
