//! Command handlers for the bot.
//!
//! Each handler maps one update to replies on a [`ChatTransport`]. Nothing is
//! kept between calls; the generation service is borrowed read-only.

use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};

use super::ChatTransport;
use crate::ai::ImageGenerationService;
use crate::models::{first_image, GenerationRequest};
use crate::{messages, Error, Result};

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot and see welcome message")]
    Start,

    #[command(description = "Show help message")]
    Help,

    #[command(description = "Create an image from your text description")]
    Generate(String),
}

/// Parse a message text into a [`Command`].
///
/// teloxide only splits the command from its arguments at a space, so a
/// prompt on the next line (or after a tab) would leave the command
/// unrecognised. Any other leading whitespace is kept as part of the
/// arguments.
pub fn parse_command(text: &str, bot_username: &str) -> Option<Command> {
    match text.find(char::is_whitespace) {
        Some(at) if !text[at..].starts_with(' ') => {
            let (head, rest) = text.split_at(at);
            Command::parse(&format!("{} {}", head, rest), bot_username).ok()
        }
        _ => Command::parse(text, bot_username).ok(),
    }
}

/// What followed the generate command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    /// Nothing at all.
    Bare,
    /// Only whitespace.
    Blank,
    Prompt(String),
}

impl PromptInput {
    pub fn parse(args: &str) -> Self {
        if args.is_empty() {
            return Self::Bare;
        }

        match args.trim() {
            "" => Self::Blank,
            prompt => Self::Prompt(prompt.to_string()),
        }
    }
}

/// How a generation request ended from the user's point of view.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// Photo sent, status message removed.
    Delivered,
    /// The service answered without any image artifact.
    NoImage,
    /// The call or the photo upload failed; the status message says so.
    Failed(Error),
}

/// Dispatch commands to appropriate handlers.
pub async fn handle_command(
    transport: &dyn ChatTransport,
    service: &dyn ImageGenerationService,
    cmd: Command,
) -> Result<()> {
    match cmd {
        Command::Start => {
            transport.send_text(messages::WELCOME).await?;
        }
        Command::Help => {
            transport.send_text(messages::HELP).await?;
        }
        Command::Generate(args) => {
            handle_generate(transport, service, &args).await?;
        }
    }
    Ok(())
}

/// Handle the text after `/generate`.
///
/// Returns `None` when no generation was attempted.
pub async fn handle_generate(
    transport: &dyn ChatTransport,
    service: &dyn ImageGenerationService,
    args: &str,
) -> Result<Option<GenerationOutcome>> {
    match PromptInput::parse(args) {
        PromptInput::Bare => {
            transport.send_text(messages::GENERATE_USAGE).await?;
            Ok(None)
        }
        PromptInput::Blank => {
            transport.send_text(messages::MISSING_PROMPT).await?;
            Ok(None)
        }
        PromptInput::Prompt(prompt) => generate_and_reply(transport, service, &prompt)
            .await
            .map(Some),
    }
}

/// Run one generation for `prompt` and report the result in the chat.
///
/// Service and upload failures are answered in the chat and returned as
/// [`GenerationOutcome::Failed`]; only transport errors on the status
/// message itself come back as `Err`.
pub async fn generate_and_reply(
    transport: &dyn ChatTransport,
    service: &dyn ImageGenerationService,
    prompt: &str,
) -> Result<GenerationOutcome> {
    let status = transport.send_text(messages::GENERATING).await?;

    let request = GenerationRequest::new(prompt);
    info!(prompt = %prompt, seed = request.seed, "Generating image");

    let answers = match service.generate(&request).await {
        Ok(answers) => answers,
        Err(e) => {
            error!(prompt = %prompt, error = %e, "Error generating image");
            transport
                .edit_text(status, messages::GENERATION_FAILED)
                .await?;
            return Ok(GenerationOutcome::Failed(e));
        }
    };

    let Some(image) = first_image(&answers) else {
        warn!(
            prompt = %prompt,
            answers = answers.len(),
            "Generation finished without an image artifact"
        );
        transport.edit_text(status, messages::NO_IMAGE).await?;
        return Ok(GenerationOutcome::NoImage);
    };

    let caption = messages::caption_for(prompt);
    if let Err(e) = transport.send_photo(image.to_vec(), &caption).await {
        error!(prompt = %prompt, error = %e, "Failed to send generated image");
        transport
            .edit_text(status, messages::GENERATION_FAILED)
            .await?;
        return Ok(GenerationOutcome::Failed(e));
    }

    if let Err(e) = transport.delete(status).await {
        warn!(error = %e, "Failed to delete status message");
    }

    info!(prompt = %prompt, bytes = image.len(), "Image delivered");
    Ok(GenerationOutcome::Delivered)
}

/// Reply to a `/something` the bot does not know.
pub async fn handle_unknown_command(transport: &dyn ChatTransport, text: &str) -> Result<()> {
    let command = text.split_whitespace().next().unwrap_or(text);
    info!(cmd = %command, "Unrecognized command");

    let reply = messages::render(messages::UNKNOWN_COMMAND, &[("command", command)]);
    transport.send_text(&reply).await?;
    Ok(())
}

/// Last-resort handling for an update whose handler failed.
///
/// Logs the update and error, then tries once to tell the user. A failure
/// of that reply is dropped.
pub async fn report_failure(transport: &dyn ChatTransport, update: &str, error: &Error) {
    error!(update = %update, error = %error, "Update caused error");

    if let Err(e) = transport.send_text(messages::FAILURE).await {
        debug!(error = %e, "Could not deliver failure notice");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockImageGenerationClient;
    use crate::bot::{MockTransport, Outgoing, SentMessage};
    use crate::models::{Answer, Artifact};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prompt_input_parse() {
        assert_eq!(PromptInput::parse(""), PromptInput::Bare);
        assert_eq!(PromptInput::parse("   \t "), PromptInput::Blank);
        assert_eq!(
            PromptInput::parse("  a castle in the clouds \n"),
            PromptInput::Prompt("a castle in the clouds".to_string())
        );
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("/start", "dreamweaver_bot").unwrap(), Command::Start);
        assert_eq!(
            Command::parse("/help@dreamweaver_bot", "dreamweaver_bot").unwrap(),
            Command::Help
        );

        match Command::parse("/generate a magical forest", "dreamweaver_bot").unwrap() {
            Command::Generate(args) => assert_eq!(args.trim(), "a magical forest"),
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Command::parse("/paint a cat", "dreamweaver_bot").is_err());
    }

    #[test]
    fn test_parse_command_prompt_after_newline_or_tab() {
        for text in ["/generate\na fox", "/generate\ta fox", "/generate@dreamweaver_bot\na fox"] {
            match parse_command(text, "dreamweaver_bot") {
                Some(Command::Generate(args)) => {
                    assert_eq!(PromptInput::parse(&args), PromptInput::Prompt("a fox".to_string()))
                }
                other => panic!("unexpected parse of {:?}: {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_parse_command_keeps_bare_and_blank_apart() {
        match parse_command("/generate", "dreamweaver_bot") {
            Some(Command::Generate(args)) => assert_eq!(PromptInput::parse(&args), PromptInput::Bare),
            other => panic!("unexpected parse: {:?}", other),
        }
        match parse_command("/generate\n", "dreamweaver_bot") {
            Some(Command::Generate(args)) => assert_eq!(PromptInput::parse(&args), PromptInput::Blank),
            other => panic!("unexpected parse: {:?}", other),
        }
        assert_eq!(parse_command("/start", "dreamweaver_bot"), Some(Command::Start));
        assert_eq!(parse_command("/paint\na cat", "dreamweaver_bot"), None);
        assert_eq!(parse_command("hello there", "dreamweaver_bot"), None);
    }

    #[tokio::test]
    async fn test_static_commands() {
        let service = MockImageGenerationClient::new();

        for (cmd, expected) in [
            (Command::Start, messages::WELCOME),
            (Command::Help, messages::HELP),
            (Command::Generate(String::new()), messages::GENERATE_USAGE),
        ] {
            let transport = MockTransport::new();
            handle_command(&transport, &service, cmd).await.unwrap();
            assert_eq!(
                transport.get_outgoing(),
                vec![Outgoing::Text(expected.to_string())]
            );
        }

        assert_eq!(service.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_prompt_makes_no_call() {
        let transport = MockTransport::new();
        let service = MockImageGenerationClient::new();

        let outcome = handle_generate(&transport, &service, "    ").await.unwrap();

        assert!(outcome.is_none());
        assert_eq!(service.get_call_count(), 0);
        assert_eq!(
            transport.get_outgoing(),
            vec![Outgoing::Text(messages::MISSING_PROMPT.to_string())]
        );
    }

    #[tokio::test]
    async fn test_generate_delivers_first_image() {
        let transport = MockTransport::new();
        let service = MockImageGenerationClient::new().with_answers(vec![
            Answer::new(vec![Artifact::other("CONTENT_FILTERED")]),
            Answer::new(vec![Artifact::image(vec![10, 20, 30]), Artifact::image(vec![40])]),
            Answer::new(vec![Artifact::image(vec![50])]),
        ]);

        let outcome = handle_generate(&transport, &service, "  northern lights  ")
            .await
            .unwrap();

        assert!(matches!(outcome, Some(GenerationOutcome::Delivered)));
        assert_eq!(service.get_requests()[0].prompt, "northern lights");
        assert_eq!(
            transport.get_outgoing(),
            vec![
                Outgoing::Text(messages::GENERATING.to_string()),
                Outgoing::Photo {
                    image: vec![10, 20, 30],
                    caption: "🎨 Generated image for: 'northern lights'".to_string(),
                },
                Outgoing::Delete(SentMessage(1)),
            ]
        );
    }

    #[tokio::test]
    async fn test_generate_without_image_edits_status() {
        let transport = MockTransport::new();
        let service = MockImageGenerationClient::new().with_answers(vec![
            Answer::new(vec![Artifact::other("CONTENT_FILTERED")]),
            Answer::default(),
        ]);

        let outcome = generate_and_reply(&transport, &service, "a fox")
            .await
            .unwrap();

        assert!(matches!(outcome, GenerationOutcome::NoImage));
        assert!(transport.get_photos().is_empty());
        assert_eq!(
            transport.get_outgoing(),
            vec![
                Outgoing::Text(messages::GENERATING.to_string()),
                Outgoing::Edit {
                    message: SentMessage(1),
                    text: messages::NO_IMAGE.to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_generate_service_failure_edits_status() {
        let transport = MockTransport::new();
        let service = MockImageGenerationClient::new().with_failure("insufficient balance");

        let outcome = generate_and_reply(&transport, &service, "a fox")
            .await
            .unwrap();

        match outcome {
            GenerationOutcome::Failed(e) => assert!(e.to_string().contains("insufficient balance")),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(service.get_call_count(), 1);
        assert_eq!(
            transport.get_outgoing(),
            vec![
                Outgoing::Text(messages::GENERATING.to_string()),
                Outgoing::Edit {
                    message: SentMessage(1),
                    text: messages::GENERATION_FAILED.to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_generate_photo_upload_failure_edits_status() {
        let transport = MockTransport::new().failing_photos();
        let service = MockImageGenerationClient::new().with_image(vec![1, 2]);

        let outcome = generate_and_reply(&transport, &service, "a fox")
            .await
            .unwrap();

        assert!(matches!(outcome, GenerationOutcome::Failed(Error::Telegram(_))));
        assert_eq!(
            transport.get_outgoing(),
            vec![
                Outgoing::Text(messages::GENERATING.to_string()),
                Outgoing::Edit {
                    message: SentMessage(1),
                    text: messages::GENERATION_FAILED.to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_generate_status_send_failure_propagates() {
        let transport = MockTransport::new().failing_texts();
        let service = MockImageGenerationClient::new();

        let err = generate_and_reply(&transport, &service, "a fox")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Telegram(_)));
        assert_eq!(service.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_command_reply() {
        let transport = MockTransport::new();

        handle_unknown_command(&transport, "/paint a cat").await.unwrap();

        assert_eq!(
            transport.get_outgoing(),
            vec![Outgoing::Text(
                "Unknown command: /paint\n\nUse /help to see available commands.".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_report_failure_sends_generic_reply() {
        let transport = MockTransport::new();
        let error = Error::AiProvider("boom".to_string());

        report_failure(&transport, "chat 42", &error).await;

        assert_eq!(
            transport.get_outgoing(),
            vec![Outgoing::Text(messages::FAILURE.to_string())]
        );
    }

    #[tokio::test]
    async fn test_report_failure_swallows_secondary_error() {
        let transport = MockTransport::new().failing_texts();
        let error = Error::AiProvider("boom".to_string());

        report_failure(&transport, "chat 42", &error).await;

        assert!(transport.get_outgoing().is_empty());
    }
}
