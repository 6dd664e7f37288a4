//! User-facing reply texts.
//!
//! Every text is kept under `data/messages/` and embedded at compile time.

pub const WELCOME: &str = include_str!("../data/messages/welcome.txt");
pub const HELP: &str = include_str!("../data/messages/help.txt");
pub const GENERATE_USAGE: &str = include_str!("../data/messages/generate_usage.txt");
pub const MISSING_PROMPT: &str = include_str!("../data/messages/missing_prompt.txt");
pub const GENERATING: &str = include_str!("../data/messages/generating.txt");
pub const GENERATION_FAILED: &str = include_str!("../data/messages/generation_failed.txt");
pub const NO_IMAGE: &str = include_str!("../data/messages/no_image.txt");
pub const FAILURE: &str = include_str!("../data/messages/failure.txt");
pub const UNKNOWN_COMMAND: &str = include_str!("../data/messages/unknown_command.txt");
pub const CAPTION: &str = include_str!("../data/messages/caption.txt");

/// Telegram rejects photo captions longer than this many UTF-16 code units.
pub const CAPTION_LIMIT: usize = 1024;

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Caption for a generated photo. Overlong prompts are cut with an ellipsis.
pub fn caption_for(prompt: &str) -> String {
    let caption = render(CAPTION, &[("prompt", prompt)]);
    if utf16_len(&caption) <= CAPTION_LIMIT {
        return caption;
    }

    let frame = utf16_len(CAPTION) - utf16_len("{{prompt}}");
    let budget = CAPTION_LIMIT.saturating_sub(frame + utf16_len("…"));
    let mut used = 0;
    let mut shortened: String = prompt
        .chars()
        .take_while(|c| {
            used += c.len_utf16();
            used <= budget
        })
        .collect();
    shortened.push('…');
    render(CAPTION, &[("prompt", &shortened)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_var() {
        assert_eq!(
            render("Hello {{name}}!", &[("name", "world")]),
            "Hello world!"
        );
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{{a}} and {{b}}", &[("a", "cats")]), "cats and {{b}}");
    }

    #[test]
    fn test_messages_are_non_empty_and_untrimmed() {
        for text in [
            WELCOME,
            HELP,
            GENERATE_USAGE,
            MISSING_PROMPT,
            GENERATING,
            GENERATION_FAILED,
            NO_IMAGE,
            FAILURE,
            UNKNOWN_COMMAND,
            CAPTION,
        ] {
            assert!(!text.is_empty());
            assert_eq!(text, text.trim_end());
        }
    }

    #[test]
    fn test_fixed_texts() {
        assert_eq!(MISSING_PROMPT, "Please provide a description after /generate");
        assert_eq!(GENERATING, "🎨 Generating your image... Please wait!");
        assert_eq!(
            GENERATION_FAILED,
            "❌ Sorry, there was an error generating your image. Please try again later."
        );
        assert_eq!(FAILURE, "Sorry, something went wrong. Please try again later.");
    }

    #[test]
    fn test_caption_for_short_prompt() {
        assert_eq!(
            caption_for("a red fox"),
            "🎨 Generated image for: 'a red fox'"
        );
    }

    #[test]
    fn test_caption_for_long_prompt_fits_limit() {
        let prompt = "fox ".repeat(400);
        let caption = caption_for(&prompt);

        assert_eq!(utf16_len(&caption), CAPTION_LIMIT);
        assert!(caption.starts_with("🎨 Generated image for: 'fox fox"));
        assert!(caption.ends_with("…'"));
    }

    #[test]
    fn test_caption_for_emoji_prompt_counts_utf16_units() {
        let prompt = "🌈".repeat(2000);
        let caption = caption_for(&prompt);

        assert!(utf16_len(&caption) <= CAPTION_LIMIT);
        assert!(caption.starts_with("🎨 Generated image for: '🌈🌈"));
        assert!(caption.ends_with("…'"));
    }

    #[test]
    fn test_caption_for_emoji_prompt_at_char_limit_is_shortened() {
        // 1024 chars once framed, but well over 1024 UTF-16 units.
        let prompt = "🌈".repeat(999);
        assert_eq!(render(CAPTION, &[("prompt", &prompt)]).chars().count(), CAPTION_LIMIT);

        let caption = caption_for(&prompt);
        assert!(utf16_len(&caption) <= CAPTION_LIMIT);
        assert!(caption.ends_with("…'"));
    }
}
