//! Prompt construction for the image generator.
//!
//! The user supplies a Hindi prompt and a choice of whether the text itself
//! should appear in the picture. [`build`] turns those two inputs into the
//! instruction sent to the model.

use std::borrow::Cow;

/// Prompts with at most this many whitespace-separated words are treated as
/// short labels and wrapped in a scene description before being sent.
pub const SHORT_PROMPT_MAX_WORDS: usize = 8;

/// Whether the prompt text should be rendered inside the generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    /// The Hindi text is painted onto banners, signs or papers in the scene.
    Embedded,
    /// The image must not contain any text at all.
    #[default]
    Forbidden,
}

impl From<bool> for TextMode {
    fn from(include_text: bool) -> Self {
        if include_text {
            Self::Embedded
        } else {
            Self::Forbidden
        }
    }
}

/// Builds the final instruction for `raw` under the given text policy.
///
/// Never fails. Callers are expected to reject empty input beforehand.
pub fn build(raw: &str, include_text: bool) -> String {
    build_with_mode(raw, TextMode::from(include_text))
}

/// Same as [`build`], taking an explicit [`TextMode`].
pub fn build_with_mode(raw: &str, mode: TextMode) -> String {
    match mode {
        TextMode::Embedded => embedded_text_prompt(raw),
        TextMode::Forbidden => text_free_prompt(&context_description(raw)),
    }
}

/// Returns the scene description used when text is forbidden.
///
/// Short prompts are expanded into a full Hindi sentence describing a
/// natural scene; longer prompts are already descriptive and pass through.
pub fn context_description(raw: &str) -> Cow<'_, str> {
    if is_short(raw) {
        Cow::Owned(format!(
            "एक दृश्य जिसमें {raw} पूरी तरह से प्राकृतिक रूप से चित्रित हो। \
             यह सिर्फ एक लेबल नहीं है, बल्कि एक पूर्ण वातावरण और दृश्य होना चाहिए। \
             किसी भी प्रकार का पाठ या शब्द चित्र में नहीं होना चाहिए।"
        ))
    } else {
        Cow::Borrowed(raw)
    }
}

/// True when `raw` has no more than [`SHORT_PROMPT_MAX_WORDS`] words.
pub fn is_short(raw: &str) -> bool {
    word_count(raw) <= SHORT_PROMPT_MAX_WORDS
}

/// Counts words separated by runs of whitespace.
///
/// The ASCII information separators U+001C..=U+001F also split words.
pub fn word_count(raw: &str) -> usize {
    raw.split(is_word_separator)
        .filter(|w| !w.is_empty())
        .count()
}

fn is_word_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn embedded_text_prompt(raw: &str) -> String {
    format!(
        "GENERATE A PROFESSIONAL VISUAL IMAGE in a vibrant, highly detailed, animated illustration style. \
         The image MUST have a precise **16:9 widescreen aspect ratio**. \
         Ensure that **the provided Hindi text or words are clearly visible and well-integrated** into the image design \
         — like on banners, signs, papers, or visually appropriate elements. \
         The Hindi text must appear **readable, naturally embedded**, and **not distorted**. \
         Every element described in the following Hindi input must be included:\n\n\
         '{raw}'"
    )
}

fn text_free_prompt(description: &str) -> String {
    format!(
        "STRICTLY GENERATE A VISUAL IMAGE. \
         The image MUST be a vibrant, highly detailed, professional **animated illustration**. \
         It MUST have a **16:9 widescreen aspect ratio**. \
         **DO NOT INCLUDE ANY TEXT OR WRITING** in the image \
         — this includes but is not limited to signs, labels, posters, screens, papers, books, symbols, characters, \
         or written language in any form. \
         The image MUST NOT contain any alphabetic or numeric characters. \
         **NO TEXT OR SYMBOLS** should appear anywhere in the final image. \
         CRITICALLY IMPORTANT: Every visual element, character, object, and environmental detail described in the \
         following Hindi text MUST be visually represented with high fidelity. \
         DO NOT OMIT ANY DETAIL. \
         Generate a vivid and complete scene that perfectly visualizes the following Hindi description:\n\n\
         '{description}'"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN_WORDS: &str = "एक जंगल में नाचती हुई एक छोटी परी चमकती पंखों";

    fn words(n: usize) -> String {
        vec!["शब्द"; n].join(" ")
    }

    #[test]
    fn test_text_mode_from_bool() {
        assert_eq!(TextMode::from(true), TextMode::Embedded);
        assert_eq!(TextMode::from(false), TextMode::Forbidden);
    }

    #[test]
    fn test_embedded_contains_prompt_once_quoted() {
        let raw = "दीवाली की शुभकामनाएँ";
        let prompt = build(raw, true);

        assert_eq!(prompt.matches(raw).count(), 1);
        assert!(prompt.ends_with(&format!("\n\n'{raw}'")));
        assert!(prompt.contains("16:9"));
        assert!(prompt.contains("clearly visible and well-integrated"));
        assert!(prompt.contains("banners, signs, papers"));
        assert!(prompt.contains("**not distorted**"));
    }

    #[test]
    fn test_embedded_ignores_word_count() {
        let long = build(TEN_WORDS, true);
        assert!(long.ends_with(&format!("'{TEN_WORDS}'")));
        assert!(!long.contains("एक दृश्य जिसमें"));
    }

    #[test]
    fn test_short_prompt_is_wrapped() {
        let prompt = build("सूरज", false);

        assert!(prompt.starts_with("STRICTLY GENERATE A VISUAL IMAGE. "));
        assert!(prompt.contains("'एक दृश्य जिसमें सूरज पूरी तरह से प्राकृतिक रूप से चित्रित हो।"));
        assert!(prompt.ends_with("किसी भी प्रकार का पाठ या शब्द चित्र में नहीं होना चाहिए।'"));
        assert!(!prompt.ends_with("'सूरज'"));
        assert!(prompt.contains("**DO NOT INCLUDE ANY TEXT OR WRITING**"));
        assert!(prompt.contains("MUST NOT contain any alphabetic or numeric characters"));
        assert!(prompt.contains("16:9"));
    }

    #[test]
    fn test_long_prompt_passes_through() {
        let prompt = build(TEN_WORDS, false);

        assert!(prompt.ends_with(&format!("\n\n'{TEN_WORDS}'")));
        assert_eq!(prompt.matches(TEN_WORDS).count(), 1);
        assert!(!prompt.contains("एक दृश्य जिसमें"));
        assert!(prompt.contains("**NO TEXT OR SYMBOLS**"));
        assert!(prompt.contains("DO NOT OMIT ANY DETAIL."));
    }

    #[test]
    fn test_threshold_is_inclusive_at_eight() {
        assert!(is_short(&words(8)));
        assert!(!is_short(&words(9)));

        assert!(build(&words(8), false).contains("एक दृश्य जिसमें"));
        assert!(!build(&words(9), false).contains("एक दृश्य जिसमें"));
    }

    #[test]
    fn test_information_separators_split_words() {
        let raw = "a\u{1c}b c d e f g h i";
        assert_eq!(word_count(raw), 9);
        assert!(!is_short(raw));
        assert!(build(raw, false).ends_with(&format!("\n\n'{raw}'")));

        assert_eq!(word_count("सूरज\u{1f}चाँद\u{a0}तारे\u{3000}बादल"), 4);
    }

    #[test]
    fn test_threshold_counts_whitespace_runs_once() {
        let spaced = "  सूरज \n\t चाँद   तारे  ";
        assert_eq!(word_count(spaced), 3);
        assert!(is_short(spaced));
        assert!(matches!(context_description(spaced), Cow::Owned(_)));
    }

    #[test]
    fn test_context_description_borrows_long_input() {
        assert!(matches!(context_description(TEN_WORDS), Cow::Borrowed(s) if s == TEN_WORDS));
    }

    #[test]
    fn test_build_is_deterministic() {
        for include_text in [true, false] {
            assert_eq!(build("सूरज", include_text), build("सूरज", include_text));
        }
    }

    #[test]
    fn test_build_with_mode_matches_build() {
        assert_eq!(build_with_mode("चाँद", TextMode::Embedded), build("चाँद", true));
        assert_eq!(build_with_mode("चाँद", TextMode::Forbidden), build("चाँद", false));
    }
}
