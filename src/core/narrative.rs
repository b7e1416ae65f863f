use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{PreferenceSet, StyleNarrative};
use crate::services::generator::{GenerationError, TextGenerator};

/// Style words looked for in generated text, in reporting order
pub const STYLE_VOCABULARY: &[&str] = &[
    "casual",
    "formal",
    "bohemian",
    "preppy",
    "vintage",
    "minimalist",
    "classic",
    "edgy",
    "streetwear",
    "elegant",
    "sophisticated",
    "athletic",
    "sporty",
    "comfortable",
    "trendy",
    "conservative",
];

/// Keywords used when the text yields too few vocabulary hits
pub const FALLBACK_KEYWORDS: &[&str] = &["personalized", "balanced", "thoughtful"];

pub const MIN_KEYWORDS: usize = 3;
pub const MAX_KEYWORDS: usize = 5;

pub const STYLIST_SYSTEM_PROMPT: &str = "You are a professional fashion stylist and personal shopper with expertise in analyzing style preferences.";

pub const FALLBACK_DESCRIPTION: &str = "Unable to generate style analysis. Please try again later.";

pub const ERROR_KEYWORD: &str = "error";

pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

const PROMPT_REQUESTS: [&str; 5] = [
    "A summary of their overall style aesthetic",
    "Key style elements that define their look",
    "Recommendations for clothing items and accessories",
    "Color palette suggestions",
    "Brands or stores that would match their style",
];

/// Turn a preference key into a label: `color_palette` -> `Color Palette`
pub fn humanize_key(key: &str) -> String {
    let mut label = String::with_capacity(key.len());
    let mut at_word_start = true;

    for ch in key.replace('_', " ").chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                label.extend(ch.to_uppercase());
            } else {
                label.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            label.push(ch);
            at_word_start = true;
        }
    }

    label
}

/// Build the analysis prompt for a preference set
///
/// One line per preference in the set's own order, then the five fixed
/// requests in order.
pub fn build_style_prompt(preferences: &PreferenceSet) -> String {
    let mut prompt = String::from(
        "Based on the following style preferences, provide a comprehensive analysis of this person's style profile:\n\n",
    );

    for (key, value) in preferences.iter() {
        prompt.push_str(&format!("- {}: {}\n", humanize_key(key), value));
    }

    prompt.push_str("\nPlease provide:\n");
    for (i, request) in PROMPT_REQUESTS.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, request));
    }

    prompt
}

/// Pick the vocabulary words present in `text`
///
/// Matching is a case-insensitive substring test, results follow vocabulary
/// order. Fewer than [`MIN_KEYWORDS`] hits are replaced wholesale by
/// [`FALLBACK_KEYWORDS`]; the result never exceeds [`MAX_KEYWORDS`].
pub fn extract_style_keywords(text: &str, vocabulary: &[&str]) -> Vec<String> {
    let haystack = text.to_lowercase();

    let found: Vec<&str> = vocabulary
        .iter()
        .copied()
        .filter(|word| haystack.contains(&word.to_lowercase()))
        .collect();

    let keywords = if found.len() < MIN_KEYWORDS {
        FALLBACK_KEYWORDS
    } else {
        found.as_slice()
    };

    keywords
        .iter()
        .take(MAX_KEYWORDS)
        .map(|word| word.to_string())
        .collect()
}

/// Decorates preference sets with an AI-written style narrative
///
/// Generation is a single attempt bounded by a timeout. Any failure is
/// logged and converted into a fallback narrative, so `generate` always
/// returns a storable value.
#[derive(Clone)]
pub struct NarrativeGenerator {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
    max_tokens: u32,
}

impl NarrativeGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            timeout: DEFAULT_GENERATION_TIMEOUT,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub async fn generate(&self, preferences: &PreferenceSet) -> StyleNarrative {
        let generated_at = Utc::now();

        match self.request_analysis(preferences).await {
            Ok(text) => {
                let keywords = extract_style_keywords(&text, STYLE_VOCABULARY);
                tracing::debug!(
                    "Generated style narrative via {} ({} keywords)",
                    self.generator.name(),
                    keywords.len()
                );
                StyleNarrative {
                    description: text,
                    keywords,
                    generated_at,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Style narrative generation via {} failed, using fallback: {}",
                    self.generator.name(),
                    e
                );
                StyleNarrative {
                    description: FALLBACK_DESCRIPTION.to_string(),
                    keywords: vec![ERROR_KEYWORD.to_string()],
                    generated_at,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn request_analysis(&self, preferences: &PreferenceSet) -> Result<String, GenerationError> {
        let prompt = build_style_prompt(preferences);

        let call = self
            .generator
            .complete(STYLIST_SYSTEM_PROMPT, &prompt, self.max_tokens);

        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(self.timeout)),
        }
    }
}
