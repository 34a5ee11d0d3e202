//! Capture workflow glue: turning extraction output into stored vocabulary.
//!
//! The image-understanding call itself lives outside this crate; what the
//! core owns is the *output contract* of the two extraction backends and the
//! store-write half of the workflow:
//!
//! - the vision model replies with a JSON array of `{word, meaning}` objects
//!   (possibly wrapped in a markdown code fence),
//! - plain OCR yields raw text from which word candidates are scraped with
//!   empty meanings for the user to fill in,
//! - confirmed candidates are bulk-appended to the captured-word table.

use thiserror::Error;

use crate::quiz_engine::models::WordCandidate;
use crate::quiz_engine::store::{StoreError, WordStore};

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("extraction reply was not a valid candidate list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parse the vision backend's reply into candidate pairs.
///
/// Models routinely wrap the JSON in a ```` ```json ```` fence; strip it
/// before parsing.
pub fn parse_vision_reply(content: &str) -> Result<Vec<WordCandidate>, CaptureError> {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();
    Ok(serde_json::from_str(unfenced)?)
}

/// Scrape word candidates from raw OCR text.
///
/// Splits on whitespace, strips non-alphabetic characters, drops fragments
/// shorter than three characters (OCR noise), lowercases, and deduplicates
/// keeping first occurrence. Meanings start empty — the user supplies them
/// in the candidate editor.
pub fn candidates_from_ocr_text(text: &str) -> Vec<WordCandidate> {
    let mut seen = std::collections::HashSet::new();
    text.split_whitespace()
        .map(|raw| raw.chars().filter(|c| c.is_ascii_alphabetic()).collect::<String>())
        .filter(|w| w.len() > 2)
        .map(|w| w.to_lowercase())
        .filter(|w| seen.insert(w.clone()))
        .map(|word| WordCandidate { word, meaning: String::new() })
        .collect()
}

/// Persist the confirmed candidates, skipping rows the user left incomplete.
/// Returns how many were stored.
pub fn save_candidates(
    store: &WordStore,
    candidates: &[WordCandidate],
    created_at: i64,
) -> Result<usize, CaptureError> {
    Ok(store.add_captured_words(candidates, created_at)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vision_reply_parses_with_and_without_fence() {
        let bare = r#"[{"word": "apple", "meaning": "りんご"}]"#;
        let fenced = format!("```json\n{bare}\n```");

        for reply in [bare.to_string(), fenced] {
            let candidates = parse_vision_reply(&reply).unwrap();
            assert_eq!(candidates.len(), 1);
            assert_eq!(candidates[0].word, "apple");
            assert_eq!(candidates[0].meaning, "りんご");
        }
    }

    #[test]
    fn vision_reply_garbage_is_an_error() {
        assert!(parse_vision_reply("I could not read the image, sorry!").is_err());
    }

    #[test]
    fn ocr_text_is_cleaned_and_deduplicated() {
        let text = "The   quick1 brown\nfox fox an it Quick";
        let words: Vec<String> = candidates_from_ocr_text(text)
            .into_iter()
            .map(|c| c.word)
            .collect();
        // "an"/"it" are too short, digits are stripped, "Quick" folds into
        // the earlier "quick1" → "quick".
        assert_eq!(words, vec!["the", "quick", "brown", "fox"]);
    }
}
