//! Evidence snippet extraction
//!
//! For each phrase, in the order given, the first case-insensitive occurrence
//! in the whitespace-normalized text is located and a window of characters on
//! either side is cut out. Snippets come back in phrase order rather than
//! document order, so the rule table's ordering decides which evidence is
//! shown first.

use filingwatch_core::normalize_whitespace;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

const ELLIPSIS: &str = "...";

/// Bounds applied to extracted snippets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceConfig {
    /// Characters kept before and after the match
    #[serde(default = "default_window")]
    pub window: usize,

    /// Maximum number of snippets returned
    #[serde(default = "default_max_snippets")]
    pub max_snippets: usize,

    /// Maximum snippet length in characters, ellipsis included
    #[serde(default = "default_max_len")]
    pub max_len: usize,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            max_snippets: default_max_snippets(),
            max_len: default_max_len(),
        }
    }
}

fn default_window() -> usize {
    250
}

fn default_max_snippets() -> usize {
    3
}

fn default_max_len() -> usize {
    200
}

impl EvidenceConfig {
    /// Extract snippets from `text` using these bounds
    pub fn extract<S: AsRef<str>>(&self, text: &str, phrases: &[S]) -> Vec<String> {
        extract_snippets(text, phrases, self.window, self.max_snippets, self.max_len)
    }
}

/// Return up to `max_snippets` bounded, de-duplicated excerpts around `phrases`
pub fn extract_snippets<S: AsRef<str>>(
    text: &str,
    phrases: &[S],
    window: usize,
    max_snippets: usize,
    max_len: usize,
) -> Vec<String> {
    if text.is_empty() || phrases.is_empty() || max_snippets == 0 {
        return Vec::new();
    }

    let normalized = normalize_whitespace(text);
    let needles: Vec<String> = phrases
        .iter()
        .map(|p| normalize_whitespace(p.as_ref()))
        .collect();

    let spans = first_occurrences(&normalized, &needles);

    let mut seen_starts = HashSet::new();
    let mut snippets: Vec<String> = Vec::new();

    for (start, end) in spans.into_iter().flatten() {
        if snippets.len() >= max_snippets {
            break;
        }
        if !seen_starts.insert(start) {
            continue;
        }

        let from = back_chars(&normalized, start, window);
        let to = forward_chars(&normalized, end, window);

        let snippet = truncate_chars(&normalize_whitespace(&normalized[from..to]), max_len);
        if snippet.is_empty() || snippets.contains(&snippet) {
            continue;
        }
        snippets.push(snippet);
    }

    snippets
}

/// Byte span of the first match of each needle, `None` where absent
///
/// Matching folds Unicode case, so a span can be longer or shorter than its
/// needle. Empty needles never match.
fn first_occurrences(haystack: &str, needles: &[String]) -> Vec<Option<(usize, usize)>> {
    needles
        .iter()
        .map(|needle| {
            if needle.is_empty() {
                return None;
            }
            match RegexBuilder::new(&regex::escape(needle))
                .case_insensitive(true)
                .build()
            {
                Ok(re) => re.find(haystack).map(|m| (m.start(), m.end())),
                Err(e) => {
                    warn!(phrase = %needle, error = %e, "Skipping evidence phrase");
                    None
                }
            }
        })
        .collect()
}

/// Byte offset `n` characters before `byte_idx`, clipped to the start
fn back_chars(text: &str, byte_idx: usize, n: usize) -> usize {
    if n == 0 {
        return byte_idx;
    }
    text[..byte_idx]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset `n` characters after `byte_idx`, clipped to the end
fn forward_chars(text: &str, byte_idx: usize, n: usize) -> usize {
    text[byte_idx..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| byte_idx + i)
        .unwrap_or(text.len())
}

/// Cut to `max_len` characters, ending with an ellipsis when shortened
fn truncate_chars(snippet: &str, max_len: usize) -> String {
    if snippet.chars().count() <= max_len {
        return snippet.to_string();
    }
    if max_len < ELLIPSIS.len() {
        return snippet.chars().take(max_len).collect();
    }

    let mut cut: String = snippet.chars().take(max_len - ELLIPSIS.len()).collect();
    cut.push_str(ELLIPSIS);
    cut
}
