//! Token counter implementations.

use crate::types::Message;

pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;

    /// Content plus a small per-message overhead for role framing.
    fn count_messages(&self, messages: &[Message]) -> usize {
        messages.iter().map(|m| self.count(&m.content) + 4).sum()
    }
}

#[derive(Debug, Clone)]
pub struct CharacterEstimator {
    chars_per_token: f64,
}

impl CharacterEstimator {
    pub fn new() -> Self {
        Self::with_ratio(4.0)
    }

    pub fn with_ratio(r: f64) -> Self {
        Self {
            chars_per_token: r,
        }
    }
}

impl Default for CharacterEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCounter for CharacterEstimator {
    fn count(&self, text: &str) -> usize {
        (text.chars().count() as f64 / self.chars_per_token).ceil() as usize
    }
}

#[derive(Debug, Clone)]
pub struct WordEstimator {
    tokens_per_word: f64,
}

impl WordEstimator {
    pub fn new() -> Self {
        Self {
            tokens_per_word: 1.3,
        }
    }
}

impl Default for WordEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCounter for WordEstimator {
    fn count(&self, text: &str) -> usize {
        let words = text.split_whitespace().count();
        (words as f64 * self.tokens_per_word).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_estimate_rounds_up() {
        let c = CharacterEstimator::new();
        assert_eq!(c.count(""), 0);
        assert_eq!(c.count("abc"), 1);
        assert_eq!(c.count("abcde"), 2);
        // Multi-byte characters count once.
        assert_eq!(c.count("éééé"), 1);
    }

    #[test]
    fn test_message_overhead() {
        let c = CharacterEstimator::new();
        let msgs = vec![Message::system("abcd"), Message::user("abcdefgh")];
        assert_eq!(c.count_messages(&msgs), 1 + 4 + 2 + 4);
    }

    #[test]
    fn test_word_estimate() {
        let w = WordEstimator::new();
        assert_eq!(w.count("one two three four five six seven eight nine ten"), 13);
        assert_eq!(w.count("   "), 0);
    }
}
