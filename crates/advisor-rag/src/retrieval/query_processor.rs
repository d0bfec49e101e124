//! Query normalization and keyword extraction

/// Words carrying no retrieval signal, removed during keyword extraction
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "also", "am", "an", "and", "any", "are", "as", "at", "be", "been",
    "being", "but", "by", "can", "could", "did", "do", "does", "for", "from", "give", "had",
    "has", "have", "he", "her", "his", "how", "i", "if", "in", "is", "it", "its", "just", "may",
    "me", "might", "must", "my", "no", "not", "of", "on", "or", "our", "please", "shall",
    "she", "should", "show", "so", "some", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "those", "to", "too", "tell", "us", "very", "was", "we",
    "were", "what", "when", "where", "which", "who", "whom", "why", "will", "with", "would",
    "you", "your",
];

/// Result of preprocessing a raw query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedQuery {
    /// Trimmed, lowercased, whitespace-collapsed form of the input
    pub normalized: String,
    /// Stop-word-free keyword reduction of the normalized text; may be empty
    pub keyword: String,
}

/// Normalizes raw query text and extracts a keyword-focused search variant
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryProcessor;

impl QueryProcessor {
    /// Process a raw query. Total: empty or whitespace-only input yields
    /// empty outputs. Normalization is idempotent.
    pub fn process(&self, raw: &str) -> ProcessedQuery {
        let normalized = Self::normalize(raw);
        let keyword = Self::extract_keywords(&normalized);
        ProcessedQuery {
            normalized,
            keyword,
        }
    }

    fn normalize(raw: &str) -> String {
        raw.to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn extract_keywords(normalized: &str) -> String {
        normalized
            .split_whitespace()
            .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|token| !token.is_empty() && !STOP_WORDS.contains(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
