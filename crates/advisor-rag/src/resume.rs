//! Resume enhancement through LLM-generated substitution lists
//!
//! The model is asked for a JSON array of targeted rewrites; each entry is
//! applied to the resume text as a literal substitution. PDF handling stays
//! outside this crate — callers hand in extracted text and write the
//! results wherever they need them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::providers::LlmProvider;

/// One targeted rewrite proposed by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enhancement {
    /// Exact text to replace
    pub original: String,
    /// Replacement text
    pub enhanced: String,
    /// Why the change helps
    #[serde(default)]
    pub reason: String,
}

/// Enhanced resume text plus the applied changes
#[derive(Debug, Clone, Serialize)]
pub struct EnhancedResume {
    /// Resume text with all enhancements applied
    pub text: String,
    /// The enhancement list the model produced
    pub enhancements: Vec<Enhancement>,
}

/// Applies LLM-proposed enhancements to resume text
pub struct ResumeEnhancer {
    llm: Arc<dyn LlmProvider>,
}

impl ResumeEnhancer {
    /// Create an enhancer over the given LLM
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Generate and apply enhancements for one resume
    pub async fn enhance(&self, resume_text: &str) -> Result<EnhancedResume> {
        let prompt = Self::build_prompt(resume_text);
        let raw = self.llm.generate(&prompt).await?;

        let enhancements = Self::parse_enhancements(&raw);
        tracing::info!(count = enhancements.len(), "generated resume enhancements");

        let text = Self::apply(resume_text, &enhancements);
        Ok(EnhancedResume {
            text,
            enhancements,
        })
    }

    fn build_prompt(resume_text: &str) -> String {
        format!(
            r#"You review student resumes for internship applications. Propose targeted
improvements to the resume below as a JSON array, where each entry is an
object with "original" (exact text to replace), "enhanced" (the improved
text), and "reason". Keep replacements short and truthful. Respond with the
JSON array only.

RESUME:
{resume}

JSON:"#,
            resume = resume_text
        )
    }

    /// Extract the first JSON array from the model output. Malformed output
    /// yields an empty list rather than an error.
    fn parse_enhancements(raw: &str) -> Vec<Enhancement> {
        let Some(start) = raw.find('[') else {
            return Vec::new();
        };
        let Some(end) = raw.rfind(']') else {
            return Vec::new();
        };
        if start >= end {
            return Vec::new();
        }

        match serde_json::from_str(&raw[start..=end]) {
            Ok(enhancements) => enhancements,
            Err(e) => {
                tracing::warn!(error = %e, "could not parse enhancement JSON");
                Vec::new()
            }
        }
    }

    fn apply(text: &str, enhancements: &[Enhancement]) -> String {
        let mut result = text.to_string();
        for enhancement in enhancements {
            if enhancement.original.is_empty() || enhancement.enhanced.is_empty() {
                continue;
            }
            result = result.replace(&enhancement.original, &enhancement.enhanced);
        }
        result
    }
}
