//! Prompt templates for the RAG and external-knowledge pipelines

use crate::session::ConversationTurn;

/// Prompt builder for advisor queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the document-grounded prompt for the RAG pipeline
    pub fn build_rag_prompt(
        question: &str,
        context: &str,
        history: &[ConversationTurn],
    ) -> String {
        format!(
            r#"You are an advisor helping students with internship and education questions.

Answer using the reference documents below. Prefer facts stated in the
documents; when they do not cover the question, say so and offer general
guidance instead of inventing specifics.

REFERENCE DOCUMENTS:
{context}

CONVERSATION SO FAR:
{history}

QUESTION: {question}

Answer:"#,
            context = context,
            history = Self::format_history(history),
            question = question
        )
    }

    /// Build the prompt for the external-knowledge pipeline (no retrieved context)
    pub fn build_external_prompt(question: &str, history: &[ConversationTurn]) -> String {
        format!(
            r#"You are an advisor helping students with internships, coding practice,
interview preparation, and education questions. Answer clearly and concretely
from your general knowledge.

CONVERSATION SO FAR:
{history}

QUESTION: {question}

Answer:"#,
            history = Self::format_history(history),
            question = question
        )
    }

    /// Render the conversation history as alternating turns
    fn format_history(history: &[ConversationTurn]) -> String {
        if history.is_empty() {
            return "(no prior turns)".to_string();
        }

        history
            .iter()
            .map(|turn| format!("Student: {}\nAdvisor: {}", turn.query, turn.answer))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
