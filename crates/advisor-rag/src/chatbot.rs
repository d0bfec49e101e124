//! Query orchestration: classify, route, retrieve, generate

use std::sync::Arc;

use crate::config::ChatbotConfig;
use crate::error::Result;
use crate::generation::{OllamaClient, PromptBuilder};
use crate::ingestion::DocumentIngestor;
use crate::providers::ollama::{OllamaEmbedder, OllamaLlm};
use crate::providers::qdrant::QdrantSearch;
use crate::providers::{EmbeddingProvider, LlmProvider, VectorSearchProvider};
use crate::retrieval::Retriever;
use crate::routing::{IntentClassifier, Pipeline, RouteRules};
use crate::session::SessionStore;

/// The chatbot pipeline: intent classification, routing, retrieval,
/// generation, and per-session conversation history.
pub struct RagChatbot {
    classifier: IntentClassifier,
    retriever: Retriever,
    ingestor: DocumentIngestor,
    llm: Arc<dyn LlmProvider>,
    sessions: SessionStore,
    fallback_response: String,
}

impl RagChatbot {
    /// Build the chatbot with the production providers (Ollama + Qdrant)
    pub fn new(config: &ChatbotConfig) -> Result<Self> {
        let ollama = Arc::new(OllamaClient::new(&config.llm, &config.embedding));

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OllamaEmbedder::from_client(
            Arc::clone(&ollama),
            config.embedding.dimensions,
            config.embedding.model.clone(),
        ));
        let llm: Arc<dyn LlmProvider> =
            Arc::new(OllamaLlm::from_client(ollama, config.llm.model.clone()));
        let search: Arc<dyn VectorSearchProvider> = Arc::new(QdrantSearch::new(&config.qdrant)?);

        Ok(Self::with_providers(config, embedder, search, llm))
    }

    /// Build the chatbot over arbitrary providers (used by tests)
    pub fn with_providers(
        config: &ChatbotConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        search: Arc<dyn VectorSearchProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let retriever = Retriever::new(
            Arc::clone(&embedder),
            Arc::clone(&search),
            config.retrieval.top_k,
            config.retrieval.similarity_threshold,
        );
        let ingestor = DocumentIngestor::new(&config.chunking, embedder, search);

        Self {
            classifier: IntentClassifier,
            retriever,
            ingestor,
            llm,
            sessions: SessionStore::new(config.session.max_history),
            fallback_response: config.fallback_response.clone(),
        }
    }

    /// Answer a query for one session. Always returns text: generation
    /// failures are replaced by the configured fallback response.
    pub async fn answer(&self, query: &str, user_id: &str, session_id: &str) -> String {
        let decision = RouteRules::decide(self.classifier.classify(query));
        tracing::info!(
            intent = decision.intent.as_str(),
            pipeline = ?decision.pipeline,
            "routed query"
        );

        let history = self.sessions.history(user_id, session_id);

        let prompt = match decision.pipeline {
            Pipeline::Rag => {
                let documents = self.retriever.retrieve(query, None, None).await;
                if documents.is_empty() {
                    tracing::info!("no documents retrieved, answering without context");
                }
                let context = Retriever::format_context(&documents);
                PromptBuilder::build_rag_prompt(query, &context, &history)
            }
            Pipeline::External | Pipeline::Unknown => {
                PromptBuilder::build_external_prompt(query, &history)
            }
        };

        let answer = match self.llm.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "generation failed, returning fallback response");
                return self.fallback_response.clone();
            }
        };

        self.sessions.append(user_id, session_id, query, &answer);

        if decision.pipeline == Pipeline::External
            && !self.retriever.ingest_qa_pair(query, &answer).await
        {
            tracing::debug!("generated Q&A pair was not ingested");
        }

        answer
    }

    /// Drop the conversation history for one session; idempotent
    pub fn clear_session(&self, user_id: &str, session_id: &str) {
        self.sessions.clear(user_id, session_id);
        tracing::info!(user = %user_id, session = %session_id, "session cleared");
    }

    /// Exercise the embedding model and search index once
    pub async fn warm_up(&self) -> Result<()> {
        self.retriever.warm().await
    }

    /// The retriever backing the RAG pipeline
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// The document ingestor sharing this chatbot's providers
    pub fn ingestor(&self) -> &DocumentIngestor {
        &self.ingestor
    }

    /// The per-session conversation store
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::providers::vector_store::SearchHit;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0, 1.0])
        }

        fn dimensions(&self) -> usize {
            2
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct RecordingSearch {
        hits: Vec<SearchHit>,
        searches: AtomicUsize,
        upserts: AtomicUsize,
    }

    impl RecordingSearch {
        fn new(hits: Vec<SearchHit>) -> Self {
            Self {
                hits,
                searches: AtomicUsize::new(0),
                upserts: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VectorSearchProvider for RecordingSearch {
        async fn search(
            &self,
            _query_vector: &[f32],
            _top_k: usize,
            _filter: Option<&BTreeMap<String, String>>,
        ) -> Result<Vec<SearchHit>> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            Ok(self.hits.clone())
        }

        async fn upsert(
            &self,
            _id: &str,
            _vector: Vec<f32>,
            _payload: BTreeMap<String, String>,
        ) -> Result<()> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct ScriptedLlm {
        answer: std::result::Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                answer: Err("model offline".to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.answer {
                Ok(answer) => Ok(answer.clone()),
                Err(message) => Err(Error::llm(message.clone())),
            }
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    fn company_hit() -> SearchHit {
        let mut payload = BTreeMap::new();
        payload.insert(
            "content".to_string(),
            "Acme runs a 12-week summer internship.".to_string(),
        );
        payload.insert("company".to_string(), "Acme".to_string());
        SearchHit {
            score: 0.9,
            payload,
        }
    }

    fn chatbot(
        search: Arc<RecordingSearch>,
        llm: Arc<ScriptedLlm>,
    ) -> RagChatbot {
        RagChatbot::with_providers(
            &ChatbotConfig::default(),
            Arc::new(FixedEmbedder),
            search as Arc<dyn VectorSearchProvider>,
            llm as Arc<dyn LlmProvider>,
        )
    }

    #[tokio::test]
    async fn company_queries_run_the_rag_pipeline() {
        let search = Arc::new(RecordingSearch::new(vec![company_hit()]));
        let llm = Arc::new(ScriptedLlm::answering("Acme offers a summer internship."));
        let bot = chatbot(Arc::clone(&search), Arc::clone(&llm));

        let answer = bot.answer("Tell me about Acme internship", "u1", "s1").await;

        assert_eq!(answer, "Acme offers a summer internship.");
        assert_eq!(search.searches.load(Ordering::SeqCst), 1);

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("Acme runs a 12-week summer internship."));
    }

    #[tokio::test]
    async fn external_queries_skip_retrieval_and_write_back_the_pair() {
        let search = Arc::new(RecordingSearch::new(Vec::new()));
        let llm = Arc::new(ScriptedLlm::answering("Practice daily."));
        let bot = chatbot(Arc::clone(&search), Arc::clone(&llm));

        let answer = bot.answer("How do I get better at coding?", "u1", "s1").await;

        assert_eq!(answer, "Practice daily.");
        assert_eq!(search.searches.load(Ordering::SeqCst), 0);
        assert_eq!(search.upserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn generation_failure_returns_the_fallback_response() {
        let search = Arc::new(RecordingSearch::new(Vec::new()));
        let llm = Arc::new(ScriptedLlm::failing());
        let bot = chatbot(Arc::clone(&search), llm);

        let answer = bot.answer("How do I get better at coding?", "u1", "s1").await;

        assert_eq!(answer, ChatbotConfig::default().fallback_response);
        // A failed turn is not recorded in the session history.
        assert!(bot.sessions().history("u1", "s1").is_empty());
    }

    #[tokio::test]
    async fn successful_turns_accumulate_in_the_session() {
        let search = Arc::new(RecordingSearch::new(Vec::new()));
        let llm = Arc::new(ScriptedLlm::answering("Sure."));
        let bot = chatbot(search, Arc::clone(&llm));

        bot.answer("How do I get better at coding?", "u1", "s1").await;
        bot.answer("Which language first?", "u1", "s1").await;

        let history = bot.sessions().history("u1", "s1");
        assert_eq!(history.len(), 2);

        // The second prompt carries the first exchange.
        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[1].contains("Student: How do I get better at coding?"));
    }

    #[tokio::test]
    async fn cleared_sessions_do_not_leak_into_later_prompts() {
        let search = Arc::new(RecordingSearch::new(Vec::new()));
        let llm = Arc::new(ScriptedLlm::answering("Sure."));
        let bot = chatbot(search, Arc::clone(&llm));

        bot.answer("How do I get better at coding?", "u1", "s1").await;
        bot.clear_session("u1", "s1");
        bot.answer("Which language first?", "u1", "s1").await;

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[1].contains("(no prior turns)"));
    }
}
