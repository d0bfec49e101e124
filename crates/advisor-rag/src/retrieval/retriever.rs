//! Similarity search retrieval over the document collection
//!
//! Composes query preprocessing, embedding, and vector search into
//! "text query in, ranked documents out". Retrieval failures degrade to an
//! empty result so a broken vector store never fails the whole query.

use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::Result;
use crate::providers::{EmbeddingProvider, VectorSearchProvider};

use super::query_processor::QueryProcessor;

/// Fixed text used to exercise the embedding model and search index at startup
pub const WARM_UP_QUERY: &str = "warm-up query to load the embedding model";

/// One document returned from a similarity search
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedDocument {
    /// Document text
    pub content: String,
    /// Remaining payload fields (company, document_type, source, ...)
    pub metadata: BTreeMap<String, String>,
    /// Similarity score, higher is more relevant
    pub similarity_score: f32,
}

/// Text query to ranked documents
pub struct Retriever {
    processor: QueryProcessor,
    embedder: Arc<dyn EmbeddingProvider>,
    search: Arc<dyn VectorSearchProvider>,
    top_k: usize,
    similarity_threshold: f32,
}

impl Retriever {
    /// Create a retriever over the given providers
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        search: Arc<dyn VectorSearchProvider>,
        top_k: usize,
        similarity_threshold: f32,
    ) -> Self {
        Self {
            processor: QueryProcessor,
            embedder,
            search,
            top_k,
            similarity_threshold,
        }
    }

    /// Retrieve relevant documents for a query.
    ///
    /// `top_k` falls back to the configured default; `filter` is a conjunction
    /// of exact-match payload conditions. Never fails: embedding or search
    /// errors are logged and yield an empty result.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: Option<usize>,
        filter: Option<&BTreeMap<String, String>>,
    ) -> Vec<RetrievedDocument> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let k = top_k.unwrap_or(self.top_k).max(1);

        let processed = self.processor.process(query);
        let search_text = if processed.keyword.is_empty() {
            processed.normalized.as_str()
        } else {
            processed.keyword.as_str()
        };
        tracing::debug!(query = %query, search_text = %search_text, "processed query");

        let vector = match self.embedder.embed(search_text).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(error = %e, "query embedding failed, returning no documents");
                return Vec::new();
            }
        };

        let hits = match self.search.search(&vector, k, filter).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(error = %e, "vector search failed, returning no documents");
                return Vec::new();
            }
        };

        let mut documents: Vec<RetrievedDocument> = hits
            .into_iter()
            .filter(|hit| hit.score >= self.similarity_threshold)
            .map(|hit| {
                let mut metadata = hit.payload;
                let content = metadata.remove("content").unwrap_or_default();
                RetrievedDocument {
                    content,
                    metadata,
                    similarity_score: hit.score,
                }
            })
            .collect();

        documents.sort_by(|a, b| {
            b.similarity_score
                .partial_cmp(&a.similarity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        documents.truncate(k);

        tracing::debug!(count = documents.len(), "retrieved documents");
        documents
    }

    /// Format retrieved documents into a context block for the LLM prompt.
    /// Returns an empty string for empty input.
    pub fn format_context(documents: &[RetrievedDocument]) -> String {
        if documents.is_empty() {
            return String::new();
        }

        let blocks: Vec<String> = documents
            .iter()
            .map(|doc| {
                let company = doc.metadata.get("company").map(String::as_str).unwrap_or("Unknown");
                let doc_type = doc
                    .metadata
                    .get("document_type")
                    .map(String::as_str)
                    .unwrap_or("Unknown");
                let source = doc.metadata.get("source").map(String::as_str).unwrap_or("Unknown");

                format!(
                    "[Company]: {company}\n[Document Type]: {doc_type}\n[Source]: {source}\n\nContent:\n{content}\n",
                    company = company,
                    doc_type = doc_type,
                    source = source,
                    content = doc.content
                )
            })
            .collect();

        blocks.join("\n---\n")
    }

    /// Ingest a generated Q&A pair so future queries can retrieve it.
    /// Returns false, never an error, when inputs are blank or any step fails.
    pub async fn ingest_qa_pair(&self, question: &str, answer: &str) -> bool {
        if question.trim().is_empty() || answer.trim().is_empty() {
            return false;
        }

        // The question is what future queries will resemble, so embed that.
        let vector = match self.embedder.embed(question).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(error = %e, "Q&A pair embedding failed");
                return false;
            }
        };

        let content = format!("Question: {}\n\nAnswer: {}", question, answer);

        let mut payload = BTreeMap::new();
        payload.insert("content".to_string(), content);
        payload.insert("document_type".to_string(), "Generated Q&A".to_string());
        payload.insert("company".to_string(), "General Knowledge".to_string());
        payload.insert("source".to_string(), "LLM".to_string());
        payload.insert("question".to_string(), question.to_string());
        payload.insert("answer".to_string(), answer.to_string());

        let id = Uuid::new_v4().to_string();
        match self.search.upsert(&id, vector, payload).await {
            Ok(()) => {
                tracing::debug!(point = %id, "ingested generated Q&A pair");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Q&A pair upsert failed");
                false
            }
        }
    }

    /// Exercise the embedding model and the search index once, for warm-up
    pub async fn warm(&self) -> Result<()> {
        let vector = self.embedder.embed(WARM_UP_QUERY).await?;
        self.search.search(&vector, 1, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::providers::vector_store::SearchHit;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeEmbedder {
        calls: AtomicUsize,
        last_input: Mutex<String>,
        fail: bool,
    }

    impl FakeEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_input: Mutex::new(String::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_input.lock().unwrap() = text.to_string();
            if self.fail {
                return Err(Error::embedding("model unavailable"));
            }
            Ok(vec![0.1, 0.2, 0.3])
        }

        fn dimensions(&self) -> usize {
            3
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(!self.fail)
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    struct FakeSearch {
        hits: Vec<SearchHit>,
        fail_search: bool,
        fail_upsert: bool,
        upserts: AtomicUsize,
    }

    impl FakeSearch {
        fn with_hits(hits: Vec<SearchHit>) -> Self {
            Self {
                hits,
                fail_search: false,
                fail_upsert: false,
                upserts: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail_search: true,
                ..Self::with_hits(Vec::new())
            }
        }
    }

    #[async_trait]
    impl VectorSearchProvider for FakeSearch {
        async fn search(
            &self,
            _query_vector: &[f32],
            top_k: usize,
            _filter: Option<&BTreeMap<String, String>>,
        ) -> Result<Vec<SearchHit>> {
            if self.fail_search {
                return Err(Error::vector_db("collection unreachable"));
            }
            Ok(self.hits.iter().take(top_k).cloned().collect())
        }

        async fn upsert(
            &self,
            _id: &str,
            _vector: Vec<f32>,
            _payload: BTreeMap<String, String>,
        ) -> Result<()> {
            if self.fail_upsert {
                return Err(Error::vector_db("write refused"));
            }
            self.upserts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn hit(content: &str, company: &str, score: f32) -> SearchHit {
        let mut payload = BTreeMap::new();
        payload.insert("content".to_string(), content.to_string());
        payload.insert("company".to_string(), company.to_string());
        payload.insert("document_type".to_string(), "FAQ".to_string());
        payload.insert("source".to_string(), "faq.md".to_string());
        SearchHit {
            score,
            payload,
        }
    }

    fn retriever(embedder: FakeEmbedder, search: FakeSearch) -> Retriever {
        Retriever::new(Arc::new(embedder), Arc::new(search), 5, 0.5)
    }

    #[tokio::test]
    async fn maps_hits_to_documents_with_content_popped_out() {
        let r = retriever(
            FakeEmbedder::new(),
            FakeSearch::with_hits(vec![hit("Acme hires interns in summer.", "Acme", 0.9)]),
        );

        let docs = r.retrieve("Acme internship", None, None).await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "Acme hires interns in summer.");
        assert!(!docs[0].metadata.contains_key("content"));
        assert_eq!(docs[0].metadata.get("company").unwrap(), "Acme");
    }

    #[tokio::test]
    async fn search_failure_degrades_to_empty() {
        let r = retriever(FakeEmbedder::new(), FakeSearch::failing());
        assert!(r.retrieve("Acme internship", None, None).await.is_empty());
    }

    #[tokio::test]
    async fn embedding_failure_degrades_to_empty() {
        let r = retriever(FakeEmbedder::failing(), FakeSearch::with_hits(Vec::new()));
        assert!(r.retrieve("Acme internship", None, None).await.is_empty());
    }

    #[tokio::test]
    async fn empty_query_short_circuits() {
        let embedder = FakeEmbedder::new();
        let r = Retriever::new(
            Arc::new(embedder),
            Arc::new(FakeSearch::with_hits(Vec::new())),
            5,
            0.5,
        );
        assert!(r.retrieve("   ", None, None).await.is_empty());
    }

    #[tokio::test]
    async fn keyword_text_is_preferred_for_search() {
        let embedder = Arc::new(FakeEmbedder::new());
        let r = Retriever::new(
            Arc::clone(&embedder) as Arc<dyn EmbeddingProvider>,
            Arc::new(FakeSearch::with_hits(Vec::new())),
            5,
            0.5,
        );

        r.retrieve("Tell me about the Acme internship", None, None).await;
        assert_eq!(*embedder.last_input.lock().unwrap(), "acme internship");

        // A query of pure stop words falls back to the normalized text.
        r.retrieve("What is that?", None, None).await;
        assert_eq!(*embedder.last_input.lock().unwrap(), "what is that?");
    }

    #[tokio::test]
    async fn hits_below_threshold_are_dropped_and_ranking_is_descending() {
        let r = retriever(
            FakeEmbedder::new(),
            FakeSearch::with_hits(vec![
                hit("weak match", "Acme", 0.2),
                hit("good match", "Acme", 0.8),
                hit("best match", "Acme", 0.95),
            ]),
        );

        let docs = r.retrieve("Acme internship", None, None).await;
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "best match");
        assert_eq!(docs[1].content, "good match");
    }

    #[test]
    fn format_context_of_empty_input_is_empty() {
        assert_eq!(Retriever::format_context(&[]), "");
    }

    #[test]
    fn format_context_contains_every_document_content() {
        let docs = vec![
            RetrievedDocument {
                content: "Acme hires interns.".to_string(),
                metadata: BTreeMap::from([
                    ("company".to_string(), "Acme".to_string()),
                    ("document_type".to_string(), "FAQ".to_string()),
                    ("source".to_string(), "faq.md".to_string()),
                ]),
                similarity_score: 0.9,
            },
            RetrievedDocument {
                content: "Globex pays well.".to_string(),
                metadata: BTreeMap::new(),
                similarity_score: 0.8,
            },
        ];

        let context = Retriever::format_context(&docs);
        assert!(context.contains("Acme hires interns."));
        assert!(context.contains("Globex pays well."));
        assert!(context.contains("[Company]: Acme"));
        // Missing metadata falls back to Unknown.
        assert!(context.contains("[Company]: Unknown"));
        assert!(context.contains("\n---\n"));
    }

    #[tokio::test]
    async fn qa_pair_with_blank_parts_is_rejected() {
        let r = retriever(FakeEmbedder::new(), FakeSearch::with_hits(Vec::new()));
        assert!(!r.ingest_qa_pair("", "answer").await);
        assert!(!r.ingest_qa_pair("question", "  ").await);
    }

    #[tokio::test]
    async fn qa_pair_upsert_failure_returns_false() {
        let search = FakeSearch {
            fail_upsert: true,
            ..FakeSearch::with_hits(Vec::new())
        };
        let r = retriever(FakeEmbedder::new(), search);
        assert!(!r.ingest_qa_pair("q", "a").await);
    }

    #[tokio::test]
    async fn qa_pair_is_stored_with_generated_metadata() {
        let search = Arc::new(FakeSearch::with_hits(Vec::new()));
        let r = Retriever::new(
            Arc::new(FakeEmbedder::new()),
            Arc::clone(&search) as Arc<dyn VectorSearchProvider>,
            5,
            0.5,
        );

        assert!(r.ingest_qa_pair("What is Acme?", "A company.").await);
        assert_eq!(search.upserts.load(Ordering::SeqCst), 1);
    }
}
