//! Application state for the chatbot service

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::chatbot::RagChatbot;
use crate::config::ChatbotConfig;
use crate::error::Result;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: ChatbotConfig,
    /// Chatbot pipeline, constructed once on first use
    chatbot: OnceCell<Arc<RagChatbot>>,
    /// Whether warm-up has been attempted
    warm_attempted: AtomicBool,
    /// Whether warm-up completed successfully; written once, never reset
    warmed: AtomicBool,
}

impl AppState {
    /// Create state with a lazily constructed chatbot
    pub fn new(config: ChatbotConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                chatbot: OnceCell::new(),
                warm_attempted: AtomicBool::new(false),
                warmed: AtomicBool::new(false),
            }),
        }
    }

    /// Create state around an already built chatbot (used by tests)
    pub fn with_chatbot(config: ChatbotConfig, chatbot: Arc<RagChatbot>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(chatbot);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                chatbot: cell,
                warm_attempted: AtomicBool::new(false),
                warmed: AtomicBool::new(false),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &ChatbotConfig {
        &self.inner.config
    }

    /// Get the chatbot, constructing it exactly once. Concurrent first
    /// requests are serialized by the cell; a failed construction is retried
    /// on the next call.
    pub fn chatbot(&self) -> Result<Arc<RagChatbot>> {
        self.inner
            .chatbot
            .get_or_try_init(|| RagChatbot::new(&self.inner.config).map(Arc::new))
            .cloned()
    }

    /// Whether the chatbot has been constructed
    pub fn chatbot_initialized(&self) -> bool {
        self.inner.chatbot.get().is_some()
    }

    /// Exercise the embedding model and search index once so the first real
    /// request avoids cold-start latency. Idempotent: later calls no-op.
    /// Failure is logged and leaves the warm flag unset.
    pub async fn warm_up(&self) {
        if self.inner.warm_attempted.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::info!("pre-warming pipeline");

        let chatbot = match self.chatbot() {
            Ok(chatbot) => chatbot,
            Err(e) => {
                tracing::warn!(error = %e, "warm-up skipped, chatbot construction failed");
                return;
            }
        };

        match chatbot.warm_up().await {
            Ok(()) => {
                self.inner.warmed.store(true, Ordering::SeqCst);
                tracing::info!("pipeline warmed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "pipeline warm-up failed");
            }
        }
    }

    /// Whether warm-up completed successfully
    pub fn pipeline_warmed(&self) -> bool {
        self.inner.warmed.load(Ordering::SeqCst)
    }
}
