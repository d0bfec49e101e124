//! Intent classification and pipeline routing

pub mod intent;
pub mod rules;

pub use intent::{Intent, IntentClassifier};
pub use rules::{Pipeline, RouteDecision, RouteRules};
