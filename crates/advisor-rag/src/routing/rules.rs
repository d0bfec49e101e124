//! Static routing rules from intent to pipeline

use serde::{Deserialize, Serialize};

use super::intent::Intent;

/// Which pipeline answers a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Pipeline {
    /// Retrieval-augmented generation over the document collection
    Rag,
    /// Generation from the model's general knowledge
    External,
    /// Intent not covered by either membership set
    Unknown,
}

/// Routing outcome for one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDecision {
    /// Classified intent
    pub intent: Intent,
    /// Pipeline chosen for that intent
    pub pipeline: Pipeline,
}

/// Maps intents to pipelines through a single exhaustive match, so the RAG
/// and external membership sets cannot drift apart or overlap.
pub struct RouteRules;

impl RouteRules {
    /// Decide the pipeline for an intent. Pure lookup, no failure mode.
    pub fn decide(intent: Intent) -> RouteDecision {
        let pipeline = match intent {
            Intent::CompanyInternship => Pipeline::Rag,
            Intent::EducationCoding | Intent::InterviewPreparation | Intent::GeneralEducation => {
                Pipeline::External
            }
            Intent::Unknown => Pipeline::Unknown,
        };

        RouteDecision { intent, pipeline }
    }

    /// True when the intent routes to the RAG pipeline
    pub fn should_use_rag(intent: Intent) -> bool {
        Self::decide(intent).pipeline == Pipeline::Rag
    }

    /// True when the intent routes to the external-knowledge pipeline
    pub fn should_use_external(intent: Intent) -> bool {
        Self::decide(intent).pipeline == Pipeline::External
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_internship_routes_to_rag() {
        let decision = RouteRules::decide(Intent::CompanyInternship);
        assert_eq!(decision.pipeline, Pipeline::Rag);
        assert_eq!(decision.intent, Intent::CompanyInternship);
    }

    #[test]
    fn knowledge_intents_route_to_external() {
        for intent in [
            Intent::EducationCoding,
            Intent::InterviewPreparation,
            Intent::GeneralEducation,
        ] {
            assert_eq!(RouteRules::decide(intent).pipeline, Pipeline::External);
        }
    }

    #[test]
    fn unknown_intent_routes_to_unknown() {
        assert_eq!(RouteRules::decide(Intent::Unknown).pipeline, Pipeline::Unknown);
    }

    #[test]
    fn rag_and_external_sets_are_disjoint_and_total() {
        for intent in Intent::ALL {
            let rag = RouteRules::should_use_rag(intent);
            let external = RouteRules::should_use_external(intent);
            assert!(!(rag && external), "{:?} is in both sets", intent);

            // Every intent resolves to exactly one of the three pipelines.
            let pipeline = RouteRules::decide(intent).pipeline;
            assert!(matches!(
                pipeline,
                Pipeline::Rag | Pipeline::External | Pipeline::Unknown
            ));
        }
    }
}
