//! Intent categories and keyword-based classification

use serde::{Deserialize, Serialize};

/// Coarse category describing the topic of a user query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Questions about a specific company's internship program
    CompanyInternship,
    /// Questions about coding and programming practice
    EducationCoding,
    /// Questions about interviews, resumes, and hiring rounds
    InterviewPreparation,
    /// Questions about colleges, degrees, courses, and exams
    GeneralEducation,
    /// Nothing matched; answered from general knowledge
    Unknown,
}

impl Intent {
    /// Every intent, for exhaustiveness checks
    pub const ALL: [Intent; 5] = [
        Intent::CompanyInternship,
        Intent::EducationCoding,
        Intent::InterviewPreparation,
        Intent::GeneralEducation,
        Intent::Unknown,
    ];

    /// Wire name of the intent
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::CompanyInternship => "COMPANY_INTERNSHIP",
            Intent::EducationCoding => "EDUCATION_CODING",
            Intent::InterviewPreparation => "INTERVIEW_PREPARATION",
            Intent::GeneralEducation => "GENERAL_EDUCATION",
            Intent::Unknown => "UNKNOWN",
        }
    }
}

const COMPANY_KEYWORDS: &[&str] = &[
    "internship",
    "intern ",
    "interns",
    "placement",
    "stipend",
    "openings",
    "hiring",
    "recruit",
    "eligibility",
    "apply",
];

const INTERVIEW_KEYWORDS: &[&str] = &[
    "interview",
    "resume",
    "aptitude",
    "hr round",
    "technical round",
    "mock test",
    "preparation",
];

const CODING_KEYWORDS: &[&str] = &[
    "coding",
    "programming",
    "python",
    "java",
    "javascript",
    "rust",
    "algorithm",
    "data structure",
    "dsa",
    "leetcode",
    "debugging",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "college",
    "university",
    "degree",
    "course",
    "semester",
    "exam",
    "syllabus",
    "scholarship",
    "admission",
    "cgpa",
];

/// Deterministic keyword classifier over the intent categories
///
/// Categories are checked in a fixed priority order and the first match wins,
/// so identical input always yields the same intent. Queries matching no
/// category fall back to [`Intent::Unknown`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    /// Classify a query into exactly one intent
    pub fn classify(&self, query: &str) -> Intent {
        let lowered = query.to_lowercase();

        if contains_any(&lowered, COMPANY_KEYWORDS) {
            Intent::CompanyInternship
        } else if contains_any(&lowered, INTERVIEW_KEYWORDS) {
            Intent::InterviewPreparation
        } else if contains_any(&lowered, CODING_KEYWORDS) {
            Intent::EducationCoding
        } else if contains_any(&lowered, EDUCATION_KEYWORDS) {
            Intent::GeneralEducation
        } else {
            Intent::Unknown
        }
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_queries_classify_to_company_internship() {
        let classifier = IntentClassifier;
        assert_eq!(
            classifier.classify("Tell me about Acme internship"),
            Intent::CompanyInternship
        );
        assert_eq!(
            classifier.classify("What stipend does Globex offer?"),
            Intent::CompanyInternship
        );
    }

    #[test]
    fn each_category_has_a_matching_query() {
        let classifier = IntentClassifier;
        assert_eq!(
            classifier.classify("How should I practice data structure problems?"),
            Intent::EducationCoding
        );
        assert_eq!(
            classifier.classify("Help me with my resume"),
            Intent::InterviewPreparation
        );
        assert_eq!(
            classifier.classify("Which degree suits data science?"),
            Intent::GeneralEducation
        );
    }

    #[test]
    fn unmatched_queries_fall_back_to_unknown() {
        let classifier = IntentClassifier;
        assert_eq!(classifier.classify("hello there"), Intent::Unknown);
        assert_eq!(classifier.classify(""), Intent::Unknown);
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = IntentClassifier;
        let query = "internship interview preparation";
        let first = classifier.classify(query);
        for _ in 0..10 {
            assert_eq!(classifier.classify(query), first);
        }
    }

    #[test]
    fn intents_serialize_to_screaming_snake_case() {
        let json = serde_json::to_string(&Intent::CompanyInternship).unwrap();
        assert_eq!(json, "\"COMPANY_INTERNSHIP\"");
        assert_eq!(Intent::CompanyInternship.as_str(), "COMPANY_INTERNSHIP");
    }
}
