//! Built-in keyword dictionary
//!
//! Questions naming a known topic get a canned answer without touching the
//! vector index. Topics are tried in table order; the general-help entry is
//! last so that a specific topic always wins.

use rqa_common::api::KnowledgeMatch;
use serde_json::{json, Map, Value};

/// One canned answer and the keywords that select it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopicAnswer {
    pub id: &'static str,
    /// Any keyword appearing in the lowercased question selects this topic
    pub keywords: &'static [&'static str],
    /// Representative question, used when seeding the entries table
    pub question: &'static str,
    pub answer: &'static str,
    pub confidence: f64,
    pub tags: &'static [&'static str],
}

pub const TOPIC_ANSWERS: &[TopicAnswer] = &[
    TopicAnswer {
        id: "return-policy-1",
        keywords: &["return policy"],
        question: "What is your return policy?",
        answer: "Our return policy allows returns within 30 days of purchase with original receipt.",
        confidence: 0.85,
        tags: &["return", "policy", "30-days"],
    },
    TopicAnswer {
        id: "shipping-info-1",
        keywords: &["shipping"],
        question: "How long does shipping take?",
        answer: "Standard shipping takes 3-5 business days. Express shipping is available for next-day delivery.",
        confidence: 0.90,
        tags: &["shipping", "delivery", "express"],
    },
    TopicAnswer {
        id: "warranty-info-1",
        keywords: &["warranty"],
        question: "What warranty do your products have?",
        answer: "All products come with a 1-year manufacturer warranty. Extended warranties are available for purchase.",
        confidence: 0.88,
        tags: &["warranty", "manufacturer", "extended"],
    },
    TopicAnswer {
        id: "payment-info-1",
        keywords: &["payment"],
        question: "What payment methods do you accept?",
        answer: "We accept all major credit cards, PayPal, and Apple Pay. Installment plans are available for purchases over $500.",
        confidence: 0.92,
        tags: &["payment", "credit-cards", "installment"],
    },
    TopicAnswer {
        id: "general-help-1",
        keywords: &["help", "support", "assist"],
        question: "Can you help me?",
        answer: "I can help you with information about our return policy, shipping, warranty, and payment options. What would you like to know?",
        confidence: 0.75,
        tags: &["help", "support", "general"],
    },
];

impl TopicAnswer {
    pub fn matches(&self, question_lower: &str) -> bool {
        self.keywords.iter().any(|k| question_lower.contains(k))
    }

    pub fn to_match(&self) -> KnowledgeMatch {
        let mut metadata = Map::new();
        metadata.insert("id".to_string(), json!(self.id));
        metadata.insert("brand".to_string(), json!("General"));
        metadata.insert("product_category".to_string(), json!("All Products"));
        metadata.insert("tags".to_string(), Value::from(self.tags.to_vec()));

        KnowledgeMatch {
            found: true,
            answer: self.answer.to_string(),
            confidence: self.confidence,
            source_type: "manual".to_string(),
            metadata,
        }
    }
}

/// First topic whose keyword appears in `question`
pub fn lookup_topic(question: &str) -> Option<&'static TopicAnswer> {
    let question_lower = question.to_lowercase();
    TOPIC_ANSWERS.iter().find(|t| t.matches(&question_lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_topics() {
        assert_eq!(lookup_topic("What is your RETURN POLICY?").unwrap().id, "return-policy-1");
        assert_eq!(lookup_topic("shipping to Canada").unwrap().confidence, 0.90);
        assert_eq!(lookup_topic("Is there a warranty?").unwrap().confidence, 0.88);
        assert_eq!(lookup_topic("payment plans").unwrap().confidence, 0.92);
    }

    #[test]
    fn test_specific_topic_beats_general_help() {
        assert_eq!(lookup_topic("I need help with shipping").unwrap().id, "shipping-info-1");
    }

    #[test]
    fn test_general_help() {
        let topic = lookup_topic("Can someone assist me?").unwrap();
        assert_eq!(topic.id, "general-help-1");
        assert_eq!(topic.confidence, 0.75);
    }

    #[test]
    fn test_no_topic() {
        assert!(lookup_topic("Do you sell gift cards?").is_none());
        // "return" alone does not select the return policy topic
        assert!(lookup_topic("Can I return this?").is_none());
    }

    #[test]
    fn test_match_metadata() {
        let m = lookup_topic("warranty").unwrap().to_match();
        assert!(m.found);
        assert_eq!(m.source_type, "manual");
        assert_eq!(m.metadata["id"], "warranty-info-1");
        assert_eq!(m.metadata["tags"], json!(["warranty", "manufacturer", "extended"]));
    }
}
