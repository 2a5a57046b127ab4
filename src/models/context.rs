use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Business metrics recognized in conversation text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Metric {
    Mrr,
    Arr,
    Cac,
    Ltv,
    Churn,
    Nps,
    Mau,
    Dau,
    Gmv,
    Retention,
    BurnRate,
    Runway,
}

impl Metric {
    pub const ALL: [Metric; 12] = [
        Metric::Mrr,
        Metric::Arr,
        Metric::Cac,
        Metric::Ltv,
        Metric::Churn,
        Metric::Nps,
        Metric::Mau,
        Metric::Dau,
        Metric::Gmv,
        Metric::Retention,
        Metric::BurnRate,
        Metric::Runway,
    ];

    /// Canonical key, as it appears in prompts and in the redundancy filter
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Mrr => "MRR",
            Metric::Arr => "ARR",
            Metric::Cac => "CAC",
            Metric::Ltv => "LTV",
            Metric::Churn => "CHURN",
            Metric::Nps => "NPS",
            Metric::Mau => "MAU",
            Metric::Dau => "DAU",
            Metric::Gmv => "GMV",
            Metric::Retention => "RETENTION",
            Metric::BurnRate => "BURN_RATE",
            Metric::Runway => "RUNWAY",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Discussion topics recognized in conversation text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Topic {
    BusinessModel,
    Team,
    Market,
    Technology,
    Traction,
    Funding,
    Risks,
    Competition,
    Customer,
    Product,
}

impl Topic {
    pub const ALL: [Topic; 10] = [
        Topic::BusinessModel,
        Topic::Team,
        Topic::Market,
        Topic::Technology,
        Topic::Traction,
        Topic::Funding,
        Topic::Risks,
        Topic::Competition,
        Topic::Customer,
        Topic::Product,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Topic::BusinessModel => "BUSINESS_MODEL",
            Topic::Team => "TEAM",
            Topic::Market => "MARKET",
            Topic::Technology => "TECHNOLOGY",
            Topic::Traction => "TRACTION",
            Topic::Funding => "FUNDING",
            Topic::Risks => "RISKS",
            Topic::Competition => "COMPETITION",
            Topic::Customer => "CUSTOMER",
            Topic::Product => "PRODUCT",
        }
    }

    /// Label used in the prompt context block
    pub fn display_name(&self) -> &'static str {
        match self {
            Topic::BusinessModel => "비즈니스 모델",
            Topic::Team => "팀 구성",
            Topic::Market => "시장",
            Topic::Technology => "기술",
            Topic::Traction => "트랙션",
            Topic::Funding => "투자/자금",
            Topic::Risks => "리스크",
            Topic::Competition => "경쟁",
            Topic::Customer => "고객",
            Topic::Product => "제품",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse phase of a meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStage {
    /// Greetings and company introduction
    #[default]
    Introduction,
    /// Detailed questioning
    DeepDive,
    /// Wrap-up and next steps
    Closing,
}

impl ConversationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStage::Introduction => "introduction",
            ConversationStage::DeepDive => "deep_dive",
            ConversationStage::Closing => "closing",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ConversationStage::Introduction => "초반 (회사 소개 단계)",
            ConversationStage::DeepDive => "중반 (상세 검토 단계)",
            ConversationStage::Closing => "후반 (마무리 단계)",
        }
    }
}

/// Concepts surfaced so far in a conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionedConcepts {
    pub metrics_mentioned: BTreeSet<Metric>,
    pub topics_discussed: BTreeSet<Topic>,
    /// Literal substrings that triggered a metric or topic
    pub keywords_found: BTreeSet<String>,
}

impl MentionedConcepts {
    pub fn is_empty(&self) -> bool {
        self.metrics_mentioned.is_empty()
            && self.topics_discussed.is_empty()
            && self.keywords_found.is_empty()
    }
}

/// Per-request view of the conversation so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    #[serde(flatten)]
    pub concepts: MentionedConcepts,
    pub stage: ConversationStage,
}

impl ConversationContext {
    pub fn metrics_mentioned(&self) -> &BTreeSet<Metric> {
        &self.concepts.metrics_mentioned
    }

    pub fn topics_discussed(&self) -> &BTreeSet<Topic> {
        &self.concepts.topics_discussed
    }

    pub fn keywords_found(&self) -> &BTreeSet<String> {
        &self.concepts.keywords_found
    }
}
