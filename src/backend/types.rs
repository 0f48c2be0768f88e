use serde::{Deserialize, Serialize};

use crate::core::language::Language;

/// Body of `POST /chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub user_id: String,
    pub session_id: String,
    pub user_message: String,
    pub language: Language,
}

/// Where the backend places the visitor in its qualification funnel.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualificationStatus {
    Initial,
    Discovery,
    Qualified,
    NeedsReview,
}

impl QualificationStatus {
    pub fn label(self) -> &'static str {
        match self {
            QualificationStatus::Initial => "New",
            QualificationStatus::Discovery => "Discovery",
            QualificationStatus::Qualified => "Qualified",
            QualificationStatus::NeedsReview => "Needs review",
        }
    }
}

/// What the backend has learned about the visitor so far.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LeadProfile {
    pub investment_type: Option<String>,
    pub budget_range: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<String>,
    pub target_location: Option<String>,
    #[serde(default)]
    pub language_preference: Option<String>,
    pub urgency: Option<String>,
    #[serde(default)]
    pub lead_score: i64,
}

/// Response of `POST /chat`. Only `reply` is required; unknown fields are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    #[serde(default)]
    pub audio_base64: Option<String>,
    #[serde(default)]
    pub lead_profile: Option<LeadProfile>,
    #[serde(default)]
    pub qualification_status: Option<QualificationStatus>,
    #[serde(default)]
    pub lead_score: Option<i64>,
}

impl ChatReply {
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            audio_base64: None,
            lead_profile: None,
            qualification_status: None,
            lead_score: None,
        }
    }

    pub fn lead_status(&self) -> Option<LeadStatus> {
        if self.qualification_status.is_none()
            && self.lead_score.is_none()
            && self.lead_profile.is_none()
        {
            return None;
        }
        Some(LeadStatus {
            status: self.qualification_status,
            score: self
                .lead_score
                .or_else(|| self.lead_profile.as_ref().map(|p| p.lead_score)),
        })
    }
}

/// Latest qualification info, shown in the panel header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadStatus {
    pub status: Option<QualificationStatus>,
    pub score: Option<i64>,
}
