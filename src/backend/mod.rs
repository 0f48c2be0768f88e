pub mod client;
pub mod http;
pub mod types;

pub use client::{BackendError, ChatBackend};
pub use http::HttpChatBackend;
pub use types::{ChatReply, ChatRequest, LeadProfile, LeadStatus, QualificationStatus};
