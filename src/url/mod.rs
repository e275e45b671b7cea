//! URL handling module for Sozluk-Ripple
//!
//! This module turns whatever topic link the user pasted into a canonical
//! topic URL, builds the per-page URLs, and derives a filesystem-safe topic
//! slug for output naming.

mod normalize;
mod topic;

// Re-export main functions
pub use normalize::{host_allowed, normalize_topic_url, page_url};
pub use topic::topic_slug;
