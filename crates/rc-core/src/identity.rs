//! Host-provided identity shown on the intro screen.
//!
//! Read-only display data; not part of the persisted state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub avatar_url: Option<String>,
}
