use async_trait::async_trait;

use crate::identity::UserProfile;

#[async_trait]
pub trait IdentityPort: Send + Sync {
    /// Fetch the current user's display profile from the host.
    async fn fetch_profile(&self) -> anyhow::Result<UserProfile>;
}
