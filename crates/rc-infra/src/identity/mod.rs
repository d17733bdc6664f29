use async_trait::async_trait;
use rc_core::ports::IdentityPort;
use rc_core::UserProfile;

/// Identity taken from local configuration.
pub struct StaticIdentity {
    profile: Option<UserProfile>,
}

impl StaticIdentity {
    pub fn new(profile: Option<UserProfile>) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl IdentityPort for StaticIdentity {
    async fn fetch_profile(&self) -> anyhow::Result<UserProfile> {
        self.profile
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no profile configured"))
    }
}
