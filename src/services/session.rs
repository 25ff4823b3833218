use crate::config::GatewayConfig;
use std::fmt;
use tokio::sync::RwLock;

/// Credentials shared by every outbound call.
///
/// App credentials and the default advertiser are fixed at startup. The
/// access token (and a rotated refresh token) are replaced only by the
/// token refresher.
pub struct Session {
    access_token: RwLock<String>,
    refresh_token: RwLock<Option<String>>,
    app_id: Option<String>,
    app_secret: Option<String>,
    default_advertiser_id: Option<String>,
}

impl Session {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            access_token: RwLock::new(config.access_token.clone()),
            refresh_token: RwLock::new(config.refresh_token.clone()),
            app_id: config.app_id.clone(),
            app_secret: config.app_secret.clone(),
            default_advertiser_id: config.advertiser_id.clone(),
        }
    }

    pub async fn access_token(&self) -> String {
        self.access_token.read().await.clone()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.refresh_token.read().await.clone()
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    pub fn app_secret(&self) -> Option<&str> {
        self.app_secret.as_deref()
    }

    pub fn default_advertiser_id(&self) -> Option<&str> {
        self.default_advertiser_id.as_deref()
    }

    /// Credential values to mask in any upstream text surfaced to callers.
    pub async fn known_secrets(&self) -> Vec<String> {
        let mut secrets = vec![self.access_token().await];
        secrets.extend(self.refresh_token().await);
        secrets.extend(self.app_secret.clone());
        secrets
    }

    pub(crate) async fn replace_tokens(&self, access_token: String, refresh_token: Option<String>) {
        *self.access_token.write().await = access_token;
        if let Some(rotated) = refresh_token {
            *self.refresh_token.write().await = Some(rotated);
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("app_id", &self.app_id)
            .field("default_advertiser_id", &self.default_advertiser_id)
            .finish_non_exhaustive()
    }
}
