//! The CLI's session: one [`Client`] per process over the stored credential.

pub mod storage;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::debug;

use collegeconnect::transport::{LOGIN_ROUTE, RecordingNavigator};
use collegeconnect::{ApiUrl, Client, ClientConfig, Identity, SessionStatus};

/// Process-wide client plus the navigator its 401 interceptor reports to.
pub struct CliSession {
    client: Client,
    navigator: Arc<RecordingNavigator>,
}

impl CliSession {
    /// Build the client for `api_url`, storing the credential in `data_dir`.
    pub fn open(api_url: &str, data_dir: Option<&Path>) -> Result<Self> {
        let api = ApiUrl::new(api_url).context("Invalid API URL")?;
        let dir = storage::data_dir(data_dir)?;
        let credentials = Arc::new(storage::credential_store(&dir));
        let navigator = Arc::new(RecordingNavigator::new());

        debug!(api = %api, dir = %dir.display(), "Opening session");
        let client = Client::new(&ClientConfig::new(api), credentials, navigator.clone())
            .context("Failed to build HTTP client")?;

        Ok(Self { client, navigator })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Revalidate the stored credential and require a logged-in user.
    pub async fn restore(&self) -> Result<Arc<Identity>> {
        match self.client.initialize().await {
            SessionStatus::Authenticated => self
                .client
                .require_identity()
                .context("Session lost during initialization"),
            SessionStatus::Loading | SessionStatus::Anonymous => {
                bail!("Not logged in. Run 'collegeconnect login' first.")
            }
        }
    }

    /// True if a 401 sent the session back to the login route.
    pub fn redirected_to_login(&self) -> bool {
        self.navigator.last().as_deref() == Some(LOGIN_ROUTE)
    }
}
