//! Single-shot HTTP reachability probe.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::models::HealthState;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Status: {0}")]
    ClientStatus(u16),
}

/// Outcome of one probe. `error` only feeds log text.
#[derive(Debug)]
pub struct ProbeReport {
    pub state: HealthState,
    pub error: Option<ProbeError>,
}

impl ProbeReport {
    pub fn new(state: HealthState) -> Self {
        Self { state, error: None }
    }

    pub fn with_error(state: HealthState, error: ProbeError) -> Self {
        Self {
            state,
            error: Some(error),
        }
    }
}

#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeReport;
}

/// Issues exactly one GET per call, bounded by `timeout`. No retries.
#[derive(Clone)]
pub struct HttpProber {
    client: Client,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("statusbot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, timeout))
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self, url: &str) -> ProbeReport {
        match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) => {
                let code = response.status().as_u16();
                debug!(%url, status = code, "probe answered");
                classify_status(code)
            }
            Err(err) => {
                debug!(%url, error = %err, "probe transport failure");
                ProbeReport::with_error(HealthState::Down, ProbeError::Transport(err))
            }
        }
    }
}

/// Maps an HTTP status to a health state.
///
/// 4xx counts as down and carries an error; 5xx counts as erroring and
/// carries none.
pub fn classify_status(code: u16) -> ProbeReport {
    match code {
        0..400 => ProbeReport::new(HealthState::Up),
        400..500 => ProbeReport::with_error(HealthState::Down, ProbeError::ClientStatus(code)),
        _ => ProbeReport::new(HealthState::Error),
    }
}
