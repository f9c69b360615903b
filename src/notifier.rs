//! Slack-compatible webhook notifier.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::HealthState;

const BOT_USERNAME: &str = "StatusBot";
const BOT_ICON: &str = ":space_invader:";
const FOOTER: &str = "StatusBot - The Newer-er Hotness";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to post notification to webhook: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Sink for transition messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        message: &str,
        severity: HealthState,
        channel: &str,
    ) -> Result<(), NotifyError>;
}

#[derive(Debug, Serialize)]
struct SlackMessage<'a> {
    username: &'static str,
    icon_emoji: &'static str,
    channel: &'a str,
    attachments: Vec<SlackAttachment<'a>>,
}

#[derive(Debug, Serialize)]
struct SlackAttachment<'a> {
    mrkdwn_in: Vec<&'static str>,
    color: &'static str,
    text: &'a str,
    footer: &'static str,
    ts: i64,
}

#[derive(Clone)]
pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self::with_client(client, webhook_url))
    }

    pub fn with_client(client: Client, webhook_url: impl Into<String>) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
        }
    }
}

fn build_payload<'a>(
    message: &'a str,
    severity: HealthState,
    channel: &'a str,
    ts: i64,
) -> SlackMessage<'a> {
    SlackMessage {
        username: BOT_USERNAME,
        icon_emoji: BOT_ICON,
        channel,
        attachments: vec![SlackAttachment {
            mrkdwn_in: vec!["text"],
            color: severity.color(),
            text: message,
            footer: FOOTER,
            ts,
        }],
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(
        &self,
        message: &str,
        severity: HealthState,
        channel: &str,
    ) -> Result<(), NotifyError> {
        let payload = build_payload(message, severity, channel, Utc::now().timestamp());
        let resp = self.client.post(&self.webhook_url).json(&payload).send().await?;

        // The sink's verdict is advisory; only transport failures are errors.
        if resp.status().is_success() {
            debug!(%severity, %channel, "notification delivered");
        } else {
            warn!("Slack webhook answered with status {}", resp.status());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::net::TcpListener;

    #[test]
    fn payload_matches_wire_contract() {
        let payload = build_payload(
            "*Example* is down!! Link <http://x>.",
            HealthState::Down,
            "#ops",
            1_700_000_000,
        );
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "username": "StatusBot",
                "icon_emoji": ":space_invader:",
                "channel": "#ops",
                "attachments": [{
                    "mrkdwn_in": ["text"],
                    "color": "#a50008",
                    "text": "*Example* is down!! Link <http://x>.",
                    "footer": "StatusBot - The Newer-er Hotness",
                    "ts": 1_700_000_000
                }]
            })
        );
    }

    #[test]
    fn payload_color_tracks_severity() {
        let connected = build_payload("Statusbot is connected.", HealthState::Normal, "#ops", 0);
        assert_eq!(connected.attachments[0].color, "#ffffff");
        let errors = build_payload("x", HealthState::Error, "#ops", 0);
        assert_eq!(errors.attachments[0].color, "#db9f49");
    }

    #[tokio::test]
    async fn unreachable_webhook_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let notifier = SlackNotifier::new(format!("http://{addr}/hook")).unwrap();
        let result = notifier.notify("hello", HealthState::Normal, "#ops").await;
        assert!(matches!(result, Err(NotifyError::Transport(_))));
    }
}
