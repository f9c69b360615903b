//! The status-watch loop.
//!
//! Every cycle probes each site in list order and compares the result with
//! the state stored from the previous cycle. Only a *change* produces a
//! notification, so a site that stays down is reported once. Sites are
//! handled strictly one after another and cycles never overlap; the loop
//! holds the site list exclusively, so compare-then-update needs no locking.

use std::convert::Infallible;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{HealthState, Site, SiteList};
use crate::notifier::{Notifier, NotifyError};
use crate::prober::Probe;

pub const CONNECTED_MESSAGE: &str = "Statusbot is connected.";

#[derive(Debug, Error)]
pub enum WatchError {
    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("probe for {site} produced {state}, which has no transition message")]
    UnexpectedState { site: String, state: HealthState },
}

/// Text sent when `site` moves into `state`.
pub fn transition_message(site: &Site, state: HealthState) -> Result<String, WatchError> {
    match state {
        HealthState::Up => Ok(format!("*{}* is back to normal.", site.name)),
        HealthState::Down => Ok(format!("*{}* is down!! Link <{}>.", site.name, site.url)),
        HealthState::Error => Ok(format!(
            "*{}* is experiencing errors. Link <{}>.",
            site.name, site.url
        )),
        HealthState::Normal | HealthState::Info => Err(WatchError::UnexpectedState {
            site: site.name.clone(),
            state,
        }),
    }
}

pub struct WatchLoop<P, N> {
    sites: SiteList,
    prober: P,
    notifier: N,
    interval: Duration,
    channel: String,
}

impl<P: Probe, N: Notifier> WatchLoop<P, N> {
    pub fn new(
        sites: SiteList,
        prober: P,
        notifier: N,
        interval: Duration,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            sites,
            prober,
            notifier,
            interval,
            channel: channel.into(),
        }
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Announces the bot on the channel, then watches forever.
    ///
    /// Nothing is probed if the announcement cannot be delivered.
    pub async fn start(&mut self) -> Result<Infallible, WatchError> {
        self.notifier
            .notify(CONNECTED_MESSAGE, HealthState::Normal, &self.channel)
            .await?;
        info!("Connected; notifications go to {}", self.channel);
        self.run().await
    }

    /// Runs cycles forever, sleeping `interval` between them.
    ///
    /// Returns only when a cycle fails, e.g. the webhook is unreachable.
    pub async fn run(&mut self) -> Result<Infallible, WatchError> {
        info!(
            "Starting watch over {} sites (interval: {:?}, channel: {})",
            self.sites.len(),
            self.interval,
            self.channel
        );

        loop {
            self.run_cycle().await?;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Probes every site once and notifies on each state change.
    ///
    /// Returns the number of notifications sent.
    pub async fn run_cycle(&mut self) -> Result<usize, WatchError> {
        let mut sent = 0;

        for site in self.sites.iter_mut() {
            let report = self.prober.probe(&site.url).await;
            let state = report.state;

            if state == site.last_state {
                debug!(site = %site.name, %state, "no change");
                continue;
            }

            let message = transition_message(site, state)?;
            let previous = site.last_state;
            site.last_state = state;

            match (state, &report.error) {
                (HealthState::Up, _) => info!("Site {} is ok.", site.name),
                (_, Some(err)) => warn!(
                    "Site {} is {} (was {}): {}",
                    site.name, state, previous, err
                ),
                (_, None) => warn!("Site {} is {} (was {}).", site.name, state, previous),
            }

            self.notifier.notify(&message, state, &self.channel).await?;
            sent += 1;
        }

        Ok(sent)
    }
}
