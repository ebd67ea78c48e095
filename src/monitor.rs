use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::time::MissedTickBehavior;

use crate::client::ServiceClient;
use crate::events::{AppEvent, EventSender};
use crate::state::ServiceHealth;

/// Starts the periodic health poll: one probe immediately, then one per
/// interval. Each tick spawns an independent probe tagged with a rising
/// generation, so a hung probe never delays the next one; ordering is
/// resolved on the receiving side by [`HealthTracker`].
pub fn spawn(
    handle: &tokio::runtime::Handle,
    client: Arc<ServiceClient>,
    poll_interval: Duration,
    tx: EventSender,
) -> tokio::task::JoinHandle<()> {
    handle.spawn(async move {
        let mut generation: u64 = 0;
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            generation += 1;
            let gen = generation;
            let client = client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let health = match client.health().await {
                    Ok(h) => h,
                    Err(e) => {
                        debug!("health probe {} failed: {}", gen, e);
                        ServiceHealth::disconnected()
                    }
                };
                let _ = tx.send(AppEvent::Health { generation: gen, health });
            });
        }
    })
}

/// Current service health plus the generation of the newest applied probe.
/// Probes can resolve out of order; the latest started probe wins and
/// stragglers are dropped.
#[derive(Default)]
pub struct HealthTracker {
    last_generation: u64,
    current: ServiceHealth,
}

impl HealthTracker {
    pub fn current(&self) -> ServiceHealth {
        self.current
    }

    /// Applies a resolved probe. Returns false when a newer probe already
    /// landed, in which case the state is untouched.
    pub fn apply(&mut self, generation: u64, health: ServiceHealth) -> bool {
        if generation < self.last_generation {
            return false;
        }
        self.last_generation = generation;
        self.current = health;
        true
    }

    /// Direct transition from an initialize or query outcome. These reflect
    /// the service's answer to an action we just took, so they override the
    /// polled value until the next probe.
    pub fn set_browser_ready(&mut self, ready: bool) {
        self.current.browser_ready = ready;
        if ready {
            self.current.reachable = true;
        }
    }
}
