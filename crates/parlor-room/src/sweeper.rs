//! Periodic background sweeping.
//!
//! Lazy sweeping runs inline with requests. Under load that puts an
//! O(rooms) scan on some unlucky request; a sweeper task moves the scan
//! off the request path. Both can run at once.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::{GameEngine, RoomRegistry};

/// Smallest interval accepted; `tokio::time::interval` panics on zero.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Owns a running sweeper task and aborts it on drop.
#[derive(Debug)]
pub struct SweeperHandle {
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stops the sweeper.
    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns a task that sweeps `registry` every `every`.
///
/// If a sweep runs late (the runtime was busy), missed ticks are skipped
/// rather than run back to back.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_sweeper<G: GameEngine>(
    registry: RoomRegistry<G>,
    every: Duration,
) -> SweeperHandle {
    let every = every.max(MIN_INTERVAL);

    let task = tokio::spawn(async move {
        let mut interval = time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::debug!(game = %G::KIND, ?every, "sweeper started");

        loop {
            interval.tick().await;
            let swept = registry.sweep().await;
            if !swept.is_empty() {
                tracing::debug!(
                    game = %G::KIND,
                    swept = swept.len(),
                    "background sweep"
                );
            }
        }
    });

    SweeperHandle { task }
}
