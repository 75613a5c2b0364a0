//! Room lifecycle configuration.

use std::time::Duration;

use parlor_session::IdSpace;
use serde::{Deserialize, Serialize};

/// Configuration shared by a registry's rooms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// How long a room lives after it is created.
    pub ttl: Duration,

    /// How long a finished game stays readable. When the engine reports a
    /// terminal state, the room's expiry is pulled in to at most this far
    /// from now.
    pub finished_grace: Duration,

    /// Where room ids are drawn from.
    pub id_space: IdSpace,

    /// How many candidate ids to draw before giving up with
    /// `RoomError::IdSpaceExhausted`.
    pub max_id_attempts: u32,

    /// Minimum time between two opportunistic sweeps. `Duration::ZERO`
    /// sweeps on every registry access.
    pub sweep_throttle: Duration,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            finished_grace: Duration::from_secs(2 * 60),
            id_space: IdSpace::SIX_DIGIT,
            max_id_attempts: 64,
            sweep_throttle: Duration::from_secs(1),
        }
    }
}

impl RoomConfig {
    /// A config where rooms never expire on their own during a test and
    /// every access sweeps.
    pub fn for_tests() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            sweep_throttle: Duration::ZERO,
            ..Self::default()
        }
    }
}
