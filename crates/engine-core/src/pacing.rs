//! Pauses between page queries.
//!
//! A fixed pause waits the configured number of seconds. The jittered
//! ("paranoid") pause adds a random term scaled by the distance of the
//! current local hour from noon:
//!
//! ```text
//! factor = 2 + |12 - hour|
//! pause  = factor * uniform[0, 1) + delay
//! ```
//!
//! The generator is seeded from the current local second. The configured
//! delay is added, not used as a floor.

use crate::error::PacingError;
use chrono::{DateTime, Local, TimeZone, Timelike};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pacing {
    /// Query pages back to back.
    Off,
    Fixed { delay: f64 },
    Jittered { delay: f64 },
}

impl Pacing {
    /// A missing or zero delay disables pacing; `paranoid` only matters when
    /// a delay is set.
    pub fn new(delay: Option<f64>, paranoid: bool) -> Self {
        match delay {
            Some(delay) if delay != 0.0 => {
                if paranoid {
                    Pacing::Jittered { delay }
                } else {
                    Pacing::Fixed { delay }
                }
            }
            _ => Pacing::Off,
        }
    }

    /// Pause to take before the next page, based on the local clock.
    pub fn next_pause(&self) -> Result<Option<Pause>, PacingError> {
        self.pause_at(&Local::now())
    }

    pub fn pause_at<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<Option<Pause>, PacingError> {
        let secs = match *self {
            Pacing::Off => return Ok(None),
            Pacing::Fixed { delay } => delay,
            Pacing::Jittered { delay } => jittered_secs(delay, now.hour(), now.second()),
        };
        Pause::from_secs(secs).map(Some)
    }
}

pub fn jittered_secs(delay: f64, hour: u32, second: u32) -> f64 {
    let mut rng = StdRng::seed_from_u64(u64::from(second));
    let factor = 2.0 + (12.0 - f64::from(hour)).abs();
    factor * rng.random::<f64>() + delay
}

/// A concrete pause, with the annotation shown on the progress line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pause {
    secs: f64,
    duration: Duration,
}

impl Pause {
    pub fn from_secs(secs: f64) -> Result<Self, PacingError> {
        let duration =
            Duration::try_from_secs_f64(secs).map_err(|_| PacingError::InvalidPause(secs))?;
        Ok(Pause { secs, duration })
    }

    pub fn secs(&self) -> f64 {
        self.secs
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn annotation(&self) -> String {
        format!("[sleeping {:.2} sec]", self.secs)
    }

    pub async fn sleep(&self) {
        tokio::time::sleep(self.duration).await;
    }
}
