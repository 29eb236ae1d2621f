use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use tracing::info;

use super::FeatureModule;

/// Time left until the countdown target, split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    pub const ZERO: Remaining = Remaining {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Remaining time from `now` to `target`; zero once the target has passed.
    pub fn between(now: DateTime<Utc>, target: DateTime<Utc>) -> Self {
        let total = (target - now).num_seconds();
        if total <= 0 {
            return Self::ZERO;
        }
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Computes the countdown once at startup.
pub struct CountdownModule {
    target: Option<DateTime<Utc>>,
    latest: Mutex<Option<Remaining>>,
}

impl CountdownModule {
    pub fn new(target: Option<DateTime<Utc>>) -> Self {
        Self {
            target,
            latest: Mutex::new(None),
        }
    }

    pub fn target(&self) -> Option<DateTime<Utc>> {
        self.target
    }

    /// Value from the most recent tick, if any.
    pub fn latest(&self) -> Option<Remaining> {
        *self.latest.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn tick(&self, now: DateTime<Utc>) -> Option<Remaining> {
        let remaining = self.target.map(|target| Remaining::between(now, target));
        *self.latest.lock().unwrap_or_else(|e| e.into_inner()) = remaining;
        remaining
    }
}

impl FeatureModule for CountdownModule {
    fn name(&self) -> &str {
        "countdown"
    }

    fn setup(&self) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            match self.tick(Utc::now()) {
                Some(remaining) if remaining.is_zero() => info!("Countdown finished"),
                Some(remaining) => info!("Countdown: {}", remaining),
                None => info!("No countdown target configured"),
            }
            Ok(())
        })
    }
}
