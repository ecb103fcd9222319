//! Clash schedule data
//!
//! A clash is a themed, time-boxed tournament with one or more schedule
//! entries. Collections of clashes are fetched per region and browsed through
//! the [`ClashNavigator`].

pub mod navigator;
pub mod remote;

pub use navigator::ClashNavigator;
pub use remote::{ClashSource, FetchTicket, HttpClashSource, RemoteClashes, StaticClashSource};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ClashId = i64;

/// A single time window within a clash. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: i64,
    pub registration_time: i64,
    pub start_time: i64,
    #[serde(default)]
    pub cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clash {
    pub id: ClashId,
    pub theme_id: i64,
    pub name_key: String,
    pub name_key_secondary: String,
    #[serde(default)]
    pub schedule: Vec<Schedule>,
}

impl Clash {
    /// Start time of the first schedule entry, used to order clashes by
    /// proximity.
    pub fn first_start_time(&self) -> ClashResult<i64> {
        self.schedule
            .first()
            .map(|entry| entry.start_time)
            .ok_or(ClashError::EmptySchedule { id: self.id })
    }

    /// True when every schedule entry has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        !self.schedule.is_empty() && self.schedule.iter().all(|entry| entry.cancelled)
    }
}

impl std::fmt::Display for Clash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} / {}", self.id, self.name_key, self.name_key_secondary)?;
        if self.is_cancelled() {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ClashError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP status error: {0} - {1}")]
    HttpStatus(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Clash {id} has no schedule entries")]
    EmptySchedule { id: ClashId },

    #[error("Clash fetch task failed: {0}")]
    Task(String),

    #[error("Clash {id} is not part of the current collection")]
    UnknownClash { id: ClashId },
}

pub type ClashResult<T> = Result<T, ClashError>;
