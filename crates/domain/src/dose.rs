use crate::date::Day;
use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A `Dose` records the outcome of one reminder on one calendar date.
/// `(reminder_id, date)` is the natural key, there is at most one record
/// per reminder per day.
#[derive(Debug, Clone, PartialEq)]
pub struct Dose {
    pub reminder_id: ID,
    pub date: Day,
    pub status: DoseStatus,
    /// Set to the logging time whenever a log marks the dose taken. A later
    /// status change leaves it untouched, so it keeps the historical record
    /// of when the dose was actually taken.
    pub taken_at: Option<i64>,
    pub snoozed_until: Option<i64>,
}

impl Dose {
    /// Placeholder created by the due-reminder scanner, waiting for a user
    /// action to resolve it.
    pub fn pending(reminder_id: ID, date: Day) -> Self {
        Self {
            reminder_id,
            date,
            status: DoseStatus::Pending,
            taken_at: None,
            snoozed_until: None,
        }
    }

    /// A dose created directly by a user log action.
    pub fn logged(
        reminder_id: ID,
        date: Day,
        status: DoseStatus,
        snoozed_until: Option<i64>,
        now: i64,
    ) -> Self {
        let mut dose = Self::pending(reminder_id, date);
        dose.apply_log(status, snoozed_until, now);
        dose
    }

    /// Applies a log action to an existing record. The status is always
    /// overwritten; `taken_at` is stamped with `now` only when the new
    /// status is taken; `snoozed_until` is overwritten only when provided.
    pub fn apply_log(&mut self, status: DoseStatus, snoozed_until: Option<i64>, now: i64) {
        self.status = status;
        if status == DoseStatus::Taken {
            self.taken_at = Some(now);
        }
        if snoozed_until.is_some() {
            self.snoozed_until = snoozed_until;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoseStatus {
    /// Created by the scanner when the reminder fired, not yet acted upon
    Pending,
    Taken,
    Skipped,
    Snoozed,
}

impl std::fmt::Display for DoseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Taken => "taken",
            Self::Skipped => "skipped",
            Self::Snoozed => "snoozed",
        };
        write!(f, "{}", label)
    }
}

#[derive(Error, Debug)]
pub enum InvalidDoseStatusError {
    #[error("Dose status: {0} is not recognized")]
    Unrecognized(String),
}

impl FromStr for DoseStatus {
    type Err = InvalidDoseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "taken" => Ok(Self::Taken),
            "skipped" => Ok(Self::Skipped),
            "snoozed" => Ok(Self::Snoozed),
            _ => Err(InvalidDoseStatusError::Unrecognized(s.to_string())),
        }
    }
}
