use crate::date::{Day, TimeOfDay};
use crate::dose::{Dose, DoseStatus};
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A `Reminder` is a user defined prompt (medication, habit, appointment)
/// firing at a fixed time of day on the days selected by its repeat rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    /// The user owning this reminder. Only the owner may view or mutate it.
    pub user_id: ID,
    pub title: String,
    pub category: Category,
    pub description: Option<String>,
    /// Time of day at which the reminder fires on active days
    pub time: TimeOfDay,
    pub repeat: RepeatRule,
    /// Timestamp of the latest dose marked taken. Derived from the dose
    /// history, never patched in place.
    pub last_taken_at: Option<i64>,
    /// Count of doses with status taken, derived from the dose history
    pub completed_count: u32,
    /// Count of doses with status skipped, derived from the dose history
    pub missed_count: u32,
    /// Advisory timestamp of the next firing, or None when the repeat rule
    /// can never fire again
    pub next_occurrence: Option<i64>,
}

impl Reminder {
    pub fn new(
        user_id: ID,
        title: String,
        category: Category,
        time: TimeOfDay,
        repeat: RepeatRule,
    ) -> Self {
        Self {
            id: Default::default(),
            user_id,
            title,
            category,
            description: None,
            time,
            repeat,
            last_taken_at: None,
            completed_count: 0,
            missed_count: 0,
            next_occurrence: None,
        }
    }

    /// Whether this reminder is due on the given calendar day.
    ///
    /// One-time reminders are never picked up by the daily scanner view,
    /// they are only logged manually. An empty day set is never active.
    pub fn is_active_on(&self, day: &Day) -> bool {
        match &self.repeat {
            RepeatRule::None => false,
            RepeatRule::Daily => true,
            RepeatRule::SpecificDays(days) => days
                .iter()
                .any(|d| d.index() as u32 == day.weekday_index()),
        }
    }

    /// The first firing timestamp strictly after `now`, scanning at most a
    /// week ahead since repeat rules are weekday based.
    pub fn next_occurrence_after(&self, now: i64) -> Option<i64> {
        if let RepeatRule::None = self.repeat {
            return None;
        }
        let mut day = Day::from_timestamp_millis(now);
        for _ in 0..=7 {
            if self.is_active_on(&day) {
                let fires_at = day.timestamp_millis_at(&self.time);
                if fires_at > now {
                    return Some(fires_at);
                }
            }
            day.inc();
        }
        None
    }

    /// Rederives the denormalized counters and the advisory next occurrence
    /// from the full dose history. Pure over its inputs and safe to re-run
    /// at any time, e.g. for backfill after a partial write.
    pub fn recompute_dose_stats(&mut self, doses: &[Dose], now: i64) {
        self.completed_count = doses
            .iter()
            .filter(|d| d.status == DoseStatus::Taken)
            .count() as u32;
        self.missed_count = doses
            .iter()
            .filter(|d| d.status == DoseStatus::Skipped)
            .count() as u32;
        self.last_taken_at = doses.iter().filter_map(|d| d.taken_at).max();
        self.next_occurrence = self.next_occurrence_after(now);
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Medication,
    Supplement,
    Appointment,
    Water,
    Exercise,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Medication => "medication",
            Self::Supplement => "supplement",
            Self::Appointment => "appointment",
            Self::Water => "water",
            Self::Exercise => "exercise",
        };
        write!(f, "{}", label)
    }
}

#[derive(Error, Debug)]
pub enum InvalidCategoryError {
    #[error("Category: {0} is not recognized")]
    Unrecognized(String),
}

impl FromStr for Category {
    type Err = InvalidCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medication" => Ok(Self::Medication),
            "supplement" => Ok(Self::Supplement),
            "appointment" => Ok(Self::Appointment),
            "water" => Ok(Self::Water),
            "exercise" => Ok(Self::Exercise),
            _ => Err(InvalidCategoryError::Unrecognized(s.to_string())),
        }
    }
}

/// How a reminder repeats. Unknown rule values are rejected when the value
/// is deserialized, so the evaluator itself only ever sees these variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "days", rename_all = "kebab-case")]
pub enum RepeatRule {
    /// Fires only once, never picked up by the recurring scanner
    None,
    Daily,
    /// Active on an explicit set of weekdays
    SpecificDays(Vec<WeekDay>),
}

/// A weekday index with `0 = Sunday` up to `6 = Saturday`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekDay(u8);

#[derive(Error, Debug)]
pub enum InvalidWeekDayError {
    #[error("WeekDay: {0} is out of range, expected 0 (Sunday) to 6 (Saturday)")]
    OutOfRange(u64),
}

impl WeekDay {
    pub fn new(index: u8) -> Result<Self, InvalidWeekDayError> {
        if index > 6 {
            return Err(InvalidWeekDayError::OutOfRange(index as u64));
        }
        Ok(Self(index))
    }

    pub fn index(&self) -> u8 {
        self.0
    }
}

impl Serialize for WeekDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for WeekDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let index = u64::deserialize(deserializer)?;
        if index > 6 {
            return Err(serde::de::Error::custom(InvalidWeekDayError::OutOfRange(
                index,
            )));
        }
        Ok(WeekDay(index as u8))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn reminder_with_repeat(repeat: RepeatRule) -> Reminder {
        Reminder::new(
            Default::default(),
            "Vitamin D".into(),
            Category::Supplement,
            "08:00".parse().unwrap(),
            repeat,
        )
    }

    fn week_of_days() -> Vec<Day> {
        // 2021-02-21 (Sunday) through 2021-02-27 (Saturday)
        let mut day = Day::new(2021, 2, 21).unwrap();
        let mut days = Vec::new();
        for _ in 0..7 {
            days.push(day.clone());
            day.inc();
        }
        days
    }

    #[test]
    fn one_time_reminders_are_never_active() {
        let reminder = reminder_with_repeat(RepeatRule::None);
        for day in week_of_days() {
            assert!(!reminder.is_active_on(&day));
        }
    }

    #[test]
    fn daily_reminders_are_active_every_day() {
        let reminder = reminder_with_repeat(RepeatRule::Daily);
        for day in week_of_days() {
            assert!(reminder.is_active_on(&day));
        }
    }

    #[test]
    fn specific_days_reminders_follow_their_day_set() {
        let days = vec![
            WeekDay::new(1).unwrap(),
            WeekDay::new(3).unwrap(),
            WeekDay::new(5).unwrap(),
        ];
        let reminder = reminder_with_repeat(RepeatRule::SpecificDays(days));
        let active = week_of_days()
            .iter()
            .map(|day| reminder.is_active_on(day))
            .collect::<Vec<_>>();
        // Sunday through Saturday, active Mon / Wed / Fri
        assert_eq!(active, vec![false, true, false, true, false, true, false]);
    }

    #[test]
    fn empty_day_set_is_never_active() {
        let reminder = reminder_with_repeat(RepeatRule::SpecificDays(Vec::new()));
        for day in week_of_days() {
            assert!(!reminder.is_active_on(&day));
        }
    }

    #[test]
    fn weekday_indices_are_validated() {
        assert!(WeekDay::new(0).is_ok());
        assert!(WeekDay::new(6).is_ok());
        assert!(WeekDay::new(7).is_err());
        assert!(serde_json::from_str::<WeekDay>("3").is_ok());
        assert!(serde_json::from_str::<WeekDay>("9").is_err());
    }

    #[test]
    fn repeat_rules_use_the_wire_format() {
        let rule: RepeatRule = serde_json::from_str(r#"{"type":"daily"}"#).unwrap();
        assert_eq!(rule, RepeatRule::Daily);
        let rule: RepeatRule =
            serde_json::from_str(r#"{"type":"specific-days","days":[1,3,5]}"#).unwrap();
        match rule {
            RepeatRule::SpecificDays(days) => {
                assert_eq!(days.iter().map(|d| d.index()).collect::<Vec<_>>(), [1, 3, 5])
            }
            _ => panic!("Expected specific-days"),
        }
        assert!(serde_json::from_str::<RepeatRule>(r#"{"type":"weekly"}"#).is_err());
    }

    const SUNDAY_MIDNIGHT: i64 = 1613865600000; // 2021-02-21 00:00:00 UTC
    const HOUR: i64 = 1000 * 60 * 60;
    const DAY: i64 = 24 * HOUR;

    #[test]
    fn next_occurrence_is_today_before_firing_time() {
        let reminder = reminder_with_repeat(RepeatRule::Daily);
        let next = reminder.next_occurrence_after(SUNDAY_MIDNIGHT).unwrap();
        assert_eq!(next, SUNDAY_MIDNIGHT + 8 * HOUR);
    }

    #[test]
    fn next_occurrence_rolls_to_tomorrow_after_firing_time() {
        let reminder = reminder_with_repeat(RepeatRule::Daily);
        let next = reminder
            .next_occurrence_after(SUNDAY_MIDNIGHT + 9 * HOUR)
            .unwrap();
        assert_eq!(next, SUNDAY_MIDNIGHT + DAY + 8 * HOUR);
    }

    #[test]
    fn next_occurrence_skips_inactive_weekdays() {
        let days = vec![WeekDay::new(3).unwrap()]; // Wednesday
        let reminder = reminder_with_repeat(RepeatRule::SpecificDays(days));
        let next = reminder.next_occurrence_after(SUNDAY_MIDNIGHT).unwrap();
        assert_eq!(next, SUNDAY_MIDNIGHT + 3 * DAY + 8 * HOUR);
    }

    #[test]
    fn next_occurrence_is_none_for_one_time_and_empty_rules() {
        let reminder = reminder_with_repeat(RepeatRule::None);
        assert!(reminder.next_occurrence_after(SUNDAY_MIDNIGHT).is_none());
        let reminder = reminder_with_repeat(RepeatRule::SpecificDays(Vec::new()));
        assert!(reminder.next_occurrence_after(SUNDAY_MIDNIGHT).is_none());
    }

    #[test]
    fn recompute_dose_stats_rederives_counters_from_history() {
        let mut reminder = reminder_with_repeat(RepeatRule::Daily);
        let mut day = Day::new(2021, 2, 15).unwrap();
        let mut doses = Vec::new();
        let statuses = [
            DoseStatus::Taken,
            DoseStatus::Taken,
            DoseStatus::Skipped,
            DoseStatus::Taken,
            DoseStatus::Snoozed,
        ];
        for (i, status) in statuses.iter().enumerate() {
            let mut dose = Dose::pending(reminder.id.clone(), day.clone());
            dose.apply_log(*status, None, SUNDAY_MIDNIGHT + i as i64);
            doses.push(dose);
            day.inc();
        }

        reminder.recompute_dose_stats(&doses, SUNDAY_MIDNIGHT);
        assert_eq!(reminder.completed_count, 3);
        assert_eq!(reminder.missed_count, 1);
        assert_eq!(reminder.last_taken_at, Some(SUNDAY_MIDNIGHT + 3));
        assert_eq!(
            reminder.next_occurrence,
            Some(SUNDAY_MIDNIGHT + 8 * HOUR)
        );

        // Running it again does not change anything
        let before = reminder.clone();
        reminder.recompute_dose_stats(&doses, SUNDAY_MIDNIGHT);
        assert_eq!(reminder, before);
    }
}
