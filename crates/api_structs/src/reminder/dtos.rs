use circlecare_domain::{Category, Dose, DoseStatus, Reminder, RepeatRule, TimeOfDay, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub user_id: ID,
    pub title: String,
    pub category: Category,
    pub description: Option<String>,
    pub time: TimeOfDay,
    pub repeat: RepeatRule,
    pub last_taken_at: Option<i64>,
    pub completed_count: u32,
    pub missed_count: u32,
    pub next_occurrence: Option<i64>,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id.clone(),
            user_id: reminder.user_id.clone(),
            title: reminder.title,
            category: reminder.category,
            description: reminder.description,
            time: reminder.time,
            repeat: reminder.repeat,
            last_taken_at: reminder.last_taken_at,
            completed_count: reminder.completed_count,
            missed_count: reminder.missed_count,
            next_occurrence: reminder.next_occurrence,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DoseDTO {
    pub reminder_id: ID,
    /// YYYY-MM-DD
    pub date: String,
    pub status: DoseStatus,
    pub taken_at: Option<i64>,
    pub snoozed_until: Option<i64>,
}

impl DoseDTO {
    pub fn new(dose: Dose) -> Self {
        Self {
            reminder_id: dose.reminder_id.clone(),
            date: dose.date.to_string(),
            status: dose.status,
            taken_at: dose.taken_at,
            snoozed_until: dose.snoozed_until,
        }
    }
}

/// A reminder listed together with its dose record for the current day,
/// when one exists.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderWithTodayDoseDTO {
    pub reminder: ReminderDTO,
    pub today_dose: Option<DoseDTO>,
}

impl ReminderWithTodayDoseDTO {
    pub fn new(reminder: Reminder, today_dose: Option<Dose>) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
            today_dose: today_dose.map(DoseDTO::new),
        }
    }
}
