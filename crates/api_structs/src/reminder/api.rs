use crate::dtos::{DoseDTO, ReminderDTO, ReminderWithTodayDoseDTO};
use circlecare_domain::{Dose, Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

pub mod create_reminder {
    use circlecare_domain::{Category, RepeatRule, TimeOfDay};

    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        pub category: Category,
        pub description: Option<String>,
        pub time: TimeOfDay,
        pub repeat: RepeatRule,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod update_reminder {
    use circlecare_domain::{Category, RepeatRule, TimeOfDay};

    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: Option<String>,
        pub category: Option<Category>,
        pub description: Option<String>,
        pub time: Option<TimeOfDay>,
        pub repeat: Option<RepeatRule>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminders {
    use super::*;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        /// When true, only reminders whose repeat rule is active on the
        /// current day are returned
        #[serde(default)]
        pub active_today: bool,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<ReminderWithTodayDoseDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<(Reminder, Option<Dose>)>) -> Self {
            Self {
                reminders: reminders
                    .into_iter()
                    .map(|(reminder, today_dose)| {
                        ReminderWithTodayDoseDTO::new(reminder, today_dose)
                    })
                    .collect(),
            }
        }
    }
}

pub mod log_dose {
    use circlecare_domain::{Day, DoseStatus};

    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub status: DoseStatus,
        /// Defaults to the current day when omitted
        pub date: Option<Day>,
        pub snoozed_until: Option<i64>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub dose: DoseDTO,
        pub reminder: ReminderDTO,
    }

    impl APIResponse {
        pub fn new(dose: Dose, reminder: Reminder) -> Self {
            Self {
                dose: DoseDTO::new(dose),
                reminder: ReminderDTO::new(reminder),
            }
        }
    }
}

pub mod get_adherence {
    use circlecare_domain::AdherenceSnapshot;

    pub type APIResponse = AdherenceSnapshot;
}
