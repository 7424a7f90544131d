use super::IDoseRepo;
use crate::repos::shared::repo::DeleteResult;
use circlecare_domain::{Day, Dose, DoseStatus, ID};
use std::sync::Mutex;

pub struct InMemoryDoseRepo {
    doses: Mutex<Vec<Dose>>,
}

impl InMemoryDoseRepo {
    pub fn new() -> Self {
        Self {
            doses: Mutex::new(Vec::new()),
        }
    }
}

// Doses are keyed by (reminder_id, date) rather than an own id, so the
// generic inmemory helpers do not apply here. All operations take the lock
// once, which gives the same atomicity per key as the postgres upsert.
#[async_trait::async_trait]
impl IDoseRepo for InMemoryDoseRepo {
    async fn upsert(&self, dose: &Dose) -> anyhow::Result<Dose> {
        let mut doses = self.doses.lock().unwrap();
        match doses
            .iter_mut()
            .find(|d| d.reminder_id == dose.reminder_id && d.date == dose.date)
        {
            Some(existing) => {
                existing.status = dose.status;
                if dose.taken_at.is_some() {
                    existing.taken_at = dose.taken_at;
                }
                if dose.snoozed_until.is_some() {
                    existing.snoozed_until = dose.snoozed_until;
                }
                Ok(existing.clone())
            }
            None => {
                doses.push(dose.clone());
                Ok(dose.clone())
            }
        }
    }

    async fn insert_pending(&self, reminder_id: &ID, date: &Day) -> anyhow::Result<bool> {
        let mut doses = self.doses.lock().unwrap();
        let exists = doses
            .iter()
            .any(|d| d.reminder_id == *reminder_id && d.date == *date);
        if exists {
            return Ok(false);
        }
        doses.push(Dose {
            reminder_id: reminder_id.clone(),
            date: date.clone(),
            status: DoseStatus::Pending,
            taken_at: None,
            snoozed_until: None,
        });
        Ok(true)
    }

    async fn find(&self, reminder_id: &ID, date: &Day) -> Option<Dose> {
        let doses = self.doses.lock().unwrap();
        doses
            .iter()
            .find(|d| d.reminder_id == *reminder_id && d.date == *date)
            .cloned()
    }

    async fn find_by_reminder(&self, reminder_id: &ID) -> Vec<Dose> {
        let doses = self.doses.lock().unwrap();
        doses
            .iter()
            .filter(|d| d.reminder_id == *reminder_id)
            .cloned()
            .collect()
    }

    async fn delete_by_reminder(&self, reminder_id: &ID) -> anyhow::Result<DeleteResult> {
        let mut doses = self.doses.lock().unwrap();
        let before = doses.len();
        doses.retain(|d| d.reminder_id != *reminder_id);
        Ok(DeleteResult {
            deleted_count: (before - doses.len()) as i64,
        })
    }
}
