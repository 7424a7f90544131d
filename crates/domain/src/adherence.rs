use crate::date::{Day, TimeOfDay};
use crate::dose::{Dose, DoseStatus};
use crate::reminder::Reminder;
use crate::shared::entity::ID;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Derived adherence statistics over a user's reminders and their full dose
/// history. Never persisted, recomputed at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdherenceSnapshot {
    pub total_reminders: usize,
    pub total_doses: usize,
    pub taken_doses: usize,
    pub skipped_doses: usize,
    /// round(taken / total * 100), 0 when there are no doses
    pub adherence_percentage: u32,
    pub longest_streak: u32,
    pub next_reminder: Option<NextReminder>,
}

/// The soonest upcoming firing across a set of reminders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextReminder {
    pub id: ID,
    pub title: String,
    pub time: TimeOfDay,
    pub next_occurrence: i64,
}

/// Computes the adherence snapshot for a set of reminders with their doses.
///
/// The streak is computed per reminder over its doses in date order, as the
/// longest run of consecutive calendar days marked taken; the snapshot
/// carries the maximum across reminders. Doses of different reminders are
/// never pooled into one sequence.
pub fn compute_adherence(reminders: &[(Reminder, Vec<Dose>)], now: i64) -> AdherenceSnapshot {
    let total_doses = reminders.iter().map(|(_, doses)| doses.len()).sum::<usize>();
    let taken_doses = reminders
        .iter()
        .flat_map(|(_, doses)| doses)
        .filter(|d| d.status == DoseStatus::Taken)
        .count();
    let skipped_doses = total_doses - taken_doses;
    let adherence_percentage = if total_doses == 0 {
        0
    } else {
        ((taken_doses as f64 / total_doses as f64) * 100.0).round() as u32
    };

    let longest_streak = reminders
        .iter()
        .map(|(_, doses)| longest_taken_streak(doses))
        .max()
        .unwrap_or(0);

    let next_reminder = reminders
        .iter()
        .filter_map(|(reminder, _)| {
            let next = reminder.next_occurrence.filter(|at| *at > now)?;
            Some((reminder, next))
        })
        .min_by_key(|(_, next)| *next)
        .map(|(reminder, next)| NextReminder {
            id: reminder.id.clone(),
            title: reminder.title.clone(),
            time: reminder.time.clone(),
            next_occurrence: next,
        });

    AdherenceSnapshot {
        total_reminders: reminders.len(),
        total_doses,
        taken_doses,
        skipped_doses,
        adherence_percentage,
        longest_streak,
        next_reminder,
    }
}

/// Longest run of consecutive calendar days with a taken dose. A day with
/// a non taken outcome or with no dose at all breaks the run.
fn longest_taken_streak(doses: &[Dose]) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut prev_taken_date: Option<&Day> = None;

    for dose in doses.iter().sorted_by(|a, b| a.date.cmp(&b.date)) {
        if dose.status != DoseStatus::Taken {
            run = 0;
            prev_taken_date = None;
            continue;
        }
        run = match prev_taken_date {
            Some(prev) if dose.date.is_day_after(prev) => run + 1,
            _ => 1,
        };
        prev_taken_date = Some(&dose.date);
        longest = longest.max(run);
    }

    longest
}
