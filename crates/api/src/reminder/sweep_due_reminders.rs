use crate::shared::usecase::UseCase;
use circlecare_domain::{minutes_since_midnight_of, Day, DoseStatus, Reminder};
use circlecare_infra::{CircleCareContext, ReminderDueEvent};
use tracing::error;

/// One pass of the due-reminder scanner.
///
/// Walks every stored reminder and, for those firing right now, makes sure
/// a pending dose record exists for today and hands a due event to the
/// notification sink. A failure on one reminder is logged and the sweep
/// moves on, it never returns an error to the scheduler driving it.
#[derive(Debug)]
pub struct SweepDueRemindersUseCase {}

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait(?Send)]
impl UseCase for SweepDueRemindersUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "SweepDueReminders";

    async fn execute(&mut self, ctx: &CircleCareContext) -> Result<Self::Response, Self::Error> {
        // One timestamp sample for the whole sweep so every reminder sees
        // the same day boundary and firing window
        let now = ctx.sys.get_timestamp_millis();
        let today = Day::from_timestamp_millis(now);
        let current_minutes = minutes_since_midnight_of(now);

        let reminders = ctx.repos.reminders.find_all().await;
        for reminder in reminders {
            if let Err(e) = process_reminder(&reminder, &today, current_minutes, ctx).await {
                error!(
                    "Sweep failed for reminder: {}. Error message: {:?}",
                    reminder.id, e
                );
            }
        }

        Ok(())
    }
}

async fn process_reminder(
    reminder: &Reminder,
    today: &Day,
    current_minutes: i64,
    ctx: &CircleCareContext,
) -> anyhow::Result<()> {
    if !reminder.is_active_on(today) {
        return Ok(());
    }

    // Fire within a one minute window around the configured time
    let delta = (current_minutes - reminder.time.minutes_since_midnight()).abs();
    if delta >= 1 {
        return Ok(());
    }

    match ctx.repos.doses.find(&reminder.id, today).await {
        // The user already acted on today's dose, never overwrite that
        Some(dose) if dose.status != DoseStatus::Pending => return Ok(()),
        Some(_) => {}
        None => {
            ctx.repos.doses.insert_pending(&reminder.id, today).await?;
        }
    }

    // Fire and forget, a failed delivery must not fail the reminder
    let event = ReminderDueEvent::new(reminder);
    if let Err(e) = ctx.notifier.reminder_due(&event).await {
        error!(
            "Unable to deliver due event for reminder: {}. Error message: {:?}",
            reminder.id, e
        );
    }

    Ok(())
}
