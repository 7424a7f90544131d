use crate::{reminder::sweep_due_reminders::SweepDueRemindersUseCase, shared::usecase::execute};
use actix_web::rt::time::{interval, sleep_until, Instant};
use circlecare_infra::CircleCareContext;
use std::time::Duration;

/// Seconds until the next wall-clock minute boundary, so the sweep runs
/// right when reminders become due.
pub fn get_start_delay(now_ts: usize) -> usize {
    60 - (now_ts / 1000) % 60
}

pub fn start_due_reminder_sweep_job(ctx: CircleCareContext) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);
        sleep_until(start).await;

        let mut minutely_interval = interval(Duration::from_secs(60));
        loop {
            minutely_interval.tick().await;
            // The sweep is awaited inline, a sweep that overruns its minute
            // delays the next tick instead of running concurrently with it
            let usecase = SweepDueRemindersUseCase {};
            let _ = execute(usecase, &ctx).await;
        }
    });
}
