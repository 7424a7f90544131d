use crate::error::CircleCareError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use circlecare_domain::{compute_adherence, AdherenceSnapshot, ID};
use circlecare_infra::CircleCareContext;

pub async fn get_adherence_controller(
    http_req: HttpRequest,
    ctx: web::Data<CircleCareContext>,
) -> Result<HttpResponse, CircleCareError> {
    let user = protect_route(&http_req, &ctx)?;

    let usecase = GetAdherenceUseCase { user_id: user.id };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(res.snapshot))
        .map_err(CircleCareError::from)
}

/// Derives the adherence snapshot for a user from their stored reminders
/// and dose history. Holds no state of its own.
#[derive(Debug)]
pub struct GetAdherenceUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for CircleCareError {
    fn from(_: UseCaseError) -> Self {
        Self::InternalError
    }
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub snapshot: AdherenceSnapshot,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAdherenceUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "GetAdherence";

    async fn execute(&mut self, ctx: &CircleCareContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();

        let reminders = ctx.repos.reminders.find_by_user(&self.user_id).await;
        let mut with_doses = Vec::with_capacity(reminders.len());
        for reminder in reminders {
            let doses = ctx.repos.doses.find_by_reminder(&reminder.id).await;
            with_doses.push((reminder, doses));
        }

        Ok(UseCaseRes {
            snapshot: compute_adherence(&with_doses, now),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::log_dose::LogDoseUseCase;
    use circlecare_domain::{Category, Day, DoseStatus, Reminder, RepeatRule};
    use circlecare_infra::ISys;
    use std::sync::Arc;

    const SUNDAY_8AM: i64 = 1613894400000; // 2021-02-21 08:00:00 UTC

    pub struct StaticTimeSys {}
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            SUNDAY_8AM
        }
    }

    #[actix_web::main]
    #[test]
    async fn snapshot_over_an_empty_account_is_all_zeroes() {
        let ctx = CircleCareContext::create_inmemory();
        let usecase = GetAdherenceUseCase {
            user_id: ID::default(),
        };
        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.snapshot.total_reminders, 0);
        assert_eq!(res.snapshot.adherence_percentage, 0);
        assert_eq!(res.snapshot.longest_streak, 0);
        assert!(res.snapshot.next_reminder.is_none());
    }

    #[actix_web::main]
    #[test]
    async fn snapshot_aggregates_the_logged_history() {
        let mut ctx = CircleCareContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys {});
        let user_id = ID::default();

        let reminder = Reminder::new(
            user_id.clone(),
            "Iron".into(),
            Category::Medication,
            "09:00".parse().unwrap(),
            RepeatRule::Daily,
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let mut date: Day = "2021-02-17".parse().unwrap();
        for status in [
            DoseStatus::Taken,
            DoseStatus::Taken,
            DoseStatus::Skipped,
            DoseStatus::Taken,
        ] {
            let usecase = LogDoseUseCase {
                user_id: user_id.clone(),
                reminder_id: reminder.id.clone(),
                date: Some(date.clone()),
                status,
                snoozed_until: None,
            };
            execute(usecase, &ctx).await.unwrap();
            date.inc();
        }

        let usecase = GetAdherenceUseCase {
            user_id: user_id.clone(),
        };
        let snapshot = execute(usecase, &ctx).await.unwrap().snapshot;

        assert_eq!(snapshot.total_reminders, 1);
        assert_eq!(snapshot.total_doses, 4);
        assert_eq!(snapshot.taken_doses, 3);
        assert_eq!(snapshot.skipped_doses, 1);
        assert_eq!(snapshot.adherence_percentage, 75);
        assert_eq!(snapshot.longest_streak, 2);

        // The daily 09:00 reminder is upcoming relative to 08:00
        let next = snapshot.next_reminder.unwrap();
        assert_eq!(next.id, reminder.id);
        assert_eq!(next.next_occurrence, SUNDAY_8AM + 1000 * 60 * 60);
    }
}
