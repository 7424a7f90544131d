use crate::error::CircleCareError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use circlecare_api_structs::get_reminders::*;
use circlecare_domain::{Day, Dose, Reminder, ID};
use circlecare_infra::CircleCareContext;

pub async fn get_reminders_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<CircleCareContext>,
) -> Result<HttpResponse, CircleCareError> {
    let user = protect_route(&http_req, &ctx)?;

    let usecase = GetRemindersUseCase {
        user_id: user.id,
        active_today: query_params.active_today,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.reminders)))
        .map_err(CircleCareError::from)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {
    pub user_id: ID,
    pub active_today: bool,
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
    pub reminders: Vec<(Reminder, Option<Dose>)>,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &CircleCareContext) -> Result<Self::Response, Self::Error> {
        let today = Day::from_timestamp_millis(ctx.sys.get_timestamp_millis());

        let mut reminders = ctx.repos.reminders.find_by_user(&self.user_id).await;
        if self.active_today {
            reminders.retain(|reminder| reminder.is_active_on(&today));
        }

        let mut with_doses = Vec::with_capacity(reminders.len());
        for reminder in reminders {
            let today_dose = ctx.repos.doses.find(&reminder.id, &today).await;
            with_doses.push((reminder, today_dose));
        }

        Ok(UseCaseRes {
            reminders: with_doses,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use circlecare_domain::{Category, DoseStatus, RepeatRule, WeekDay};
    use circlecare_infra::ISys;
    use std::sync::Arc;

    pub struct StaticTimeSys {}
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            1613894400000 // 2021-02-21 08:00:00 UTC, a Sunday
        }
    }

    async fn insert_reminder(
        ctx: &CircleCareContext,
        user_id: &ID,
        time: &str,
        repeat: RepeatRule,
    ) -> Reminder {
        let reminder = Reminder::new(
            user_id.clone(),
            "Iron".into(),
            Category::Medication,
            time.parse().unwrap(),
            repeat,
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        reminder
    }

    #[actix_web::main]
    #[test]
    async fn lists_reminders_ordered_by_time_with_todays_dose() {
        let mut ctx = CircleCareContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys {});
        let user_id = ID::default();

        let evening = insert_reminder(&ctx, &user_id, "20:00", RepeatRule::Daily).await;
        let morning = insert_reminder(&ctx, &user_id, "08:00", RepeatRule::Daily).await;
        let today: Day = "2021-02-21".parse().unwrap();
        ctx.repos
            .doses
            .insert_pending(&morning.id, &today)
            .await
            .unwrap();

        let usecase = GetRemindersUseCase {
            user_id: user_id.clone(),
            active_today: false,
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert_eq!(res.reminders.len(), 2);
        assert_eq!(res.reminders[0].0.id, morning.id);
        assert_eq!(
            res.reminders[0].1.as_ref().map(|d| d.status),
            Some(DoseStatus::Pending)
        );
        assert_eq!(res.reminders[1].0.id, evening.id);
        assert!(res.reminders[1].1.is_none());
    }

    #[actix_web::main]
    #[test]
    async fn active_today_filters_by_the_repeat_rule() {
        let mut ctx = CircleCareContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys {}); // a Sunday
        let user_id = ID::default();

        insert_reminder(&ctx, &user_id, "08:00", RepeatRule::Daily).await;
        insert_reminder(&ctx, &user_id, "09:00", RepeatRule::None).await;
        insert_reminder(
            &ctx,
            &user_id,
            "10:00",
            RepeatRule::SpecificDays(vec![WeekDay::new(1).unwrap()]),
        )
        .await;
        let sunday_only =
            insert_reminder(&ctx, &user_id, "11:00", RepeatRule::SpecificDays(vec![
                WeekDay::new(0).unwrap(),
            ]))
            .await;

        let usecase = GetRemindersUseCase {
            user_id: user_id.clone(),
            active_today: true,
        };
        let res = execute(usecase, &ctx).await.unwrap();

        let ids = res
            .reminders
            .iter()
            .map(|(r, _)| r.id.clone())
            .collect::<Vec<_>>();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&sunday_only.id));
    }
}
