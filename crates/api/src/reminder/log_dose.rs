use crate::error::CircleCareError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use circlecare_api_structs::log_dose::*;
use circlecare_domain::{Day, Dose, DoseStatus, Reminder, ID};
use circlecare_infra::CircleCareContext;

pub async fn log_dose_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body_params: web::Json<RequestBody>,
    ctx: web::Data<CircleCareContext>,
) -> Result<HttpResponse, CircleCareError> {
    let user = protect_route(&http_req, &ctx)?;

    let body = body_params.0;
    let usecase = LogDoseUseCase {
        user_id: user.id,
        reminder_id: path_params.reminder_id.clone(),
        date: body.date,
        status: body.status,
        snoozed_until: body.snoozed_until,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.dose, res.reminder)))
        .map_err(CircleCareError::from)
}

/// Records the outcome of a reminder for one calendar date, creating the
/// dose record when absent and merging into it when present. Afterwards the
/// reminder's denormalized counters are rederived from the full history, so
/// a retry after a partial write simply converges to the same state.
#[derive(Debug)]
pub struct LogDoseUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
    /// Defaults to today when not given
    pub date: Option<Day>,
    pub status: DoseStatus,
    pub snoozed_until: Option<i64>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    NotOwner,
    Storage,
}

impl From<UseCaseError> for CircleCareError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::NotOwner => {
                Self::Forbidden("Only the owner can log doses for a reminder".into())
            }
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub dose: Dose,
    pub reminder: Reminder,
}

#[async_trait::async_trait(?Send)]
impl UseCase for LogDoseUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "LogDose";

    async fn execute(&mut self, ctx: &CircleCareContext) -> Result<Self::Response, Self::Error> {
        let mut reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;

        if reminder.user_id != self.user_id {
            return Err(UseCaseError::NotOwner);
        }

        let now = ctx.sys.get_timestamp_millis();
        let date = self
            .date
            .clone()
            .unwrap_or_else(|| Day::from_timestamp_millis(now));

        let dose = Dose::logged(
            self.reminder_id.clone(),
            date,
            self.status,
            self.snoozed_until,
            now,
        );
        let dose = ctx
            .repos
            .doses
            .upsert(&dose)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        let history = ctx.repos.doses.find_by_reminder(&reminder.id).await;
        reminder.recompute_dose_stats(&history, now);
        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        Ok(UseCaseRes { dose, reminder })
    }
}
