use crate::error::CircleCareError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use circlecare_api_structs::delete_reminder::*;
use circlecare_domain::{Reminder, ID};
use circlecare_infra::CircleCareContext;

pub async fn delete_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<CircleCareContext>,
) -> Result<HttpResponse, CircleCareError> {
    let user = protect_route(&http_req, &ctx)?;

    let usecase = DeleteReminderUseCase {
        user_id: user.id,
        reminder_id: path_params.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.reminder)))
        .map_err(CircleCareError::from)
}

#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
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
                Self::Forbidden("Only the owner can delete a reminder".into())
            }
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub reminder: Reminder,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &CircleCareContext) -> Result<Self::Response, Self::Error> {
        let reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;

        if reminder.user_id != self.user_id {
            return Err(UseCaseError::NotOwner);
        }

        // The dose history has no life of its own, it goes with the reminder
        ctx.repos
            .doses
            .delete_by_reminder(&self.reminder_id)
            .await
            .map_err(|_| UseCaseError::Storage)?;
        let reminder = ctx
            .repos
            .reminders
            .delete(&self.reminder_id)
            .await
            .ok_or(UseCaseError::Storage)?;

        Ok(UseCaseRes { reminder })
    }
}
