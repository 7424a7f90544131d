use crate::error::CircleCareError;
use crate::reminder::create_reminder::{validate_description, validate_title};
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use circlecare_api_structs::update_reminder::*;
use circlecare_domain::{Category, Reminder, RepeatRule, TimeOfDay, ID};
use circlecare_infra::CircleCareContext;

pub async fn update_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body_params: web::Json<RequestBody>,
    ctx: web::Data<CircleCareContext>,
) -> Result<HttpResponse, CircleCareError> {
    let user = protect_route(&http_req, &ctx)?;

    let body = body_params.0;
    let usecase = UpdateReminderUseCase {
        user_id: user.id,
        reminder_id: path_params.reminder_id.clone(),
        title: body.title,
        category: body.category,
        description: body.description,
        time: body.time,
        repeat: body.repeat,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.reminder)))
        .map_err(CircleCareError::from)
}

/// Partial update, fields left out of the request are preserved.
#[derive(Debug)]
pub struct UpdateReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
    pub title: Option<String>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub time: Option<TimeOfDay>,
    pub repeat: Option<RepeatRule>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    NotOwner,
    InvalidTitle(String),
    InvalidDescription(String),
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
                Self::Forbidden("Only the owner can update a reminder".into())
            }
            UseCaseError::InvalidTitle(msg) => Self::BadClientData(msg),
            UseCaseError::InvalidDescription(msg) => Self::BadClientData(msg),
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

impl From<super::create_reminder::UseCaseError> for UseCaseError {
    fn from(e: super::create_reminder::UseCaseError) -> Self {
        match e {
            super::create_reminder::UseCaseError::InvalidTitle(msg) => Self::InvalidTitle(msg),
            super::create_reminder::UseCaseError::InvalidDescription(msg) => {
                Self::InvalidDescription(msg)
            }
            super::create_reminder::UseCaseError::Storage => Self::Storage,
        }
    }
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub reminder: Reminder,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

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

        if let Some(title) = &self.title {
            validate_title(title)?;
            reminder.title = title.trim().to_string();
        }
        if let Some(category) = self.category {
            reminder.category = category;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
            reminder.description = Some(description.clone());
        }
        if let Some(time) = &self.time {
            reminder.time = time.clone();
        }
        if let Some(repeat) = &self.repeat {
            reminder.repeat = repeat.clone();
        }

        // Time or repeat edits move the advisory next occurrence
        let now = ctx.sys.get_timestamp_millis();
        reminder.next_occurrence = reminder.next_occurrence_after(now);

        let res = ctx.repos.reminders.save(&reminder).await;
        match res {
            Ok(_) => Ok(UseCaseRes { reminder }),
            Err(_) => Err(UseCaseError::Storage),
        }
    }
}
