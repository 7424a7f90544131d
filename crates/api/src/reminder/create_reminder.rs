use crate::error::CircleCareError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use circlecare_api_structs::create_reminder::*;
use circlecare_domain::{Category, Reminder, RepeatRule, TimeOfDay, ID};
use circlecare_infra::CircleCareContext;

pub async fn create_reminder_controller(
    http_req: HttpRequest,
    body_params: web::Json<RequestBody>,
    ctx: web::Data<CircleCareContext>,
) -> Result<HttpResponse, CircleCareError> {
    let user = protect_route(&http_req, &ctx)?;

    let body = body_params.0;
    let usecase = CreateReminderUseCase {
        user_id: user.id,
        title: body.title,
        category: body.category,
        description: body.description,
        time: body.time,
        repeat: body.repeat,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Created().json(APIResponse::new(res.reminder)))
        .map_err(CircleCareError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub user_id: ID,
    pub title: String,
    pub category: Category,
    pub description: Option<String>,
    pub time: TimeOfDay,
    pub repeat: RepeatRule,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidTitle(String),
    InvalidDescription(String),
    Storage,
}

impl From<UseCaseError> for CircleCareError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidTitle(msg) => Self::BadClientData(msg),
            UseCaseError::InvalidDescription(msg) => Self::BadClientData(msg),
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub reminder: Reminder,
}

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 500;

pub fn validate_title(title: &str) -> Result<(), UseCaseError> {
    let trimmed = title.trim();
    if trimmed.is_empty() || trimmed.len() > TITLE_MAX_LEN {
        return Err(UseCaseError::InvalidTitle(format!(
            "Title must be 1-{} characters, got: `{}`",
            TITLE_MAX_LEN, title
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), UseCaseError> {
    if description.len() > DESCRIPTION_MAX_LEN {
        return Err(UseCaseError::InvalidDescription(format!(
            "Description cannot exceed {} characters",
            DESCRIPTION_MAX_LEN
        )));
    }
    Ok(())
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &CircleCareContext) -> Result<Self::Response, Self::Error> {
        validate_title(&self.title)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }

        let mut reminder = Reminder::new(
            self.user_id.clone(),
            self.title.trim().to_string(),
            self.category,
            self.time.clone(),
            self.repeat.clone(),
        );
        reminder.description = self.description.clone();

        let now = ctx.sys.get_timestamp_millis();
        reminder.next_occurrence = reminder.next_occurrence_after(now);

        let res = ctx.repos.reminders.insert(&reminder).await;
        match res {
            Ok(_) => Ok(UseCaseRes { reminder }),
            Err(_) => Err(UseCaseError::Storage),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn usecase_with_title(title: &str) -> CreateReminderUseCase {
        CreateReminderUseCase {
            user_id: Default::default(),
            title: title.into(),
            category: Category::Medication,
            description: None,
            time: "08:00".parse().unwrap(),
            repeat: RepeatRule::Daily,
        }
    }

    #[actix_web::main]
    #[test]
    async fn creates_a_reminder_with_its_next_occurrence() {
        let ctx = CircleCareContext::create_inmemory();
        let usecase = usecase_with_title("Iron");

        let res = execute(usecase, &ctx).await.unwrap();
        assert_eq!(res.reminder.title, "Iron");
        assert!(res.reminder.next_occurrence.is_some());

        let stored = ctx.repos.reminders.find(&res.reminder.id).await.unwrap();
        assert_eq!(stored, res.reminder);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_titles() {
        let ctx = CircleCareContext::create_inmemory();
        let too_long = "a".repeat(101);
        for title in ["", "   ", too_long.as_str()] {
            let usecase = usecase_with_title(title);
            assert!(matches!(
                execute(usecase, &ctx).await,
                Err(UseCaseError::InvalidTitle(_))
            ));
        }
    }

    #[actix_web::main]
    #[test]
    async fn rejects_too_long_descriptions() {
        let ctx = CircleCareContext::create_inmemory();
        let mut usecase = usecase_with_title("Iron");
        usecase.description = Some("a".repeat(501));
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::InvalidDescription(_))
        ));
    }
}
