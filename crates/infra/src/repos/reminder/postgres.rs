use super::IReminderRepo;
use crate::repos::shared::repo::DeleteResult;
use circlecare_domain::{Reminder, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    user_uid: Uuid,
    title: String,
    category: String,
    description: Option<String>,
    fire_time: String,
    repeat_rule: serde_json::Value,
    last_taken_at: Option<i64>,
    completed_count: i32,
    missed_count: i32,
    next_occurrence: Option<i64>,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: raw.reminder_uid.into(),
            user_id: raw.user_uid.into(),
            title: raw.title,
            category: raw.category.parse()?,
            description: raw.description,
            time: raw.fire_time.parse()?,
            repeat: serde_json::from_value(raw.repeat_rule)?,
            last_taken_at: raw.last_taken_at,
            completed_count: raw.completed_count as u32,
            missed_count: raw.missed_count as u32,
            next_occurrence: raw.next_occurrence,
        })
    }
}

fn to_reminders(raws: Vec<ReminderRaw>) -> Vec<Reminder> {
    raws.into_iter()
        .filter_map(|raw| match Reminder::try_from(raw) {
            Ok(reminder) => Some(reminder),
            Err(e) => {
                error!("Unable to decode reminder row: {:?}", e);
                None
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, user_uid, title, category, description, fire_time,
             repeat_rule, last_taken_at, completed_count, missed_count, next_occurrence)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.user_id.inner_ref())
        .bind(&reminder.title)
        .bind(reminder.category.to_string())
        .bind(&reminder.description)
        .bind(reminder.time.to_string())
        .bind(serde_json::to_value(&reminder.repeat)?)
        .bind(reminder.last_taken_at)
        .bind(reminder.completed_count as i32)
        .bind(reminder.missed_count as i32)
        .bind(reminder.next_occurrence)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET title = $2,
            category = $3,
            description = $4,
            fire_time = $5,
            repeat_rule = $6,
            last_taken_at = $7,
            completed_count = $8,
            missed_count = $9,
            next_occurrence = $10
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(&reminder.title)
        .bind(reminder.category.to_string())
        .bind(&reminder.description)
        .bind(reminder.time.to_string())
        .bind(serde_json::to_value(&reminder.repeat)?)
        .bind(reminder.last_taken_at)
        .bind(reminder.completed_count as i32)
        .bind(reminder.missed_count as i32)
        .bind(reminder.next_occurrence)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        let raw: ReminderRaw = match sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_one(&self.pool)
        .await
        {
            Ok(raw) => raw,
            Err(_) => return None,
        };
        Reminder::try_from(raw).ok()
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder> {
        let raws: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            WHERE user_uid = $1
            ORDER BY fire_time ASC
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();

        to_reminders(raws)
    }

    async fn find_all(&self) -> Vec<Reminder> {
        let raws: Vec<ReminderRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminders
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();

        to_reminders(raws)
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        let raw: ReminderRaw = match sqlx::query_as(
            r#"
            DELETE FROM reminders
            WHERE reminder_uid = $1
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_one(&self.pool)
        .await
        {
            Ok(raw) => raw,
            Err(_) => return None,
        };
        Reminder::try_from(raw).ok()
    }

    async fn delete_by_user(&self, user_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM reminders
            WHERE user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
