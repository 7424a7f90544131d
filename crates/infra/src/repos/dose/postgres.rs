use super::IDoseRepo;
use crate::repos::shared::repo::DeleteResult;
use circlecare_domain::{Day, Dose, DoseStatus, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresDoseRepo {
    pool: PgPool,
}

impl PostgresDoseRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DoseRaw {
    reminder_uid: Uuid,
    date: String,
    status: String,
    taken_at: Option<i64>,
    snoozed_until: Option<i64>,
}

impl TryFrom<DoseRaw> for Dose {
    type Error = anyhow::Error;

    fn try_from(raw: DoseRaw) -> anyhow::Result<Self> {
        Ok(Self {
            reminder_id: raw.reminder_uid.into(),
            date: raw.date.parse()?,
            status: raw.status.parse()?,
            taken_at: raw.taken_at,
            snoozed_until: raw.snoozed_until,
        })
    }
}

#[async_trait::async_trait]
impl IDoseRepo for PostgresDoseRepo {
    async fn upsert(&self, dose: &Dose) -> anyhow::Result<Dose> {
        // The merge keeps the stored taken_at / snoozed_until whenever the
        // incoming record does not carry one, in a single statement so a
        // concurrent scanner insert cannot interleave.
        let raw: DoseRaw = sqlx::query_as(
            r#"
            INSERT INTO doses
            (reminder_uid, date, status, taken_at, snoozed_until)
            VALUES($1, $2, $3, $4, $5)
            ON CONFLICT (reminder_uid, date) DO UPDATE
            SET status = EXCLUDED.status,
            taken_at = COALESCE(EXCLUDED.taken_at, doses.taken_at),
            snoozed_until = COALESCE(EXCLUDED.snoozed_until, doses.snoozed_until)
            RETURNING *
            "#,
        )
        .bind(dose.reminder_id.inner_ref())
        .bind(dose.date.to_string())
        .bind(dose.status.to_string())
        .bind(dose.taken_at)
        .bind(dose.snoozed_until)
        .fetch_one(&self.pool)
        .await?;

        Dose::try_from(raw)
    }

    async fn insert_pending(&self, reminder_id: &ID, date: &Day) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO doses
            (reminder_uid, date, status, taken_at, snoozed_until)
            VALUES($1, $2, $3, NULL, NULL)
            ON CONFLICT (reminder_uid, date) DO NOTHING
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(date.to_string())
        .bind(DoseStatus::Pending.to_string())
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() > 0)
    }

    async fn find(&self, reminder_id: &ID, date: &Day) -> Option<Dose> {
        let raw: DoseRaw = match sqlx::query_as(
            r#"
            SELECT * FROM doses
            WHERE reminder_uid = $1 AND date = $2
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(date.to_string())
        .fetch_one(&self.pool)
        .await
        {
            Ok(raw) => raw,
            Err(_) => return None,
        };
        Dose::try_from(raw).ok()
    }

    async fn find_by_reminder(&self, reminder_id: &ID) -> Vec<Dose> {
        let raws: Vec<DoseRaw> = sqlx::query_as(
            r#"
            SELECT * FROM doses
            WHERE reminder_uid = $1
            ORDER BY date ASC
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();

        raws.into_iter()
            .filter_map(|raw| match Dose::try_from(raw) {
                Ok(dose) => Some(dose),
                Err(e) => {
                    error!("Unable to decode dose row: {:?}", e);
                    None
                }
            })
            .collect()
    }

    async fn delete_by_reminder(&self, reminder_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM doses
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
