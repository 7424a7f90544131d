mod inmemory;
mod postgres;

use crate::repos::shared::repo::DeleteResult;
use circlecare_domain::{Day, Dose, ID};
pub use inmemory::InMemoryDoseRepo;
pub use postgres::PostgresDoseRepo;

/// Store of dose outcomes under the natural key `(reminder_id, date)`.
///
/// Both mutating operations are atomic against concurrent callers at the
/// storage layer, so a user log action racing the scanner's placeholder
/// insert ends with exactly one record carrying the user's status.
#[async_trait::async_trait]
pub trait IDoseRepo: Send + Sync {
    /// Creates the record or merges a log action into the existing one:
    /// status is overwritten, `taken_at` only when the incoming record
    /// carries one, `snoozed_until` only when the incoming record carries
    /// one. Returns the stored record.
    async fn upsert(&self, dose: &Dose) -> anyhow::Result<Dose>;
    /// Inserts a pending placeholder unless any record already exists for
    /// the key. Returns true when a new record was created.
    async fn insert_pending(&self, reminder_id: &ID, date: &Day) -> anyhow::Result<bool>;
    async fn find(&self, reminder_id: &ID, date: &Day) -> Option<Dose>;
    async fn find_by_reminder(&self, reminder_id: &ID) -> Vec<Dose>;
    async fn delete_by_reminder(&self, reminder_id: &ID) -> anyhow::Result<DeleteResult>;
}

#[cfg(test)]
mod tests {
    use crate::CircleCareContext;
    use circlecare_domain::{Day, Dose, DoseStatus, ID};

    fn day() -> Day {
        "2021-02-21".parse().unwrap()
    }

    #[tokio::test]
    async fn insert_pending_is_idempotent() {
        let ctx = CircleCareContext::create_inmemory();
        let reminder_id = ID::default();

        assert!(ctx
            .repos
            .doses
            .insert_pending(&reminder_id, &day())
            .await
            .unwrap());
        assert!(!ctx
            .repos
            .doses
            .insert_pending(&reminder_id, &day())
            .await
            .unwrap());

        let doses = ctx.repos.doses.find_by_reminder(&reminder_id).await;
        assert_eq!(doses.len(), 1);
        assert_eq!(doses[0].status, DoseStatus::Pending);
    }

    #[tokio::test]
    async fn pending_does_not_overwrite_a_logged_dose() {
        let ctx = CircleCareContext::create_inmemory();
        let reminder_id = ID::default();
        let logged = Dose::logged(reminder_id.clone(), day(), DoseStatus::Taken, None, 100);
        ctx.repos.doses.upsert(&logged).await.unwrap();

        assert!(!ctx
            .repos
            .doses
            .insert_pending(&reminder_id, &day())
            .await
            .unwrap());

        let stored = ctx.repos.doses.find(&reminder_id, &day()).await.unwrap();
        assert_eq!(stored.status, DoseStatus::Taken);
        assert_eq!(stored.taken_at, Some(100));
    }

    #[tokio::test]
    async fn upsert_merges_into_the_existing_record() {
        let ctx = CircleCareContext::create_inmemory();
        let reminder_id = ID::default();
        let taken = Dose::logged(reminder_id.clone(), day(), DoseStatus::Taken, None, 100);
        ctx.repos.doses.upsert(&taken).await.unwrap();

        // A later skip keeps the historical taken_at
        let skipped = Dose::logged(reminder_id.clone(), day(), DoseStatus::Skipped, None, 200);
        let stored = ctx.repos.doses.upsert(&skipped).await.unwrap();
        assert_eq!(stored.status, DoseStatus::Skipped);
        assert_eq!(stored.taken_at, Some(100));

        let doses = ctx.repos.doses.find_by_reminder(&reminder_id).await;
        assert_eq!(doses.len(), 1);
    }

    #[tokio::test]
    async fn delete_by_reminder_removes_the_history() {
        let ctx = CircleCareContext::create_inmemory();
        let reminder_id = ID::default();
        let mut date = day();
        for _ in 0..3 {
            ctx.repos
                .doses
                .insert_pending(&reminder_id, &date)
                .await
                .unwrap();
            date.inc();
        }

        let res = ctx
            .repos
            .doses
            .delete_by_reminder(&reminder_id)
            .await
            .unwrap();
        assert_eq!(res.deleted_count, 3);
        assert!(ctx.repos.doses.find_by_reminder(&reminder_id).await.is_empty());
    }
}
