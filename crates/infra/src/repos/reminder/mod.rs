mod inmemory;
mod postgres;

use crate::repos::shared::repo::DeleteResult;
use circlecare_domain::{Reminder, ID};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    /// All reminders of one user, ordered by time of day ascending
    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder>;
    /// Every stored reminder, the due-reminder sweep scans all of them
    async fn find_all(&self) -> Vec<Reminder>;
    async fn delete(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn delete_by_user(&self, user_id: &ID) -> anyhow::Result<DeleteResult>;
}

#[cfg(test)]
mod tests {
    use crate::CircleCareContext;
    use circlecare_domain::{Category, Reminder, RepeatRule, ID};

    fn reminder(user_id: &ID, title: &str, time: &str) -> Reminder {
        Reminder::new(
            user_id.clone(),
            title.into(),
            Category::Medication,
            time.parse().unwrap(),
            RepeatRule::Daily,
        )
    }

    #[tokio::test]
    async fn create_and_delete() {
        let ctx = CircleCareContext::create_inmemory();
        let user_id = ID::default();
        let new_reminder = reminder(&user_id, "Iron", "08:00");

        // Insert
        assert!(ctx.repos.reminders.insert(&new_reminder).await.is_ok());

        // Find
        let res = ctx.repos.reminders.find(&new_reminder.id).await.unwrap();
        assert_eq!(res, new_reminder);

        // Delete
        let res = ctx.repos.reminders.delete(&new_reminder.id).await;
        assert!(res.is_some());
        assert_eq!(res.unwrap(), new_reminder);

        // Find
        assert!(ctx.repos.reminders.find(&new_reminder.id).await.is_none());
    }

    #[tokio::test]
    async fn update() {
        let ctx = CircleCareContext::create_inmemory();
        let user_id = ID::default();
        let mut new_reminder = reminder(&user_id, "Iron", "08:00");

        assert!(ctx.repos.reminders.insert(&new_reminder).await.is_ok());

        new_reminder.title = "Iron supplement".into();
        new_reminder.completed_count = 3;
        assert!(ctx.repos.reminders.save(&new_reminder).await.is_ok());

        let stored = ctx.repos.reminders.find(&new_reminder.id).await.unwrap();
        assert_eq!(stored.title, "Iron supplement");
        assert_eq!(stored.completed_count, 3);
    }

    #[tokio::test]
    async fn find_by_user_is_ordered_by_time_of_day() {
        let ctx = CircleCareContext::create_inmemory();
        let user_id = ID::default();
        let evening = reminder(&user_id, "Evening", "20:00");
        let morning = reminder(&user_id, "Morning", "07:30");
        let other_user = reminder(&ID::default(), "Other", "09:00");
        for r in [&evening, &morning, &other_user] {
            ctx.repos.reminders.insert(r).await.unwrap();
        }

        let found = ctx.repos.reminders.find_by_user(&user_id).await;
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, morning.id);
        assert_eq!(found[1].id, evening.id);

        assert_eq!(ctx.repos.reminders.find_all().await.len(), 3);
    }
}
