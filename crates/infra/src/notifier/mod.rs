use circlecare_domain::Reminder;
use serde::Serialize;
use tracing::info;

/// Payload delivered to the notification sink when a reminder fires.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDueEvent {
    pub reminder_id: String,
    pub user_id: String,
    pub title: String,
    pub category: String,
    pub time: String,
}

impl ReminderDueEvent {
    pub fn new(reminder: &Reminder) -> Self {
        Self {
            reminder_id: reminder.id.as_string(),
            user_id: reminder.user_id.as_string(),
            title: reminder.title.clone(),
            category: reminder.category.to_string(),
            time: reminder.time.to_string(),
        }
    }
}

/// Sink for due-reminder events. Delivery and display are outside this
/// service, implementations only hand the event off.
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    async fn reminder_due(&self, event: &ReminderDueEvent) -> anyhow::Result<()>;
}

/// POSTs every event as JSON to a configured webhook.
pub struct WebhookNotifier {
    url: String,
    key: Option<String>,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: String, key: Option<String>) -> Self {
        Self {
            url,
            key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl INotifier for WebhookNotifier {
    async fn reminder_due(&self, event: &ReminderDueEvent) -> anyhow::Result<()> {
        let mut req = self.client.post(&self.url).json(event);
        if let Some(key) = &self.key {
            req = req.header("circlecare-webhook-key", key);
        }
        req.send().await?.error_for_status()?;
        Ok(())
    }
}

/// Fallback sink that only writes the event to the log. Used when no
/// webhook is configured and in tests.
pub struct LogNotifier {}

#[async_trait::async_trait]
impl INotifier for LogNotifier {
    async fn reminder_due(&self, event: &ReminderDueEvent) -> anyhow::Result<()> {
        info!(
            "Reminder due: {} @ {} for user {}",
            event.title, event.time, event.user_id
        );
        Ok(())
    }
}
