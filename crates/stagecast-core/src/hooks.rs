//! Notification hook
//!
//! The pipeline and publisher report lifecycle events through this trait
//! without depending on any particular chat or alerting service. Delivery is
//! best-effort: callers dispatch it detached and only log failures.

use async_trait::async_trait;

use crate::models::NotificationEvent;

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, event: &NotificationEvent) -> Result<(), String>;
}

/// No-op implementation for when no notification channel is configured
pub struct NoOpNotificationSink;

#[async_trait]
impl NotificationSink for NoOpNotificationSink {
    async fn notify(&self, _event: &NotificationEvent) -> Result<(), String> {
        Ok(())
    }
}
