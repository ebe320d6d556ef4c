//! crates/ideaboard_core/src/services/analytics.rs
//!
//! Analytics events are append-only: there is no update or remove path.

use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{AnalyticsEvent, CreateAnalyticsEvent, DataEnvelope, EventCount};
use crate::ports::{DatabaseService, PortResult};
use crate::services::require_text;

#[derive(Clone)]
pub struct AnalyticsService {
    db: Arc<dyn DatabaseService>,
}

impl AnalyticsService {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    /// Records an event, linked to the caller when one is signed in.
    pub async fn record(
        &self,
        user_id: Option<Uuid>,
        dto: CreateAnalyticsEvent,
    ) -> PortResult<AnalyticsEvent> {
        let event_name = require_text("eventName", &dto.event_name)?;
        let event = self
            .db
            .record_event(user_id, &event_name, dto.metadata)
            .await?;
        debug!(event = %event.event_name, user_id = ?user_id, "analytics event recorded");
        Ok(event)
    }

    pub async fn find_all(&self, user_id: Uuid) -> PortResult<DataEnvelope<Vec<AnalyticsEvent>>> {
        Ok(DataEnvelope::new(self.db.list_events(user_id).await?))
    }

    pub async fn summary(&self, user_id: Uuid) -> PortResult<DataEnvelope<Vec<EventCount>>> {
        Ok(DataEnvelope::new(self.db.count_events_by_name(user_id).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryDatabase;
    use crate::ports::PortError;
    use serde_json::json;

    fn event(name: &str) -> CreateAnalyticsEvent {
        CreateAnalyticsEvent {
            event_name: name.into(),
            metadata: Some(json!({ "screen": "home" })),
        }
    }

    #[tokio::test]
    async fn summary_counts_only_the_callers_events() {
        let svc = AnalyticsService::new(Arc::new(InMemoryDatabase::new()));
        let user = Uuid::new_v4();
        for name in ["open", "search", "open", "open", "search", "share"] {
            svc.record(Some(user), event(name)).await.unwrap();
        }
        svc.record(None, event("open")).await.unwrap();
        svc.record(Some(Uuid::new_v4()), event("open")).await.unwrap();

        let summary = svc.summary(user).await.unwrap().data;
        assert_eq!(
            summary,
            vec![
                EventCount { event_name: "open".into(), count: 3 },
                EventCount { event_name: "search".into(), count: 2 },
                EventCount { event_name: "share".into(), count: 1 },
            ]
        );
        assert_eq!(svc.find_all(user).await.unwrap().data.len(), 6);
    }

    #[tokio::test]
    async fn anonymous_events_have_no_owner() {
        let svc = AnalyticsService::new(Arc::new(InMemoryDatabase::new()));
        let recorded = svc.record(None, event("landing")).await.unwrap();
        assert_eq!(recorded.user_id, None);
        assert_eq!(recorded.metadata, Some(json!({ "screen": "home" })));

        assert!(matches!(
            svc.record(None, event(" ")).await,
            Err(PortError::InvalidInput(_))
        ));
    }
}
