//! services/api/src/adapters/db/analytics.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ideaboard_core::domain::{AnalyticsEvent, EventCount};
use ideaboard_core::ports::{AnalyticsRepository, PortResult};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

use super::{unexpected, DbAdapter};

#[derive(FromRow)]
struct AnalyticsEventRecord {
    id: Uuid,
    user_id: Option<Uuid>,
    event_name: String,
    metadata: Option<JsonValue>,
    created_at: DateTime<Utc>,
}

impl AnalyticsEventRecord {
    fn to_domain(self) -> AnalyticsEvent {
        AnalyticsEvent {
            id: self.id,
            user_id: self.user_id,
            event_name: self.event_name,
            metadata: self.metadata,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct EventCountRecord {
    event_name: String,
    count: i64,
}

#[async_trait]
impl AnalyticsRepository for DbAdapter {
    async fn record_event(
        &self,
        user_id: Option<Uuid>,
        event_name: &str,
        metadata: Option<JsonValue>,
    ) -> PortResult<AnalyticsEvent> {
        let record = sqlx::query_as::<_, AnalyticsEventRecord>(
            "INSERT INTO analytics_events (id, user_id, event_name, metadata) \
             VALUES ($1, $2, $3, $4) RETURNING id, user_id, event_name, metadata, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(event_name)
        .bind(metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_events(&self, user_id: Uuid) -> PortResult<Vec<AnalyticsEvent>> {
        let records = sqlx::query_as::<_, AnalyticsEventRecord>(
            "SELECT id, user_id, event_name, metadata, created_at FROM analytics_events \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn count_events_by_name(&self, user_id: Uuid) -> PortResult<Vec<EventCount>> {
        let records = sqlx::query_as::<_, EventCountRecord>(
            "SELECT event_name, COUNT(*) AS count FROM analytics_events \
             WHERE user_id = $1 GROUP BY event_name \
             ORDER BY count DESC, LOWER(event_name) COLLATE \"C\", event_name COLLATE \"C\"",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records
            .into_iter()
            .map(|r| EventCount {
                event_name: r.event_name,
                count: r.count,
            })
            .collect())
    }
}
