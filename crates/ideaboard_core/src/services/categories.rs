//! crates/ideaboard_core/src/services/categories.rs

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{Category, CreateCategory, DataEnvelope, MessageEnvelope, UpdateCategory};
use crate::ports::{DatabaseService, PortError, PortResult};
use crate::services::require_text;

pub const CATEGORY_DELETED: &str = "分类已删除";

#[derive(Clone)]
pub struct CategoriesService {
    db: Arc<dyn DatabaseService>,
}

impl CategoriesService {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    pub async fn create(&self, user_id: Uuid, dto: CreateCategory) -> PortResult<Category> {
        let name = require_text("name", &dto.name)?;
        validate_color(&dto.color)?;
        let category = self.db.create_category(user_id, &name, &dto.color).await?;
        info!(category_id = %category.id, %user_id, "category created");
        Ok(category)
    }

    pub async fn find_all(&self, user_id: Uuid) -> PortResult<DataEnvelope<Vec<Category>>> {
        let categories = self.db.list_categories(user_id).await?;
        Ok(DataEnvelope::new(categories))
    }

    pub async fn find_one(&self, user_id: Uuid, id: Uuid) -> PortResult<Category> {
        self.db.get_category(user_id, id).await
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        mut dto: UpdateCategory,
    ) -> PortResult<DataEnvelope<Category>> {
        if let Some(name) = dto.name.as_deref() {
            dto.name = Some(require_text("name", name)?);
        }
        if let Some(color) = dto.color.as_deref() {
            validate_color(color)?;
        }
        let category = self.db.update_category(user_id, id, dto).await?;
        Ok(DataEnvelope::new(category))
    }

    pub async fn remove(&self, user_id: Uuid, id: Uuid) -> PortResult<MessageEnvelope> {
        self.db.delete_category(user_id, id).await?;
        info!(category_id = %id, %user_id, "category deleted");
        Ok(MessageEnvelope::new(CATEGORY_DELETED))
    }
}

/// Accepts CSS hex colors: `#rgb` or `#rrggbb`.
fn validate_color(color: &str) -> PortResult<()> {
    let valid = color
        .strip_prefix('#')
        .map(|hex| (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(PortError::InvalidInput(format!(
            "color '{}' is not a hex color",
            color
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryDatabase;

    fn service() -> CategoriesService {
        CategoriesService::new(Arc::new(InMemoryDatabase::new()))
    }

    fn work() -> CreateCategory {
        CreateCategory {
            name: "Work".to_string(),
            color: "#ff0000".to_string(),
        }
    }

    #[tokio::test]
    async fn create_attaches_the_owner() {
        let svc = service();
        let user = Uuid::new_v4();
        let category = svc.create(user, work()).await.unwrap();
        assert_eq!(category.user_id, user);
        assert_eq!(category.name, "Work");
        assert_eq!(category.color, "#ff0000");
    }

    #[tokio::test]
    async fn find_all_is_scoped_and_sorted_by_name() {
        let svc = service();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        for name in ["Zeta", "Alpha", "Mid"] {
            svc.create(
                alice,
                CreateCategory {
                    name: name.into(),
                    color: "#000".into(),
                },
            )
            .await
            .unwrap();
        }
        svc.create(bob, work()).await.unwrap();

        let names: Vec<_> = svc
            .find_all(alice)
            .await
            .unwrap()
            .data
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
    }

    #[tokio::test]
    async fn name_order_ignores_case() {
        let svc = service();
        let user = Uuid::new_v4();
        for name in ["beta", "Alpha", "alpha", "Beta"] {
            svc.create(
                user,
                CreateCategory {
                    name: name.into(),
                    color: "#000".into(),
                },
            )
            .await
            .unwrap();
        }

        let names: Vec<_> = svc
            .find_all(user)
            .await
            .unwrap()
            .data
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "alpha", "Beta", "beta"]);
    }

    #[tokio::test]
    async fn update_applies_only_given_fields() {
        let svc = service();
        let user = Uuid::new_v4();
        let created = svc.create(user, work()).await.unwrap();

        let updated = svc
            .update(
                user,
                created.id,
                UpdateCategory {
                    color: Some("#00ff00".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .data;
        assert_eq!(updated.name, "Work");
        assert_eq!(updated.color, "#00ff00");
    }

    #[tokio::test]
    async fn foreign_user_sees_not_found_and_nothing_changes() {
        let svc = service();
        let (owner, intruder) = (Uuid::new_v4(), Uuid::new_v4());
        let created = svc.create(owner, work()).await.unwrap();

        let err = svc
            .update(
                intruder,
                created.id,
                UpdateCategory {
                    name: Some("Hijacked".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));

        let err = svc.remove(intruder, created.id).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));

        let still = svc.find_one(owner, created.id).await.unwrap();
        assert_eq!(still.name, "Work");
    }

    #[tokio::test]
    async fn remove_returns_message_and_deletes() {
        let svc = service();
        let user = Uuid::new_v4();
        let created = svc.create(user, work()).await.unwrap();

        let msg = svc.remove(user, created.id).await.unwrap();
        assert_eq!(msg.message, "分类已删除");
        assert!(svc.find_all(user).await.unwrap().data.is_empty());
        assert!(matches!(
            svc.remove(user, created.id).await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn rejects_bad_color_and_blank_name() {
        let svc = service();
        let user = Uuid::new_v4();
        let bad_color = CreateCategory {
            name: "Work".into(),
            color: "red".into(),
        };
        assert!(matches!(
            svc.create(user, bad_color).await,
            Err(PortError::InvalidInput(_))
        ));
        let blank = CreateCategory {
            name: "  ".into(),
            color: "#abc".into(),
        };
        assert!(matches!(
            svc.create(user, blank).await,
            Err(PortError::InvalidInput(_))
        ));
    }
}
