//! Typed per-entity services.
//!
//! Each service binds [`CrudEngine`] to one [`EntityKind`] and forwards the
//! five operations unchanged.

use std::sync::Arc;

use uuid::Uuid;

use super::CrudEngine;
use crate::features::records::error::Result;
use crate::features::records::model::{ListFilter, Record, RecordInput};
use crate::features::records::schema::EntityKind;

macro_rules! entity_facade {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            engine: Arc<CrudEngine>,
        }

        impl $name {
            pub const KIND: EntityKind = $kind;

            pub fn new(engine: Arc<CrudEngine>) -> Self {
                Self { engine }
            }

            pub async fn create(&self, input: RecordInput) -> Result<Record> {
                self.engine.create(Self::KIND, input).await
            }

            pub async fn list(&self, filter: ListFilter) -> Result<Vec<Record>> {
                self.engine.list(Self::KIND, filter).await
            }

            pub async fn get_by_id(&self, id: Uuid) -> Result<Record> {
                self.engine.get_by_id(Self::KIND, id).await
            }

            pub async fn update(&self, id: Uuid, input: RecordInput) -> Result<Record> {
                self.engine.update(Self::KIND, id, input).await
            }

            pub async fn delete(&self, id: Uuid) -> Result<Vec<Record>> {
                self.engine.delete(Self::KIND, id).await
            }
        }
    };
}

entity_facade!(
    /// Celebration announcements (weddings, anniversaries, ...)
    CelebrationService => EntityKind::Celebration
);
entity_facade!(
    /// Condolence notices
    CondolenceService => EntityKind::Condolence
);
entity_facade!(NewsService => EntityKind::News);
entity_facade!(BirthdayService => EntityKind::Birthday);
entity_facade!(
    /// Community member registry. Deleting a member deactivates it.
    MemberService => EntityKind::Member
);
entity_facade!(
    /// Contact-form messages
    MessageService => EntityKind::Message
);
entity_facade!(
    /// District / city / member directory entries
    DirectoryNodeService => EntityKind::DirectoryNode
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::records::error::ErrorKind;
    use crate::shared::test_helpers::TestContext;
    use fake::faker::name::en::Name;
    use fake::Fake;

    #[tokio::test]
    async fn test_services_are_bound_to_their_kind() {
        let ctx = TestContext::new();
        let news = NewsService::new(ctx.engine.clone());
        let birthdays = BirthdayService::new(ctx.engine.clone());

        let item = news
            .create(RecordInput::new().set("title", "Blood donation camp"))
            .await
            .unwrap();
        birthdays
            .create(RecordInput::new().set("personName", Name().fake::<String>()))
            .await
            .unwrap();

        assert_eq!(news.list(ListFilter::new()).await.unwrap().len(), 1);
        assert_eq!(birthdays.list(ListFilter::new()).await.unwrap().len(), 1);

        let err = birthdays.get_by_id(item.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_message_lifecycle() {
        let ctx = TestContext::new();
        let messages = MessageService::new(ctx.engine.clone());

        let created = messages
            .create(
                RecordInput::new()
                    .set("name", Name().fake::<String>())
                    .set("email", "visitor@example.org")
                    .set("message", "When is the next meeting?"),
            )
            .await
            .unwrap();
        assert_eq!(created.get("isRead"), Some(&serde_json::Value::Null));

        let read = messages
            .update(
                created.id,
                RecordInput::new()
                    .set("name", created.get_str("name").unwrap())
                    .set("message", "When is the next meeting?")
                    .set("isRead", true),
            )
            .await
            .unwrap();
        assert_eq!(read.get_bool("isRead"), Some(true));
        assert_eq!(read.get("email"), Some(&serde_json::Value::Null));

        assert_eq!(messages.delete(created.id).await.unwrap().len(), 1);
        assert!(messages.list(ListFilter::new()).await.unwrap().is_empty());
    }

    #[test]
    fn test_kind_constants() {
        assert_eq!(CelebrationService::KIND, EntityKind::Celebration);
        assert_eq!(CondolenceService::KIND, EntityKind::Condolence);
        assert_eq!(MemberService::KIND, EntityKind::Member);
        assert_eq!(DirectoryNodeService::KIND, EntityKind::DirectoryNode);
    }
}
