//! In-memory store implementations.
//!
//! Used by unit and integration tests in place of `PostgreSQL`. Each store
//! counts write calls so tests can assert that a rejected operation never
//! reached storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use garuda_core::content::SectionName;
use garuda_core::{AdminUserId, ContentSectionId, Email};

use super::{AdminUserStore, EntityStore, RepositoryError, SectionStore};
use crate::models::admin_user::NewAdminUser;
use crate::models::{AdminUser, ContentSection, Entity};

/// `website_content` held in a map keyed by section name.
#[derive(Debug, Default)]
pub struct MemorySectionStore {
    rows: RwLock<HashMap<SectionName, ContentSection>>,
    writes: AtomicUsize,
}

impl MemorySectionStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `upsert`/`insert_if_absent` calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SectionStore for MemorySectionStore {
    async fn fetch(&self, name: &SectionName) -> Result<Option<ContentSection>, RepositoryError> {
        Ok(self.rows.read().await.get(name).cloned())
    }

    async fn upsert(
        &self,
        name: &SectionName,
        content: &Value,
        updated_by: Option<AdminUserId>,
    ) -> Result<ContentSection, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let mut rows = self.rows.write().await;
        let row = rows
            .entry(name.clone())
            .and_modify(|row| {
                row.content = content.clone();
                row.last_updated_by = updated_by;
                row.updated_at = now;
            })
            .or_insert_with(|| ContentSection {
                id: ContentSectionId::generate(),
                section_name: name.clone(),
                content: content.clone(),
                last_updated_by: updated_by,
                created_at: now,
                updated_at: now,
            });
        Ok(row.clone())
    }

    async fn insert_if_absent(
        &self,
        name: &SectionName,
        content: &Value,
    ) -> Result<bool, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.write().await;
        if rows.contains_key(name) {
            return Ok(false);
        }
        let now = Utc::now();
        rows.insert(
            name.clone(),
            ContentSection {
                id: ContentSectionId::generate(),
                section_name: name.clone(),
                content: content.clone(),
                last_updated_by: None,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<ContentSection>, RepositoryError> {
        let mut rows: Vec<_> = self.rows.read().await.values().cloned().collect();
        rows.sort_by(|a, b| a.section_name.as_str().cmp(b.section_name.as_str()));
        Ok(rows)
    }
}

/// Admin users held in a map keyed by id.
#[derive(Debug, Default)]
pub struct MemoryAdminUserStore {
    users: RwLock<HashMap<AdminUserId, AdminUser>>,
}

impl MemoryAdminUserStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminUserStore for MemoryAdminUserStore {
    async fn get_by_email(&self, email: &Email) -> Result<Option<AdminUser>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn get_by_id(&self, id: AdminUserId) -> Result<Option<AdminUser>, RepositoryError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, user: &NewAdminUser) -> Result<AdminUser, RepositoryError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(
                "admin email already exists".to_string(),
            ));
        }
        let now = Utc::now();
        let created = AdminUser {
            id: AdminUserId::generate(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            is_active: true,
            password_hash: user.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn set_active(&self, email: &Email, active: bool) -> Result<bool, RepositoryError> {
        let mut users = self.users.write().await;
        let Some(user) = users.values_mut().find(|u| &u.email == email) else {
            return Ok(false);
        };
        user.is_active = active;
        user.updated_at = Utc::now();
        Ok(true)
    }
}

/// Any [`Entity`] kind held in a map keyed by id.
#[derive(Debug)]
pub struct MemoryEntityStore<E: Entity> {
    records: RwLock<HashMap<E::Id, E>>,
    writes: AtomicUsize,
}

impl<E: Entity> Default for MemoryEntityStore<E> {
    fn default() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            writes: AtomicUsize::new(0),
        }
    }
}

impl<E: Entity> MemoryEntityStore<E> {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `insert`/`update`/`delete` calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MemoryEntityStore<E> {
    async fn list(&self) -> Result<Vec<E>, RepositoryError> {
        let mut records: Vec<E> = self.records.read().await.values().cloned().collect();
        records.sort_by(E::list_order);
        Ok(records)
    }

    async fn get(&self, id: E::Id) -> Result<Option<E>, RepositoryError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn insert(&self, fields: &E::Fields, actor: AdminUserId) -> Result<E, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let id = E::Id::from(Uuid::new_v4());
        let record = E::assemble(id, fields.clone(), actor, Utc::now());

        let mut records = self.records.write().await;
        check_unique(&records, &record)?;
        records.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: E::Id, fields: &E::Fields) -> Result<Option<E>, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.write().await;
        let Some(mut record) = records.get(&id).cloned() else {
            return Ok(None);
        };
        record.apply(fields.clone(), Utc::now());

        check_unique(&records, &record)?;
        records.insert(id, record.clone());
        Ok(Some(record))
    }

    async fn delete(&self, id: E::Id) -> Result<bool, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let len = self.records.read().await.len();
        Ok(i64::try_from(len).unwrap_or(i64::MAX))
    }
}

/// Reject `candidate` if another record already holds its unique key.
fn check_unique<E: Entity>(
    records: &HashMap<E::Id, E>,
    candidate: &E,
) -> Result<(), RepositoryError> {
    let Some((what, key)) = candidate.unique_key() else {
        return Ok(());
    };
    let taken = records.values().any(|other| {
        other.id() != candidate.id() && other.unique_key().is_some_and(|(_, k)| k == key)
    });
    if taken {
        return Err(RepositoryError::Conflict(format!("{what} already exists")));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{Event, EventFields, Volunteer, VolunteerFields};

    fn volunteer(email: &str) -> VolunteerFields {
        serde_json::from_value(json!({ "full_name": "Arjun", "email": email })).unwrap()
    }

    fn name(s: &str) -> SectionName {
        SectionName::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_section() {
        let store = MemorySectionStore::new();
        store.upsert(&name("hero"), &json!({"title": "a"}), None).await.unwrap();
        let second = store
            .upsert(&name("hero"), &json!({"title": "b"}), None)
            .await
            .unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(second.content, json!({"title": "b"}));
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_insert_if_absent_does_not_overwrite() {
        let store = MemorySectionStore::new();
        store.upsert(&name("stats"), &json!({"villages": 7}), None).await.unwrap();
        let inserted = store
            .insert_if_absent(&name("stats"), &json!({"villages": 100}))
            .await
            .unwrap();

        assert!(!inserted);
        let row = store.fetch(&name("stats")).await.unwrap().unwrap();
        assert_eq!(row.content, json!({"villages": 7}));
    }

    #[tokio::test]
    async fn test_events_list_soonest_first() {
        let store = MemoryEntityStore::<Event>::new();
        let actor = AdminUserId::generate();
        for date in ["2026-12-01T10:00:00Z", "2026-11-01T10:00:00Z"] {
            let fields: EventFields = serde_json::from_value(json!({
                "title": "Deepotsav",
                "event_date": date,
                "location": "Ayodhya",
                "event_type": "celebration",
            }))
            .unwrap();
            store.insert(&fields, actor).await.unwrap();
        }

        let listed = store.list().await.unwrap();
        assert!(listed[0].fields.event_date < listed[1].fields.event_date);
    }

    #[tokio::test]
    async fn test_volunteer_email_is_unique() {
        let store = MemoryEntityStore::<Volunteer>::new();
        let actor = AdminUserId::generate();
        store.insert(&volunteer("arjun@example.in"), actor).await.unwrap();
        let other = store.insert(&volunteer("kavya@example.in"), actor).await.unwrap();

        let err = store
            .insert(&volunteer(" Arjun@Example.in "), actor)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let err = store
            .update(other.id, &volunteer("arjun@example.in"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let kept = store.update(other.id, &volunteer("kavya@example.in")).await.unwrap();
        assert!(kept.is_some());
        assert_eq!(store.count().await.unwrap(), 2);
    }
}
