//! Generic CRUD over the six managed record kinds.
//!
//! Every write validates first and needs a signed-in admin; deletes also
//! need an explicit confirmation. A rejected request never reaches the store.

use std::marker::PhantomData;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use garuda_core::ValidationError;

use crate::db::{EntityStore, RepositoryError};
use crate::models::{
    CurrentAdmin, Donation, Entity, Event, GalleryItem, Program, Story, Volunteer,
};

/// Errors from entity operations.
#[derive(Debug, Error)]
pub enum EntityError {
    /// Write attempted without a signed-in admin.
    #[error("authentication required")]
    AuthRequired,

    /// The submitted fields failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No record with the requested id.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Delete requested without confirmation.
    #[error("deleting a {0} requires confirmation")]
    ConfirmationRequired(&'static str),

    /// The store could not be reached or rejected the statement.
    #[error("store error: {0}")]
    Store(#[from] RepositoryError),
}

/// Whether a destructive action was explicitly confirmed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Unconfirmed,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Unconfirmed
        }
    }
}

/// CRUD manager for one entity kind.
pub struct EntityManager<E: Entity> {
    store: Arc<dyn EntityStore<E>>,
    _kind: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for EntityManager<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _kind: PhantomData,
        }
    }
}

impl<E: Entity> EntityManager<E> {
    /// Create a manager over an entity store.
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore<E>>) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    /// All records in listing order.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::Store` on storage failure.
    pub async fn list(&self) -> Result<Vec<E>, EntityError> {
        Ok(self.store.list().await?)
    }

    /// One record by id.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::NotFound` if absent.
    pub async fn get(&self, id: E::Id) -> Result<E, EntityError> {
        self.store
            .get(id)
            .await?
            .ok_or(EntityError::NotFound(E::NOUN))
    }

    /// Validate and insert a new record as `actor`.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` or `Validation` before any store call.
    pub async fn create(
        &self,
        actor: Option<&CurrentAdmin>,
        fields: &E::Fields,
    ) -> Result<E, EntityError> {
        let actor = actor.ok_or(EntityError::AuthRequired)?;
        E::validate(fields)?;

        let record = self.store.insert(fields, actor.id).await?;
        info!(kind = E::NOUN, id = %record.id(), admin_id = %actor.id, "record created");
        Ok(record)
    }

    /// Validate and overwrite an existing record as `actor`.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` or `Validation` before any store call, and
    /// `NotFound` if the id does not exist.
    pub async fn update(
        &self,
        actor: Option<&CurrentAdmin>,
        id: E::Id,
        fields: &E::Fields,
    ) -> Result<E, EntityError> {
        let actor = actor.ok_or(EntityError::AuthRequired)?;
        E::validate(fields)?;

        let record = self
            .store
            .update(id, fields)
            .await?
            .ok_or(EntityError::NotFound(E::NOUN))?;
        info!(kind = E::NOUN, %id, admin_id = %actor.id, "record updated");
        Ok(record)
    }

    /// Delete exactly one record as `actor`.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` or `ConfirmationRequired` before any store
    /// call, and `NotFound` if the id does not exist.
    pub async fn delete(
        &self,
        actor: Option<&CurrentAdmin>,
        id: E::Id,
        confirmation: Confirmation,
    ) -> Result<(), EntityError> {
        let actor = actor.ok_or(EntityError::AuthRequired)?;
        if confirmation != Confirmation::Confirmed {
            return Err(EntityError::ConfirmationRequired(E::NOUN));
        }

        if !self.store.delete(id).await? {
            return Err(EntityError::NotFound(E::NOUN));
        }
        info!(kind = E::NOUN, %id, admin_id = %actor.id, "record deleted");
        Ok(())
    }

    /// Number of records.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::Store` on storage failure.
    pub async fn count(&self) -> Result<i64, EntityError> {
        Ok(self.store.count().await?)
    }
}

/// One manager per record kind.
#[derive(Clone)]
pub struct Managers {
    pub programs: EntityManager<Program>,
    pub stories: EntityManager<Story>,
    pub gallery: EntityManager<GalleryItem>,
    pub events: EntityManager<Event>,
    pub donations: EntityManager<Donation>,
    pub volunteers: EntityManager<Volunteer>,
}

/// Entity kinds reachable through [`Managers`].
pub trait Managed: Entity {
    /// This kind's manager.
    fn manager(managers: &Managers) -> &EntityManager<Self>;
}

macro_rules! managed {
    ($($entity:ty => $field:ident),* $(,)?) => {
        $(
            impl Managed for $entity {
                fn manager(managers: &Managers) -> &EntityManager<Self> {
                    &managers.$field
                }
            }
        )*
    };
}

managed! {
    Program => programs,
    Story => stories,
    GalleryItem => gallery,
    Event => events,
    Donation => donations,
    Volunteer => volunteers,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use garuda_core::{AdminRole, AdminUserId, Email};
    use serde_json::json;

    use super::*;
    use crate::db::memory::MemoryEntityStore;
    use crate::models::{Program, ProgramFields};

    fn admin() -> CurrentAdmin {
        CurrentAdmin {
            id: AdminUserId::generate(),
            email: Email::parse("admin@example.org").unwrap(),
            full_name: "Programs Lead".to_string(),
            role: AdminRole::Admin,
            login_time: Utc::now(),
        }
    }

    fn program(title: &str) -> ProgramFields {
        serde_json::from_value(json!({ "title": title, "category": "ayurveda" })).unwrap()
    }

    fn manager() -> (EntityManager<Program>, Arc<MemoryEntityStore<Program>>) {
        let store = Arc::new(MemoryEntityStore::new());
        (EntityManager::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_create_records_creator() {
        let (programs, _) = manager();
        let admin = admin();
        let created = programs.create(Some(&admin), &program("Vaidya camp")).await.unwrap();

        assert_eq!(created.created_by, Some(admin.id));
        assert_eq!(programs.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_anonymous_writes_rejected() {
        let (programs, store) = manager();
        let result = programs.create(None, &program("Vaidya camp")).await;

        assert!(matches!(result, Err(EntityError::AuthRequired)));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (programs, _) = manager();
        let result = programs
            .update(Some(&admin()), uuid::Uuid::new_v4().into(), &program("Ghost"))
            .await;

        assert!(matches!(result, Err(EntityError::NotFound("program"))));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (programs, store) = manager();
        let admin = admin();
        let created = programs.create(Some(&admin), &program("Vaidya camp")).await.unwrap();

        let result = programs
            .delete(Some(&admin), created.id, Confirmation::Unconfirmed)
            .await;
        assert!(matches!(result, Err(EntityError::ConfirmationRequired(_))));
        assert_eq!(store.write_count(), 1);

        programs
            .delete(Some(&admin), created.id, Confirmation::Confirmed)
            .await
            .unwrap();
        assert_eq!(programs.count().await.unwrap(), 0);
    }
}
