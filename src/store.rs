//! The contact store: single owner of the contact collection.
//!
//! [`ContactStore`] holds the ordered collection in memory (most recently
//! added first) and mediates every mutation. After each successful
//! mutation the whole collection is written through its [`Storage`]
//! backend as one envelope; the store is rehydrated from that envelope by
//! [`ContactStore::open`].
//!
//! Lookups that miss are not errors: `update`, `delete` and the append
//! helpers report "not found" through their return value and leave both
//! the collection and the storage entry untouched.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::export::{self, ExportTarget};
use crate::models::{
    Contact, ContactPatch, JourneyCategory, NewContact, NewInteraction, PreferenceCategory,
};
use crate::storage::{decode_state, encode_state, FileStorage, Storage};

pub struct ContactStore<S: Storage> {
    storage: S,
    key: String,
    contacts: Vec<Contact>,
}

/// Open the file-backed store described by `config`.
pub async fn open_store(config: &Config) -> Result<ContactStore<FileStorage>> {
    let storage = FileStorage::new(&config.storage.dir);
    ContactStore::open(storage, &config.storage.key).await
}

impl<S: Storage> ContactStore<S> {
    /// Hydrate from `storage` under `key`, or start empty if nothing is stored.
    pub async fn open(storage: S, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let contacts = match storage.load(&key).await? {
            Some(raw) => decode_state(&raw)?.contacts,
            None => Vec::new(),
        };
        debug!(key = %key, contacts = contacts.len(), "contact store hydrated");
        Ok(Self {
            storage,
            key,
            contacts,
        })
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Contacts whose first name, last name, or email contain `term`
    /// (case-insensitive), in collection order. An empty term matches all.
    pub fn search(&self, term: &str) -> Vec<&Contact> {
        let term = term.trim();
        self.contacts.iter().filter(|c| c.matches(term)).collect()
    }

    /// Create a contact with a fresh id and equal audit timestamps, and
    /// prepend it to the collection.
    pub async fn add(&mut self, data: NewContact) -> Result<Contact> {
        let mut id = Uuid::new_v4().to_string();
        while self.get(&id).is_some() {
            id = Uuid::new_v4().to_string();
        }

        let contact = data.into_contact(id, Utc::now());
        self.contacts.insert(0, contact.clone());
        self.persist().await?;

        info!(id = %contact.id, name = %contact.full_name(), "contact added");
        Ok(contact)
    }

    /// Shallow-merge `patch` over the contact with `id` and refresh
    /// `updated_at`. Returns `Ok(None)` if no such contact exists.
    pub async fn update(&mut self, id: &str, patch: ContactPatch) -> Result<Option<Contact>> {
        let updated = self.modify(id, |contact| patch.apply_to(contact));
        if updated.is_some() {
            self.persist().await?;
            info!(id = %id, "contact updated");
        } else {
            debug!(id = %id, "update skipped: contact not found");
        }
        Ok(updated)
    }

    /// Remove the contact with `id`. Returns whether a contact was removed.
    pub async fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.contacts.len();
        self.contacts.retain(|c| c.id != id);
        if self.contacts.len() == before {
            debug!(id = %id, "delete skipped: contact not found");
            return Ok(false);
        }
        self.persist().await?;
        info!(id = %id, "contact deleted");
        Ok(true)
    }

    /// Prepend a timestamped interaction to the contact's history.
    pub async fn log_interaction(
        &mut self,
        id: &str,
        interaction: NewInteraction,
    ) -> Result<Option<Contact>> {
        let now = Utc::now();
        let updated = self.modify(id, |contact| {
            contact.updates.insert(0, interaction.into_interaction(now));
        });
        if updated.is_some() {
            self.persist().await?;
            info!(id = %id, "interaction logged");
        }
        Ok(updated)
    }

    /// Append one value to a preference list, creating the grouping if
    /// needed. Blank values leave the contact untouched.
    pub async fn add_preference(
        &mut self,
        id: &str,
        category: PreferenceCategory,
        value: &str,
    ) -> Result<Option<Contact>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(self.get(id).cloned());
        }
        let updated = self.modify(id, |contact| {
            contact
                .groups
                .preferences
                .get_or_insert_with(Default::default)
                .list_mut(category)
                .push(value.to_string());
        });
        if updated.is_some() {
            self.persist().await?;
            info!(id = %id, category = ?category, "preference added");
        }
        Ok(updated)
    }

    /// Append one value to a personal-journey list, creating the grouping
    /// if needed. Blank values leave the contact untouched.
    pub async fn add_journey_item(
        &mut self,
        id: &str,
        category: JourneyCategory,
        value: &str,
    ) -> Result<Option<Contact>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(self.get(id).cloned());
        }
        let updated = self.modify(id, |contact| {
            contact
                .groups
                .journey
                .get_or_insert_with(Default::default)
                .list_mut(category)
                .push(value.to_string());
        });
        if updated.is_some() {
            self.persist().await?;
            info!(id = %id, category = ?category, "journey item added");
        }
        Ok(updated)
    }

    /// Write the current collection as CSV. Read-only with respect to the store.
    pub async fn export(&self, target: &ExportTarget) -> Result<Option<PathBuf>> {
        export::export_csv(&self.contacts, target).await
    }

    fn modify(&mut self, id: &str, f: impl FnOnce(&mut Contact)) -> Option<Contact> {
        let contact = self.contacts.iter_mut().find(|c| c.id == id)?;
        let previous = contact.updated_at;
        f(contact);
        contact.updated_at = next_timestamp(previous);
        Some(contact.clone())
    }

    async fn persist(&self) -> Result<()> {
        let raw = encode_state(&self.contacts)?;
        self.storage.save(&self.key, &raw).await
    }
}

/// Current time, bumped past `previous` so every modification strictly
/// advances `updated_at` even under a coarse or skewed clock.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InteractionKind, Preferences, Sentiment};
    use crate::storage::MemoryStorage;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::sync::Arc;

    const KEY: &str = "contacts-storage";

    async fn empty_store() -> ContactStore<Arc<MemoryStorage>> {
        ContactStore::open(Arc::new(MemoryStorage::new()), KEY)
            .await
            .unwrap()
    }

    fn ann() -> NewContact {
        NewContact::new("Ann", "Lee", "a@x.com")
    }

    #[tokio::test]
    async fn test_add_assigns_id_and_equal_timestamps() {
        let mut store = empty_store().await;
        let contact = store.add(ann()).await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(!contact.id.is_empty());
        assert_eq!(contact.created_at, contact.updated_at);
        assert!(contact.updates.is_empty());
    }

    #[tokio::test]
    async fn test_add_prepends_and_ids_are_unique() {
        let mut store = empty_store().await;
        let first = store.add(ann()).await.unwrap();
        let second = store
            .add(NewContact::new("Bob", "Ray", "b@x.com"))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.contacts()[0].id, second.id);
        assert_eq!(store.contacts()[1].id, first.id);
    }

    #[tokio::test]
    async fn test_update_merges_and_advances_timestamp() {
        let mut store = empty_store().await;
        let contact = store.add(ann()).await.unwrap();
        let other = store
            .add(NewContact::new("Bob", "Ray", "b@x.com"))
            .await
            .unwrap();

        let patch = ContactPatch {
            role: Some("CTO".into()),
            ..Default::default()
        };
        let updated = store.update(&contact.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.role.as_deref(), Some("CTO"));
        assert_eq!(updated.email, "a@x.com");
        assert_eq!(updated.created_at, contact.created_at);
        assert!(updated.updated_at > contact.updated_at);
        assert_eq!(store.get(&other.id), Some(&other));
    }

    #[tokio::test]
    async fn test_update_missing_is_noop() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = ContactStore::open(storage.clone(), KEY).await.unwrap();
        store.add(ann()).await.unwrap();
        let before = store.contacts().to_vec();
        let snapshot = storage.snapshot(KEY);

        let patch = ContactPatch {
            role: Some("CTO".into()),
            ..Default::default()
        };
        assert!(store.update("missing", patch).await.unwrap().is_none());
        assert_eq!(store.contacts(), before.as_slice());
        assert_eq!(storage.snapshot(KEY), snapshot);
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing() {
        let mut store = empty_store().await;
        let a = store.add(ann()).await.unwrap();
        store
            .add(NewContact::new("Bob", "Ray", "b@x.com"))
            .await
            .unwrap();

        assert!(!store.delete("missing").await.unwrap());
        assert_eq!(store.len(), 2);

        assert!(store.delete(&a.id).await.unwrap());
        assert_eq!(store.len(), 1);
        assert!(store.get(&a.id).is_none());
    }

    #[tokio::test]
    async fn test_every_mutation_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = ContactStore::open(storage.clone(), KEY).await.unwrap();
        assert!(storage.snapshot(KEY).is_none());

        let contact = store.add(ann()).await.unwrap();
        let saved = decode_state(&storage.snapshot(KEY).unwrap()).unwrap();
        assert_eq!(saved.contacts, store.contacts());

        store.delete(&contact.id).await.unwrap();
        let saved = decode_state(&storage.snapshot(KEY).unwrap()).unwrap();
        assert!(saved.contacts.is_empty());
    }

    #[tokio::test]
    async fn test_reopen_rehydrates_in_order() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = ContactStore::open(storage.clone(), KEY).await.unwrap();
        store.add(ann()).await.unwrap();
        store
            .add(NewContact::new("Bob", "Ray", "b@x.com"))
            .await
            .unwrap();

        let reopened = ContactStore::open(storage, KEY).await.unwrap();
        assert_eq!(reopened.contacts(), store.contacts());
    }

    #[tokio::test]
    async fn test_log_interaction_prepends() {
        let mut store = empty_store().await;
        let contact = store.add(ann()).await.unwrap();

        store
            .log_interaction(&contact.id, NewInteraction::note("first"))
            .await
            .unwrap();
        let updated = store
            .log_interaction(
                &contact.id,
                NewInteraction {
                    content: "second".into(),
                    kind: Some(InteractionKind::Call),
                    follow_up: Some("send notes".into()),
                    sentiment: Some(Sentiment::Positive),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.updates.len(), 2);
        assert_eq!(updated.updates[0].content, "second");
        assert_eq!(updated.updates[0].kind, InteractionKind::Call);
        assert_eq!(updated.updates[1].content, "first");
        assert!(updated.updated_at > contact.updated_at);

        assert!(store
            .log_interaction("missing", NewInteraction::note("x"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_add_preference_appends_and_skips_blank() {
        let mut store = empty_store().await;
        let mut data = ann();
        data.groups.preferences = Some(Preferences {
            dietary: Some(vec!["vegan".into()]),
            ..Default::default()
        });
        let contact = store.add(data).await.unwrap();

        store
            .add_preference(&contact.id, PreferenceCategory::Dietary, " gluten-free ")
            .await
            .unwrap();
        let unchanged = store
            .add_preference(&contact.id, PreferenceCategory::Cultural, "   ")
            .await
            .unwrap()
            .unwrap();

        let prefs = unchanged.groups.preferences.unwrap();
        assert_eq!(
            prefs.dietary,
            Some(vec!["vegan".to_string(), "gluten-free".to_string()])
        );
        assert_eq!(prefs.cultural, None);
    }

    #[tokio::test]
    async fn test_add_journey_item_creates_group() {
        let mut store = empty_store().await;
        let contact = store.add(ann()).await.unwrap();
        let updated = store
            .add_journey_item(&contact.id, JourneyCategory::Dreams, "sail the Atlantic")
            .await
            .unwrap()
            .unwrap();
        let journey = updated.groups.journey.unwrap();
        assert_eq!(journey.dreams, Some(vec!["sail the Atlantic".to_string()]));
        assert_eq!(journey.values, None);
    }

    #[tokio::test]
    async fn test_search() {
        let mut store = empty_store().await;
        store.add(ann()).await.unwrap();
        store
            .add(NewContact::new("Bob", "Ray", "bob@corp.io"))
            .await
            .unwrap();

        assert_eq!(store.search("").len(), 2);
        assert_eq!(store.search("ANN")[0].first_name, "Ann");
        assert_eq!(store.search("corp.io")[0].first_name, "Bob");
        assert!(store.search("zed").is_empty());
    }

    struct FailingStorage;

    #[async_trait]
    impl Storage for FailingStorage {
        async fn load(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn save(&self, _key: &str, _value: &str) -> Result<()> {
            bail!("quota exceeded")
        }
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let mut store = ContactStore::open(FailingStorage, KEY).await.unwrap();
        let err = store.add(ann()).await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        // The in-memory collection keeps the mutation.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_next_timestamp_is_strictly_increasing() {
        let future = Utc::now() + Duration::hours(1);
        assert!(next_timestamp(future) > future);
        let past = Utc::now() - Duration::hours(1);
        assert!(next_timestamp(past) > past);
    }
}
