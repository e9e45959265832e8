//! In-memory participant store and the service that shares it across handlers.

use std::collections::HashMap;
use std::sync::Arc;

use census_models::{
    validate_participant, HomeDetails, Participant, ParticipantDetails, PersonalSummary,
    ValidationError, WorkDetails,
};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::metrics;
use crate::security::sanitize_for_log;

/// Store-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Participant not found")]
    NotFound,

    #[error("A participant with the same email already exists")]
    Duplicate,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("No active work details available for this participant")]
    NoActiveWork,

    #[error("No active home details available for this participant")]
    NoActiveHome,
}

/// Participants keyed by email, iterated in insertion order.
///
/// Invariant: `order` holds exactly the keys of `records`, each once.
#[derive(Debug, Default)]
pub struct ParticipantStore {
    records: HashMap<String, Participant>,
    order: Vec<String>,
}

impl ParticipantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding only the example participant.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        let seed = Participant::seed();
        if let Some(email) = seed.email().map(str::to_string) {
            store.order.push(email.clone());
            store.records.insert(email, seed);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.records.contains_key(email)
    }

    pub fn get(&self, email: &str) -> Option<&Participant> {
        self.records.get(email)
    }

    /// All records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.order.iter().filter_map(|email| self.records.get(email))
    }

    pub fn list_details(&self) -> Vec<PersonalSummary> {
        self.iter().map(PersonalSummary::from).collect()
    }

    pub fn get_details(&self, email: &str) -> Result<ParticipantDetails, StoreError> {
        self.get(email)
            .map(ParticipantDetails::from)
            .ok_or(StoreError::NotFound)
    }

    pub fn get_work(&self, email: &str) -> Result<WorkDetails, StoreError> {
        let participant = self.get(email).ok_or(StoreError::NotFound)?;
        participant
            .active_work()
            .map(WorkDetails::from)
            .ok_or(StoreError::NoActiveWork)
    }

    pub fn get_home(&self, email: &str) -> Result<HomeDetails, StoreError> {
        let participant = self.get(email).ok_or(StoreError::NotFound)?;
        participant
            .active_home()
            .map(HomeDetails::from)
            .ok_or(StoreError::NoActiveHome)
    }

    /// Append a new participant.
    ///
    /// An email collision is reported before any validation failure.
    pub fn insert(&mut self, participant: Participant) -> Result<(), StoreError> {
        if participant.email().is_some_and(|e| self.records.contains_key(e)) {
            return Err(StoreError::Duplicate);
        }

        validate_participant(&participant)?;
        let Some(email) = participant.email().map(str::to_string) else {
            return Err(ValidationError::MissingSections.into());
        };

        self.order.push(email.clone());
        self.records.insert(email, participant);
        Ok(())
    }

    /// Replace the record stored under `email` with `participant`, unvalidated.
    ///
    /// The record keeps its position. It is re-keyed when the body carries a
    /// different, non-empty email; a body without one stays under `email`.
    pub fn update(&mut self, email: &str, participant: Participant) -> Result<(), StoreError> {
        if !self.records.contains_key(email) {
            return Err(StoreError::NotFound);
        }

        // A body without a usable email keeps the path key, so the record
        // stays reachable and its email stays reserved against inserts.
        let key = participant
            .email()
            .filter(|e| !e.is_empty())
            .unwrap_or(email)
            .to_string();

        if key != email {
            if self.records.contains_key(&key) {
                return Err(StoreError::Duplicate);
            }
            self.records.remove(email);
            if let Some(slot) = self.order.iter_mut().find(|k| k.as_str() == email) {
                *slot = key.clone();
            }
        }

        self.records.insert(key, participant);
        Ok(())
    }

    /// Remove the record stored under `email`, keeping the others in order.
    pub fn delete(&mut self, email: &str) -> Result<Participant, StoreError> {
        let removed = self.records.remove(email).ok_or(StoreError::NotFound)?;
        self.order.retain(|k| k != email);
        Ok(removed)
    }
}

/// Shared, lock-guarded access to the participant store.
#[derive(Clone, Default)]
pub struct ParticipantService {
    store: Arc<RwLock<ParticipantStore>>,
}

impl ParticipantService {
    /// Create a new participant service.
    pub fn new(store: ParticipantStore) -> Self {
        metrics::set_participants_total(store.len());
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Snapshot of all participants, in order.
    pub async fn list(&self) -> Vec<Participant> {
        self.store.read().await.iter().cloned().collect()
    }

    pub async fn count(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn list_details(&self) -> Vec<PersonalSummary> {
        self.store.read().await.list_details()
    }

    pub async fn get_details(&self, email: &str) -> ApiResult<ParticipantDetails> {
        Ok(self.store.read().await.get_details(email)?)
    }

    pub async fn get_work(&self, email: &str) -> ApiResult<WorkDetails> {
        Ok(self.store.read().await.get_work(email)?)
    }

    pub async fn get_home(&self, email: &str) -> ApiResult<HomeDetails> {
        Ok(self.store.read().await.get_home(email)?)
    }

    /// Insert a validated participant.
    pub async fn create(&self, participant: Participant) -> ApiResult<()> {
        let email = participant.email().map(sanitize_for_log).unwrap_or_default();
        let mut store = self.store.write().await;

        let result = store.insert(participant);
        self.observe("create", &result, store.len());
        result?;

        info!(email = %email, total = store.len(), "Participant created");
        Ok(())
    }

    /// Replace the participant stored under `email` wholesale.
    pub async fn replace(&self, email: &str, participant: Participant) -> ApiResult<()> {
        let mut store = self.store.write().await;

        let result = store.update(email, participant);
        self.observe("update", &result, store.len());
        result?;

        info!(email = %sanitize_for_log(email), "Participant replaced");
        Ok(())
    }

    pub async fn remove(&self, email: &str) -> ApiResult<()> {
        let mut store = self.store.write().await;

        let result = store.delete(email).map(|_| ());
        self.observe("delete", &result, store.len());
        result?;

        info!(email = %sanitize_for_log(email), total = store.len(), "Participant deleted");
        Ok(())
    }

    fn observe(&self, op: &str, result: &Result<(), StoreError>, total: usize) {
        let outcome = match result {
            Ok(()) => "ok",
            Err(StoreError::NotFound) => "not_found",
            Err(StoreError::Duplicate) => "duplicate",
            Err(StoreError::Invalid(e)) => {
                debug!(op, reason = %e, "Participant rejected");
                "invalid"
            }
            Err(StoreError::NoActiveWork | StoreError::NoActiveHome) => "inactive",
        };
        metrics::record_participant_mutation(op, outcome);
        metrics::set_participants_total(total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use census_models::{Home, PersonalInfo, Work, SEED_EMAIL};
    use serde_json::json;

    fn participant(email: &str) -> Participant {
        Participant::new(
            email,
            PersonalInfo::new("Ada", "Lovelace", "1815/12/10"),
            Work::new("Analytical Engines", 1000, "GBP"),
            Home::new("UK", "London"),
        )
    }

    fn emails(store: &ParticipantStore) -> Vec<&str> {
        store.iter().filter_map(|p| p.email()).collect()
    }

    #[test]
    fn test_seeded_store() {
        let store = ParticipantStore::seeded();
        assert_eq!(store.len(), 1);
        let details = store.get_details(SEED_EMAIL).unwrap();
        assert_eq!(details.firstname, Some(json!("John Updates")));
        assert_eq!(details.dob, Some(json!("1990/06/15")));
        assert_eq!(details.salary, Some(json!(55000)));
        assert_eq!(details.currency, Some(json!("USD")));
    }

    #[test]
    fn test_insert_then_list() {
        let mut store = ParticipantStore::seeded();
        let ada = participant("ada@example.com");
        store.insert(ada.clone()).unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.iter().any(|p| *p == ada));
        assert_eq!(emails(&store), vec![SEED_EMAIL, "ada@example.com"]);
    }

    #[test]
    fn test_duplicate_insert_leaves_store_unchanged() {
        let mut store = ParticipantStore::new();
        store.insert(participant("ada@example.com")).unwrap();

        let mut again = participant("ada@example.com");
        again.personal_info.as_mut().unwrap().firstname = Some(json!("Other"));

        assert_eq!(store.insert(again), Err(StoreError::Duplicate));
        assert_eq!(store.len(), 1);
        assert_eq!(store.list_details()[0].firstname, Some(json!("Ada")));
    }

    #[test]
    fn test_duplicate_reported_before_validation() {
        let mut store = ParticipantStore::seeded();
        let mut bad = participant(SEED_EMAIL);
        bad.work = None;

        assert_eq!(store.insert(bad), Err(StoreError::Duplicate));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalid_insert_rejected() {
        let mut store = ParticipantStore::new();
        let mut bad = participant("ada@example.com");
        bad.home = None;

        assert_eq!(
            store.insert(bad),
            Err(StoreError::Invalid(ValidationError::MissingSections))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_work_is_not_found() {
        let store = ParticipantStore::seeded();
        assert_eq!(store.get_work("missing@x.com"), Err(StoreError::NotFound));
        assert_eq!(store.get_home("missing@x.com"), Err(StoreError::NotFound));
    }

    #[test]
    fn test_deleted_sections_are_hidden() {
        let mut store = ParticipantStore::new();
        let mut p = participant("ada@example.com");
        p.work.as_mut().unwrap().deleted = Some(json!(true));
        store.insert(p).unwrap();

        assert_eq!(store.get_work("ada@example.com"), Err(StoreError::NoActiveWork));
        assert_eq!(
            store.get_home("ada@example.com").unwrap().city,
            Some(json!("London"))
        );
    }

    #[test]
    fn test_delete_then_details_not_found() {
        let mut store = ParticipantStore::seeded();
        store.insert(participant("a@example.com")).unwrap();
        store.insert(participant("b@example.com")).unwrap();

        store.delete("a@example.com").unwrap();

        assert_eq!(store.get_details("a@example.com"), Err(StoreError::NotFound));
        assert_eq!(emails(&store), vec![SEED_EMAIL, "b@example.com"]);
        assert_eq!(store.delete("a@example.com").unwrap_err(), StoreError::NotFound);
    }

    #[test]
    fn test_update_replaces_without_validation() {
        let mut store = ParticipantStore::seeded();
        let body: Participant = serde_json::from_value(json!({
            "email": SEED_EMAIL,
            "personalInfo": { "firstname": "Only" },
            "work": { "salary": "not a number" }
        }))
        .unwrap();
        assert!(validate_participant(&body).is_err());

        store.update(SEED_EMAIL, body.clone()).unwrap();

        assert_eq!(store.get(SEED_EMAIL), Some(&body));
        assert_eq!(store.get_home(SEED_EMAIL), Err(StoreError::NoActiveHome));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut store = ParticipantStore::seeded();
        assert_eq!(
            store.update("nobody@example.com", participant("nobody@example.com")),
            Err(StoreError::NotFound)
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_rekeys_in_place() {
        let mut store = ParticipantStore::seeded();
        store.insert(participant("a@example.com")).unwrap();

        store.update(SEED_EMAIL, participant("renamed@example.com")).unwrap();

        assert!(!store.contains(SEED_EMAIL));
        assert_eq!(emails(&store), vec!["renamed@example.com", "a@example.com"]);
    }

    #[test]
    fn test_update_rekey_onto_existing_email_rejected() {
        let mut store = ParticipantStore::seeded();
        store.insert(participant("a@example.com")).unwrap();

        assert_eq!(
            store.update(SEED_EMAIL, participant("a@example.com")),
            Err(StoreError::Duplicate)
        );
        assert_eq!(emails(&store), vec![SEED_EMAIL, "a@example.com"]);
    }

    #[test]
    fn test_update_stores_unknown_and_mistyped_fields() {
        let mut store = ParticipantStore::seeded();
        let body: Participant = serde_json::from_value(json!({
            "email": SEED_EMAIL,
            "notes": "keep me",
            "personalInfo": { "firstname": 7, "middlename": "Q" }
        }))
        .unwrap();

        store.update(SEED_EMAIL, body).unwrap();

        let stored = serde_json::to_value(store.get(SEED_EMAIL).unwrap()).unwrap();
        assert_eq!(stored["notes"], "keep me");
        assert_eq!(stored["personalInfo"], json!({ "firstname": 7, "middlename": "Q" }));
    }

    #[test]
    fn test_update_with_non_string_email_keeps_key() {
        let mut store = ParticipantStore::seeded();
        let body: Participant = serde_json::from_value(json!({ "email": 42 })).unwrap();

        store.update(SEED_EMAIL, body.clone()).unwrap();

        assert_eq!(store.get(SEED_EMAIL), Some(&body));
        assert_eq!(store.insert(Participant::seed()), Err(StoreError::Duplicate));
    }

    #[test]
    fn test_update_without_email_keeps_key() {
        let mut store = ParticipantStore::seeded();
        store.update(SEED_EMAIL, Participant::default()).unwrap();

        assert_eq!(store.get(SEED_EMAIL), Some(&Participant::default()));
        assert_eq!(store.list_details().len(), 1);
    }

    #[tokio::test]
    async fn test_service_round_trip() {
        let service = ParticipantService::new(ParticipantStore::seeded());
        service.create(participant("ada@example.com")).await.unwrap();
        assert_eq!(service.count().await, 2);

        let work = service.get_work("ada@example.com").await.unwrap();
        assert_eq!(work.companyname, Some(json!("Analytical Engines")));

        service.remove("ada@example.com").await.unwrap();
        assert!(service.get_details("ada@example.com").await.is_err());
        assert_eq!(service.list().await, vec![Participant::seed()]);
    }
}
