//! Registration service: catalog operations and registration invariants.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::{
    CatalogEvent, Event, EventBus, EventId, EventPatch, NewEvent, NewParticipant, Participant,
    ParticipantId,
};
use crate::error::AppError;
use crate::persistence::{CatalogStore, StorageError};

/// Both collections as loaded at the start of an operation.
#[derive(Debug, Clone, PartialEq)]
struct CatalogSnapshot {
    events: Vec<Event>,
    participants: Vec<Participant>,
}

/// Orchestration layer for events and participants.
///
/// Every mutation follows the same pattern: take the writer lock → load →
/// check invariants → stage the new collections → persist → publish a
/// [`CatalogEvent`]. The writer lock is service-wide because every
/// registration rewrites the shared participant collection. Reads take no
/// lock.
#[derive(Debug, Clone)]
pub struct RegistrationService {
    store: Arc<dyn CatalogStore>,
    event_bus: EventBus,
    writer: Arc<Mutex<()>>,
}

impl RegistrationService {
    /// Creates a new `RegistrationService` over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>, event_bus: EventBus) -> Self {
        Self {
            store,
            event_bus,
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns all events.
    ///
    /// Unreadable storage is logged and served as an empty list.
    pub async fn list_events(&self) -> Vec<Event> {
        match self.store.load_events().await {
            Ok(events) => events,
            Err(e) => {
                tracing::error!(error = %e, "failed to load events; serving empty list");
                Vec::new()
            }
        }
    }

    /// Returns all participants, or only those registered for `event_id`.
    ///
    /// Unreadable storage is logged and served as an empty list.
    pub async fn list_participants(&self, event_id: Option<&EventId>) -> Vec<Participant> {
        let participants = match self.store.load_participants().await {
            Ok(participants) => participants,
            Err(e) => {
                tracing::error!(error = %e, "failed to load participants; serving empty list");
                return Vec::new();
            }
        };
        match event_id {
            Some(id) => participants
                .into_iter()
                .filter(|p| p.event_id == *id)
                .collect(),
            None => participants,
        }
    }

    /// Creates a new event with no registrations.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a text field is blank, or
    /// [`AppError::Storage`] if the catalog cannot be read or written.
    pub async fn create_event(&self, input: NewEvent) -> Result<Event, AppError> {
        self.detached(move |service| async move { service.create_event_locked(input).await })
            .await
    }

    /// Merges `patch` into the event with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EventNotFound`] if no such event exists,
    /// [`AppError::Validation`] if the patch is rejected, or
    /// [`AppError::Storage`] on storage failure.
    pub async fn update_event(&self, id: &EventId, patch: EventPatch) -> Result<Event, AppError> {
        let id = id.clone();
        self.detached(move |service| async move { service.update_event_locked(&id, patch).await })
            .await
    }

    /// Deletes an event together with every participant registered for it.
    ///
    /// Returns the number of participants removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EventNotFound`] if no such event exists, or
    /// [`AppError::Storage`] on storage failure. On a partial write the
    /// collection that was written is rolled back before the error is
    /// returned.
    pub async fn delete_event(&self, id: &EventId) -> Result<usize, AppError> {
        let id = id.clone();
        self.detached(move |service| async move { service.delete_event_locked(&id).await })
            .await
    }

    /// Registers a participant for an event.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if a field is blank or malformed.
    /// - [`AppError::UnknownEvent`] if the event does not exist.
    /// - [`AppError::CapacityExceeded`] if the event is full.
    /// - [`AppError::DuplicateRegistration`] if the email is already
    ///   registered for the event.
    /// - [`AppError::Storage`] on storage failure.
    pub async fn register_participant(
        &self,
        input: NewParticipant,
    ) -> Result<Participant, AppError> {
        self.detached(move |service| async move {
            service.register_participant_locked(input).await
        })
        .await
    }

    /// Removes a participant and frees their place on the event.
    ///
    /// The event's `registered` counter is decremented by one and never
    /// goes below zero. Returns the removed participant.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ParticipantNotFound`] if no such participant
    /// exists, or [`AppError::Storage`] on storage failure.
    pub async fn delete_participant(&self, id: &ParticipantId) -> Result<Participant, AppError> {
        let id = id.clone();
        self.detached(move |service| async move {
            service.delete_participant_locked(&id).await
        })
        .await
    }

    /// Recomputes every event's `registered` counter from the participant
    /// collection and persists the corrections.
    ///
    /// Returns the number of events whose counter changed. Participants
    /// referencing missing events and events holding more participants
    /// than their capacity are reported but left in place.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the catalog cannot be read or the
    /// corrections cannot be written.
    pub async fn reconcile_counts(&self) -> Result<usize, AppError> {
        self.detached(move |service| async move { service.reconcile_counts_locked().await })
            .await
    }

    /// Runs a mutation on its own task so that a dropped request cannot
    /// interrupt the locked section between the two collection writes.
    async fn detached<T, F, Fut>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(Self) -> Fut,
        Fut: Future<Output = Result<T, AppError>> + Send + 'static,
        T: Send + 'static,
    {
        tokio::spawn(op(self.clone()))
            .await
            .map_err(|e| AppError::Internal(format!("catalog task failed: {e}")))?
    }

    async fn create_event_locked(&self, input: NewEvent) -> Result<Event, AppError> {
        let input = input.normalized()?;

        let guard = self.writer.lock().await;
        let mut events = self.store.load_events().await?;
        let event = Event::create(input);
        events.push(event.clone());
        self.store.save_events(&events).await?;
        drop(guard);

        tracing::info!(event_id = %event.id, title = %event.title, capacity = event.capacity, "event created");
        let _ = self.event_bus.publish(CatalogEvent::EventCreated {
            event: event.clone(),
            timestamp: Utc::now(),
        });
        Ok(event)
    }

    async fn update_event_locked(&self, id: &EventId, patch: EventPatch) -> Result<Event, AppError> {
        let guard = self.writer.lock().await;
        let mut events = self.store.load_events().await?;
        let event = events
            .iter_mut()
            .find(|e| e.id == *id)
            .ok_or_else(|| AppError::EventNotFound(id.clone()))?;
        event.apply(patch)?;
        let updated = event.clone();
        self.store.save_events(&events).await?;
        drop(guard);

        tracing::info!(event_id = %id, "event updated");
        let _ = self.event_bus.publish(CatalogEvent::EventUpdated {
            event: updated.clone(),
            timestamp: Utc::now(),
        });
        Ok(updated)
    }

    async fn delete_event_locked(&self, id: &EventId) -> Result<usize, AppError> {
        let guard = self.writer.lock().await;
        let snapshot = self.load_snapshot().await?;
        let mut next = snapshot.clone();

        let events_before = next.events.len();
        next.events.retain(|e| e.id != *id);
        if next.events.len() == events_before {
            return Err(AppError::EventNotFound(id.clone()));
        }

        let participants_before = next.participants.len();
        next.participants.retain(|p| p.event_id != *id);
        let participants_removed = participants_before - next.participants.len();

        self.commit(&snapshot, &next).await?;
        drop(guard);

        tracing::info!(event_id = %id, participants_removed, "event deleted");
        let _ = self.event_bus.publish(CatalogEvent::EventDeleted {
            event_id: id.clone(),
            participants_removed,
            timestamp: Utc::now(),
        });
        Ok(participants_removed)
    }

    async fn register_participant_locked(
        &self,
        input: NewParticipant,
    ) -> Result<Participant, AppError> {
        let input = input.normalized()?;

        let guard = self.writer.lock().await;
        let snapshot = self.load_snapshot().await?;
        let mut next = snapshot.clone();

        let event = next
            .events
            .iter_mut()
            .find(|e| e.id == input.event_id)
            .ok_or_else(|| AppError::UnknownEvent(input.event_id.clone()))?;

        if event.is_full() {
            tracing::info!(event_id = %event.id, capacity = event.capacity, "registration rejected: event full");
            return Err(AppError::CapacityExceeded(event.id.clone()));
        }

        if next
            .participants
            .iter()
            .any(|p| p.matches(&input.event_id, &input.email))
        {
            return Err(AppError::DuplicateRegistration {
                event_id: input.event_id,
                email: input.email,
            });
        }

        event.registered = event.registered.saturating_add(1);
        let (registered, capacity, remaining) =
            (event.registered, event.capacity, event.remaining());

        let participant = Participant::create(input);
        next.participants.push(participant.clone());

        self.commit(&snapshot, &next).await?;
        drop(guard);

        tracing::info!(
            event_id = %participant.event_id,
            participant_id = %participant.id,
            registered,
            remaining,
            "participant registered"
        );
        let _ = self.event_bus.publish(CatalogEvent::ParticipantRegistered {
            event_id: participant.event_id.clone(),
            participant_id: participant.id.clone(),
            registered,
            capacity,
            timestamp: Utc::now(),
        });
        Ok(participant)
    }

    async fn delete_participant_locked(&self, id: &ParticipantId) -> Result<Participant, AppError> {
        let guard = self.writer.lock().await;
        let snapshot = self.load_snapshot().await?;
        let mut next = snapshot.clone();

        let position = next
            .participants
            .iter()
            .position(|p| p.id == *id)
            .ok_or_else(|| AppError::ParticipantNotFound(id.clone()))?;
        let participant = next.participants.remove(position);

        let registered = match next
            .events
            .iter_mut()
            .find(|e| e.id == participant.event_id)
        {
            Some(event) => {
                event.registered = event.registered.saturating_sub(1);
                event.registered
            }
            None => {
                tracing::warn!(participant_id = %id, event_id = %participant.event_id, "removing participant of a missing event");
                0
            }
        };

        self.commit(&snapshot, &next).await?;
        drop(guard);

        tracing::info!(participant_id = %id, event_id = %participant.event_id, registered, "participant removed");
        let _ = self.event_bus.publish(CatalogEvent::ParticipantRemoved {
            event_id: participant.event_id.clone(),
            participant_id: participant.id.clone(),
            registered,
            timestamp: Utc::now(),
        });
        Ok(participant)
    }

    async fn reconcile_counts_locked(&self) -> Result<usize, AppError> {
        let guard = self.writer.lock().await;
        let snapshot = self.load_snapshot().await?;
        let mut next = snapshot.clone();

        let mut counts: HashMap<&EventId, u32> = HashMap::new();
        for participant in &snapshot.participants {
            let count = counts.entry(&participant.event_id).or_insert(0);
            *count = count.saturating_add(1);
        }

        let mut corrected = 0;
        for event in &mut next.events {
            let actual = counts.get(&event.id).copied().unwrap_or(0);
            if actual != event.registered {
                tracing::warn!(event_id = %event.id, stored = event.registered, actual, "registered counter drifted; correcting");
                event.registered = actual;
                corrected += 1;
            }
            if actual > event.capacity {
                tracing::warn!(event_id = %event.id, capacity = event.capacity, actual, "event is over capacity");
            }
        }

        let known: HashSet<&EventId> = snapshot.events.iter().map(|e| &e.id).collect();
        let orphans = snapshot
            .participants
            .iter()
            .filter(|p| !known.contains(&p.event_id))
            .count();
        if orphans > 0 {
            tracing::warn!(orphans, "participants reference events that no longer exist");
        }

        if corrected > 0 {
            self.commit(&snapshot, &next).await?;
        }
        drop(guard);

        Ok(corrected)
    }

    async fn load_snapshot(&self) -> Result<CatalogSnapshot, StorageError> {
        let (events, participants) =
            tokio::try_join!(self.store.load_events(), self.store.load_participants())?;
        Ok(CatalogSnapshot {
            events,
            participants,
        })
    }

    /// Persists the collections that differ between `prev` and `next`.
    ///
    /// Both writes are issued concurrently. If exactly one fails, the one
    /// that succeeded is rewritten from `prev` so the catalog stays
    /// consistent, and the failure is returned.
    async fn commit(&self, prev: &CatalogSnapshot, next: &CatalogSnapshot) -> Result<(), AppError> {
        let events_changed = prev.events != next.events;
        let participants_changed = prev.participants != next.participants;

        let save_events = async {
            if events_changed {
                self.store.save_events(&next.events).await
            } else {
                Ok(())
            }
        };
        let save_participants = async {
            if participants_changed {
                self.store.save_participants(&next.participants).await
            } else {
                Ok(())
            }
        };

        match tokio::join!(save_events, save_participants) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(err), Ok(())) => {
                if participants_changed {
                    self.roll_back_participants(&prev.participants).await;
                }
                Err(err.into())
            }
            (Ok(()), Err(err)) => {
                if events_changed {
                    self.roll_back_events(&prev.events).await;
                }
                Err(err.into())
            }
            (Err(err), Err(other)) => {
                tracing::error!(error = %other, "participant write failed alongside event write");
                Err(err.into())
            }
        }
    }

    async fn roll_back_events(&self, previous: &[Event]) {
        match self.store.save_events(previous).await {
            Ok(()) => tracing::warn!("event collection rolled back after failed participant write"),
            Err(e) => tracing::error!(
                error = %e,
                "event rollback failed; counters will be reconciled at next startup"
            ),
        }
    }

    async fn roll_back_participants(&self, previous: &[Participant]) {
        match self.store.save_participants(previous).await {
            Ok(()) => tracing::warn!("participant collection rolled back after failed event write"),
            Err(e) => tracing::error!(
                error = %e,
                "participant rollback failed; counters will be reconciled at next startup"
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use std::time::Duration;

    use async_trait::async_trait;
    use tokio_test::assert_ok;

    use crate::domain::event::tests::new_event;
    use crate::domain::participant::tests::new_participant;
    use crate::persistence::MemoryStore;

    /// Memory store whose writes can be made to fail on demand.
    #[derive(Debug, Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_events: AtomicBool,
        fail_participants: AtomicBool,
    }

    fn injected() -> StorageError {
        StorageError::Write {
            path: "injected".into(),
            source: std::io::Error::other("disk full"),
        }
    }

    #[async_trait]
    impl CatalogStore for FlakyStore {
        async fn load_events(&self) -> Result<Vec<Event>, StorageError> {
            self.inner.load_events().await
        }

        async fn load_participants(&self) -> Result<Vec<Participant>, StorageError> {
            self.inner.load_participants().await
        }

        async fn save_events(&self, events: &[Event]) -> Result<(), StorageError> {
            if self.fail_events.load(Ordering::SeqCst) {
                return Err(injected());
            }
            self.inner.save_events(events).await
        }

        async fn save_participants(&self, participants: &[Participant]) -> Result<(), StorageError> {
            if self.fail_participants.load(Ordering::SeqCst) {
                return Err(injected());
            }
            self.inner.save_participants(participants).await
        }

        fn describe(&self) -> String {
            "flaky".to_string()
        }
    }

    /// Memory store whose participant writes take a while.
    #[derive(Debug, Default)]
    struct SlowStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl CatalogStore for SlowStore {
        async fn load_events(&self) -> Result<Vec<Event>, StorageError> {
            self.inner.load_events().await
        }

        async fn load_participants(&self) -> Result<Vec<Participant>, StorageError> {
            self.inner.load_participants().await
        }

        async fn save_events(&self, events: &[Event]) -> Result<(), StorageError> {
            self.inner.save_events(events).await
        }

        async fn save_participants(&self, participants: &[Participant]) -> Result<(), StorageError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            self.inner.save_participants(participants).await
        }

        fn describe(&self) -> String {
            "slow".to_string()
        }
    }

    fn make_service() -> RegistrationService {
        RegistrationService::new(Arc::new(MemoryStore::new()), EventBus::new(64))
    }

    async fn make_event(service: &RegistrationService, capacity: u32) -> Event {
        let Ok(event) = service.create_event(new_event(capacity)).await else {
            panic!("event creation failed");
        };
        event
    }

    async fn registered_count(service: &RegistrationService, id: &EventId) -> u32 {
        service
            .list_events()
            .await
            .into_iter()
            .find(|e| e.id == *id)
            .map_or(0, |e| e.registered)
    }

    #[tokio::test]
    async fn create_event_starts_at_zero() {
        let service = make_service();
        let event = make_event(&service, 10).await;
        assert_eq!(event.registered, 0);
        assert_eq!(service.list_events().await, vec![event]);
    }

    #[tokio::test]
    async fn create_event_rejects_blank_location() {
        let service = make_service();
        let mut input = new_event(10);
        input.location = String::new();
        let result = service.create_event(input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(service.list_events().await.is_empty());
    }

    #[tokio::test]
    async fn capacity_is_enforced() {
        let service = make_service();
        let event = make_event(&service, 2).await;

        assert_ok!(service.register_participant(new_participant(&event.id, "a@x.io")).await);
        assert_eq!(registered_count(&service, &event.id).await, 1);
        assert_ok!(service.register_participant(new_participant(&event.id, "b@x.io")).await);
        assert_eq!(registered_count(&service, &event.id).await, 2);

        let third = service
            .register_participant(new_participant(&event.id, "c@x.io"))
            .await;
        assert!(matches!(third, Err(AppError::CapacityExceeded(_))));
        assert_eq!(registered_count(&service, &event.id).await, 2);
        assert_eq!(service.list_participants(Some(&event.id)).await.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let service = make_service();
        let event = make_event(&service, 10).await;

        assert_ok!(service.register_participant(new_participant(&event.id, "a@x.io")).await);
        let second = service
            .register_participant(new_participant(&event.id, "A@X.io"))
            .await;

        assert!(matches!(second, Err(AppError::DuplicateRegistration { .. })));
        assert_eq!(service.list_participants(Some(&event.id)).await.len(), 1);
        assert_eq!(registered_count(&service, &event.id).await, 1);
    }

    #[tokio::test]
    async fn same_email_may_register_for_different_events() {
        let service = make_service();
        let first = make_event(&service, 10).await;
        let second = make_event(&service, 10).await;

        assert_ok!(service.register_participant(new_participant(&first.id, "a@x.io")).await);
        assert_ok!(service.register_participant(new_participant(&second.id, "a@x.io")).await);
        assert_eq!(service.list_participants(None).await.len(), 2);
    }

    #[tokio::test]
    async fn registration_for_unknown_event_fails() {
        let service = make_service();
        let result = service
            .register_participant(new_participant(&EventId::from("missing"), "a@x.io"))
            .await;
        assert!(matches!(result, Err(AppError::UnknownEvent(_))));
        assert!(service.list_participants(None).await.is_empty());
    }

    #[tokio::test]
    async fn delete_participant_frees_a_place() {
        let service = make_service();
        let event = make_event(&service, 1).await;
        let Ok(participant) = service
            .register_participant(new_participant(&event.id, "a@x.io"))
            .await
        else {
            panic!("registration failed");
        };

        assert_ok!(service.delete_participant(&participant.id).await);
        assert_eq!(registered_count(&service, &event.id).await, 0);
        assert_ok!(service.register_participant(new_participant(&event.id, "b@x.io")).await);
    }

    #[tokio::test]
    async fn delete_participant_clamps_at_zero() {
        let event = Event::create(new_event(5));
        let participant = Participant::create(new_participant(&event.id, "a@x.io"));
        let store = MemoryStore::seeded(vec![event.clone()], vec![participant.clone()]);
        let service = RegistrationService::new(Arc::new(store), EventBus::new(8));

        assert_ok!(service.delete_participant(&participant.id).await);
        assert_eq!(registered_count(&service, &event.id).await, 0);
    }

    #[tokio::test]
    async fn delete_unknown_participant_fails() {
        let service = make_service();
        let result = service
            .delete_participant(&ParticipantId::from("nobody"))
            .await;
        assert!(matches!(result, Err(AppError::ParticipantNotFound(_))));
    }

    #[tokio::test]
    async fn delete_event_cascades() {
        let service = make_service();
        let doomed = make_event(&service, 5).await;
        let kept = make_event(&service, 5).await;
        assert_ok!(service.register_participant(new_participant(&doomed.id, "a@x.io")).await);
        assert_ok!(service.register_participant(new_participant(&kept.id, "b@x.io")).await);

        let removed = service.delete_event(&doomed.id).await;
        assert!(matches!(removed, Ok(1)));

        assert!(service.list_participants(Some(&doomed.id)).await.is_empty());
        assert_eq!(service.list_participants(None).await.len(), 1);
        let ids: Vec<EventId> = service.list_events().await.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![kept.id]);
    }

    #[tokio::test]
    async fn delete_unknown_event_fails() {
        let service = make_service();
        let result = service.delete_event(&EventId::from("missing")).await;
        assert!(matches!(result, Err(AppError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let service = make_service();
        let event = make_event(&service, 5).await;
        let patch = EventPatch {
            location: Some("Main Hall".to_string()),
            capacity: Some(50),
            ..EventPatch::default()
        };

        let Ok(updated) = service.update_event(&event.id, patch).await else {
            panic!("update failed");
        };
        assert_eq!(updated.location, "Main Hall");
        assert_eq!(updated.capacity, 50);
        assert_eq!(updated.title, event.title);
        assert_eq!(service.list_events().await, vec![updated]);
    }

    #[tokio::test]
    async fn update_cannot_shrink_below_registered() {
        let service = make_service();
        let event = make_event(&service, 5).await;
        assert_ok!(service.register_participant(new_participant(&event.id, "a@x.io")).await);
        assert_ok!(service.register_participant(new_participant(&event.id, "b@x.io")).await);

        let patch = EventPatch {
            capacity: Some(1),
            ..EventPatch::default()
        };
        let result = service.update_event(&event.id, patch).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn update_unknown_event_fails() {
        let service = make_service();
        let result = service
            .update_event(&EventId::from("missing"), EventPatch::default())
            .await;
        assert!(matches!(result, Err(AppError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn failed_event_write_rolls_back_participants() {
        let store = Arc::new(FlakyStore::default());
        let service = RegistrationService::new(
            Arc::clone(&store) as Arc<dyn CatalogStore>,
            EventBus::new(8),
        );
        let event = make_event(&service, 5).await;

        store.fail_events.store(true, Ordering::SeqCst);
        let result = service
            .register_participant(new_participant(&event.id, "a@x.io"))
            .await;
        assert!(matches!(result, Err(AppError::Storage(_))));

        store.fail_events.store(false, Ordering::SeqCst);
        assert!(service.list_participants(None).await.is_empty());
        assert_eq!(registered_count(&service, &event.id).await, 0);
    }

    #[tokio::test]
    async fn failed_participant_write_rolls_back_events() {
        let store = Arc::new(FlakyStore::default());
        let service = RegistrationService::new(
            Arc::clone(&store) as Arc<dyn CatalogStore>,
            EventBus::new(8),
        );
        let event = make_event(&service, 5).await;
        assert_ok!(service.register_participant(new_participant(&event.id, "a@x.io")).await);

        store.fail_participants.store(true, Ordering::SeqCst);
        let result = service.delete_event(&event.id).await;
        assert!(matches!(result, Err(AppError::Storage(_))));

        store.fail_participants.store(false, Ordering::SeqCst);
        assert_eq!(service.list_events().await.len(), 1);
        assert_eq!(service.list_participants(Some(&event.id)).await.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_never_overbook() {
        let service = make_service();
        let event = make_event(&service, 5).await;

        let mut handles = Vec::new();
        for i in 0..20 {
            let service = service.clone();
            let event_id = event.id.clone();
            handles.push(tokio::spawn(async move {
                service
                    .register_participant(new_participant(&event_id, &format!("user{i}@x.io")))
                    .await
            }));
        }

        let mut accepted = 0;
        let mut full = 0;
        for handle in handles {
            match handle.await {
                Ok(Ok(_)) => accepted += 1,
                Ok(Err(AppError::CapacityExceeded(_))) => full += 1,
                other => panic!("unexpected outcome: {other:?}"),
            }
        }

        assert_eq!(accepted, 5);
        assert_eq!(full, 15);
        assert_eq!(registered_count(&service, &event.id).await, 5);
        assert_eq!(service.list_participants(Some(&event.id)).await.len(), 5);
    }

    #[tokio::test]
    async fn counter_stays_within_bounds_across_register_and_cancel() {
        let service = make_service();
        let event = make_event(&service, 3).await;
        let mut active: Vec<ParticipantId> = Vec::new();

        for round in 0..12 {
            if round % 3 == 2 {
                if let Some(id) = active.pop() {
                    assert_ok!(service.delete_participant(&id).await);
                }
            } else if let Ok(p) = service
                .register_participant(new_participant(&event.id, &format!("r{round}@x.io")))
                .await
            {
                active.push(p.id);
            }

            let registered = registered_count(&service, &event.id).await;
            assert!(registered <= 3);
            assert_eq!(registered as usize, active.len());
        }
    }

    #[tokio::test]
    async fn register_publishes_notification() {
        let service = make_service();
        let event = make_event(&service, 5).await;
        let mut rx = service.event_bus().subscribe();

        assert_ok!(service.register_participant(new_participant(&event.id, "a@x.io")).await);

        let Ok(notification) = rx.recv().await else {
            panic!("expected notification");
        };
        assert_eq!(notification.event_type_str(), "participant_registered");
        assert_eq!(notification.event_id(), &event.id);
    }

    #[tokio::test]
    async fn reconcile_repairs_drifted_counters() {
        let mut event = Event::create(new_event(5));
        event.registered = 4;
        let participant = Participant::create(new_participant(&event.id, "a@x.io"));
        let store = MemoryStore::seeded(vec![event.clone()], vec![participant]);
        let service = RegistrationService::new(Arc::new(store), EventBus::new(8));

        assert!(matches!(service.reconcile_counts().await, Ok(1)));
        assert_eq!(registered_count(&service, &event.id).await, 1);
        assert!(matches!(service.reconcile_counts().await, Ok(0)));
    }

    #[tokio::test]
    async fn abandoned_registration_still_writes_both_collections() {
        let store: Arc<dyn CatalogStore> = Arc::new(SlowStore::default());
        let service = RegistrationService::new(Arc::clone(&store), EventBus::new(8));
        let event = make_event(&service, 5).await;

        let attempt = tokio::time::timeout(
            Duration::from_millis(50),
            service.register_participant(new_participant(&event.id, "a@x.io")),
        )
        .await;
        assert!(attempt.is_err(), "registration should still be saving");

        // The writer lock is held until the detached commit finishes.
        drop(service.writer.lock().await);

        let Ok(participants) = store.load_participants().await else {
            panic!("participants should load");
        };
        let registered = registered_count(&service, &event.id).await;
        assert_eq!(participants.len(), 1);
        assert_eq!(usize::try_from(registered).unwrap_or_default(), participants.len());
    }

    #[tokio::test]
    async fn abandoned_cancellation_still_frees_the_place() {
        let store: Arc<dyn CatalogStore> = Arc::new(SlowStore::default());
        let service = RegistrationService::new(Arc::clone(&store), EventBus::new(8));
        let event = make_event(&service, 1).await;
        let Ok(participant) = service
            .register_participant(new_participant(&event.id, "a@x.io"))
            .await
        else {
            panic!("registration failed");
        };

        let attempt = tokio::time::timeout(
            Duration::from_millis(50),
            service.delete_participant(&participant.id),
        )
        .await;
        assert!(attempt.is_err(), "cancellation should still be saving");
        drop(service.writer.lock().await);

        assert_eq!(registered_count(&service, &event.id).await, 0);
        assert!(service.list_participants(Some(&event.id)).await.is_empty());
    }
}
