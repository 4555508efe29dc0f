//! Calendar event repository contract and in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use memora_core::CalendarEvent;

use crate::error::StoreError;

/// Read/write contract for calendar events.
#[async_trait]
pub trait CalendarRepository: Send + Sync {
    /// All events belonging to a user, ordered by date then start time.
    async fn get_by_user_id(&self, user_id: &str) -> Result<Vec<CalendarEvent>, StoreError>;

    /// Fetch a single event by id.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<CalendarEvent>, StoreError>;

    /// Store a new event.
    async fn create(&self, event: CalendarEvent) -> Result<(), StoreError>;

    /// Replace an existing event. Fails if the event does not exist.
    async fn update(&self, event: CalendarEvent) -> Result<(), StoreError>;

    /// Delete an event by id. Fails if the event does not exist.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// In-memory [`CalendarRepository`].
#[derive(Default)]
pub struct MemoryCalendarRepository {
    events: Mutex<HashMap<Uuid, CalendarEvent>>,
}

impl MemoryCalendarRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CalendarRepository for MemoryCalendarRepository {
    async fn get_by_user_id(&self, user_id: &str) -> Result<Vec<CalendarEvent>, StoreError> {
        let events = self
            .events
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let mut result: Vec<CalendarEvent> = events
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.date.cmp(&b.date).then(a.start.cmp(&b.start)));
        Ok(result)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<CalendarEvent>, StoreError> {
        let events = self
            .events
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(events.get(&id).cloned())
    }

    async fn create(&self, event: CalendarEvent) -> Result<(), StoreError> {
        let mut events = self
            .events
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        events.insert(event.id, event);
        Ok(())
    }

    async fn update(&self, event: CalendarEvent) -> Result<(), StoreError> {
        let mut events = self
            .events
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        if !events.contains_key(&event.id) {
            return Err(StoreError::EventNotFound(event.id));
        }
        events.insert(event.id, event);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut events = self
            .events
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        events
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::EventNotFound(id))
    }
}
