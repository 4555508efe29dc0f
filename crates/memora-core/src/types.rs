use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// UserProfile
// =============================================================================

/// Durable facts known about a user.
///
/// Every field except `id` is optional: the profile starts empty and is
/// filled in over time by the fact extraction pipeline. Field values are
/// stored as free text exactly as extracted (last write wins per field).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable user identifier supplied by the transport layer.
    pub id: String,
    pub name: Option<String>,
    pub age: Option<String>,
    pub location: Option<String>,
    pub hobbies: Option<String>,
    pub family: Option<String>,
    pub medications: Option<String>,
    /// Updated whenever any profile field is written.
    pub last_interaction_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Create an empty profile for the given user.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set a profile field by its extraction key.
    ///
    /// Returns `true` if the key is a known field and the value was written.
    /// Unknown keys are ignored and return `false`.
    pub fn set_field(&mut self, key: &str, value: String) -> bool {
        match key {
            "name" => self.name = Some(value),
            "age" => self.age = Some(value),
            "location" => self.location = Some(value),
            "hobbies" => self.hobbies = Some(value),
            "family" => self.family = Some(value),
            "medications" => self.medications = Some(value),
            _ => return false,
        }
        true
    }

    /// The fixed set of extraction keys recognized by [`set_field`].
    ///
    /// [`set_field`]: UserProfile::set_field
    pub fn field_names() -> &'static [&'static str] {
        &["name", "age", "location", "hobbies", "family", "medications"]
    }
}

// =============================================================================
// CalendarEvent
// =============================================================================

/// A stored calendar event.
///
/// Consumed read-only by the fuzzy resolver and read/write by the calendar
/// capability handlers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
    pub category: Option<String>,
}

impl CalendarEvent {
    /// Create a new event with a fresh id and empty optional fields.
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            name: name.into(),
            description: description.into(),
            date,
            start: None,
            end: None,
            category: None,
        }
    }
}
