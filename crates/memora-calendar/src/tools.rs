//! Tool handlers for calendar operations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};
use tracing::debug;

use memora_core::CalendarEvent;
use memora_llm::{ToolDefinition, ToolError, ToolHandler, ToolRegistry};
use memora_match::{find_best_with_threshold, rank, MatchOutcome};
use memora_store::CalendarRepository;

/// Maximum results returned by `search_events`.
const SEARCH_LIMIT: usize = 5;

/// Build the full calendar tool registry around one repository.
pub fn calendar_registry(repo: Arc<dyn CalendarRepository>, threshold: f64) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(CreateEventTool { repo: repo.clone() }));
    registry.register(Arc::new(GetEventsTool { repo: repo.clone() }));
    registry.register(Arc::new(SearchEventsTool { repo: repo.clone() }));
    registry.register(Arc::new(FindBestMatchingEventTool {
        repo: repo.clone(),
        threshold,
    }));
    registry.register(Arc::new(SmartUpdateEventTool {
        repo: repo.clone(),
        threshold,
    }));
    registry.register(Arc::new(SmartDeleteEventTool { repo, threshold }));
    registry
}

// =============================================================================
// Argument helpers
// =============================================================================

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ToolError::InvalidArguments(format!("missing '{}'", key)))
}

fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn parse_date(text: &str) -> Result<NaiveDate, ToolError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| ToolError::InvalidArguments(format!("invalid date '{}', expected YYYY-MM-DD", text)))
}

fn parse_time(text: &str) -> Result<NaiveTime, ToolError> {
    NaiveTime::parse_from_str(text, "%H:%M")
        .map_err(|_| ToolError::InvalidArguments(format!("invalid time '{}', expected HH:MM", text)))
}

fn optional_date(args: &Value, key: &str) -> Result<Option<NaiveDate>, ToolError> {
    optional_str(args, key).map(parse_date).transpose()
}

fn store_err(e: memora_store::StoreError) -> ToolError {
    ToolError::Execution(e.to_string())
}

fn event_json(event: &CalendarEvent) -> Value {
    json!({
        "id": event.id,
        "name": event.name,
        "description": event.description,
        "date": event.date.format("%Y-%m-%d").to_string(),
        "start": event.start.map(|t| t.format("%H:%M").to_string()),
        "end": event.end.map(|t| t.format("%H:%M").to_string()),
        "category": event.category,
    })
}

fn candidates_json(candidates: &[CalendarEvent]) -> Value {
    Value::Array(candidates.iter().map(event_json).collect())
}

/// Disambiguation payload when no candidate clears the threshold: the full
/// candidate list goes back so the user can be asked to choose explicitly.
fn ambiguous_json(candidates: &[CalendarEvent]) -> Value {
    json!({
        "status": "ambiguous",
        "message": "No clearly matching event was found. Ask the user which of these they meant.",
        "candidates": candidates_json(candidates),
    })
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

// =============================================================================
// create_event
// =============================================================================

/// Create a calendar event.
pub struct CreateEventTool {
    pub(crate) repo: Arc<dyn CalendarRepository>,
}

#[async_trait]
impl ToolHandler for CreateEventTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "create_event".to_string(),
            description: "Create a calendar event for the user".to_string(),
            parameters: object_schema(
                json!({
                    "name": {"type": "string"},
                    "description": {"type": "string"},
                    "date": {"type": "string", "description": "YYYY-MM-DD"},
                    "start": {"type": "string", "description": "HH:MM"},
                    "end": {"type": "string", "description": "HH:MM"},
                    "category": {"type": "string"},
                }),
                &["name", "date"],
            ),
        }
    }

    async fn call(&self, user_id: &str, args: Value) -> Result<Value, ToolError> {
        let name = required_str(&args, "name")?;
        let date = parse_date(required_str(&args, "date")?)?;

        let mut event = CalendarEvent::new(
            user_id,
            name,
            optional_str(&args, "description").unwrap_or_default(),
            date,
        );
        event.start = optional_str(&args, "start").map(parse_time).transpose()?;
        event.end = optional_str(&args, "end").map(parse_time).transpose()?;
        event.category = optional_str(&args, "category").map(str::to_string);

        self.repo.create(event.clone()).await.map_err(store_err)?;
        debug!(user_id, event = %event.name, "Event created");
        Ok(json!({"status": "created", "event": event_json(&event)}))
    }
}

// =============================================================================
// get_events
// =============================================================================

/// List the user's events, optionally for one date.
pub struct GetEventsTool {
    pub(crate) repo: Arc<dyn CalendarRepository>,
}

#[async_trait]
impl ToolHandler for GetEventsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_events".to_string(),
            description: "List the user's calendar events, optionally filtered to one date"
                .to_string(),
            parameters: object_schema(
                json!({"date": {"type": "string", "description": "YYYY-MM-DD"}}),
                &[],
            ),
        }
    }

    async fn call(&self, user_id: &str, args: Value) -> Result<Value, ToolError> {
        let date = optional_date(&args, "date")?;
        let events = self.repo.get_by_user_id(user_id).await.map_err(store_err)?;
        let filtered: Vec<&CalendarEvent> = events
            .iter()
            .filter(|e| date.map_or(true, |d| e.date == d))
            .collect();
        Ok(json!({
            "events": filtered.iter().map(|e| event_json(e)).collect::<Vec<_>>(),
        }))
    }
}

// =============================================================================
// search_events
// =============================================================================

/// Rank the user's events against a free-text query.
pub struct SearchEventsTool {
    pub(crate) repo: Arc<dyn CalendarRepository>,
}

#[async_trait]
impl ToolHandler for SearchEventsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search_events".to_string(),
            description: "Search the user's events by fuzzy name/description match".to_string(),
            parameters: object_schema(
                json!({
                    "query": {"type": "string"},
                    "date": {"type": "string", "description": "YYYY-MM-DD"},
                }),
                &["query"],
            ),
        }
    }

    async fn call(&self, user_id: &str, args: Value) -> Result<Value, ToolError> {
        let query = required_str(&args, "query")?;
        let date = optional_date(&args, "date")?;
        let events = self.repo.get_by_user_id(user_id).await.map_err(store_err)?;

        let results: Vec<Value> = rank(query, &events, date)
            .into_iter()
            .take(SEARCH_LIMIT)
            .map(|m| {
                json!({
                    "event": event_json(&m.event),
                    "score": m.total_score,
                })
            })
            .collect();
        Ok(json!({"results": results}))
    }
}

// =============================================================================
// find_best_matching_event
// =============================================================================

/// Resolve a fuzzy reference to a single event without acting on it.
pub struct FindBestMatchingEventTool {
    pub(crate) repo: Arc<dyn CalendarRepository>,
    pub(crate) threshold: f64,
}

#[async_trait]
impl ToolHandler for FindBestMatchingEventTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "find_best_matching_event".to_string(),
            description: "Resolve a fuzzy event reference to the single best match".to_string(),
            parameters: object_schema(
                json!({
                    "query": {"type": "string"},
                    "date": {"type": "string", "description": "YYYY-MM-DD"},
                }),
                &["query"],
            ),
        }
    }

    async fn call(&self, user_id: &str, args: Value) -> Result<Value, ToolError> {
        let query = required_str(&args, "query")?;
        let date = optional_date(&args, "date")?;
        let events = self.repo.get_by_user_id(user_id).await.map_err(store_err)?;

        match find_best_with_threshold(query, &events, date, self.threshold) {
            MatchOutcome::Confirmed(m) => Ok(json!({
                "status": "matched",
                "event": event_json(&m.event),
                "score": m.total_score,
            })),
            MatchOutcome::NoGoodMatch { candidates } => Ok(ambiguous_json(&candidates)),
        }
    }
}

// =============================================================================
// smart_update_event
// =============================================================================

/// Resolve a fuzzy reference and apply partial changes to the match.
pub struct SmartUpdateEventTool {
    pub(crate) repo: Arc<dyn CalendarRepository>,
    pub(crate) threshold: f64,
}

#[async_trait]
impl ToolHandler for SmartUpdateEventTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "smart_update_event".to_string(),
            description: "Find the event best matching a fuzzy reference and update it"
                .to_string(),
            parameters: object_schema(
                json!({
                    "query": {"type": "string"},
                    "date": {"type": "string", "description": "YYYY-MM-DD filter"},
                    "changes": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "description": {"type": "string"},
                            "date": {"type": "string"},
                            "start": {"type": "string"},
                            "end": {"type": "string"},
                            "category": {"type": "string"},
                        },
                    },
                }),
                &["query", "changes"],
            ),
        }
    }

    async fn call(&self, user_id: &str, args: Value) -> Result<Value, ToolError> {
        let query = required_str(&args, "query")?;
        let date = optional_date(&args, "date")?;
        let changes = args
            .get("changes")
            .and_then(Value::as_object)
            .ok_or_else(|| ToolError::InvalidArguments("missing 'changes' object".to_string()))?;

        let events = self.repo.get_by_user_id(user_id).await.map_err(store_err)?;
        let matched = match find_best_with_threshold(query, &events, date, self.threshold) {
            MatchOutcome::Confirmed(m) => m,
            MatchOutcome::NoGoodMatch { candidates } => return Ok(ambiguous_json(&candidates)),
        };

        let mut event = matched.event;
        if let Some(name) = changes.get("name").and_then(Value::as_str) {
            event.name = name.to_string();
        }
        if let Some(description) = changes.get("description").and_then(Value::as_str) {
            event.description = description.to_string();
        }
        if let Some(d) = changes.get("date").and_then(Value::as_str) {
            event.date = parse_date(d)?;
        }
        if let Some(t) = changes.get("start").and_then(Value::as_str) {
            event.start = Some(parse_time(t)?);
        }
        if let Some(t) = changes.get("end").and_then(Value::as_str) {
            event.end = Some(parse_time(t)?);
        }
        if let Some(category) = changes.get("category").and_then(Value::as_str) {
            event.category = Some(category.to_string());
        }

        self.repo.update(event.clone()).await.map_err(store_err)?;
        debug!(user_id, event = %event.name, "Event updated via fuzzy match");
        Ok(json!({
            "status": "updated",
            "score": matched.total_score,
            "event": event_json(&event),
        }))
    }
}

// =============================================================================
// smart_delete_event
// =============================================================================

/// Resolve a fuzzy reference and delete the match.
pub struct SmartDeleteEventTool {
    pub(crate) repo: Arc<dyn CalendarRepository>,
    pub(crate) threshold: f64,
}

#[async_trait]
impl ToolHandler for SmartDeleteEventTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "smart_delete_event".to_string(),
            description: "Find the event best matching a fuzzy reference and delete it"
                .to_string(),
            parameters: object_schema(
                json!({
                    "query": {"type": "string"},
                    "date": {"type": "string", "description": "YYYY-MM-DD filter"},
                }),
                &["query"],
            ),
        }
    }

    async fn call(&self, user_id: &str, args: Value) -> Result<Value, ToolError> {
        let query = required_str(&args, "query")?;
        let date = optional_date(&args, "date")?;
        let events = self.repo.get_by_user_id(user_id).await.map_err(store_err)?;

        let matched = match find_best_with_threshold(query, &events, date, self.threshold) {
            MatchOutcome::Confirmed(m) => m,
            MatchOutcome::NoGoodMatch { candidates } => return Ok(ambiguous_json(&candidates)),
        };

        self.repo.delete(matched.event.id).await.map_err(store_err)?;
        debug!(user_id, event = %matched.event.name, "Event deleted via fuzzy match");
        Ok(json!({
            "status": "deleted",
            "score": matched.total_score,
            "event": event_json(&matched.event),
        }))
    }
}
