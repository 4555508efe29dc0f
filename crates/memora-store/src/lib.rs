//! Storage contracts consumed by the Memora engines.
//!
//! Persistence itself is an external concern: this crate defines the
//! repository traits the engines depend on, plus in-memory implementations
//! used by tests and the standalone binary.

pub mod calendar;
pub mod error;
pub mod profile;
pub mod session;

pub use calendar::{CalendarRepository, MemoryCalendarRepository};
pub use error::StoreError;
pub use profile::{MemoryUserRepository, UserRepository};
pub use session::{MemorySessionStore, SessionStore};
