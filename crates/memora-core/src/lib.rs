pub mod config;
pub mod error;
pub mod types;

pub use config::MemoraConfig;
pub use error::{MemoraError, Result};
pub use types::*;
