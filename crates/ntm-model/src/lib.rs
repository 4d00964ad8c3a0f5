pub mod error;
pub mod mention;
pub mod methods;
pub mod record;

pub use error::{NtmError, Result};
pub use mention::MentionMap;
pub use methods::{RECOGNIZED_METHODS, is_recognized_method};
pub use record::{Record, columns};
