pub mod error;
pub mod item;
pub mod person;

pub use error::{CuentasError, ErrorCategory, Result};
pub use item::{LineItem, RawItem};
pub use person::Participant;
