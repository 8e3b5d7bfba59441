//! Table-driven record insertion.
//!
//! Every insertable kind is described by a static [`schema::SchemaEntry`]:
//! the fields it requires, how raw input becomes a storable record, and the
//! parameterized statement that stores it. The [`Dispatcher`] runs
//! validation, transformation and the insert in that order for one request.

pub mod dispatcher;
pub mod error;
pub mod insert;
pub mod password;
pub mod schema;
pub mod transform;
pub mod validate;
pub mod value;

pub use dispatcher::{Dispatcher, InsertOutcome};
pub use error::{RecordError, ValidationError};
pub use schema::{NormalizedRecord, SchemaEntry};
