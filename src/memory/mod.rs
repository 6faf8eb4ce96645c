pub mod forget;
pub mod maintenance;
pub mod query;
pub mod stats;
pub mod store;
pub mod types;

pub use forget::ForgetReport;
pub use query::QueryMatch;
pub use store::Memory;
pub use types::{Priority, Truth, Value};
