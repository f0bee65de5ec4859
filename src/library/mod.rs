mod manager;
pub mod queries;
pub mod store;
mod user;

pub use manager::{games_to_check, LibraryManager, RefreshSummary, SyncConfig};
pub use queries::LibraryQueries;
pub use user::{SetupOutcome, User};
