pub mod appid;
mod completion;
mod credentials;
mod dlc_cache;
mod library_cache;

pub use completion::{CompletionEntry, CompletionLog, NewCompletion};
pub use credentials::Credentials;
pub use dlc_cache::{DlcCache, DlcEntry};
pub use library_cache::{sort_by_name, LibraryCache, OwnedGame};
