mod steam_events;
mod store_events;
mod sync_events;

pub use steam_events::*;
pub use store_events::*;
pub use sync_events::*;
