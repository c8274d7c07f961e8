pub mod cache;
pub mod clock;

pub use cache::{CacheEntry, SummaryCache};
pub use clock::{Clock, ManualClock, SystemClock};
