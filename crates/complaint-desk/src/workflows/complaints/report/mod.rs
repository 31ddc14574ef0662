mod summary;
pub mod views;

pub use summary::{ComplaintReport, WeekdayBucket, RECENT_LIMIT, WEEK_ORDER};
