mod category;
mod rating;
mod score;
mod time_range;

pub use category::RatingCategory;
pub use rating::RatingSample;
pub use score::{CategoryCount, CategoryDiff, PeriodScore, TicketScore};
pub use time_range::{DATE_FORMAT, Granularity, PeriodLabel, TimeRange, parse_date};
