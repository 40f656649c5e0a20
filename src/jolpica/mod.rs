pub mod cache;
pub mod client;
pub mod colors;
pub mod results;
pub mod schedule;
pub mod types;

pub use cache::CacheConfig;
pub use client::create_client;
pub use results::session_results;
pub use schedule::{completed_rounds, season_schedule, RoundSchedule};
pub use types::FetchError;
