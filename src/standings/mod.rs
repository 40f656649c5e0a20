pub mod aggregate;
pub mod countback;
pub mod points;
pub mod rerank;
pub mod sort;
pub mod types;

pub use aggregate::build_season;
pub use countback::count_for;
pub use points::PointsTable;
pub use rerank::{rank_session, MalformedSession};
pub use sort::TableRank;
pub use types::{
    DriverStanding, P5Result, RankedRow, RankedSession, SeasonStandings, SessionResult,
    SessionType, TeamStanding,
};
