//! F1P5: the Formula 1.5 championship.
//!
//! Re-ranks Formula 1 race and sprint results with the front-running teams
//! excluded, re-applies the points tables to the recomputed order, and
//! aggregates per-driver and per-team season standings with countback
//! tiebreaks.

pub mod config;
pub mod fetch;
pub mod jolpica;
pub mod output;
pub mod runlog;
pub mod standings;
