//! Coffee Roulette - pairs roster members into one-to-one coffee chats
//!
//! Each run pairs people from different teams and sites who have not met
//! before, after honouring operator-mandated forced pairs. The pairing core
//! is a pure function of (roster, forced pairs, pool order); spreadsheet
//! import/export and the HTTP surface sit around it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, RosterModel, RosterError, parse_forced_pairs, is_eligible, PoolOrder, SeededShuffle};
pub use crate::models::{Person, ForcedPair, Assignment, AssignmentResult, MatchStrategy, RawRow, normalize_name};
