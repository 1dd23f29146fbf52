// Core algorithm exports
pub mod blossom;
pub mod filters;
pub mod forced;
pub mod matcher;
pub mod roster;
pub mod shuffle;

pub use filters::{is_eligible, different_teams, different_sites, met_before};
pub use forced::{parse_forced_pairs, reserved_names};
pub use matcher::{Matcher, PoolOutcome, greedy_pairs, maximum_pairs};
pub use roster::{RosterModel, RosterError};
pub use shuffle::{PoolOrder, SeededShuffle, IdentityOrder, FixedOrder};
