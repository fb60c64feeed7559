//! Channel membership: participants, privilege ranks, activity weights.

pub mod activity;
pub mod participant;
pub mod rank;
pub mod roster;

pub use activity::ActivityTracker;
pub use participant::Participant;
pub use rank::{Rank, RankDerivation, RankSet};
pub use roster::Roster;
