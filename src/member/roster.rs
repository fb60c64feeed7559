//! Canonical participant bookkeeping for a channel context.
//!
//! Exactly one [`Participant`] exists per case-folded nickname. Entries
//! are created when a participant is first observed (join, names list, or
//! a privilege change), mutated on protocol events, and removed on
//! part/quit/kick or context teardown.

use std::collections::HashMap;

use tracing::debug;

use crate::casemap;
use crate::config::Tuning;
use crate::member::participant::Participant;

/// The set of participants sharing one channel context.
#[derive(Debug, Default)]
pub struct Roster {
    members: HashMap<String, Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the participant for `nickname`, creating it on first sight.
    pub fn observe(&mut self, nickname: &str, tuning: &Tuning) -> &mut Participant {
        let key = casemap::fold(nickname);
        self.members
            .entry(key)
            .or_insert_with(|| Participant::new(nickname, tuning))
    }

    pub fn get(&self, nickname: &str) -> Option<&Participant> {
        self.members.get(&casemap::fold(nickname))
    }

    pub fn get_mut(&mut self, nickname: &str) -> Option<&mut Participant> {
        self.members.get_mut(&casemap::fold(nickname))
    }

    pub fn contains(&self, nickname: &str) -> bool {
        self.members.contains_key(&casemap::fold(nickname))
    }

    /// Remove a participant (part, quit, or kick).
    pub fn remove(&mut self, nickname: &str) -> Option<Participant> {
        self.members.remove(&casemap::fold(nickname))
    }

    /// Migrate a participant to a new nickname.
    ///
    /// The old entry is discarded; its identity, weights, and away state
    /// carry over via [`Participant::migrate`]. Channel modes survive a
    /// nickname change within the same context, so the roster re-supplies
    /// them to the new entry itself. Returns false when `old` is unknown.
    pub fn rename(&mut self, old: &str, new: &str, tuning: &Tuning) -> bool {
        let Some(previous) = self.members.remove(&casemap::fold(old)) else {
            return false;
        };

        let mut renamed = Participant::new(new, tuning);
        renamed.migrate(&previous);
        renamed.set_modes(previous.modes().iter().copied());

        debug!(old, new, "participant renamed");
        self.members.insert(renamed.folded_nickname(), renamed);
        true
    }

    /// Members in privilege order: higher rank first, then nickname.
    pub fn sorted(&self) -> Vec<&Participant> {
        let mut members: Vec<&Participant> = self.members.values().collect();
        members.sort_by(|a, b| a.compare(b));
        members
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.members.values()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Context teardown.
    pub fn clear(&mut self) {
        self.members.clear();
    }
}
