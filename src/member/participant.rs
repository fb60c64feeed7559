//! Channel participant entity.
//!
//! A participant aggregates identity, the server-reported mode symbols,
//! the privilege rank derived from them, and decaying activity weights.
//! Rank is never stored: it is recomputed from the mode sequence on every
//! query so the two can never drift apart.

use std::cmp::Ordering;

use chrono::{DateTime, TimeDelta, Utc};
use smallvec::SmallVec;

use crate::casemap;
use crate::config::Tuning;
use crate::member::activity::ActivityTracker;
use crate::member::rank::{self, Rank, RankDerivation, RankSet};

/// A participant in a channel context.
#[derive(Debug, Clone)]
pub struct Participant {
    pub nickname: String,
    pub username: String,
    pub address: String,
    pub realname: String,
    /// Mode symbols as reported by the server, highest authority first.
    modes: SmallVec<[char; 4]>,
    /// Network-level operator status, independent of channel modes.
    pub is_operator: bool,
    pub is_away: bool,
    activity: ActivityTracker,
    away_notice_interval: TimeDelta,
    last_away_notice: Option<DateTime<Utc>>,
}

impl Participant {
    pub fn new(nickname: impl Into<String>, tuning: &Tuning) -> Self {
        Self {
            nickname: nickname.into(),
            username: String::new(),
            address: String::new(),
            realname: String::new(),
            modes: SmallVec::new(),
            is_operator: false,
            is_away: false,
            activity: ActivityTracker::new(tuning.decay_factor),
            away_notice_interval: TimeDelta::seconds(tuning.away_notice_interval_secs),
            last_away_notice: None,
        }
    }

    // ------------------------------------------------------------------
    // Modes and rank
    // ------------------------------------------------------------------

    /// Replace the mode symbols. The caller supplies them in the order
    /// the server reported, highest authority first.
    pub fn set_modes(&mut self, modes: impl IntoIterator<Item = char>) {
        self.modes = modes.into_iter().collect();
    }

    pub fn modes(&self) -> &[char] {
        &self.modes
    }

    fn derive(&self) -> RankDerivation {
        rank::compute(&self.modes, self.is_operator)
    }

    /// Highest privilege held.
    pub fn rank(&self) -> Rank {
        self.derive().rank
    }

    /// Full privilege bitmask.
    pub fn ranks(&self) -> RankSet {
        self.derive().ranks
    }

    /// Display symbol for the highest privilege, if any.
    pub fn mark(&self) -> Option<char> {
        self.derive().mark
    }

    /// Operator or better (owner, super-operator, operator).
    pub fn has_op_or_higher(&self) -> bool {
        self.rank() >= Rank::Operator
    }

    /// Half-operator or better.
    pub fn has_halfop_or_higher(&self) -> bool {
        self.rank() >= Rank::HalfOperator
    }

    // ------------------------------------------------------------------
    // Identity strings
    // ------------------------------------------------------------------

    pub fn folded_nickname(&self) -> String {
        casemap::fold(&self.nickname)
    }

    /// Full `nick!user@address` mask with `*` placeholders for unknown
    /// parts.
    pub fn hostmask(&self) -> String {
        let user = if self.username.is_empty() {
            "*"
        } else {
            self.username.as_str()
        };
        let addr = if self.address.is_empty() {
            "*"
        } else {
            self.address.as_str()
        };
        format!("{}!{}@{}", self.nickname, user, addr)
    }

    /// Mask suitable for a ban against this participant. Falls back to a
    /// nickname mask when the address is not yet known.
    pub fn ban_mask(&self) -> String {
        if self.address.is_empty() {
            format!("{}!*@*", self.nickname)
        } else {
            format!("*!*@{}", self.address)
        }
    }

    // ------------------------------------------------------------------
    // Activity
    // ------------------------------------------------------------------

    /// Record conversation received from this participant.
    pub fn record_incoming(&mut self, now: DateTime<Utc>) {
        self.activity.record_incoming(now);
    }

    /// Record conversation sent to this participant.
    pub fn record_outgoing(&mut self, now: DateTime<Utc>) {
        self.activity.record_outgoing(now);
    }

    /// Combined decayed activity weight, used for activity ordering.
    pub fn total_weight(&mut self, now: DateTime<Utc>) -> f64 {
        self.activity.total_weight(now)
    }

    /// Whether an away message (numeric 301) for this participant should
    /// be presented now. Acts as a rate-limit gate: true only when no
    /// notice was ever shown or the configured interval has elapsed since
    /// the previous presentation. Updates the gate when returning true.
    pub fn should_present_away_notice(&mut self, now: DateTime<Utc>) -> bool {
        let due = match self.last_away_notice {
            None => true,
            Some(last) => now - last >= self.away_notice_interval,
        };
        if due {
            self.last_away_notice = Some(now);
        }
        due
    }

    // ------------------------------------------------------------------
    // Migration and ordering
    // ------------------------------------------------------------------

    /// Adopt state from an existing participant that represents the same
    /// physical user under a different nickname.
    ///
    /// Copies address, realname, the operator and away flags, and the
    /// weight/decay state. Channel modes (and therefore rank) are not
    /// copied; privileges are context-specific and must be re-supplied
    /// by the caller.
    pub fn migrate(&mut self, from: &Participant) {
        self.username = from.username.clone();
        self.address = from.address.clone();
        self.realname = from.realname.clone();
        self.is_operator = from.is_operator;
        self.is_away = from.is_away;
        self.activity = from.activity.clone();
        self.last_away_notice = from.last_away_notice;
    }

    /// Total order for member lists: higher rank first, then folded
    /// nickname ascending.
    pub fn compare(&self, other: &Participant) -> Ordering {
        other
            .rank()
            .cmp(&self.rank())
            .then_with(|| casemap::cmp_fold(&self.nickname, &other.nickname))
    }

    /// Orders participants by nickname length, shortest first. Used for
    /// list sizing, independent of privilege ordering.
    pub fn nickname_length_cmp(a: &Participant, b: &Participant) -> Ordering {
        a.nickname
            .chars()
            .count()
            .cmp(&b.nickname.chars().count())
            .then_with(|| casemap::cmp_fold(&a.nickname, &b.nickname))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> Tuning {
        Tuning::default()
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn rank_is_recomputed_from_modes() {
        let mut p = Participant::new("alice", &tuning());
        assert_eq!(p.rank(), Rank::None);

        p.set_modes(['o']);
        assert_eq!(p.rank(), Rank::Operator);
        assert_eq!(p.mark(), Some('@'));

        p.set_modes([]);
        assert_eq!(p.rank(), Rank::None);
        assert_eq!(p.mark(), None);
    }

    #[test]
    fn privilege_helpers_follow_rank_ladder() {
        let mut p = Participant::new("alice", &tuning());
        p.set_modes(['h']);
        assert!(p.has_halfop_or_higher());
        assert!(!p.has_op_or_higher());

        p.set_modes(['q']);
        assert!(p.has_op_or_higher());
    }

    #[test]
    fn hostmask_uses_placeholders_for_unknown_parts() {
        let mut p = Participant::new("alice", &tuning());
        assert_eq!(p.hostmask(), "alice!*@*");

        p.username = "ali".into();
        p.address = "host.example.net".into();
        assert_eq!(p.hostmask(), "alice!ali@host.example.net");
    }

    #[test]
    fn ban_mask_prefers_address() {
        let mut p = Participant::new("alice", &tuning());
        assert_eq!(p.ban_mask(), "alice!*@*");

        p.address = "host.example.net".into();
        assert_eq!(p.ban_mask(), "*!*@host.example.net");
    }

    #[test]
    fn migrate_copies_identity_and_weights_but_not_modes() {
        let mut old = Participant::new("alice", &tuning());
        old.username = "ali".into();
        old.address = "host.example.net".into();
        old.realname = "Alice".into();
        old.is_operator = true;
        old.is_away = true;
        old.set_modes(['o']);
        old.record_incoming(t0());

        let mut new = Participant::new("alice_", &tuning());
        new.migrate(&old);

        assert_eq!(new.address, "host.example.net");
        assert_eq!(new.realname, "Alice");
        assert!(new.is_operator);
        assert!(new.is_away);
        assert_eq!(new.total_weight(t0()), old.clone().total_weight(t0()));
        assert!(new.modes().is_empty());
        // The source keeps its own modes untouched.
        assert_eq!(old.modes(), &['o']);
    }

    #[test]
    fn compare_sorts_by_rank_then_nickname() {
        let mut owner = Participant::new("zoe", &tuning());
        owner.set_modes(['q']);
        let mut voiced = Participant::new("mike", &tuning());
        voiced.set_modes(['v']);
        let plain = Participant::new("Anna", &tuning());

        let mut members = vec![&plain, &owner, &voiced];
        members.sort_by(|a, b| a.compare(b));
        let order: Vec<&str> = members.iter().map(|p| p.nickname.as_str()).collect();
        assert_eq!(order, ["zoe", "mike", "Anna"]);
    }

    #[test]
    fn compare_is_antisymmetric() {
        let mut a = Participant::new("alice", &tuning());
        a.set_modes(['v']);
        let b = Participant::new("bob", &tuning());

        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(b.compare(&a), Ordering::Greater);
        assert_eq!(a.compare(&a), Ordering::Equal);
    }

    #[test]
    fn same_rank_orders_case_insensitively() {
        let a = Participant::new("Alice", &tuning());
        let b = Participant::new("bob", &tuning());
        assert_eq!(a.compare(&b), Ordering::Less);
    }

    #[test]
    fn compare_folds_bracket_family_in_tie_break() {
        let a = Participant::new("Nick[1]", &tuning());
        let b = Participant::new("nick{1}", &tuning());
        assert_eq!(a.compare(&b), Ordering::Equal);
    }

    #[test]
    fn nickname_length_comparator_ignores_privileges() {
        let mut long = Participant::new("bartholomew", &tuning());
        long.set_modes(['q']);
        let short = Participant::new("Zo", &tuning());

        assert_eq!(
            Participant::nickname_length_cmp(&short, &long),
            Ordering::Less
        );
    }

    #[test]
    fn away_notice_gate_rate_limits() {
        let mut p = Participant::new("alice", &tuning());
        assert!(p.should_present_away_notice(t0()));
        assert!(!p.should_present_away_notice(t0() + TimeDelta::seconds(10)));
        assert!(p.should_present_away_notice(t0() + TimeDelta::seconds(301)));
    }
}
