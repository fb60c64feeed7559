//! Channel privilege ranks derived from server-reported mode symbols.
//!
//! Servers report a participant's channel privileges as an ordered string
//! of mode symbols (highest authority first). Custom modes keep appearing
//! in the wild, so instead of hard-coded booleans per mode the engine maps
//! the symbols it knows onto a bitmask and lets callers ask for the
//! highest bit. Symbols the engine does not recognize are ignored.

use std::fmt;

/// A single privilege level, ordered lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    None,
    Voiced,
    HalfOperator,
    Operator,
    SuperOperator,
    Owner,
    /// Set when the InspIRCd-style operator-announcement modes (+y and +Y)
    /// are both present. Independent of the network-level operator flag.
    OperatorByMode,
}

impl Rank {
    /// The bit this rank occupies inside a [`RankSet`].
    pub const fn bit(self) -> u16 {
        match self {
            Rank::None => 1 << 0,
            Rank::OperatorByMode => 1 << 1,
            Rank::Owner => 1 << 2,
            Rank::SuperOperator => 1 << 3,
            Rank::Operator => 1 << 4,
            Rank::HalfOperator => 1 << 5,
            Rank::Voiced => 1 << 6,
        }
    }

    /// The display symbol drawn next to a participant holding this rank.
    pub const fn mark(self) -> Option<char> {
        match self {
            Rank::None => None,
            Rank::Voiced => Some('+'),
            Rank::HalfOperator => Some('%'),
            Rank::Operator => Some('@'),
            Rank::SuperOperator => Some('&'),
            Rank::Owner => Some('~'),
            Rank::OperatorByMode => Some('!'),
        }
    }
}

/// Priority table mapping mode symbols to ranks, highest authority first.
const MODE_RANKS: [(char, Rank); 5] = [
    ('q', Rank::Owner),
    ('a', Rank::SuperOperator),
    ('o', Rank::Operator),
    ('h', Rank::HalfOperator),
    ('v', Rank::Voiced),
];

/// All privileges a participant holds, as independent bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankSet(u16);

impl RankSet {
    pub const EMPTY: RankSet = RankSet(0);

    pub fn insert(&mut self, rank: Rank) {
        self.0 |= rank.bit();
    }

    pub fn contains(&self, rank: Rank) -> bool {
        self.0 & rank.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    /// The highest privilege present, or [`Rank::None`] if empty.
    pub fn highest(&self) -> Rank {
        [
            Rank::OperatorByMode,
            Rank::Owner,
            Rank::SuperOperator,
            Rank::Operator,
            Rank::HalfOperator,
            Rank::Voiced,
        ]
        .into_iter()
        .find(|r| self.contains(*r))
        .unwrap_or(Rank::None)
    }
}

impl fmt::Display for RankSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#09b}", self.0)
    }
}

/// Everything derived from one mode string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankDerivation {
    /// Highest privilege held.
    pub rank: Rank,
    /// Full set of privileges held.
    pub ranks: RankSet,
    /// Display symbol for `rank`, if any.
    pub mark: Option<char>,
}

/// Derive rank information from an ordered mode-symbol sequence.
///
/// Pure and total: unknown symbols are skipped and an empty sequence
/// yields [`Rank::None`]. `is_operator` is the network-level operator
/// flag; it is part of the contract for callers that carry it alongside
/// channel modes, but it grants no channel bit — operator-by-mode comes
/// solely from `y` + `Y` being present together.
pub fn compute(modes: &[char], is_operator: bool) -> RankDerivation {
    let _ = is_operator;

    let mut ranks = RankSet::EMPTY;
    for &symbol in modes {
        if let Some(&(_, rank)) = MODE_RANKS.iter().find(|(m, _)| *m == symbol) {
            ranks.insert(rank);
        }
    }

    if modes.contains(&'y') && modes.contains(&'Y') {
        ranks.insert(Rank::OperatorByMode);
    }

    let rank = ranks.highest();
    RankDerivation {
        rank,
        ranks,
        mark: rank.mark(),
    }
}
