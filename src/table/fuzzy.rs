//! Fuzzy match scorer
//!
//! Decides whether a cell value matches a query and ranks how well it does.
//! Tiers, best first:
//!
//! | Tier | Meaning |
//! |---|---|
//! | `CaseSensitiveEqual` | value == query |
//! | `Equal` | equal ignoring case |
//! | `StartsWith` | value starts with query |
//! | `WordStartsWith` | a word inside value starts with query |
//! | `Contains` | query is a substring of value |
//! | `Acronym` | query is contained in the value's acronym |
//! | `Matches` | query characters appear in order (subsequence) |
//! | `NoMatch` | none of the above |
//!
//! Within `Matches`, tighter subsequences rank higher.

use std::cmp::Ordering;

use crate::core::field::CellValue;

/// Match tier, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RankTier {
    NoMatch = 0,
    Matches = 1,
    Acronym = 2,
    Contains = 3,
    WordStartsWith = 4,
    StartsWith = 5,
    Equal = 6,
    CaseSensitiveEqual = 7,
}

/// Totally ordered relevance score; greater is better
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rank {
    pub tier: RankTier,
    /// In `[0, 1)`; only non-zero for `Matches`
    pub closeness: f64,
}

impl Rank {
    const fn tier(tier: RankTier) -> Self {
        Self {
            tier,
            closeness: 0.0,
        }
    }

    pub const NO_MATCH: Rank = Rank::tier(RankTier::NoMatch);

    /// Single number view of the rank, e.g. `1.25` for a loose subsequence
    pub fn score(&self) -> f64 {
        self.tier as u8 as f64 + self.closeness
    }
}

impl Eq for Rank {}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tier
            .cmp(&other.tier)
            .then_with(|| self.closeness.total_cmp(&other.closeness))
    }
}

/// Outcome of matching one value against one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub passed: bool,
    pub rank: Rank,
}

/// Match a cell value against a query
///
/// An empty query always passes.
pub fn match_value(value: &CellValue, query: &str) -> MatchResult {
    match_str(&value.to_string(), query)
}

/// Match a string against a query
pub fn match_str(value: &str, query: &str) -> MatchResult {
    let rank = rank(value, query);
    MatchResult {
        passed: query.is_empty() || rank.tier >= RankTier::Matches,
        rank,
    }
}

fn rank(value: &str, query: &str) -> Rank {
    if query.is_empty() {
        return if value.is_empty() {
            Rank::tier(RankTier::CaseSensitiveEqual)
        } else {
            Rank::tier(RankTier::StartsWith)
        };
    }

    if query.chars().count() > value.chars().count() {
        return Rank::NO_MATCH;
    }
    if value == query {
        return Rank::tier(RankTier::CaseSensitiveEqual);
    }

    let value = value.to_lowercase();
    let query = query.to_lowercase();

    if value == query {
        return Rank::tier(RankTier::Equal);
    }
    if value.starts_with(&query) {
        return Rank::tier(RankTier::StartsWith);
    }
    if value.contains(&format!(" {}", query)) {
        return Rank::tier(RankTier::WordStartsWith);
    }
    if value.contains(&query) {
        return Rank::tier(RankTier::Contains);
    }
    if query.chars().count() == 1 {
        return Rank::NO_MATCH;
    }
    if acronym(&value).contains(&query) {
        return Rank::tier(RankTier::Acronym);
    }

    closeness(&value, &query)
}

/// First letter of every word, words split on spaces and hyphens
fn acronym(value: &str) -> String {
    value
        .split(' ')
        .flat_map(|word| word.split('-'))
        .filter_map(|part| part.chars().next())
        .collect()
}

/// Subsequence ranking: rewards queries whose characters sit close together
fn closeness(value: &str, query: &str) -> Rank {
    let haystack: Vec<char> = value.chars().collect();
    let needle: Vec<char> = query.chars().collect();

    let mut positions = Vec::with_capacity(needle.len());
    let mut from = 0;
    for c in &needle {
        match haystack[from..].iter().position(|h| h == c) {
            Some(offset) => {
                positions.push(from + offset);
                from += offset + 1;
            }
            None => return Rank::NO_MATCH,
        }
    }

    let (first, last) = match (positions.first(), positions.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Rank::NO_MATCH,
    };

    let spread = (last - first).max(1) as f64;
    let in_order = positions.len() as f64 / needle.len() as f64;

    Rank {
        tier: RankTier::Matches,
        // Strictly below 1 so a subsequence never reaches the Acronym tier
        closeness: (in_order / spread).min(0.999),
    }
}
