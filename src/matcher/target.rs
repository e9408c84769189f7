//! Target set and matching policy.

use std::fmt;

/// Whether a target ends the search or is only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Ends the search when found
    Primary,
    /// Reported when found, never ends the search
    Bonus,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Primary => write!(f, "primary"),
            TargetKind::Bonus => write!(f, "bonus"),
        }
    }
}

/// The validated targets of one search. Immutable once built.
///
/// Targets are expected to be lowercase and drawn from the encoding
/// alphabet; see [`crate::Config::target_set`].
#[derive(Debug, Clone, Default)]
pub struct TargetSet {
    /// Terminating targets, in operator order
    primary: Vec<String>,
    /// Report-only targets
    bonus: Vec<String>,
    /// Also match at the end of the encoded key
    include_end: bool,
}

impl TargetSet {
    /// Creates a target set.
    pub fn new(primary: Vec<String>, bonus: Vec<String>, include_end: bool) -> Self {
        Self {
            primary,
            bonus,
            include_end,
        }
    }

    pub fn primary(&self) -> &[String] {
        &self.primary
    }

    pub fn bonus(&self) -> &[String] {
        &self.bonus
    }

    pub fn include_end(&self) -> bool {
        self.include_end
    }

    /// Checks a single target against an identifier.
    ///
    /// A target longer than the identifier never matches.
    #[inline]
    pub fn matches(&self, identifier: &str, target: &str) -> bool {
        identifier.starts_with(target) || (self.include_end && identifier.ends_with(target))
    }

    /// Returns the first primary target the identifier satisfies.
    #[inline]
    pub fn first_primary(&self, identifier: &str) -> Option<&str> {
        self.primary
            .iter()
            .map(String::as_str)
            .find(|target| self.matches(identifier, target))
    }

    /// Returns every bonus target the identifier satisfies.
    #[inline]
    pub fn bonus_hits<'a>(&'a self, identifier: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.bonus
            .iter()
            .map(String::as_str)
            .filter(move |target| self.matches(identifier, target))
    }

    /// Length of the longest primary target.
    pub fn longest_primary(&self) -> usize {
        self.primary.iter().map(String::len).max().unwrap_or(0)
    }

    /// Returns the expected number of attempts before the easiest primary
    /// target shows up.
    ///
    /// Each position has 32 possible characters, so a target of length n
    /// needs 32^n attempts on average (half that with trailing matches).
    pub fn estimated_difficulty(&self) -> u64 {
        let Some(shortest) = self.primary.iter().map(String::len).min() else {
            return 0;
        };
        let attempts = 32u64.saturating_pow(shortest as u32);
        if self.include_end {
            attempts / 2
        } else {
            attempts
        }
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        match self.estimated_difficulty() {
            0 => "None (no primary target)".into(),
            1..=1_000 => "Very Easy (< 1 second)".into(),
            1_001..=1_000_000 => "Easy (seconds)".into(),
            1_000_001..=100_000_000 => "Medium (minutes)".into(),
            100_000_001..=10_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(primary: &[&str], bonus: &[&str], include_end: bool) -> TargetSet {
        TargetSet::new(
            primary.iter().map(|s| s.to_string()).collect(),
            bonus.iter().map(|s| s.to_string()).collect(),
            include_end,
        )
    }

    #[test]
    fn test_prefix_match() {
        let set = targets(&["dead"], &[], false);
        assert_eq!(set.first_primary("deadq0x"), Some("dead"));
        assert_eq!(set.first_primary("q0xdead"), None);
    }

    #[test]
    fn test_suffix_only_when_enabled() {
        let set = targets(&["dead"], &[], true);
        assert_eq!(set.first_primary("q0xdead"), Some("dead"));
        assert_eq!(set.first_primary("q0deadx"), None);
    }

    #[test]
    fn test_target_longer_than_identifier() {
        let set = targets(&["abcdef"], &["abcdef"], true);
        assert_eq!(set.first_primary("abc"), None);
        assert_eq!(set.bonus_hits("def").count(), 0);
        assert_eq!(set.first_primary(""), None);
    }

    #[test]
    fn test_first_primary_in_operator_order() {
        let set = targets(&["xy", "x"], &[], false);
        assert_eq!(set.first_primary("xyz"), Some("xy"));

        let set = targets(&["x", "xy"], &[], false);
        assert_eq!(set.first_primary("xyz"), Some("x"));
    }

    #[test]
    fn test_multiple_bonus_hits() {
        let set = targets(&[], &["a", "ac", "z", "c"], true);
        let hits: Vec<&str> = set.bonus_hits("aczzc").collect();
        assert_eq!(hits, vec!["a", "ac", "c"]);
    }

    #[test]
    fn test_difficulty() {
        let set = targets(&["dead", "ab"], &[], false);
        assert_eq!(set.estimated_difficulty(), 1024); // 32^2
        assert_eq!(set.longest_primary(), 4);
        assert_eq!(targets(&[], &["a"], false).estimated_difficulty(), 0);
    }
}
