//! Route generation tags.
//!
//! Every event that can reach a guidance session carries the generation of
//! the route it was produced for.  The session compares it against its own
//! and drops anything that does not match, which is how late route results
//! and commands for a superseded route are kept from mutating state.

use std::fmt;

/// Identifies one engine run and one route revision within it.
///
/// Ordering is lexicographic: every revision of run `n` is older than any
/// revision of run `n + 1`.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default,
    serde::Serialize, serde::Deserialize,
)]
pub struct RouteGeneration {
    /// Bumped on every start and stop.
    pub run: u32,
    /// Bumped on every recalculation inside a run; reset to 0 on a new run.
    pub revision: u32,
}

impl RouteGeneration {
    /// The generation of a session that has never started.
    pub const INITIAL: RouteGeneration = RouteGeneration { run: 0, revision: 0 };

    /// First revision of the next run.
    #[inline]
    pub fn next_run(self) -> RouteGeneration {
        RouteGeneration { run: self.run.wrapping_add(1), revision: 0 }
    }

    /// Next revision of the same run.
    #[inline]
    pub fn next_revision(self) -> RouteGeneration {
        RouteGeneration { run: self.run, revision: self.revision.wrapping_add(1) }
    }

    /// `true` if `other` belongs to the same engine run.
    #[inline]
    pub fn same_run(self, other: RouteGeneration) -> bool {
        self.run == other.run
    }
}

impl fmt::Display for RouteGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}.{}", self.run, self.revision)
    }
}
