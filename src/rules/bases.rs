//! Base advancement.
//!
//! Each ball-in-play or base-running result maps the current occupancy
//! vector to the next one plus a number of runs. The function is pure: the
//! engine computes the whole next vector first and assigns it in one step,
//! so no intermediate occupancy is ever observable.
//!
//! | advance       | next (1st, 2nd, 3rd)       | runs                 |
//! |---------------|----------------------------|----------------------|
//! | `Single`      | (true, 1st, 2nd)           | 3rd                  |
//! | `Double`      | (false, true, 1st)         | 2nd + 3rd            |
//! | `Triple`      | (false, false, true)       | 1st + 2nd + 3rd      |
//! | `HomeRun`     | empty                      | 1 + 1st + 2nd + 3rd  |
//! | `GrandSlam`   | empty                      | 4                    |
//! | `Steal`       | (false, 1st, 2nd)          | 3rd                  |
//! | `StealBonus`  | (false, false, 1st)        | 2nd + 3rd            |
//! | `Clear`       | empty                      | 0                    |

use crate::core::Bases;

/// Runs scored by a grand slam regardless of who is on.
pub const GRAND_SLAM_RUNS: u32 = 4;

/// How runners move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Advance {
    /// Batter to first, forced runners move up one.
    Single,
    /// Batter to second.
    Double,
    /// Batter to third, everyone on scores.
    Triple,
    /// Batter and everyone on score.
    HomeRun,
    /// Flat four runs, bases cleared.
    GrandSlam,
    /// Every runner moves up one, no batter.
    Steal,
    /// Every runner moves up two, no batter.
    StealBonus,
    /// Runners are erased.
    Clear,
}

/// Result of an advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvanceResult {
    pub bases: Bases,
    pub runs: u32,
}

impl Bases {
    /// Compute the occupancy and runs produced by `advance`.
    ///
    /// ```
    /// use beer_baseball::core::Bases;
    /// use beer_baseball::rules::Advance;
    ///
    /// let loaded = Bases::new(true, true, true);
    /// let result = loaded.advance(Advance::Single);
    ///
    /// assert_eq!(result.bases, Bases::new(true, true, true));
    /// assert_eq!(result.runs, 1);
    /// ```
    #[must_use]
    pub fn advance(self, advance: Advance) -> AdvanceResult {
        let runs_from = |bases: &[bool]| bases.iter().filter(|&&on| on).count() as u32;

        let (bases, runs) = match advance {
            Advance::Single => (
                Bases::new(true, self.first, self.second),
                runs_from(&[self.third]),
            ),
            Advance::Double => (
                Bases::new(false, true, self.first),
                runs_from(&[self.second, self.third]),
            ),
            Advance::Triple => (
                Bases::new(false, false, true),
                runs_from(&[self.first, self.second, self.third]),
            ),
            Advance::HomeRun => (
                Bases::EMPTY,
                1 + runs_from(&[self.first, self.second, self.third]),
            ),
            Advance::GrandSlam => (Bases::EMPTY, GRAND_SLAM_RUNS),
            Advance::Steal => (
                Bases::new(false, self.first, self.second),
                runs_from(&[self.third]),
            ),
            Advance::StealBonus => (
                Bases::new(false, false, self.first),
                runs_from(&[self.second, self.third]),
            ),
            Advance::Clear => (Bases::EMPTY, 0),
        };

        AdvanceResult { bases, runs }
    }
}
