//! Outcome codes per event kind.
//!
//! Transports carry outcomes as lowercase strings. Parsing is the only
//! place an unrecognized code is detected, so the engine itself only ever
//! sees valid outcomes.

use serde::{Deserialize, Serialize};

use crate::error::RulesError;

macro_rules! outcome_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every outcome, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The outcome code as logged.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = RulesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok($name::$variant),)+
                    other => Err(RulesError::UnknownOutcome {
                        kind: $kind,
                        outcome: other.to_string(),
                    }),
                }
            }
        }
    };
}

outcome_enum!(
    /// Result of a shot (shooter against catcher).
    ShotOutcome, "shot" {
        First => "first",
        Second => "second",
        Third => "third",
        Home => "home",
        GrandSlam => "grandslam",
        Strike => "strike",
        Out => "out",
    }
);

outcome_enum!(
    /// Result of a steal attempt (offensive drinker against defensive drinker).
    StealOutcome, "steal" {
        Success => "success",
        Bonus => "bonus",
        Fail => "fail",
    }
);

outcome_enum!(
    /// Result of a bunt (offensive drinker against defensive drinker).
    BuntOutcome, "bunt" {
        Success => "success",
        Bonus => "bonus",
        Fail => "fail",
    }
);

/// Base credited by one knock unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnockBase {
    First,
    Second,
    Third,
}

impl KnockBase {
    /// Application order within one knock event.
    pub const ORDER: [KnockBase; 3] = [KnockBase::First, KnockBase::Second, KnockBase::Third];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            KnockBase::First => "first",
            KnockBase::Second => "second",
            KnockBase::Third => "third",
        }
    }
}

impl std::str::FromStr for KnockBase {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(KnockBase::First),
            "second" => Ok(KnockBase::Second),
            "third" => Ok(KnockBase::Third),
            other => Err(RulesError::UnknownBase(other.to_string())),
        }
    }
}

/// Most knock units one knock event may carry across all three bases.
///
/// Each unit is applied one at a time, so the cap bounds the work of a
/// single transition. Larger counts are rejected before anything runs.
pub const MAX_KNOCK_UNITS: u32 = 100;

/// Knock units per base for one knock event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KnockCounts {
    #[serde(default)]
    pub first: u32,
    #[serde(default)]
    pub second: u32,
    #[serde(default)]
    pub third: u32,
}

impl KnockCounts {
    #[must_use]
    pub const fn new(first: u32, second: u32, third: u32) -> Self {
        Self { first, second, third }
    }

    /// Units for one base.
    #[must_use]
    pub const fn get(self, base: KnockBase) -> u32 {
        match base {
            KnockBase::First => self.first,
            KnockBase::Second => self.second,
            KnockBase::Third => self.third,
        }
    }

    /// Add units for a base named by the transport.
    pub fn add(&mut self, base: &str, units: u32) -> Result<(), RulesError> {
        match base.parse::<KnockBase>()? {
            KnockBase::First => self.first = self.first.saturating_add(units),
            KnockBase::Second => self.second = self.second.saturating_add(units),
            KnockBase::Third => self.third = self.third.saturating_add(units),
        }
        Ok(())
    }

    /// Units across all bases, saturating at `u32::MAX`.
    #[must_use]
    pub const fn total(self) -> u32 {
        self.first.saturating_add(self.second).saturating_add(self.third)
    }

    /// Whether the event stays within `MAX_KNOCK_UNITS`.
    #[must_use]
    pub const fn within_limit(self) -> bool {
        self.total() <= MAX_KNOCK_UNITS
    }

    /// The metadata attached to the knock log record.
    #[must_use]
    pub fn to_metadata(self) -> serde_json::Value {
        serde_json::json!({
            "first": self.first,
            "second": self.second,
            "third": self.third,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shot_outcome_parse() {
        assert_eq!("grandslam".parse::<ShotOutcome>(), Ok(ShotOutcome::GrandSlam));
        assert_eq!("out".parse::<ShotOutcome>(), Ok(ShotOutcome::Out));
        for outcome in ShotOutcome::ALL {
            assert_eq!(outcome.as_str().parse::<ShotOutcome>(), Ok(*outcome));
        }
    }

    #[test]
    fn test_unknown_outcome_names_kind() {
        let err = "Home".parse::<ShotOutcome>().unwrap_err();
        assert_eq!(
            err,
            RulesError::UnknownOutcome { kind: "shot", outcome: "Home".to_string() }
        );

        let err = "bonus!".parse::<BuntOutcome>().unwrap_err();
        assert!(matches!(err, RulesError::UnknownOutcome { kind: "bunt", .. }));
    }

    #[test]
    fn test_steal_outcome_serde() {
        let json = serde_json::to_string(&StealOutcome::Bonus).unwrap();
        assert_eq!(json, "\"bonus\"");
    }

    #[test]
    fn test_knock_base_parse() {
        assert_eq!("third".parse::<KnockBase>(), Ok(KnockBase::Third));
        assert_eq!(
            "home".parse::<KnockBase>(),
            Err(RulesError::UnknownBase("home".to_string()))
        );
    }

    #[test]
    fn test_knock_counts() {
        let mut counts = KnockCounts::default();
        counts.add("first", 2).unwrap();
        counts.add("third", 1).unwrap();
        assert!(counts.add("fourth", 1).is_err());

        assert_eq!(counts, KnockCounts::new(2, 0, 1));
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.get(KnockBase::First), 2);
        assert_eq!(counts.to_metadata(), serde_json::json!({"first": 2, "second": 0, "third": 1}));
    }

    #[test]
    fn test_knock_limit() {
        assert!(KnockCounts::new(MAX_KNOCK_UNITS, 0, 0).within_limit());
        assert!(!KnockCounts::new(MAX_KNOCK_UNITS, 1, 0).within_limit());

        let mut huge = KnockCounts::new(u32::MAX, u32::MAX, 0);
        huge.add("first", 1).unwrap();
        assert_eq!(huge.first, u32::MAX);
        assert_eq!(huge.total(), u32::MAX);
        assert!(!huge.within_limit());
    }

    #[test]
    fn test_knock_counts_missing_fields_default() {
        let counts: KnockCounts = serde_json::from_str(r#"{"second": 4}"#).unwrap();
        assert_eq!(counts, KnockCounts::new(0, 4, 0));
    }
}
