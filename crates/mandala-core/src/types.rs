use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

pub const STEP_COUNT: u8 = 14;

/// One of the 14 ordinal steps of the guided wizard.
///
/// Steps map to intents as follows: 1 reflection, 2 notes review,
/// 3 center goal, 4-5 sub-goal batches, 6-13 action plans (sub-goal
/// index = step - 6), 14 summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Step(u8);

impl Step {
    pub const FIRST: Step = Step(1);
    pub const LAST: Step = Step(STEP_COUNT);

    pub fn new(n: u32) -> crate::error::Result<Self> {
        if n < 1 || n > STEP_COUNT as u32 {
            return Err(crate::error::MandalaError::InvalidStep(n));
        }
        Ok(Step(n as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Step> {
        (1..=STEP_COUNT).map(Step)
    }

    /// The step's successor, or `None` for step 14.
    pub fn next(self) -> Option<Step> {
        if self.0 < STEP_COUNT {
            Some(Step(self.0 + 1))
        } else {
            None
        }
    }

    pub fn prev(self) -> Option<Step> {
        if self.0 > 1 {
            Some(Step(self.0 - 1))
        } else {
            None
        }
    }

    /// Sub-goal index (0-7) owned by an action-plan step, if this is one.
    pub fn action_plan_index(self) -> Option<u8> {
        if (6..=13).contains(&self.0) {
            Some(self.0 - 6)
        } else {
            None
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Step {
    type Err = crate::error::MandalaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u32 = s
            .parse()
            .map_err(|_| crate::error::MandalaError::InvalidStep(0))?;
        Step::new(n)
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Account capability, resolved once per session. Reviewers bypass the
/// midnight gate and strict sequential locking; everything else behaves
/// identically for both roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Standard,
    Reviewer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Standard => "standard",
            Role::Reviewer => "reviewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::MandalaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Role::Standard),
            "reviewer" => Ok(Role::Reviewer),
            _ => Err(crate::error::MandalaError::InvalidRole(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ThemeKey
// ---------------------------------------------------------------------------

/// Reflection theme selected on step 1. Closed set; the question bank is
/// keyed by theme on the client side, the record only stores the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeKey {
    Career,
    Health,
    Relationships,
    Learning,
    Finance,
    Lifestyle,
}

impl ThemeKey {
    pub fn all() -> &'static [ThemeKey] {
        &[
            ThemeKey::Career,
            ThemeKey::Health,
            ThemeKey::Relationships,
            ThemeKey::Learning,
            ThemeKey::Finance,
            ThemeKey::Lifestyle,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeKey::Career => "career",
            ThemeKey::Health => "health",
            ThemeKey::Relationships => "relationships",
            ThemeKey::Learning => "learning",
            ThemeKey::Finance => "finance",
            ThemeKey::Lifestyle => "lifestyle",
        }
    }
}

impl fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThemeKey {
    type Err = crate::error::MandalaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "career" => Ok(ThemeKey::Career),
            "health" => Ok(ThemeKey::Health),
            "relationships" => Ok(ThemeKey::Relationships),
            "learning" => Ok(ThemeKey::Learning),
            "finance" => Ok(ThemeKey::Finance),
            "lifestyle" => Ok(ThemeKey::Lifestyle),
            _ => Err(crate::error::MandalaError::InvalidTheme(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn step_bounds() {
        assert!(Step::new(0).is_err());
        assert!(Step::new(15).is_err());
        assert_eq!(Step::new(1).unwrap(), Step::FIRST);
        assert_eq!(Step::new(14).unwrap(), Step::LAST);
    }

    #[test]
    fn step_next_prev() {
        assert_eq!(Step::new(1).unwrap().next(), Some(Step::new(2).unwrap()));
        assert_eq!(Step::LAST.next(), None);
        assert_eq!(Step::FIRST.prev(), None);
        assert_eq!(Step::new(5).unwrap().prev(), Some(Step::new(4).unwrap()));
    }

    #[test]
    fn action_plan_index_mapping() {
        assert_eq!(Step::new(6).unwrap().action_plan_index(), Some(0));
        assert_eq!(Step::new(13).unwrap().action_plan_index(), Some(7));
        assert_eq!(Step::new(5).unwrap().action_plan_index(), None);
        assert_eq!(Step::new(14).unwrap().action_plan_index(), None);
    }

    #[test]
    fn step_parse_roundtrip() {
        for step in Step::all() {
            let parsed = Step::from_str(&step.to_string()).unwrap();
            assert_eq!(step, parsed);
        }
        assert!(Step::from_str("fifteen").is_err());
    }

    #[test]
    fn theme_roundtrip() {
        for theme in ThemeKey::all() {
            let parsed = ThemeKey::from_str(theme.as_str()).unwrap();
            assert_eq!(*theme, parsed);
        }
        assert!(ThemeKey::from_str("wealth").is_err());
    }

    #[test]
    fn role_parse() {
        assert_eq!(Role::from_str("reviewer").unwrap(), Role::Reviewer);
        assert_eq!(Role::from_str("standard").unwrap(), Role::Standard);
        assert!(Role::from_str("admin").is_err());
        assert_eq!(Role::default(), Role::Standard);
    }
}
