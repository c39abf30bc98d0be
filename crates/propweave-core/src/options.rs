#![forbid(unsafe_code)]

//! Configuration for property redirection.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// When a redirect seeds the target from the source.
///
/// Seeding only consults this policy when `force_override` is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeedPolicy {
    /// Seed only when the target's value is `Undefined`. A real `0`, `""` or
    /// `false` on the target is kept.
    #[default]
    Absent,
    /// Seed whenever the target's value is falsy. Compatibility mode: a
    /// shared `0` or `""` on the target is treated as unset and overwritten.
    Falsy,
}

impl SeedPolicy {
    /// Whether `current` (the target's value) counts as unset.
    #[must_use]
    pub fn is_unset(self, current: &Value) -> bool {
        match self {
            Self::Absent => current.is_undefined(),
            Self::Falsy => !current.is_truthy(),
        }
    }
}

/// Options for [`redirect`](crate::redirect::redirect).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RedirectOptions {
    /// Seed the target from the source before linking.
    pub copy: bool,
    /// Seed unconditionally instead of consulting `seed_policy`.
    pub force_override: bool,
    pub seed_policy: SeedPolicy,
}

impl Default for RedirectOptions {
    fn default() -> Self {
        Self {
            copy: true,
            force_override: false,
            seed_policy: SeedPolicy::default(),
        }
    }
}

impl RedirectOptions {
    #[must_use]
    pub fn with_copy(mut self, copy: bool) -> Self {
        self.copy = copy;
        self
    }

    #[must_use]
    pub fn with_force_override(mut self, force_override: bool) -> Self {
        self.force_override = force_override;
        self
    }

    #[must_use]
    pub fn with_seed_policy(mut self, seed_policy: SeedPolicy) -> Self {
        self.seed_policy = seed_policy;
        self
    }

    /// Options matching the legacy behavior: copy on, no override, falsy
    /// seeding.
    #[must_use]
    pub fn legacy() -> Self {
        Self::default().with_seed_policy(SeedPolicy::Falsy)
    }

    /// Whether a pair should seed `target` given its current value.
    #[must_use]
    pub fn should_seed(&self, current: &Value) -> bool {
        self.copy && (self.force_override || self.seed_policy.is_unset(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = RedirectOptions::default();
        assert!(opts.copy);
        assert!(!opts.force_override);
        assert_eq!(opts.seed_policy, SeedPolicy::Absent);
    }

    #[test]
    fn absent_policy_keeps_zero() {
        assert!(SeedPolicy::Absent.is_unset(&Value::Undefined));
        assert!(!SeedPolicy::Absent.is_unset(&Value::Int(0)));
        assert!(!SeedPolicy::Absent.is_unset(&Value::Null));
        assert!(!SeedPolicy::Absent.is_unset(&Value::from("")));
    }

    #[test]
    fn falsy_policy_treats_zero_as_unset() {
        assert!(SeedPolicy::Falsy.is_unset(&Value::Int(0)));
        assert!(SeedPolicy::Falsy.is_unset(&Value::from("")));
        assert!(SeedPolicy::Falsy.is_unset(&Value::Null));
        assert!(!SeedPolicy::Falsy.is_unset(&Value::Int(1)));
    }

    #[test]
    fn should_seed_matrix() {
        let set = Value::Int(5);
        let unset = Value::Undefined;

        let opts = RedirectOptions::default();
        assert!(opts.should_seed(&unset));
        assert!(!opts.should_seed(&set));

        let forced = opts.with_force_override(true);
        assert!(forced.should_seed(&set));

        let no_copy = forced.with_copy(false);
        assert!(!no_copy.should_seed(&unset));
        assert!(!no_copy.should_seed(&set));
    }

    #[test]
    fn legacy_uses_falsy() {
        let opts = RedirectOptions::legacy();
        assert_eq!(opts.seed_policy, SeedPolicy::Falsy);
        assert!(opts.should_seed(&Value::Int(0)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn options_from_json() {
        let opts: RedirectOptions =
            serde_json::from_str(r#"{"force_override": true, "seed_policy": "falsy"}"#).unwrap();
        assert!(opts.copy);
        assert!(opts.force_override);
        assert_eq!(opts.seed_policy, SeedPolicy::Falsy);
    }
}
