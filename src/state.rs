//! Canonical state keys.
//!
//! Callers discretize observations into small integer features (idle worker
//! count, number of supply depots, a resource tier bucket, ...). A
//! [`StateKey`] wraps that ordered tuple so it can be hashed and compared
//! structurally. The terminal pseudo-state is a separate variant, so it can
//! never be equal to an observed key, and its text form `terminal` can never
//! be produced by an observed key, whose text form always starts with `(`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Text form of the terminal sentinel.
pub const TERMINAL_LABEL: &str = "terminal";

/// A discrete world-state snapshot used as a Q-table row key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StateKey {
    /// An observed state described by its discretized features.
    Observed(Vec<i64>),
    /// End of episode; carries no future value.
    Terminal,
}

impl StateKey {
    /// Build an observed key from any sequence of integer features.
    pub fn observed<I>(features: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        StateKey::Observed(features.into_iter().map(Into::into).collect())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StateKey::Terminal)
    }

    /// Features of an observed state, `None` for the terminal sentinel.
    pub fn features(&self) -> Option<&[i64]> {
        match self {
            StateKey::Observed(features) => Some(features),
            StateKey::Terminal => None,
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKey::Terminal => f.write_str(TERMINAL_LABEL),
            StateKey::Observed(features) => {
                f.write_str("(")?;
                for (i, value) in features.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl FromStr for StateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == TERMINAL_LABEL {
            return Ok(StateKey::Terminal);
        }

        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| Error::InvalidStateKey {
                input: s.to_string(),
                reason: "expected '(f1, f2, ...)' or 'terminal'".to_string(),
            })?;

        if inner.trim().is_empty() {
            return Ok(StateKey::Observed(Vec::new()));
        }

        let features = inner
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<i64>()
                    .map_err(|e| Error::InvalidStateKey {
                        input: s.to_string(),
                        reason: format!("feature '{}': {e}", part.trim()),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StateKey::Observed(features))
    }
}

impl TryFrom<String> for StateKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StateKey> for String {
    fn from(key: StateKey) -> Self {
        key.to_string()
    }
}

impl From<Vec<i64>> for StateKey {
    fn from(features: Vec<i64>) -> Self {
        StateKey::Observed(features)
    }
}

impl From<&[i64]> for StateKey {
    fn from(features: &[i64]) -> Self {
        StateKey::Observed(features.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for StateKey {
    fn from(features: [i64; N]) -> Self {
        StateKey::Observed(features.to_vec())
    }
}

impl From<&StateKey> for StateKey {
    fn from(key: &StateKey) -> Self {
        key.clone()
    }
}

macro_rules! impl_from_tuple {
    ($($ty:ident $var:ident),+) => {
        impl<$($ty: Into<i64>),+> From<($($ty,)+)> for StateKey {
            fn from(($($var,)+): ($($ty,)+)) -> Self {
                StateKey::Observed(vec![$($var.into()),+])
            }
        }
    };
}

impl_from_tuple!(A a);
impl_from_tuple!(A a, B b);
impl_from_tuple!(A a, B b, C c);
impl_from_tuple!(A a, B b, C c, D d);
impl_from_tuple!(A a, B b, C c, D d, E e);
impl_from_tuple!(A a, B b, C c, D d, E e, F f);
