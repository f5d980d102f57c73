//! Action vocabulary for Q-learning agents.
//!
//! Actions are named choices (for example `donothing` or `trainscv`). An
//! [`ActionSet`] fixes the vocabulary and its order for the lifetime of a
//! Q-table; the order only matters for tie-break determinism and for the
//! column order of tabular exports.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error};

/// A single named action.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(String);

impl Action {
    /// Create a new action.
    ///
    /// # Examples
    ///
    /// ```
    /// use athene::actions::Action;
    ///
    /// let action = Action::new("trainscv");
    /// assert_eq!(action.as_str(), "trainscv");
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the action name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the action into its inner String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for Action {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Action {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<Action> for &str {
    fn eq(&self, other: &Action) -> bool {
        *self == other.as_str()
    }
}

impl Borrow<str> for Action {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<String> for Action {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for Action {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Ordered, duplicate-free, non-empty action vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Action>", into = "Vec<Action>")]
pub struct ActionSet {
    actions: Vec<Action>,
}

impl ActionSet {
    /// Build an action set, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyActionSet`] for an empty vocabulary and
    /// [`Error::DuplicateAction`] when a name is repeated.
    ///
    /// # Examples
    ///
    /// ```
    /// use athene::actions::ActionSet;
    ///
    /// let actions = ActionSet::new(["donothing", "trainscv", "buildsupply"])?;
    /// assert_eq!(actions.len(), 3);
    /// assert_eq!(actions.index_of("trainscv"), Some(1));
    /// # Ok::<(), athene::Error>(())
    /// ```
    pub fn new<I, A>(actions: I) -> Result<Self>
    where
        I: IntoIterator<Item = A>,
        A: Into<Action>,
    {
        let mut collected: Vec<Action> = Vec::new();
        for action in actions {
            let action = action.into();
            if collected.contains(&action) {
                return Err(Error::DuplicateAction {
                    action: action.into_inner(),
                });
            }
            collected.push(action);
        }

        if collected.is_empty() {
            return Err(Error::EmptyActionSet);
        }

        Ok(Self { actions: collected })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Always false: construction rejects empty vocabularies.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    /// Position of an action in the vocabulary.
    pub fn index_of(&self, action: &str) -> Option<usize> {
        self.actions.iter().position(|a| a.as_str() == action)
    }

    pub fn contains(&self, action: &str) -> bool {
        self.index_of(action).is_some()
    }

    /// Action at a vocabulary position.
    pub fn get(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    /// Resolve an action name to its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAction`] if the name is not in the vocabulary.
    pub fn require(&self, action: &str) -> Result<usize> {
        self.index_of(action).ok_or_else(|| Error::UnknownAction {
            action: action.to_string(),
        })
    }
}

impl TryFrom<Vec<Action>> for ActionSet {
    type Error = Error;

    fn try_from(actions: Vec<Action>) -> Result<Self> {
        Self::new(actions)
    }
}

impl From<ActionSet> for Vec<Action> {
    fn from(set: ActionSet) -> Self {
        set.actions
    }
}

impl<'a> IntoIterator for &'a ActionSet {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
