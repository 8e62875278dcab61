//! # Tournament Options
//!
//! Every tournament [`System`] accepts configuration that changes its behavoir, e.g. the score
//! margin below which a game counts as a draw, or the number of rounds played in a swiss
//! tournament.
//!
//! This module provides this kind of configuration via [`TournamentOption`] using a key-value map.
//! [`OptionValue`] contains all types supported. Each system describes the options it accepts
//! (including their defaults) with a [`TournamentOptions`] value; callers pass their values as
//! [`TournamentOptionValues`] which are validated using [`TournamentOptionValues::merge`].
//!
//! [`System`]: crate::System
use std::collections::{
    hash_map::{Iter, Keys},
    HashMap,
};

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown key {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: expected {expected}, found {found}")]
    InvalidValue {
        key: String,
        found: &'static str,
        expected: &'static str,
    },
}

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A list of optional values for a tournament. `TournamentOptions` includes the names and should
/// be used to describe a list of options. [`TournamentOptionValues`] should be used when just
/// expecting a list of key-value pairs.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TournamentOptions(HashMap<String, TournamentOption>);

impl TournamentOptions {
    /// Creates a new [`Builder`].
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns the option with the given `key`. Returns `None` if the given key does not exist
    pub fn get(&self, key: &str) -> Option<&TournamentOption> {
        self.0.get(key)
    }

    /// Inserts a new [`TournamentOption`] with the provided `key`, overwriting the previous value
    /// if it exists.
    pub fn insert<K>(&mut self, key: K, option: TournamentOption)
    where
        K: ToString,
    {
        self.0.insert(key.to_string(), option);
    }

    /// Returns an iterator over all keys.
    pub fn keys(&self) -> Keys<'_, String, TournamentOption> {
        self.0.keys()
    }

    /// Returns an iterator over all [`TournamentOption`]s.
    pub fn iter(&self) -> Iter<'_, String, TournamentOption> {
        self.0.iter()
    }
}

/// A list of optional key-values for a tournament which only contains the values.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TournamentOptionValues(HashMap<String, OptionValue>);

impl TournamentOptionValues {
    /// Creates a new empty list of values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the [`OptionValue`] with the given `key`. Returns `None` if no value exist for the
    /// given `key`.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    pub fn take(&mut self, key: &str) -> Option<OptionValue> {
        self.0.remove(key)
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: ToString,
        V: Into<OptionValue>,
    {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn iter(&self) -> Iter<'_, String, OptionValue> {
        self.0.iter()
    }

    /// Validates the values against the described `options` and fills all missing values with
    /// the defaults from `options`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if a key is not described by `options` or a value has a different
    /// type than the described default.
    pub fn merge(mut self, mut options: TournamentOptions) -> Result<Self, Error> {
        for (key, value) in self.0.iter() {
            let default_value = match options.0.remove(key) {
                Some(value) => value,
                None => return Err(Error::UnknownKey(key.to_owned())),
            };

            if default_value.value.value_type() != value.value_type() {
                return Err(Error::InvalidValue {
                    key: key.to_owned(),
                    found: value.value_type(),
                    expected: default_value.value.value_type(),
                });
            }
        }

        // Fill the unassigned fields with defaults.
        for (key, value) in options.0.into_iter() {
            self.0.insert(key, value.value);
        }

        Ok(self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TournamentOption {
    pub name: String,
    pub value: OptionValue,
}

/// The value of a [`TournamentOption`].
///
/// Values are serialized without a tag. Any non-negative integer is read as [`U64`].
///
/// [`U64`]: Self::U64
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum OptionValue {
    Bool(bool),
    U64(u64),
}

impl OptionValue {
    /// Returns the name of the type of this value.
    pub fn value_type(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::U64(_) => "u64",
        }
    }

    /// Returns the contained [`Bool`] value or the provided default.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynamic_tournament_scheduler::options::OptionValue;
    /// let val = OptionValue::Bool(true);
    /// assert!(val.unwrap_bool_or(false));
    /// ```
    ///
    /// ```
    /// # use dynamic_tournament_scheduler::options::OptionValue;
    /// let val = OptionValue::U64(0);
    /// assert!(val.unwrap_bool_or(true));
    /// ```
    ///
    /// [`Bool`]: Self::Bool
    #[inline]
    pub fn unwrap_bool_or(self, default: bool) -> bool {
        match self {
            Self::Bool(val) => val,
            _ => default,
        }
    }

    /// Returns the contained [`U64`] value or the provided default.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynamic_tournament_scheduler::options::OptionValue;
    /// let val = OptionValue::U64(4);
    /// assert_eq!(val.unwrap_u64_or(2), 4);
    /// ```
    ///
    /// ```
    /// # use dynamic_tournament_scheduler::options::OptionValue;
    /// let val = OptionValue::Bool(true);
    /// assert_eq!(val.unwrap_u64_or(2), 2);
    /// ```
    ///
    /// [`U64`]: Self::U64
    #[inline]
    pub fn unwrap_u64_or(self, default: u64) -> u64 {
        match self {
            Self::U64(val) => val,
            _ => default,
        }
    }
}

impl From<bool> for OptionValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u64> for OptionValue {
    #[inline]
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

/// A builder for [`TournamentOptions`].
#[derive(Clone, Debug, Default)]
pub struct Builder {
    options: TournamentOptions,
}

impl Builder {
    /// Inserts a new [`TournamentOption`]. If the `key` already exists, it is overwritten.
    pub fn option<T, V>(mut self, key: &'static str, name: T, value: V) -> Self
    where
        T: ToString,
        V: Into<OptionValue>,
    {
        self.options.insert(
            key.to_string(),
            TournamentOption {
                name: name.to_string(),
                value: value.into(),
            },
        );
        self
    }

    /// Consumes the `Builder`, returning the collected [`TournamentOptions`].
    #[inline]
    pub fn build(self) -> TournamentOptions {
        self.options
    }
}
