//! # dynamic-tournament-scheduler
//!
//! This crate builds match schedules for a roster of teams, tracks scores and the derived
//! standings and advances a competition through its rounds. Three formats are builtin:
//! [`SingleElimination`], [`Swiss`] and [`Classic`].
//!
//! Important types:
//! - [`System`]: A trait implemented by every tournament format.
//! - [`Tournament`]: A closed variant over all builtin formats, selected by a [`TournamentKind`].
//! - [`Entrants`]: A wrapper around `Vec<T>` where `T` is a team in a tournament.
//! - [`Game`]: A single game of two teams, its scores and its [`GameResult`].
//! - [`EntrantSpot`]: A *spot* within a game, which can contain a team, be permanently empty
//! or contain a to-be-determined team.
//! - [`Schedule`]: The games, teams and per-team [`Record`]s shared by all formats.
//!
//! Teams are referred to by their position in the roster ([`TeamId`]), games by their position
//! in the schedule ([`GameId`]). Callers address games with the 1-based [`Game::index`].
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to the entity model and the options.
//!
pub mod options;
pub mod standings;
pub mod tournament;

mod classic;
mod game;
mod schedule;
mod single_elimination;
mod swiss;
mod team;
mod utils;

pub use classic::Classic;
pub use game::{Game, GameDisplay, GameResult};
pub use schedule::{Record, Schedule, Scoring};
pub use single_elimination::SingleElimination;
pub use swiss::Swiss;
pub use team::{Person, Role, Team};
pub use tournament::{Tournament, TournamentKind};

use standings::Standings;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use std::fmt::{self, Display, Formatter};
use std::ops::{Deref, DerefMut};
use std::result;
use std::vec::IntoIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A wrapper around a `Vec<T>` where `T` should be considered a team of a tournament.
///
/// This is a wrapper around a `Vec<T>` and has the same layout as a `Vec<T>`.
#[derive(Clone, Debug, Default)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Entrants<T> {
    entrants: Vec<T>,
}

impl<T> Entrants<T> {
    /// Returns the entrant with the given [`TeamId`].
    #[inline]
    pub fn entrant(&self, id: TeamId) -> Option<&T> {
        self.entrants.get(id.0)
    }

    /// Returns an iterator over the [`TeamId`]s of all entrants in roster order.
    #[inline]
    pub fn ids(&self) -> impl Iterator<Item = TeamId> {
        (0..self.entrants.len()).map(TeamId)
    }

    /// Permutes the entrants uniformly at random using `rng`.
    pub fn shuffle<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.entrants.as_mut_slice().shuffle(rng);
    }
}

impl<T> FromIterator<T> for Entrants<T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let entrants = iter.into_iter().collect();

        Self { entrants }
    }
}

impl<T> IntoIterator for Entrants<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entrants.into_iter()
    }
}

impl<T> Deref for Entrants<T> {
    type Target = Vec<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.entrants
    }
}

impl<T> DerefMut for Entrants<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.entrants
    }
}

impl<T, U> PartialEq<U> for Entrants<T>
where
    T: PartialEq,
    U: AsRef<[T]>,
{
    #[inline]
    fn eq(&self, other: &U) -> bool {
        self.entrants == other.as_ref()
    }
}

impl<T> From<Vec<T>> for Entrants<T> {
    #[inline]
    fn from(entrants: Vec<T>) -> Self {
        Self { entrants }
    }
}

/// A stable handle to a team: its position in the roster of a tournament.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TeamId(pub usize);

/// A stable handle to a game: its position in the [`Schedule`].
///
/// The caller facing index of the game is always `GameId + 1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GameId(pub usize);

impl GameId {
    /// Returns the 1-based index of the game.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 + 1
    }
}

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid roster size for {kind}: expected {requirement}, found {found} teams")]
    InvalidRosterSize {
        kind: TournamentKind,
        requirement: &'static str,
        found: usize,
    },
    #[error("invalid game index {index}: the schedule contains {length} games")]
    IndexOutOfRange { index: usize, length: usize },
    #[error("invalid score {score}")]
    InvalidScore { score: i64 },
    #[error("game {index} is not ready: an opponent is not determined yet")]
    GameNotReady { index: usize },
    #[error("cannot pair round {round} without a rematch after {attempts} attempts")]
    PairingExhausted { round: usize, attempts: usize },
    #[error(transparent)]
    Options(#[from] options::Error),
}

/// A spot for a team in a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntrantSpot<T> {
    Entrant(T),
    /// The spot stays empty, e.g. the missing opponent of a bye.
    Empty,
    /// The spot is filled once an upstream game is decided.
    TBD,
}

impl<T> EntrantSpot<T> {
    /// Returns `true` if the `EntrantSpot` is [`Entrant`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynamic_tournament_scheduler::EntrantSpot;
    /// let spot = EntrantSpot::Entrant(());
    /// assert!(spot.is_entrant());
    /// ```
    /// [`Entrant`]: Self::Entrant
    pub fn is_entrant(&self) -> bool {
        matches!(self, Self::Entrant(_))
    }

    /// Returns `true` if the `EntrantSpot` is [`Empty`].
    ///
    /// [`Empty`]: Self::Empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` if the `EntrantSpot` is [`TBD`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynamic_tournament_scheduler::EntrantSpot;
    /// let spot: EntrantSpot<()> = EntrantSpot::TBD;
    /// assert!(spot.is_tbd());
    /// ```
    ///
    /// [`TBD`]: Self::TBD
    pub fn is_tbd(&self) -> bool {
        matches!(self, Self::TBD)
    }

    /// Converts the `EntrantSpot` into an [`Option`], discarding the difference between
    /// [`Empty`] and [`TBD`].
    ///
    /// [`Empty`]: Self::Empty
    /// [`TBD`]: Self::TBD
    pub fn entrant(self) -> Option<T> {
        match self {
            Self::Entrant(entrant) => Some(entrant),
            _ => None,
        }
    }

    /// Maps `EntrantSpot<T>` to `EntrantSpot<U>` by applying `f` on it.
    pub fn map<U, F>(self, f: F) -> EntrantSpot<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Entrant(entrant) => EntrantSpot::Entrant(f(entrant)),
            Self::Empty => EntrantSpot::Empty,
            Self::TBD => EntrantSpot::TBD,
        }
    }
}

impl<T> Default for EntrantSpot<T> {
    #[inline]
    fn default() -> Self {
        Self::TBD
    }
}

impl Display for TeamId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A tournament system.
///
/// Every format owns a [`Schedule`] and decides how games are created and how the schedule
/// progresses. All methods execute synchronously and mutate the tournament in place.
pub trait System {
    /// Returns the [`TournamentKind`] of the system.
    fn kind(&self) -> TournamentKind;

    /// Returns a reference to the [`Schedule`] of the tournament.
    fn schedule(&self) -> &Schedule;

    /// Returns a reference to the teams of the tournament, in draw order.
    #[inline]
    fn teams(&self) -> &Entrants<Team> {
        self.schedule().teams()
    }

    /// Returns all games of the tournament in creation order.
    #[inline]
    fn games(&self) -> &[Game] {
        self.schedule().games()
    }

    /// Returns the current standings table, best team first.
    #[inline]
    fn standings(&self) -> Standings {
        self.schedule().standings()
    }

    /// Records the scores of the game with the 1-based `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if no game with `index` exists,
    /// [`Error::InvalidScore`] if a score is negative and [`Error::GameNotReady`] if the game
    /// still waits for an opponent in strict mode.
    fn set_score(&mut self, index: usize, score_1: i64, score_2: i64) -> Result<()>;

    /// Assigns the `referees` to the game with the 1-based `index`.
    fn set_referees(&mut self, index: usize, referees: Vec<Person>) -> Result<()>;

    /// Appends the next round or stage once enough games have concluded. Returns `true` if new
    /// games were appended.
    fn update_schedule(&mut self) -> Result<bool>;

    /// Removes the games appended by the last [`update_schedule`] call if none of them has a
    /// recorded score. Returns `true` if games were removed.
    ///
    /// [`update_schedule`]: Self::update_schedule
    fn remove_update(&mut self) -> bool;
}
