use std::fmt::{self, Display, Formatter};

use rand::Rng;

use crate::options::{TournamentOptionValues, TournamentOptions};
use crate::schedule::Schedule;
use crate::{
    Classic, Entrants, Person, Result, SingleElimination, Swiss, System, Team, TeamId,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A tournament of any builtin [`TournamentKind`].
#[derive(Clone, Debug)]
pub struct Tournament {
    inner: InnerTournament,
}

impl Tournament {
    /// Creates a new tournament of the given `kind` using `teams` in the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if the `options` are invalid or the number of teams is not supported
    /// by `kind`.
    pub fn new<O>(kind: TournamentKind, teams: Entrants<Team>, options: O) -> Result<Self>
    where
        O: Into<TournamentOptionValues>,
    {
        let teams = teams.into_iter();

        let inner = match kind {
            TournamentKind::SingleElimination => InnerTournament::SingleElimination(
                SingleElimination::new_with_options(teams, options)?,
            ),
            TournamentKind::Swiss => {
                InnerTournament::Swiss(Swiss::new_with_options(teams, options)?)
            }
            TournamentKind::Classic => {
                InnerTournament::Classic(Classic::new_with_options(teams, options)?)
            }
        };

        Ok(Self { inner })
    }

    /// Creates a new tournament of the given `kind` with the default options. If `shuffle` is
    /// `true` the teams are drawn in a random order first.
    pub fn initialize(kind: TournamentKind, teams: Entrants<Team>, shuffle: bool) -> Result<Self> {
        let rng = shuffle.then(rand::thread_rng);
        Self::initialize_with_rng(kind, teams, rng, TournamentOptionValues::default())
    }

    /// Creates a new tournament of the given `kind`. If `rng` is `Some` the teams are drawn in
    /// a random order using it.
    pub fn initialize_with_rng<R, O>(
        kind: TournamentKind,
        mut teams: Entrants<Team>,
        rng: Option<R>,
        options: O,
    ) -> Result<Self>
    where
        R: Rng,
        O: Into<TournamentOptionValues>,
    {
        if let Some(mut rng) = rng {
            log::debug!("Shuffling {} teams", teams.len());
            teams.shuffle(&mut rng);
        }

        Self::new(kind, teams, options)
    }

    /// Returns the [`TournamentOptions`] accepted by the given `kind`.
    pub fn options(kind: TournamentKind) -> TournamentOptions {
        match kind {
            TournamentKind::SingleElimination => SingleElimination::options(),
            TournamentKind::Swiss => Swiss::options(),
            TournamentKind::Classic => Classic::options(),
        }
    }

    /// Returns the winner of the tournament. Only a [`SingleElimination`] tournament has a
    /// single winner, all other kinds are decided by their [`standings`].
    ///
    /// [`standings`]: System::standings
    pub fn champion(&self) -> Option<TeamId> {
        match &self.inner {
            InnerTournament::SingleElimination(t) => t.champion(),
            InnerTournament::Swiss(_) | InnerTournament::Classic(_) => None,
        }
    }
}

impl System for Tournament {
    fn kind(&self) -> TournamentKind {
        match &self.inner {
            InnerTournament::SingleElimination(t) => t.kind(),
            InnerTournament::Swiss(t) => t.kind(),
            InnerTournament::Classic(t) => t.kind(),
        }
    }

    fn schedule(&self) -> &Schedule {
        match &self.inner {
            InnerTournament::SingleElimination(t) => t.schedule(),
            InnerTournament::Swiss(t) => t.schedule(),
            InnerTournament::Classic(t) => t.schedule(),
        }
    }

    fn set_score(&mut self, index: usize, score_1: i64, score_2: i64) -> Result<()> {
        match &mut self.inner {
            InnerTournament::SingleElimination(t) => t.set_score(index, score_1, score_2),
            InnerTournament::Swiss(t) => t.set_score(index, score_1, score_2),
            InnerTournament::Classic(t) => t.set_score(index, score_1, score_2),
        }
    }

    fn set_referees(&mut self, index: usize, referees: Vec<Person>) -> Result<()> {
        match &mut self.inner {
            InnerTournament::SingleElimination(t) => t.set_referees(index, referees),
            InnerTournament::Swiss(t) => t.set_referees(index, referees),
            InnerTournament::Classic(t) => t.set_referees(index, referees),
        }
    }

    fn update_schedule(&mut self) -> Result<bool> {
        match &mut self.inner {
            InnerTournament::SingleElimination(t) => t.update_schedule(),
            InnerTournament::Swiss(t) => t.update_schedule(),
            InnerTournament::Classic(t) => t.update_schedule(),
        }
    }

    fn remove_update(&mut self) -> bool {
        match &mut self.inner {
            InnerTournament::SingleElimination(t) => t.remove_update(),
            InnerTournament::Swiss(t) => t.remove_update(),
            InnerTournament::Classic(t) => t.remove_update(),
        }
    }
}

#[derive(Clone, Debug)]
enum InnerTournament {
    SingleElimination(SingleElimination),
    Swiss(Swiss),
    Classic(Classic),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TournamentKind {
    SingleElimination,
    Swiss,
    Classic,
}

impl Display for TournamentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SingleElimination => "Single Elimination",
            Self::Swiss => "Swiss",
            Self::Classic => "Classic",
        };

        f.write_str(s)
    }
}
