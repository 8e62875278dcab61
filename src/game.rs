use std::fmt::{self, Display, Formatter};

use crate::schedule::Scoring;
use crate::{EntrantSpot, Entrants, GameId, Person, Team, TeamId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The result of a [`Game`], derived from its scores.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameResult {
    #[default]
    NotStarted,
    Draw,
    Win1,
    Win2,
}

impl GameResult {
    /// Derives the result from a pair of scores.
    ///
    /// `0:0` means the game has not started. A difference of less than `draw_margin` points is
    /// a draw, otherwise the team with the higher score wins.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dynamic_tournament_scheduler::GameResult;
    /// assert_eq!(GameResult::from_scores(0, 0, 4), GameResult::NotStarted);
    /// assert_eq!(GameResult::from_scores(10, 7, 4), GameResult::Draw);
    /// assert_eq!(GameResult::from_scores(10, 6, 4), GameResult::Win1);
    /// assert_eq!(GameResult::from_scores(2, 12, 4), GameResult::Win2);
    /// ```
    pub fn from_scores(score_1: u32, score_2: u32, draw_margin: u32) -> Self {
        if score_1 == 0 && score_2 == 0 {
            Self::NotStarted
        } else if score_1 == score_2 || score_1.abs_diff(score_2) < draw_margin {
            Self::Draw
        } else if score_1 > score_2 {
            Self::Win1
        } else {
            Self::Win2
        }
    }

    /// Returns `true` if the game has a recorded outcome.
    #[inline]
    pub fn is_concluded(self) -> bool {
        self != Self::NotStarted
    }

    /// Returns the position (0 or 1) of the winning team, if any.
    #[inline]
    pub fn winner(self) -> Option<usize> {
        match self {
            Self::Win1 => Some(0),
            Self::Win2 => Some(1),
            _ => None,
        }
    }

    /// Returns the points awarded to both sides.
    pub fn points(self, scoring: &Scoring) -> [u64; 2] {
        match self {
            Self::NotStarted => [0, 0],
            Self::Draw => [scoring.points_draw, scoring.points_draw],
            Self::Win1 => [scoring.points_win, 0],
            Self::Win2 => [0, scoring.points_win],
        }
    }
}

/// A game between two teams.
///
/// Games in a single elimination bracket additionally link to the games feeding their spots
/// (`game_1`/`game_2`) and to the game their winner advances to (`game_next`).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Game {
    index: usize,
    teams: [EntrantSpot<TeamId>; 2],
    scores: [u32; 2],
    result: GameResult,
    referees: Vec<Person>,
    upstream: [Option<GameId>; 2],
    next: Option<GameId>,
}

impl Game {
    pub(crate) fn new(
        index: usize,
        first: EntrantSpot<TeamId>,
        second: EntrantSpot<TeamId>,
    ) -> Self {
        Self {
            index,
            teams: [first, second],
            scores: [0, 0],
            result: GameResult::NotStarted,
            referees: Vec::new(),
            upstream: [None, None],
            next: None,
        }
    }

    /// Returns the 1-based index of the game.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn teams(&self) -> [EntrantSpot<TeamId>; 2] {
        self.teams
    }

    #[inline]
    pub fn team_1(&self) -> EntrantSpot<TeamId> {
        self.teams[0]
    }

    #[inline]
    pub fn team_2(&self) -> EntrantSpot<TeamId> {
        self.teams[1]
    }

    #[inline]
    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    #[inline]
    pub fn score_1(&self) -> u32 {
        self.scores[0]
    }

    #[inline]
    pub fn score_2(&self) -> u32 {
        self.scores[1]
    }

    #[inline]
    pub fn result(&self) -> GameResult {
        self.result
    }

    #[inline]
    pub fn referees(&self) -> &[Person] {
        &self.referees
    }

    /// The game whose winner is placed into the first spot.
    #[inline]
    pub fn game_1(&self) -> Option<GameId> {
        self.upstream[0]
    }

    /// The game whose winner is placed into the second spot.
    #[inline]
    pub fn game_2(&self) -> Option<GameId> {
        self.upstream[1]
    }

    /// The game the winner of this game advances to.
    #[inline]
    pub fn game_next(&self) -> Option<GameId> {
        self.next
    }

    #[inline]
    pub fn is_concluded(&self) -> bool {
        self.result.is_concluded()
    }

    /// Returns `true` if both spots contain a known team.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.teams[0].is_entrant() && self.teams[1].is_entrant()
    }

    /// Returns `true` if this game is a slot for a single team without an opponent. The team
    /// advances without playing.
    #[inline]
    pub fn is_bye(&self) -> bool {
        self.teams[0].is_entrant() && self.teams[1].is_empty() && self.upstream[1].is_none()
    }

    /// Returns the winning team, if the game is decided.
    pub fn winner(&self) -> Option<TeamId> {
        self.result
            .winner()
            .and_then(|position| self.teams[position].entrant())
    }

    /// Returns the spot (0 or 1) of `team` in this game.
    pub fn position(&self, team: TeamId) -> Option<usize> {
        self.teams
            .iter()
            .position(|spot| *spot == EntrantSpot::Entrant(team))
    }

    /// Returns the points `team` earned in this game.
    pub fn team_points(&self, team: TeamId, scoring: &Scoring) -> u64 {
        match self.position(team) {
            Some(position) => self.result.points(scoring)[position],
            None => 0,
        }
    }

    /// Returns the score `team` made in this game.
    pub fn team_score(&self, team: TeamId) -> u32 {
        match self.position(team) {
            Some(position) => self.scores[position],
            None => 0,
        }
    }

    /// Returns a value implementing [`Display`] that renders the game using the names in
    /// `teams`.
    #[inline]
    pub fn display<'a>(&'a self, teams: &'a Entrants<Team>) -> GameDisplay<'a> {
        GameDisplay { game: self, teams }
    }

    pub(crate) fn set_score(&mut self, score_1: u32, score_2: u32, draw_margin: u32) {
        self.scores = [score_1, score_2];
        self.result = GameResult::from_scores(score_1, score_2, draw_margin);
    }

    pub(crate) fn set_referees(&mut self, referees: Vec<Person>) {
        self.referees = referees;
    }

    /// Replaces the team at `position`, returning the previous spot.
    pub(crate) fn set_team(
        &mut self,
        position: usize,
        spot: EntrantSpot<TeamId>,
    ) -> EntrantSpot<TeamId> {
        std::mem::replace(&mut self.teams[position], spot)
    }

    pub(crate) fn set_upstream(&mut self, position: usize, game: GameId) {
        self.upstream[position] = Some(game);
    }

    pub(crate) fn set_next(&mut self, game: GameId) {
        self.next = Some(game);
    }
}

/// Renders a [`Game`] as a single line, e.g. `3| Lions 12:4 Tigers`.
#[derive(Copy, Clone, Debug)]
pub struct GameDisplay<'a> {
    game: &'a Game,
    teams: &'a Entrants<Team>,
}

impl<'a> GameDisplay<'a> {
    fn spot(&self, position: usize) -> Option<String> {
        match self.game.teams[position] {
            EntrantSpot::Entrant(id) => Some(
                self.teams
                    .entrant(id)
                    .map(|team| team.name())
                    .unwrap_or(Team::UNKNOWN_NAME)
                    .to_owned(),
            ),
            _ => self.game.upstream[position]
                .map(|game| format!("Winner of game #{}", game.index())),
        }
    }
}

impl<'a> Display for GameDisplay<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.game.is_bye() {
            if let Some(team) = self.spot(0) {
                return write!(f, "{}| {} (bye)", self.game.index, team);
            }
        }

        match (self.spot(0), self.spot(1)) {
            (Some(first), Some(second)) => write!(
                f,
                "{}| {} {}:{} {}",
                self.game.index, first, self.game.scores[0], self.game.scores[1], second
            ),
            _ => f.write_str("Undefined game"),
        }
    }
}
