use std::cmp::Reverse;
use std::ops::Range;

use crate::options::{Builder, TournamentOptionValues, TournamentOptions};
use crate::standings::Standings;
use crate::{EntrantSpot, Entrants, Error, Game, GameId, Person, Result, Team, TeamId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How games are scored. Shared by all formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Scoring {
    /// A score difference below this value is a draw.
    pub draw_margin: u32,
    pub points_win: u64,
    pub points_draw: u64,
    /// Reject scores for games that do not have two known teams yet.
    pub strict: bool,
}

impl Scoring {
    /// Returns a [`Builder`] describing the scoring options, to which a format can add its own.
    pub fn options() -> Builder {
        TournamentOptions::builder()
            .option(
                "draw_margin",
                "Score difference below which a game is a draw.",
                4u64,
            )
            .option("points_win", "How many points to award for a win.", 2u64)
            .option("points_draw", "How many points to award for a draw.", 1u64)
            .option(
                "strict",
                "Reject scores for games whose opponents are not determined yet.",
                true,
            )
    }

    pub(crate) fn new(options: &mut TournamentOptionValues) -> Self {
        let mut this = Self::default();

        if let Some(val) = options.take("draw_margin") {
            let margin = val.unwrap_u64_or(u64::from(this.draw_margin));
            this.draw_margin = u32::try_from(margin).unwrap_or(u32::MAX);
        }

        if let Some(val) = options.take("points_win") {
            this.points_win = val.unwrap_u64_or(2);
        }

        if let Some(val) = options.take("points_draw") {
            this.points_draw = val.unwrap_u64_or(1);
        }

        if let Some(val) = options.take("strict") {
            this.strict = val.unwrap_bool_or(true);
        }

        this
    }
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            draw_margin: 4,
            points_win: 2,
            points_draw: 1,
            strict: true,
        }
    }
}

/// The aggregate of all recorded games of a team.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Record {
    pub points: u64,
    /// The cumulative score the team made.
    pub score: u64,
}

/// The state shared by all tournament formats: the roster, the games and the records of all
/// teams.
///
/// Games are stored in an arena and addressed by their [`GameId`]. Games appended by a
/// round-progression are tracked as batches so that the last batch can be rolled back.
#[derive(Clone, Debug)]
pub struct Schedule {
    teams: Entrants<Team>,
    games: Vec<Game>,
    records: Vec<Record>,
    batches: Vec<Range<usize>>,
    scoring: Scoring,
}

impl Schedule {
    pub(crate) fn new(teams: Entrants<Team>, scoring: Scoring) -> Self {
        Self {
            records: vec![Record::default(); teams.len()],
            teams,
            games: Vec::new(),
            batches: Vec::new(),
            scoring,
        }
    }

    #[inline]
    pub fn teams(&self) -> &Entrants<Team> {
        &self.teams
    }

    #[inline]
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    #[inline]
    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.get(id.0)
    }

    #[inline]
    pub fn scoring(&self) -> &Scoring {
        &self.scoring
    }

    /// Returns the [`Record`] of `team`.
    #[inline]
    pub fn record(&self, team: TeamId) -> Option<Record> {
        self.records.get(team.0).copied()
    }

    /// Returns the [`Record`]s of all teams in roster order.
    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Sorts `teams` from best to worst: points, then cumulative score, then roster position.
    pub fn ranking<I>(&self, teams: I) -> Vec<TeamId>
    where
        I: IntoIterator<Item = TeamId>,
    {
        let mut teams: Vec<_> = teams.into_iter().collect();
        teams.sort_by_key(|team| {
            let record = self.record(*team).unwrap_or_default();
            (Reverse(record.points), Reverse(record.score), *team)
        });
        teams
    }

    /// Returns the standings of all teams, best team first.
    pub fn standings(&self) -> Standings {
        Standings::new(
            self.ranking(self.teams.ids())
                .into_iter()
                .map(|team| (team, self.record(team).unwrap_or_default())),
        )
    }

    /// Appends a new game and returns its [`GameId`].
    pub(crate) fn push_game(
        &mut self,
        first: EntrantSpot<TeamId>,
        second: EntrantSpot<TeamId>,
    ) -> GameId {
        let id = GameId(self.games.len());
        self.games.push(Game::new(id.index(), first, second));
        id
    }

    #[inline]
    pub(crate) fn game_mut(&mut self, id: GameId) -> Option<&mut Game> {
        self.games.get_mut(id.0)
    }

    /// Returns the [`GameId`] of the game with the 1-based `index`.
    pub(crate) fn resolve(&self, index: usize) -> Result<GameId> {
        if index == 0 || index > self.games.len() {
            return Err(Error::IndexOutOfRange {
                index,
                length: self.games.len(),
            });
        }

        Ok(GameId(index - 1))
    }

    /// Records the scores of the game with the 1-based `index` and recounts the records of both
    /// teams.
    pub(crate) fn set_score(&mut self, index: usize, score_1: i64, score_2: i64) -> Result<GameId> {
        let id = self.resolve(index)?;
        let score_1 = validate_score(score_1)?;
        let score_2 = validate_score(score_2)?;

        let game = &mut self.games[id.0];
        if self.scoring.strict && !game.is_ready() {
            return Err(Error::GameNotReady { index });
        }

        game.set_score(score_1, score_2, self.scoring.draw_margin);
        log::debug!(
            "Game {} scored {}:{} ({:?})",
            index,
            score_1,
            score_2,
            game.result()
        );

        for spot in game.teams() {
            if let EntrantSpot::Entrant(team) = spot {
                self.recount(team);
            }
        }

        Ok(id)
    }

    pub(crate) fn set_referees(&mut self, index: usize, referees: Vec<Person>) -> Result<()> {
        let id = self.resolve(index)?;
        self.games[id.0].set_referees(referees);
        Ok(())
    }

    /// Rebuilds the [`Record`] of `team` from all games.
    pub(crate) fn recount(&mut self, team: TeamId) {
        let mut record = Record::default();
        for game in &self.games {
            record.points += game.team_points(team, &self.scoring);
            record.score += u64::from(game.team_score(team));
        }

        if let Some(slot) = self.records.get_mut(team.0) {
            *slot = record;
        }
    }

    /// Returns the number of concluded games within `range`.
    pub(crate) fn concluded(&self, range: Range<usize>) -> usize {
        self.games
            .get(range)
            .map(|games| games.iter().filter(|game| game.is_concluded()).count())
            .unwrap_or(0)
    }

    /// Marks all games starting at `start` as the batch appended by the last update.
    pub(crate) fn commit_batch(&mut self, start: usize) {
        self.batches.push(start..self.games.len());
    }

    /// Returns the range of the last appended batch.
    #[inline]
    pub(crate) fn last_batch(&self) -> Option<Range<usize>> {
        self.batches.last().cloned()
    }

    /// Removes the last appended batch if none of its games has a recorded score. Returns the
    /// removed games.
    pub(crate) fn remove_batch(&mut self) -> Option<Vec<Game>> {
        let batch = self.last_batch()?;
        if self.concluded(batch.clone()) != 0 {
            return None;
        }

        self.batches.pop();
        Some(self.games.drain(batch).collect())
    }
}

fn validate_score(score: i64) -> Result<u32> {
    u32::try_from(score).map_err(|_| Error::InvalidScore { score })
}

#[cfg(test)]
mod tests {
    use crate::tests::roster;
    use crate::{option_values, EntrantSpot, Error, GameId, GameResult, Person, Role, TeamId};

    use super::{Record, Schedule, Scoring};

    fn schedule() -> Schedule {
        let mut schedule = Schedule::new(roster(4), Scoring::default());
        schedule.push_game(EntrantSpot::Entrant(TeamId(0)), EntrantSpot::Entrant(TeamId(1)));
        schedule.push_game(EntrantSpot::Entrant(TeamId(2)), EntrantSpot::Entrant(TeamId(3)));
        schedule.push_game(EntrantSpot::Entrant(TeamId(0)), EntrantSpot::Entrant(TeamId(2)));
        schedule
    }

    #[test]
    fn test_scoring_options() {
        let mut values = option_values!("draw_margin" => 2u64, "strict" => false);
        let scoring = Scoring::new(&mut values);

        assert_eq!(
            scoring,
            Scoring {
                draw_margin: 2,
                points_win: 2,
                points_draw: 1,
                strict: false,
            }
        );
    }

    #[test]
    fn test_set_score() {
        let mut schedule = schedule();

        assert_eq!(schedule.set_score(1, 10, 2), Ok(GameId(0)));
        assert_eq!(schedule.games()[0].result(), GameResult::Win1);
        assert_eq!(
            schedule.record(TeamId(0)),
            Some(Record {
                points: 2,
                score: 10
            })
        );
        assert_eq!(
            schedule.record(TeamId(1)),
            Some(Record {
                points: 0,
                score: 2
            })
        );

        schedule.set_score(3, 5, 6).unwrap();
        assert_eq!(
            schedule.record(TeamId(0)),
            Some(Record {
                points: 3,
                score: 15
            })
        );
        assert_eq!(
            schedule.record(TeamId(2)),
            Some(Record {
                points: 1,
                score: 6
            })
        );

        // Correcting a score recounts from scratch.
        schedule.set_score(1, 0, 0).unwrap();
        assert_eq!(
            schedule.record(TeamId(0)),
            Some(Record {
                points: 1,
                score: 5
            })
        );
        assert_eq!(schedule.record(TeamId(1)), Some(Record::default()));
    }

    #[test]
    fn test_set_score_errors() {
        let mut schedule = schedule();

        assert_eq!(
            schedule.set_score(0, 1, 1),
            Err(Error::IndexOutOfRange {
                index: 0,
                length: 3
            })
        );
        assert_eq!(
            schedule.set_score(4, 1, 1),
            Err(Error::IndexOutOfRange {
                index: 4,
                length: 3
            })
        );
        assert_eq!(
            schedule.set_score(1, -1, 1),
            Err(Error::InvalidScore { score: -1 })
        );
        assert_eq!(
            schedule.set_score(1, 1, i64::MAX),
            Err(Error::InvalidScore { score: i64::MAX })
        );

        // Nothing was recorded.
        assert!(schedule.games().iter().all(|game| !game.is_concluded()));
        assert!(schedule.records().iter().all(|r| *r == Record::default()));
    }

    #[test]
    fn test_set_score_not_ready() {
        let mut schedule = Schedule::new(roster(2), Scoring::default());
        schedule.push_game(EntrantSpot::Entrant(TeamId(0)), EntrantSpot::TBD);

        assert_eq!(
            schedule.set_score(1, 8, 0),
            Err(Error::GameNotReady { index: 1 })
        );

        let mut schedule = Schedule::new(
            roster(2),
            Scoring {
                strict: false,
                ..Default::default()
            },
        );
        schedule.push_game(EntrantSpot::Entrant(TeamId(0)), EntrantSpot::TBD);

        assert!(schedule.set_score(1, 8, 0).is_ok());
        assert_eq!(schedule.record(TeamId(0)).unwrap().points, 2);
    }

    #[test]
    fn test_ranking() {
        let mut schedule = schedule();
        schedule.set_score(1, 10, 2).unwrap();
        schedule.set_score(2, 9, 1).unwrap();

        assert_eq!(
            schedule.ranking([TeamId(3), TeamId(2), TeamId(1), TeamId(0)]),
            [TeamId(0), TeamId(2), TeamId(1), TeamId(3)]
        );

        let standings = schedule.standings();
        assert_eq!(
            standings.teams().collect::<Vec<_>>(),
            [TeamId(0), TeamId(2), TeamId(1), TeamId(3)]
        );
        assert_eq!(
            standings.get(TeamId(2)).unwrap().record,
            Record {
                points: 2,
                score: 9
            }
        );
    }

    #[test]
    fn test_batches() {
        let mut schedule = schedule();
        assert!(schedule.remove_batch().is_none());

        let start = schedule.games().len();
        schedule.push_game(EntrantSpot::Entrant(TeamId(1)), EntrantSpot::Entrant(TeamId(3)));
        schedule.commit_batch(start);
        assert_eq!(schedule.last_batch(), Some(3..4));

        schedule.set_score(4, 6, 1).unwrap();
        assert!(schedule.remove_batch().is_none());
        assert_eq!(schedule.games().len(), 4);

        schedule.set_score(4, 0, 0).unwrap();
        let removed = schedule.remove_batch().unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(schedule.games().len(), 3);
        assert_eq!(schedule.last_batch(), None);
    }

    #[test]
    fn test_set_referees() {
        let mut schedule = schedule();
        let referee = Person::new("Dmitry", "School 1", Role::Referee);

        schedule.set_referees(2, vec![referee.clone()]).unwrap();
        assert_eq!(schedule.games()[1].referees(), [referee]);
        assert_eq!(
            schedule.set_referees(9, vec![]),
            Err(Error::IndexOutOfRange {
                index: 9,
                length: 3
            })
        );
    }
}
