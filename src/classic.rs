use crate::options::{TournamentOptionValues, TournamentOptions};
use crate::schedule::{Schedule, Scoring};
use crate::{EntrantSpot, Entrants, Error, Person, Result, System, Team, TeamId, TournamentKind};

/// The number of teams in a classic tournament.
const TEAMS: usize = 8;
/// The number of teams in each group.
const GROUP_SIZE: usize = 4;
/// The number of group games: a full round-robin in both groups.
const GROUP_GAMES: usize = 12;

/// Pairings of a round-robin in a group of 4, by position in the group. Every two pairings form
/// a round in which each team plays once.
const GROUP_PAIRINGS: [(usize, usize); 6] = [(0, 1), (2, 3), (0, 2), (1, 3), (3, 0), (2, 1)];

/// A classic tournament with 8 teams.
///
/// The first four teams form group A, the last four form group B. Each group plays a full
/// round-robin, with the rounds of both groups interleaved. Once all 12 group games have
/// concluded, the teams of both groups are ranked and the team at each rank in group A plays the
/// team at the same rank in group B.
///
/// The finals are appended best first: game 13 decides places 1 and 2, game 16 decides places
/// 7 and 8.
#[derive(Clone, Debug)]
pub struct Classic {
    schedule: Schedule,
}

impl Classic {
    /// Creates a new `Classic` tournament using the given `teams`.
    pub fn new<I>(teams: I) -> Result<Self>
    where
        I: Iterator<Item = Team>,
    {
        Self::new_with_options(teams, TournamentOptionValues::default())
    }

    /// Creates a new `Classic` tournament using the given `teams` and using the given
    /// `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRosterSize`] if `teams` does not contain exactly 8 teams.
    pub fn new_with_options<I, O>(teams: I, options: O) -> Result<Self>
    where
        I: Iterator<Item = Team>,
        O: Into<TournamentOptionValues>,
    {
        let mut options = options.into().merge(Self::options())?;
        let scoring = Scoring::new(&mut options);
        log::debug!("Using options: {:?}", scoring);

        let teams: Entrants<Team> = teams.collect();
        if teams.len() != TEAMS {
            return Err(Error::InvalidRosterSize {
                kind: TournamentKind::Classic,
                requirement: "exactly 8 teams",
                found: teams.len(),
            });
        }

        let mut schedule = Schedule::new(teams, scoring);

        for round in GROUP_PAIRINGS.chunks(2) {
            for group in [group_a(), group_b()] {
                for (first, second) in round {
                    schedule.push_game(
                        EntrantSpot::Entrant(group[*first]),
                        EntrantSpot::Entrant(group[*second]),
                    );
                }
            }
        }

        log::debug!(
            "Created Classic tournament with {} group games",
            schedule.games().len()
        );

        Ok(Self { schedule })
    }

    /// Returns the [`TournamentOptions`] accepted by this system.
    #[inline]
    pub fn options() -> TournamentOptions {
        Scoring::options().build()
    }

    /// Returns `true` once the finals have been created.
    #[inline]
    pub fn has_finals(&self) -> bool {
        self.schedule.games().len() > GROUP_GAMES
    }
}

impl System for Classic {
    #[inline]
    fn kind(&self) -> TournamentKind {
        TournamentKind::Classic
    }

    #[inline]
    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn set_score(&mut self, index: usize, score_1: i64, score_2: i64) -> Result<()> {
        self.schedule.set_score(index, score_1, score_2)?;
        Ok(())
    }

    #[inline]
    fn set_referees(&mut self, index: usize, referees: Vec<Person>) -> Result<()> {
        self.schedule.set_referees(index, referees)
    }

    fn update_schedule(&mut self) -> Result<bool> {
        if self.has_finals() {
            return Ok(false);
        }

        let concluded = self.schedule.concluded(0..GROUP_GAMES);
        if concluded < GROUP_GAMES {
            log::debug!(
                "Group stage is not done yet: {}/{} games concluded",
                concluded,
                GROUP_GAMES
            );

            return Ok(false);
        }

        let group_a = self.schedule.ranking(group_a());
        let group_b = self.schedule.ranking(group_b());

        let start = self.schedule.games().len();
        for (first, second) in group_a.into_iter().zip(group_b) {
            log::debug!("Pairing {} with {} in the finals", first, second);
            self.schedule
                .push_game(EntrantSpot::Entrant(first), EntrantSpot::Entrant(second));
        }
        self.schedule.commit_batch(start);

        Ok(true)
    }

    fn remove_update(&mut self) -> bool {
        match self.schedule.remove_batch() {
            Some(games) => {
                log::debug!("Removed {} final games", games.len());
                true
            }
            None => false,
        }
    }
}

fn group_a() -> [TeamId; GROUP_SIZE] {
    [TeamId(0), TeamId(1), TeamId(2), TeamId(3)]
}

fn group_b() -> [TeamId; GROUP_SIZE] {
    [TeamId(4), TeamId(5), TeamId(6), TeamId(7)]
}

#[cfg(test)]
mod tests {
    use crate::tests::roster;
    use crate::{EntrantSpot, Error, System, TeamId, TournamentKind};

    use super::Classic;

    fn pairs(tournament: &Classic) -> Vec<(usize, usize)> {
        tournament
            .games()
            .iter()
            .map(|game| match game.teams() {
                [EntrantSpot::Entrant(first), EntrantSpot::Entrant(second)] => {
                    (first.0, second.0)
                }
                teams => panic!("incomplete game {:?}", teams),
            })
            .collect()
    }

    /// Scores every group game, the first team wins 10:0.
    fn play_groups(tournament: &mut Classic) {
        for index in 1..=12 {
            tournament.set_score(index, 10, 0).unwrap();
        }
    }

    #[test]
    fn test_classic_roster_size() {
        for n in [0, 4, 7, 9, 16] {
            assert_eq!(
                Classic::new(roster(n).into_iter()).unwrap_err(),
                Error::InvalidRosterSize {
                    kind: TournamentKind::Classic,
                    requirement: "exactly 8 teams",
                    found: n,
                }
            );
        }
    }

    #[test]
    fn test_classic_groups() {
        let tournament = Classic::new(roster(8).into_iter()).unwrap();

        assert_eq!(
            pairs(&tournament),
            [
                (0, 1),
                (2, 3),
                (4, 5),
                (6, 7),
                (0, 2),
                (1, 3),
                (4, 6),
                (5, 7),
                (3, 0),
                (2, 1),
                (7, 4),
                (6, 5),
            ]
        );
        assert!(!tournament.has_finals());
    }

    #[test]
    fn test_classic_finals() {
        let mut tournament = Classic::new(roster(8).into_iter()).unwrap();

        for index in 1..=11 {
            tournament.set_score(index, 10, 0).unwrap();
        }
        assert_eq!(tournament.update_schedule(), Ok(false));
        assert_eq!(tournament.games().len(), 12);

        tournament.set_score(12, 10, 0).unwrap();
        assert_eq!(tournament.update_schedule(), Ok(true));
        assert_eq!(tournament.games().len(), 16);

        // Group A ranks 0, 2, 1, 3 and group B ranks 4, 6, 5, 7.
        assert_eq!(
            pairs(&tournament)[12..],
            [(0, 4), (2, 6), (1, 5), (3, 7)]
        );

        // The finals are only created once.
        assert_eq!(tournament.update_schedule(), Ok(false));
        assert_eq!(tournament.games().len(), 16);

        let record = tournament.schedule().record(TeamId(0)).unwrap();
        assert_eq!(record.points, 4);
        assert_eq!(record.score, 20);
    }

    #[test]
    fn test_classic_remove_update() {
        let mut tournament = Classic::new(roster(8).into_iter()).unwrap();
        assert!(!tournament.remove_update());

        play_groups(&mut tournament);
        assert_eq!(tournament.update_schedule(), Ok(true));

        assert!(tournament.remove_update());
        assert_eq!(tournament.games().len(), 12);

        assert_eq!(tournament.update_schedule(), Ok(true));
        assert_eq!(tournament.games().len(), 16);

        tournament.set_score(13, 3, 2).unwrap();
        assert!(!tournament.remove_update());
        assert_eq!(tournament.games().len(), 16);
    }
}
