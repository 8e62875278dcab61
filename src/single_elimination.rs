use crate::options::{TournamentOptionValues, TournamentOptions};
use crate::schedule::{Schedule, Scoring};
use crate::utils::NumExt;
use crate::{
    EntrantSpot, Entrants, Error, Game, GameId, Person, Result, System, Team, TeamId,
    TournamentKind,
};

/// A single elimination tournament.
///
/// The roster does not need to be a power of two. With `n` teams the bracket has
/// `m = n.next_power_of_two()` spots: `n - m / 2` first round games are played, the remaining
/// `m - n` teams receive a bye. Byes are stored as games with a single team and advance without
/// a score.
// The first round pairs the teams from both ends of the roster inwards, the teams in the middle
// receive the byes. Bye slots take the odd positions of the first round first so that a bye
// meets the winner of a played game in the second round whenever possible.
#[derive(Clone, Debug)]
pub struct SingleElimination {
    schedule: Schedule,
}

impl SingleElimination {
    /// Creates a new `SingleElimination` tournament with the given `teams`.
    pub fn new<I>(teams: I) -> Result<Self>
    where
        I: Iterator<Item = Team>,
    {
        Self::new_with_options(teams, TournamentOptionValues::default())
    }

    /// Creates a new `SingleElimination` tournament with the given `teams` and using the
    /// given `options`.
    ///
    /// If you don't need to specify the options consider using [`new`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRosterSize`] if `teams` is empty or an [`Error::Options`] if
    /// `options` contains values not described by [`options`].
    ///
    /// [`new`]: Self::new
    /// [`options`]: Self::options
    pub fn new_with_options<I, O>(teams: I, options: O) -> Result<Self>
    where
        I: Iterator<Item = Team>,
        O: Into<TournamentOptionValues>,
    {
        let mut options = options.into().merge(Self::options())?;
        let scoring = Scoring::new(&mut options);
        log::debug!("Using options: {:?}", scoring);

        let teams: Entrants<Team> = teams.collect();
        if teams.is_empty() {
            return Err(Error::InvalidRosterSize {
                kind: TournamentKind::SingleElimination,
                requirement: "at least 1 team",
                found: 0,
            });
        }

        log::debug!(
            "Creating new SingleElimination bracket with {} teams",
            teams.len()
        );

        let mut schedule = Schedule::new(teams, scoring);
        build(&mut schedule);

        log::debug!(
            "Created new SingleElimination bracket with {} games",
            schedule.games().len()
        );

        Ok(Self { schedule })
    }

    /// Returns the [`TournamentOptions`] accepted by this system.
    pub fn options() -> TournamentOptions {
        Scoring::options().build()
    }

    /// Returns the number of rounds in the bracket.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.schedule.teams().len().ilog2_ceil()
    }

    /// Returns the games of `round`, starting with the first round at 0. Bye slots are part
    /// of the first round.
    pub fn round(&self, round: usize) -> &[Game] {
        let size = self.schedule.teams().len().next_power_of_two();

        let mut start = 0;
        let mut len = size / 2;
        for _ in 0..round {
            start += len;
            len /= 2;
        }

        self.schedule.games().get(start..start + len).unwrap_or(&[])
    }

    /// Returns the winner of the tournament once the final is decided.
    pub fn champion(&self) -> Option<TeamId> {
        match self.schedule.teams().len() {
            1 => Some(TeamId(0)),
            _ => self.schedule.games().last().and_then(Game::winner),
        }
    }

    /// Places the winner of `id` into the next game. The spot is reset to `TBD` if the game no
    /// longer has a winner.
    fn propagate(&mut self, id: GameId) {
        let Some(game) = self.schedule.game(id) else {
            return;
        };

        let Some(next) = game.game_next() else {
            return;
        };

        let spot = match game.winner() {
            Some(team) => EntrantSpot::Entrant(team),
            None => EntrantSpot::TBD,
        };

        let Some(next_game) = self.schedule.game_mut(next) else {
            return;
        };

        let position = if next_game.game_1() == Some(id) { 0 } else { 1 };
        let concluded = next_game.is_concluded();

        let previous = next_game.set_team(position, spot);
        if previous == spot {
            return;
        }

        log::debug!(
            "Game {} moves {:?} into game {} (replacing {:?})",
            id.index(),
            spot,
            next.index(),
            previous
        );

        if concluded {
            log::warn!(
                "Game {} changed a team of the already scored game {}",
                id.index(),
                next.index()
            );
        }

        for spot in [previous, spot] {
            if let EntrantSpot::Entrant(team) = spot {
                self.schedule.recount(team);
            }
        }
    }
}

/// Builds all games of the bracket.
fn build(schedule: &mut Schedule) {
    let n = schedule.teams().len();

    // A single team wins without playing.
    if n < 2 {
        return;
    }

    let size = n.next_power_of_two();
    let slots = size / 2;
    let contested = n - slots;

    let mut byes = vec![false; slots];
    let mut remaining = size - n;
    for position in (1..slots).step_by(2).chain((0..slots).step_by(2).rev()) {
        if remaining == 0 {
            break;
        }

        byes[position] = true;
        remaining -= 1;
    }

    let mut round = Vec::with_capacity(slots);
    let mut next_pair = 0;
    let mut next_bye = contested;
    for is_bye in byes {
        let id = if is_bye {
            let team = TeamId(next_bye);
            next_bye += 1;

            schedule.push_game(EntrantSpot::Entrant(team), EntrantSpot::Empty)
        } else {
            let first = TeamId(next_pair);
            let second = TeamId(n - 1 - next_pair);
            next_pair += 1;

            schedule.push_game(EntrantSpot::Entrant(first), EntrantSpot::Entrant(second))
        };

        round.push(id);
    }

    while round.len() > 1 {
        round = round
            .chunks(2)
            .map(|pair| match_slots(schedule, pair[0], pair[1]))
            .collect();
    }
}

/// Creates the game fed by the slots `first` and `second`. A bye slot places its team directly
/// into the new game, a played game links to it.
fn match_slots(schedule: &mut Schedule, first: GameId, second: GameId) -> GameId {
    let bye = |id: GameId| {
        schedule
            .game(id)
            .filter(|game| game.is_bye())
            .and_then(|game| game.team_1().entrant())
    };

    match (bye(first), bye(second)) {
        (Some(first), Some(second)) => {
            schedule.push_game(EntrantSpot::Entrant(first), EntrantSpot::Entrant(second))
        }
        (Some(team), None) => match_team_and_slot(schedule, team, second),
        (None, Some(team)) => match_team_and_slot(schedule, team, first),
        (None, None) => match_games(schedule, first, second),
    }
}

fn match_games(schedule: &mut Schedule, first: GameId, second: GameId) -> GameId {
    let id = schedule.push_game(EntrantSpot::TBD, EntrantSpot::TBD);
    link(schedule, first, id, 0);
    link(schedule, second, id, 1);
    id
}

fn match_team_and_slot(schedule: &mut Schedule, team: TeamId, game: GameId) -> GameId {
    let id = schedule.push_game(EntrantSpot::Entrant(team), EntrantSpot::TBD);
    link(schedule, game, id, 1);
    id
}

fn link(schedule: &mut Schedule, from: GameId, to: GameId, position: usize) {
    if let Some(game) = schedule.game_mut(from) {
        game.set_next(to);
    }

    if let Some(game) = schedule.game_mut(to) {
        game.set_upstream(position, from);
    }
}

impl System for SingleElimination {
    #[inline]
    fn kind(&self) -> TournamentKind {
        TournamentKind::SingleElimination
    }

    #[inline]
    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn set_score(&mut self, index: usize, score_1: i64, score_2: i64) -> Result<()> {
        let id = self.schedule.set_score(index, score_1, score_2)?;
        self.propagate(id);
        Ok(())
    }

    #[inline]
    fn set_referees(&mut self, index: usize, referees: Vec<Person>) -> Result<()> {
        self.schedule.set_referees(index, referees)
    }

    /// The bracket is complete on construction.
    #[inline]
    fn update_schedule(&mut self) -> Result<bool> {
        Ok(false)
    }

    #[inline]
    fn remove_update(&mut self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::roster;
    use crate::{option_values, EntrantSpot, Error, GameId, GameResult, System, TeamId};

    use super::SingleElimination;

    #[test]
    fn test_single_elimination_sizes() {
        for n in 2..=33_usize {
            let tournament = SingleElimination::new(roster(n).into_iter()).unwrap();
            let size = n.next_power_of_two();

            assert_eq!(tournament.games().len(), size - 1, "{} teams", n);

            let first_round = tournament.round(0);
            assert_eq!(first_round.len(), size / 2);
            assert_eq!(
                first_round.iter().filter(|game| game.is_ready()).count(),
                n - size / 2
            );
            assert_eq!(
                first_round.iter().filter(|game| game.is_bye()).count(),
                size - n
            );

            // Every team is placed exactly once in the first round.
            let mut placed: Vec<_> = first_round
                .iter()
                .flat_map(|game| game.teams())
                .filter_map(EntrantSpot::entrant)
                .collect();
            placed.sort();
            assert_eq!(placed, (0..n).map(TeamId).collect::<Vec<_>>());

            // All rounds together make up the bracket.
            let total: usize = (0..tournament.rounds())
                .map(|round| tournament.round(round).len())
                .sum();
            assert_eq!(total, size - 1);
        }
    }

    #[test]
    fn test_single_elimination_five_teams() {
        let tournament = SingleElimination::new(roster(5).into_iter()).unwrap();
        let games = tournament.games();

        assert_eq!(games.len(), 7);
        assert_eq!(tournament.rounds(), 3);

        // First round: one played game and three byes.
        assert_eq!(
            games[0].teams(),
            [
                EntrantSpot::Entrant(TeamId(0)),
                EntrantSpot::Entrant(TeamId(4))
            ]
        );
        for (index, team) in [(1, 1), (2, 2), (3, 3)] {
            assert!(games[index].is_bye());
            assert_eq!(games[index].team_1(), EntrantSpot::Entrant(TeamId(team)));
        }

        // Second round: the bye teams are placed without any score.
        assert_eq!(
            games[4].teams(),
            [EntrantSpot::Entrant(TeamId(1)), EntrantSpot::TBD]
        );
        assert_eq!(games[4].game_1(), None);
        assert_eq!(games[4].game_2(), Some(GameId(0)));
        assert_eq!(games[0].game_next(), Some(GameId(4)));

        assert_eq!(
            games[5].teams(),
            [
                EntrantSpot::Entrant(TeamId(2)),
                EntrantSpot::Entrant(TeamId(3))
            ]
        );
        assert_eq!(games[5].game_1(), None);
        assert_eq!(games[5].game_2(), None);

        // Final.
        assert_eq!(games[6].teams(), [EntrantSpot::TBD, EntrantSpot::TBD]);
        assert_eq!(games[6].game_1(), Some(GameId(4)));
        assert_eq!(games[6].game_2(), Some(GameId(5)));
        assert_eq!(games[4].game_next(), Some(GameId(6)));
        assert_eq!(games[5].game_next(), Some(GameId(6)));

        assert_eq!(
            games[4].display(tournament.teams()).to_string(),
            "5| Team 1 0:0 Winner of game #1"
        );
    }

    #[test]
    fn test_single_elimination_byes_meet_winners() {
        let tournament = SingleElimination::new(roster(6).into_iter()).unwrap();
        let games = tournament.games();

        // Two played games, two byes. Each bye meets the winner of a played game.
        assert!(games[0].is_ready());
        assert!(games[1].is_bye());
        assert!(games[2].is_ready());
        assert!(games[3].is_bye());

        assert_eq!(games[0].teams()[1], EntrantSpot::Entrant(TeamId(5)));
        assert_eq!(games[2].teams()[1], EntrantSpot::Entrant(TeamId(4)));
        assert_eq!(games[1].team_1(), EntrantSpot::Entrant(TeamId(2)));
        assert_eq!(games[3].team_1(), EntrantSpot::Entrant(TeamId(3)));

        assert_eq!(games[4].team_1(), EntrantSpot::Entrant(TeamId(2)));
        assert_eq!(games[4].game_2(), Some(GameId(0)));
        assert_eq!(games[5].team_1(), EntrantSpot::Entrant(TeamId(3)));
        assert_eq!(games[5].game_2(), Some(GameId(2)));
    }

    #[test]
    fn test_single_elimination_propagation() {
        let mut tournament = SingleElimination::new(roster(5).into_iter()).unwrap();

        // The final is not ready yet.
        assert_eq!(
            tournament.set_score(7, 10, 2),
            Err(Error::GameNotReady { index: 7 })
        );
        // Byes are never scored.
        assert_eq!(
            tournament.set_score(2, 10, 2),
            Err(Error::GameNotReady { index: 2 })
        );

        tournament.set_score(1, 3, 15).unwrap();
        assert_eq!(
            tournament.games()[4].team_2(),
            EntrantSpot::Entrant(TeamId(4))
        );
        // Propagation only reaches the immediate next game.
        assert_eq!(tournament.games()[6].teams(), [EntrantSpot::TBD; 2]);

        tournament.set_score(5, 20, 8).unwrap();
        tournament.set_score(6, 4, 18).unwrap();
        assert_eq!(
            tournament.games()[6].teams(),
            [
                EntrantSpot::Entrant(TeamId(1)),
                EntrantSpot::Entrant(TeamId(3))
            ]
        );
        assert_eq!(tournament.champion(), None);

        tournament.set_score(7, 11, 30).unwrap();
        assert_eq!(tournament.games()[6].result(), GameResult::Win2);
        assert_eq!(tournament.champion(), Some(TeamId(3)));

        let record = tournament.schedule().record(TeamId(3)).unwrap();
        assert_eq!(record.points, 4);
        assert_eq!(record.score, 48);
    }

    #[test]
    fn test_single_elimination_correction() {
        let mut tournament = SingleElimination::new(roster(4).into_iter()).unwrap();

        tournament.set_score(1, 12, 2).unwrap();
        assert_eq!(
            tournament.games()[2].team_1(),
            EntrantSpot::Entrant(TeamId(0))
        );

        // Correcting the score moves the other team.
        tournament.set_score(1, 2, 12).unwrap();
        assert_eq!(
            tournament.games()[2].team_1(),
            EntrantSpot::Entrant(TeamId(3))
        );

        // A draw does not decide the game.
        tournament.set_score(1, 6, 5).unwrap();
        assert_eq!(tournament.games()[2].team_1(), EntrantSpot::TBD);
    }

    #[test]
    fn test_single_elimination_lenient() {
        let mut tournament = SingleElimination::new_with_options(
            roster(4).into_iter(),
            option_values!("strict" => false),
        )
        .unwrap();

        assert!(tournament.set_score(3, 10, 0).is_ok());
        assert_eq!(tournament.games()[2].result(), GameResult::Win1);
        assert_eq!(tournament.champion(), None);
    }

    #[test]
    fn test_single_elimination_small() {
        assert_eq!(
            SingleElimination::new(roster(0).into_iter()).unwrap_err(),
            Error::InvalidRosterSize {
                kind: crate::TournamentKind::SingleElimination,
                requirement: "at least 1 team",
                found: 0,
            }
        );

        let tournament = SingleElimination::new(roster(1).into_iter()).unwrap();
        assert!(tournament.games().is_empty());
        assert_eq!(tournament.rounds(), 0);
        assert_eq!(tournament.champion(), Some(TeamId(0)));

        let mut tournament = SingleElimination::new(roster(2).into_iter()).unwrap();
        assert_eq!(tournament.games().len(), 1);
        tournament.set_score(1, 0, 9).unwrap();
        assert_eq!(tournament.champion(), Some(TeamId(1)));
    }

    #[test]
    fn test_single_elimination_no_progression() {
        let mut tournament = SingleElimination::new(roster(8).into_iter()).unwrap();
        for index in 1..=4 {
            tournament.set_score(index, 10, 0).unwrap();
        }

        assert_eq!(tournament.update_schedule(), Ok(false));
        assert!(!tournament.remove_update());
        assert_eq!(tournament.games().len(), 7);
    }
}
