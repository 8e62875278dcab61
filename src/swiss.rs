use std::collections::HashSet;

use crate::options::{TournamentOptionValues, TournamentOptions};
use crate::schedule::{Schedule, Scoring};
use crate::{
    EntrantSpot, Entrants, Error, Game, Person, Result, System, Team, TeamId, TournamentKind,
};

/// A swiss tournament for an even number of teams.
///
/// Every round pairs teams with a similar record while never pairing two teams a second time.
/// A new round is created by [`update_schedule`] once all games of the current round have
/// concluded.
///
/// # Implementation notes
///
/// Teams are ranked by points, then cumulative score, then their roster position. The highest
/// ranked team is paired with the next ranked team it has not played yet. If the remaining
/// teams cannot be paired without a rematch the last pairing is released and the next
/// candidate is tried. The search is bounded by the `pairing_attempts` option and fails with
/// [`Error::PairingExhausted`] once the budget is spent.
///
/// [`update_schedule`]: System::update_schedule
#[derive(Clone, Debug)]
pub struct Swiss {
    schedule: Schedule,
    /// For every team the opponents it has not played yet.
    not_played: Vec<HashSet<TeamId>>,
    options: SwissOptions,
    rounds: usize,
}

impl Swiss {
    /// Creates a new `Swiss` tournament using the given `teams` and creates the first round.
    pub fn new<I>(teams: I) -> Result<Self>
    where
        I: Iterator<Item = Team>,
    {
        Self::new_with_options(teams, TournamentOptionValues::default())
    }

    /// Creates a new `Swiss` tournament using the given `teams` and using the given `options`.
    ///
    /// If you don't need to specify the options consider using [`new`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRosterSize`] unless `teams` contains an even number of at least
    /// 6 teams.
    ///
    /// [`new`]: Self::new
    pub fn new_with_options<I, O>(teams: I, options: O) -> Result<Self>
    where
        I: Iterator<Item = Team>,
        O: Into<TournamentOptionValues>,
    {
        let mut options = options.into().merge(Self::options())?;
        let scoring = Scoring::new(&mut options);
        let options = SwissOptions::new(options);
        log::debug!("Using options: {:?}, {:?}", scoring, options);

        let teams: Entrants<Team> = teams.collect();
        if teams.len() < 6 || teams.len() % 2 != 0 {
            return Err(Error::InvalidRosterSize {
                kind: TournamentKind::Swiss,
                requirement: "an even number of at least 6 teams",
                found: teams.len(),
            });
        }

        log::debug!("Creating new Swiss tournament with {} teams", teams.len());

        let not_played = teams
            .ids()
            .map(|team| teams.ids().filter(|other| *other != team).collect())
            .collect();

        let mut this = Self {
            schedule: Schedule::new(teams, scoring),
            not_played,
            options,
            rounds: 0,
        };

        this.create_round()?;

        Ok(this)
    }

    /// Returns the [`TournamentOptions`] accepted by this system.
    pub fn options() -> TournamentOptions {
        Scoring::options()
            .option(
                "rounds",
                "How many rounds to play. 0 plays until no new pairing is possible.",
                4u64,
            )
            .option(
                "pairing_attempts",
                "How many pairings to try per round. 0 derives the limit from the team count.",
                0u64,
            )
            .build()
    }

    /// Returns the number of rounds created so far.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Returns the games of `round`, starting with the first round at 0.
    pub fn round(&self, round: usize) -> &[Game] {
        let start = round * self.games_per_round();
        let end = start + self.games_per_round();

        self.schedule.games().get(start..end).unwrap_or(&[])
    }

    /// Returns `true` if `first` and `second` have already been paired.
    #[inline]
    pub fn has_played(&self, first: TeamId, second: TeamId) -> bool {
        self.not_played
            .get(first.0)
            .map(|opponents| first != second && !opponents.contains(&second))
            .unwrap_or(false)
    }

    #[inline]
    fn games_per_round(&self) -> usize {
        self.schedule.teams().len() / 2
    }

    /// The maximum number of rounds. A team can play at most `n - 1` different opponents.
    fn max_rounds(&self) -> usize {
        let limit = self.schedule.teams().len() - 1;

        match self.options.rounds {
            0 => limit,
            rounds => rounds.min(limit),
        }
    }

    fn create_round(&mut self) -> Result<()> {
        let round = self.rounds + 1;
        let ranking = self.schedule.ranking(self.schedule.teams().ids());

        let attempts = match self.options.pairing_attempts {
            0 => self.schedule.teams().len().pow(3),
            n => n,
        };
        let mut budget = attempts;

        let mut pairs = Vec::with_capacity(self.games_per_round());
        if !self.search(&ranking, &mut pairs, &mut budget) {
            log::debug!(
                "Failed to pair round {} after {} attempts",
                round,
                attempts - budget
            );

            return Err(Error::PairingExhausted {
                round,
                attempts: attempts - budget,
            });
        }

        let start = self.schedule.games().len();
        for (first, second) in pairs {
            self.schedule
                .push_game(EntrantSpot::Entrant(first), EntrantSpot::Entrant(second));

            self.not_played[first.0].remove(&second);
            self.not_played[second.0].remove(&first);
        }

        // The first round is part of the initial schedule and cannot be removed.
        if round > 1 {
            self.schedule.commit_batch(start);
        }

        self.rounds = round;

        log::debug!(
            "Created round {} using {} pairing attempts",
            round,
            attempts - budget
        );

        Ok(())
    }

    /// Pairs all teams in `pool`, which is ordered from best to worst. Returns `false` if no
    /// pairing without rematches was found within `budget` attempts.
    fn search(
        &self,
        pool: &[TeamId],
        pairs: &mut Vec<(TeamId, TeamId)>,
        budget: &mut usize,
    ) -> bool {
        let Some((&top, rest)) = pool.split_first() else {
            return true;
        };

        for (position, &opponent) in rest.iter().enumerate() {
            if !self.not_played[top.0].contains(&opponent) {
                continue;
            }

            if *budget == 0 {
                return false;
            }
            *budget -= 1;

            pairs.push((top, opponent));

            let remaining: Vec<_> = rest
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != position)
                .map(|(_, team)| *team)
                .collect();

            if self.search(&remaining, pairs, budget) {
                return true;
            }

            log::trace!("Releasing pairing {} - {}", top, opponent);
            pairs.pop();
        }

        false
    }
}

impl System for Swiss {
    #[inline]
    fn kind(&self) -> TournamentKind {
        TournamentKind::Swiss
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
        if self.rounds >= self.max_rounds() {
            log::debug!("All {} rounds have been created", self.rounds);
            return Ok(false);
        }

        let start = (self.rounds - 1) * self.games_per_round();
        let concluded = self
            .schedule
            .concluded(start..start + self.games_per_round());

        if concluded < self.games_per_round() {
            log::debug!(
                "Round {} is not done yet: {}/{} games concluded",
                self.rounds,
                concluded,
                self.games_per_round()
            );

            return Ok(false);
        }

        self.create_round()?;
        Ok(true)
    }

    fn remove_update(&mut self) -> bool {
        let Some(games) = self.schedule.remove_batch() else {
            return false;
        };

        for game in &games {
            if let [EntrantSpot::Entrant(first), EntrantSpot::Entrant(second)] = game.teams() {
                self.not_played[first.0].insert(second);
                self.not_played[second.0].insert(first);
            }
        }

        log::debug!("Removed round {} ({} games)", self.rounds, games.len());
        self.rounds -= 1;

        true
    }
}

#[derive(Copy, Clone, Debug)]
struct SwissOptions {
    rounds: usize,
    pairing_attempts: usize,
}

impl SwissOptions {
    fn new(mut options: TournamentOptionValues) -> Self {
        let mut this = Self::default();

        if let Some(val) = options.take("rounds") {
            this.rounds = usize::try_from(val.unwrap_u64_or(4)).unwrap_or(usize::MAX);
        }

        if let Some(val) = options.take("pairing_attempts") {
            this.pairing_attempts = usize::try_from(val.unwrap_u64_or(0)).unwrap_or(usize::MAX);
        }

        this
    }
}

impl Default for SwissOptions {
    fn default() -> Self {
        Self {
            rounds: 4,
            pairing_attempts: 0,
        }
    }
}
