#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The role of a [`Person`] within a team or a game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Role {
    #[default]
    Player,
    Captain,
    Coach,
    Referee,
}

/// A person taking part in a tournament.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Person {
    name: String,
    school: String,
    role: Role,
}

impl Person {
    /// The name given to [`Person::unknown`].
    pub const UNKNOWN_NAME: &'static str = "NoName";

    pub fn new<N, S>(name: N, school: S, role: Role) -> Self
    where
        N: Into<String>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            school: school.into(),
            role,
        }
    }

    /// Returns the placeholder for a slot that has not been populated.
    #[inline]
    pub fn unknown() -> Self {
        Self::new(Self::UNKNOWN_NAME, "", Role::Player)
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn school(&self) -> &str {
        &self.school
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }
}

/// A team as supplied by the roster.
///
/// The name identifies the team for the caller and must be unique within one tournament. The
/// scheduler itself only refers to teams by their [`TeamId`].
///
/// [`TeamId`]: crate::TeamId
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Team {
    name: String,
    coach: Person,
    captain: Person,
    players: Vec<Person>,
}

impl Team {
    /// The name given to [`Team::unknown`].
    pub const UNKNOWN_NAME: &'static str = "Unknown";

    /// Creates a new `Team` without players and with unknown coach and captain.
    pub fn new<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        Self {
            name: name.into(),
            coach: Person::unknown(),
            captain: Person::unknown(),
            players: Vec::new(),
        }
    }

    /// Returns the placeholder for a bracket slot that is not determined yet.
    #[inline]
    pub fn unknown() -> Self {
        Self::new(Self::UNKNOWN_NAME)
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }

    pub fn with_coach(mut self, coach: Person) -> Self {
        self.coach = coach;
        self
    }

    pub fn with_captain(mut self, captain: Person) -> Self {
        self.captain = captain;
        self
    }

    pub fn with_players<I>(mut self, players: I) -> Self
    where
        I: IntoIterator<Item = Person>,
    {
        self.players = players.into_iter().collect();
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn coach(&self) -> &Person {
        &self.coach
    }

    #[inline]
    pub fn captain(&self) -> &Person {
        &self.captain
    }

    #[inline]
    pub fn players(&self) -> &[Person] {
        &self.players
    }
}
