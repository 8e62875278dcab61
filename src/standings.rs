//! The ranked standings of a tournament.
//!
//! [`Standings`] hold one [`Entry`] per team, ordered from best to worst: points, then
//! cumulative score, then roster position. Teams with equal points and score share a place.
use std::slice::Iter;

use crate::{Record, TeamId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Standings {
    entries: Vec<Entry>,
}

impl Standings {
    /// Creates the standings from `ranking`, which must be ordered from best to worst.
    pub(crate) fn new<I>(ranking: I) -> Self
    where
        I: IntoIterator<Item = (TeamId, Record)>,
    {
        let mut entries: Vec<Entry> = Vec::new();

        for (position, (team, record)) in ranking.into_iter().enumerate() {
            let place = match entries.last() {
                Some(prev) if prev.record == record => prev.place,
                _ => position + 1,
            };

            entries.push(Entry {
                team,
                place,
                record,
            });
        }

        Self { entries }
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Returns the entry of `team`.
    pub fn get(&self, team: TeamId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.team == team)
    }

    /// Returns the teams in ranked order.
    pub fn teams(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.entries.iter().map(|entry| entry.team)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Standings {
    type Item = &'a Entry;
    type IntoIter = Iter<'a, Entry>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A single row of the [`Standings`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entry {
    pub team: TeamId,
    /// The 1-based place of the team.
    pub place: usize,
    pub record: Record,
}
