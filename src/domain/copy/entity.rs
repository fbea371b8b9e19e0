use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::movie::Movie;
use crate::domain::DomainError;

/// A stack of identical physical copies of one Movie owned by one User
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieCopy {
    /// Database identity, `None` until inserted
    pub id: Option<i64>,

    /// The catalog entry this copy is of (loaded together with the copy)
    pub movie: Movie,

    /// Owning user, set when the copy is attached to a user
    pub user_id: Option<i64>,

    pub condition: CopyCondition,

    pub medium: CopyMedium,

    /// Number of units; a row never exists with zero
    pub quantity: u32,
}

/// Physical state of the disc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CopyCondition {
    #[serde(rename = "bueno")]
    Good,
    #[serde(rename = "gastado")]
    Worn,
    #[serde(rename = "dañado")]
    Damaged,
}

/// Disc format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CopyMedium {
    #[serde(rename = "dvd")]
    Dvd,
    #[serde(rename = "blue-ray")]
    BluRay,
}

/// Outcome of removing a single unit from a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitRemoval {
    /// Quantity went down by one, the row stays
    Decremented { remaining: u32 },
    /// That was the last unit, the row must be deleted
    Exhausted,
}

impl MovieCopy {
    pub fn new(movie: Movie, condition: CopyCondition, medium: CopyMedium, quantity: u32) -> Self {
        Self {
            id: None,
            movie,
            user_id: None,
            condition,
            medium,
            quantity,
        }
    }

    /// Take one unit away.
    /// A copy holding a single unit is never decremented to zero; the caller
    /// deletes it instead.
    pub fn remove_unit(&mut self) -> UnitRemoval {
        if self.quantity > 1 {
            self.quantity -= 1;
            UnitRemoval::Decremented {
                remaining: self.quantity,
            }
        } else {
            UnitRemoval::Exhausted
        }
    }

    /// Case-insensitive substring match on movie title, condition or medium
    pub fn matches_filter(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let needle = filter.to_lowercase();
        self.movie.title.to_lowercase().contains(&needle)
            || self.condition.as_str().contains(&needle)
            || self.medium.as_str().contains(&needle)
    }
}

impl CopyCondition {
    pub const ALL: [CopyCondition; 3] = [
        CopyCondition::Good,
        CopyCondition::Worn,
        CopyCondition::Damaged,
    ];

    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyCondition::Good => "bueno",
            CopyCondition::Worn => "gastado",
            CopyCondition::Damaged => "dañado",
        }
    }
}

impl CopyMedium {
    pub const ALL: [CopyMedium; 2] = [CopyMedium::Dvd, CopyMedium::BluRay];

    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyMedium::Dvd => "dvd",
            CopyMedium::BluRay => "blue-ray",
        }
    }
}

impl std::fmt::Display for CopyCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for CopyMedium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CopyCondition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bueno" => Ok(CopyCondition::Good),
            "gastado" => Ok(CopyCondition::Worn),
            "dañado" => Ok(CopyCondition::Damaged),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown copy condition '{}'",
                other
            ))),
        }
    }
}

impl FromStr for CopyMedium {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dvd" => Ok(CopyMedium::Dvd),
            "blue-ray" => Ok(CopyMedium::BluRay),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown copy medium '{}'",
                other
            ))),
        }
    }
}
