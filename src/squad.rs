use std::fmt;

use serde::{Deserialize, Serialize};

use crate::roster::{Player, Role};

pub const SQUAD_SIZE: usize = 11;
pub const CREDIT_BUDGET: f64 = 100.0;

/// Why a squad operation was refused. These are expected outcomes the caller
/// checks, never failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquadRejection {
    AlreadySelected,
    SquadFull,
    OverBudget,
    NotSelected,
    CaptaincyClash,
    CaptaincyUnset,
    SquadIncomplete,
}

impl fmt::Display for SquadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SquadRejection::AlreadySelected => "player is already in the squad",
            SquadRejection::SquadFull => "squad already has 11 players",
            SquadRejection::OverBudget => "not enough credits left",
            SquadRejection::NotSelected => "player is not in the squad",
            SquadRejection::CaptaincyClash => "captain and vice-captain must differ",
            SquadRejection::CaptaincyUnset => "captain and vice-captain are not both set",
            SquadRejection::SquadIncomplete => "squad must have exactly 11 players",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadSlot {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub credit: f64,
}

impl SquadSlot {
    fn of(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            role: player.role,
            credit: player.credit,
        }
    }
}

/// A user's fantasy XI under the 100-credit cap. Grows only through
/// validated adds; captaincy is enforced distinct at assignment time rather
/// than just at contest join.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    slots: Vec<SquadSlot>,
    captain: Option<String>,
    vice_captain: Option<String>,
}

impl Squad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[SquadSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.slots.iter().any(|s| s.id == player_id)
    }

    pub fn spent(&self) -> f64 {
        self.slots.iter().map(|s| s.credit).sum()
    }

    pub fn remaining_credits(&self) -> f64 {
        CREDIT_BUDGET - self.spent()
    }

    pub fn role_count(&self, role: Role) -> usize {
        self.slots.iter().filter(|s| s.role == role).count()
    }

    pub fn captain(&self) -> Option<&str> {
        self.captain.as_deref()
    }

    pub fn vice_captain(&self) -> Option<&str> {
        self.vice_captain.as_deref()
    }

    pub fn add(&mut self, player: &Player) -> Result<(), SquadRejection> {
        if self.contains(&player.id) {
            return Err(SquadRejection::AlreadySelected);
        }
        if self.slots.len() >= SQUAD_SIZE {
            return Err(SquadRejection::SquadFull);
        }
        if self.spent() + player.credit > CREDIT_BUDGET {
            return Err(SquadRejection::OverBudget);
        }
        self.slots.push(SquadSlot::of(player));
        Ok(())
    }

    /// Removes the player if present; captaincy pointing at them is cleared.
    pub fn remove(&mut self, player_id: &str) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.id != player_id);
        if self.slots.len() == before {
            return false;
        }
        if self.captain.as_deref() == Some(player_id) {
            self.captain = None;
        }
        if self.vice_captain.as_deref() == Some(player_id) {
            self.vice_captain = None;
        }
        true
    }

    pub fn set_captain(&mut self, player_id: &str) -> Result<(), SquadRejection> {
        if !self.contains(player_id) {
            return Err(SquadRejection::NotSelected);
        }
        if self.vice_captain.as_deref() == Some(player_id) {
            return Err(SquadRejection::CaptaincyClash);
        }
        self.captain = Some(player_id.to_string());
        Ok(())
    }

    pub fn set_vice_captain(&mut self, player_id: &str) -> Result<(), SquadRejection> {
        if !self.contains(player_id) {
            return Err(SquadRejection::NotSelected);
        }
        if self.captain.as_deref() == Some(player_id) {
            return Err(SquadRejection::CaptaincyClash);
        }
        self.vice_captain = Some(player_id.to_string());
        Ok(())
    }

    /// Gate for the contest-join action: a full XI with a distinct captain
    /// and vice-captain.
    pub fn validate_for_contest(&self) -> Result<(), SquadRejection> {
        if self.slots.len() != SQUAD_SIZE {
            return Err(SquadRejection::SquadIncomplete);
        }
        match (&self.captain, &self.vice_captain) {
            (Some(cap), Some(vice)) if cap == vice => Err(SquadRejection::CaptaincyClash),
            (Some(_), Some(_)) => Ok(()),
            _ => Err(SquadRejection::CaptaincyUnset),
        }
    }
}
