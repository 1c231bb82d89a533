use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Fantasy role buckets. Enumeration order matters: composition targets and
/// tie-breaks in the recommendation engine follow this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Batter,
    AllRounder,
    Bowler,
}

pub const ROLES: [Role; 3] = [Role::Batter, Role::AllRounder, Role::Bowler];

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Batter => "BAT",
            Role::AllRounder => "AR",
            Role::Bowler => "BWL",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub short_code: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub team: String,
    pub name: String,
    pub role: Role,
    pub credit: f64,
    pub season_runs: u32,
    pub season_wickets: u32,
    pub strike_rate: f64,
    pub economy: f64,
    /// Recent-form sample, oldest first, each value in 0..=100.
    pub form: Vec<u8>,
}

impl Player {
    pub fn form_average(&self) -> f64 {
        if self.form.is_empty() {
            return 0.0;
        }
        self.form.iter().map(|&v| v as f64).sum::<f64>() / self.form.len() as f64
    }
}

/// Read-only player/team catalog. Created once at startup and passed by
/// reference into the simulation and recommendation engines; nothing in the
/// crate mutates it after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    teams: Vec<Team>,
    players: Vec<Player>,
}

impl Roster {
    /// Load the embedded season catalog.
    pub fn embedded() -> Result<Self> {
        Self::from_json(include_str!("../assets/roster_jpl.json"))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let roster: Roster = serde_json::from_str(raw).context("parse roster catalog")?;
        roster.validate()?;
        Ok(roster)
    }

    fn validate(&self) -> Result<()> {
        if self.teams.is_empty() {
            bail!("roster has no teams");
        }
        let form_len = self
            .players
            .first()
            .map(|p| p.form.len())
            .unwrap_or_default();
        for p in &self.players {
            if self.team(&p.team).is_none() {
                bail!("player {} references unknown team {}", p.id, p.team);
            }
            if p.credit <= 0.0 {
                bail!("player {} has non-positive credit", p.id);
            }
            if p.form.len() != form_len {
                bail!("player {} has a form sample of unexpected length", p.id);
            }
            if p.form.iter().any(|&v| v > 100) {
                bail!("player {} has a form value above 100", p.id);
            }
        }
        Ok(())
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.team(id).map(|t| t.name.as_str()).unwrap_or(id)
    }

    /// Players of one team, in catalog order. Catalog order doubles as the
    /// batting order in the simulation.
    pub fn players(&self, team_id: &str) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| p.team == team_id)
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn all_players(&self) -> &[Player] {
        &self.players
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_loads() {
        let roster = Roster::embedded().expect("embedded catalog should parse");
        assert_eq!(roster.teams().len(), 6);
        assert!(roster.team("JJ").is_some());
        assert_eq!(roster.team_name("MM"), "Mumbai Mavericks");
    }

    #[test]
    fn featured_teams_field_full_elevens() {
        let roster = Roster::embedded().unwrap();
        for team in ["JJ", "MM"] {
            assert_eq!(roster.players(team).count(), 11, "team {team}");
            let bowlers = roster
                .players(team)
                .filter(|p| p.role != Role::Batter)
                .count();
            assert!(bowlers >= 4, "team {team} needs enough bowling options");
        }
    }

    #[test]
    fn form_samples_are_uniform_length() {
        let roster = Roster::embedded().unwrap();
        let len = roster.all_players()[0].form.len();
        assert!(len > 0);
        assert!(roster.all_players().iter().all(|p| p.form.len() == len));
    }

    #[test]
    fn form_average_of_known_player() {
        let roster = Roster::embedded().unwrap();
        let shah = roster.player("JJ01").unwrap();
        let mean = shah.form.iter().map(|&v| v as f64).sum::<f64>() / shah.form.len() as f64;
        assert_eq!(shah.form_average(), mean);
    }

    #[test]
    fn unknown_team_reference_is_rejected() {
        let raw = r##"{
            "teams": [{ "id": "T1", "name": "T", "short_code": "T1", "color": "#fff" }],
            "players": [{ "id": "X1", "team": "ZZ", "name": "X", "role": "Batter",
                          "credit": 8.0, "season_runs": 10, "season_wickets": 0,
                          "strike_rate": 100.0, "economy": 0.0, "form": [10] }]
        }"##;
        assert!(Roster::from_json(raw).is_err());
    }
}
