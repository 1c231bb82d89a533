use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ball_outcome::{BallOutcome, OutcomeSource};
use crate::roster::{Player, Role, Roster};

pub const MAX_OVERS: u8 = 20;
pub const BALLS_PER_OVER: u8 = 6;
pub const MAX_WICKETS: u8 = 10;
pub const COMMENTARY_LIMIT: usize = 40;

const INNINGS_BALLS: u32 = MAX_OVERS as u32 * BALLS_PER_OVER as u32;

/// Slot 0 of every batting card accumulates wide/no-ball runs, so the card
/// always sums to the team total.
pub const EXTRAS_SLOT: usize = 0;
const EXTRAS_LABEL: &str = "Extras";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LivePhase {
    InningsOne,
    InningsTwo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    NotStarted,
    Live(LivePhase),
    /// Carries the live phase the match resumes into.
    Paused(LivePhase),
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: String,
    pub home: String,
    pub away: String,
    pub venue: String,
    pub toss: String,
    pub batting_first: String,
}

impl Fixture {
    /// The season's featured fixture.
    pub fn featured() -> Self {
        Self {
            id: "JPL09_M12".to_string(),
            home: "JJ".to_string(),
            away: "MM".to_string(),
            venue: "Motera Stadium, Ahmedabad".to_string(),
            toss: "Mumbai Mavericks won the toss and elected to bowl.".to_string(),
            batting_first: "JJ".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingEntry {
    pub player: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub out: bool,
}

impl BattingEntry {
    fn named(player: &str) -> Self {
        Self {
            player: player.to_string(),
            runs: 0,
            balls: 0,
            fours: 0,
            sixes: 0,
            out: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingEntry {
    pub player: String,
    /// Legal deliveries only; wides and no-balls do not count.
    pub balls: u32,
    pub runs: u32,
    pub wickets: u8,
}

impl BowlingEntry {
    fn named(player: &str) -> Self {
        Self {
            player: player.to_string(),
            balls: 0,
            runs: 0,
            wickets: 0,
        }
    }

    pub fn economy(&self) -> f64 {
        if self.balls == 0 {
            return 0.0;
        }
        self.runs as f64 * 6.0 / self.balls as f64
    }

    pub fn overs_label(&self) -> String {
        format!("{}.{}", self.balls / 6, self.balls % 6)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentaryEntry {
    pub at: DateTime<Utc>,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsClose {
    pub runs: u32,
    pub wickets: u8,
    pub overs: u8,
    pub balls: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub fixture: Fixture,
    pub phase: MatchPhase,
    pub batting_team: String,
    pub bowling_team: String,
    pub balls_in_over: u8,
    pub completed_overs: u8,
    pub runs: u32,
    pub wickets: u8,
    /// First-innings total + 1; set at the innings break.
    pub target: Option<u32>,
    pub current_run_rate: f64,
    /// Defined only while chasing.
    pub required_run_rate: Option<f64>,
    pub striker: usize,
    pub non_striker: usize,
    pub bowler: usize,
    pub batting_card: Vec<BattingEntry>,
    pub bowling_card: Vec<BowlingEntry>,
    pub first_innings: Option<InningsClose>,
    pub last_ball: Option<BallOutcome>,
    /// Most recent first, capped at [`COMMENTARY_LIMIT`].
    pub commentary: VecDeque<CommentaryEntry>,
    pub result: Option<String>,
}

impl MatchState {
    pub fn legal_balls_total(&self) -> u32 {
        self.completed_overs as u32 * BALLS_PER_OVER as u32 + self.balls_in_over as u32
    }

    pub fn overs_label(&self) -> String {
        format!("{}.{}", self.completed_overs, self.balls_in_over)
    }

    pub fn score_line(&self) -> String {
        format!(
            "{} {}-{} ({})",
            self.batting_team,
            self.runs,
            self.wickets,
            self.overs_label()
        )
    }

    pub fn is_live(&self) -> bool {
        matches!(self.phase, MatchPhase::Live(_))
    }
}

/// Ball-by-ball engine for one fixture. Owns an outcome source and a copy of
/// the catalog; `advance` is a reducer from one immutable state to the next.
pub struct MatchSimulation<S> {
    roster: Roster,
    source: S,
}

impl<S: OutcomeSource> MatchSimulation<S> {
    pub fn new(roster: Roster, source: S) -> Self {
        Self { roster, source }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn create(&self, fixture: Fixture) -> MatchState {
        let batting_team = fixture.batting_first.clone();
        let bowling_team = if fixture.batting_first == fixture.home {
            fixture.away.clone()
        } else {
            fixture.home.clone()
        };
        MatchState {
            fixture,
            phase: MatchPhase::NotStarted,
            batting_team,
            bowling_team,
            balls_in_over: 0,
            completed_overs: 0,
            runs: 0,
            wickets: 0,
            target: None,
            current_run_rate: 0.0,
            required_run_rate: None,
            striker: 0,
            non_striker: 0,
            bowler: 0,
            batting_card: Vec::new(),
            bowling_card: Vec::new(),
            first_innings: None,
            last_ball: None,
            commentary: VecDeque::new(),
            result: None,
        }
    }

    /// NotStarted -> first innings. Any other phase is returned unchanged.
    pub fn start(&self, state: &MatchState) -> MatchState {
        if state.phase != MatchPhase::NotStarted {
            return state.clone();
        }
        let mut next = state.clone();
        self.reset_cards(&mut next);
        next.phase = MatchPhase::Live(LivePhase::InningsOne);
        let message = format!(
            "{} vs {} underway at {}",
            self.roster.team_name(&next.batting_team),
            self.roster.team_name(&next.bowling_team),
            next.fixture.venue
        );
        push_commentary(&mut next, message);
        next
    }

    pub fn pause(&self, state: &MatchState) -> MatchState {
        let mut next = state.clone();
        if let MatchPhase::Live(phase) = next.phase {
            next.phase = MatchPhase::Paused(phase);
        }
        next
    }

    pub fn resume(&self, state: &MatchState) -> MatchState {
        let mut next = state.clone();
        if let MatchPhase::Paused(phase) = next.phase {
            next.phase = MatchPhase::Live(phase);
        }
        next
    }

    /// Consume one delivery and produce the next state. Ticking a state that
    /// is not live is a no-op, not an error, so interval callers need no
    /// special terminal handling.
    pub fn advance(&mut self, state: &MatchState) -> MatchState {
        let live = match state.phase {
            MatchPhase::Live(phase) => phase,
            _ => return state.clone(),
        };

        let outcome = self.source.next_outcome();
        let mut next = state.clone();
        let label = format!("{}.{}", next.completed_overs, next.balls_in_over + 1);
        let striker_name = next.batting_card[next.striker].player.clone();
        next.last_ball = Some(outcome);

        match outcome {
            BallOutcome::Wide | BallOutcome::NoBall => {
                next.runs += 1;
                next.batting_card[EXTRAS_SLOT].runs += 1;
                next.bowling_card[next.bowler].runs += 1;
            }
            BallOutcome::Wicket => {
                next.balls_in_over += 1;
                let striker = &mut next.batting_card[next.striker];
                striker.balls += 1;
                striker.out = true;
                next.wickets += 1;
                let bowler = &mut next.bowling_card[next.bowler];
                bowler.balls += 1;
                bowler.wickets += 1;
                if let Some(replacement) = self.next_batter(&next) {
                    let entry = BattingEntry::named(&replacement.name);
                    next.batting_card.push(entry);
                    next.striker = next.batting_card.len() - 1;
                }
            }
            BallOutcome::Runs(r) => {
                next.balls_in_over += 1;
                next.runs += r as u32;
                let striker = &mut next.batting_card[next.striker];
                striker.runs += r as u32;
                striker.balls += 1;
                if r == 4 {
                    striker.fours += 1;
                }
                if r == 6 {
                    striker.sixes += 1;
                }
                let bowler = &mut next.bowling_card[next.bowler];
                bowler.balls += 1;
                bowler.runs += r as u32;
                if r % 2 == 1 {
                    std::mem::swap(&mut next.striker, &mut next.non_striker);
                }
            }
        }

        if next.balls_in_over == BALLS_PER_OVER {
            next.balls_in_over = 0;
            next.completed_overs += 1;
            // End-of-over rotation applies on top of any mid-over swap.
            std::mem::swap(&mut next.striker, &mut next.non_striker);
            self.select_bowler(&mut next);
        }

        self.recompute_rates(&mut next, live);
        push_commentary(&mut next, format!("{label} {striker_name}: {}", outcome.tag()));

        match live {
            LivePhase::InningsOne => {
                if self.innings_over(&next) {
                    self.close_first_innings(&mut next);
                }
            }
            LivePhase::InningsTwo => {
                if let Some(target) = next.target {
                    if next.runs >= target {
                        let margin = MAX_WICKETS - next.wickets;
                        let message = format!(
                            "{} won by {} wickets",
                            self.roster.team_name(&next.batting_team),
                            margin
                        );
                        self.complete(&mut next, message);
                    } else if self.innings_over(&next) {
                        let margin = target - next.runs - 1;
                        let result = if margin == 0 {
                            "Match tied".to_string()
                        } else {
                            format!(
                                "{} won by {} runs",
                                self.roster.team_name(&next.bowling_team),
                                margin
                            )
                        };
                        self.complete(&mut next, result);
                    }
                }
            }
        }

        next
    }

    fn innings_over(&self, state: &MatchState) -> bool {
        state.wickets >= MAX_WICKETS
            || state.completed_overs >= MAX_OVERS
            // No replacement batter was available for the last wicket.
            || state.batting_card[state.striker].out
            || state.batting_card[state.non_striker].out
    }

    fn close_first_innings(&self, next: &mut MatchState) {
        next.first_innings = Some(InningsClose {
            runs: next.runs,
            wickets: next.wickets,
            overs: next.completed_overs,
            balls: next.balls_in_over,
        });
        let target = next.runs + 1;
        next.target = Some(target);
        std::mem::swap(&mut next.batting_team, &mut next.bowling_team);
        next.runs = 0;
        next.wickets = 0;
        next.completed_overs = 0;
        next.balls_in_over = 0;
        self.reset_cards(next);
        next.current_run_rate = 0.0;
        next.required_run_rate = Some(target as f64 * 6.0 / INNINGS_BALLS as f64);
        next.phase = MatchPhase::Live(LivePhase::InningsTwo);
        push_commentary(
            next,
            format!(
                "Innings break: {} need {} to win",
                self.roster.team_name(&next.batting_team),
                target
            ),
        );
    }

    fn complete(&self, next: &mut MatchState, result: String) {
        next.phase = MatchPhase::Completed;
        next.required_run_rate = None;
        push_commentary(next, result.clone());
        next.result = Some(result);
    }

    fn recompute_rates(&self, next: &mut MatchState, live: LivePhase) {
        let legal = next.legal_balls_total();
        next.current_run_rate = if legal == 0 {
            0.0
        } else {
            next.runs as f64 * 6.0 / legal as f64
        };
        next.required_run_rate = match (live, next.target) {
            (LivePhase::InningsTwo, Some(target)) => {
                let remaining = INNINGS_BALLS.saturating_sub(legal);
                if remaining == 0 {
                    Some(0.0)
                } else {
                    let needed = target.saturating_sub(next.runs);
                    Some(needed as f64 * 6.0 / remaining as f64)
                }
            }
            _ => None,
        };
    }

    /// Fresh cards for the current batting/bowling pairing: extras slot, the
    /// top two of the batting order, and the opening bowler.
    fn reset_cards(&self, next: &mut MatchState) {
        let mut card = vec![BattingEntry::named(EXTRAS_LABEL)];
        card.extend(
            self.roster
                .players(&next.batting_team)
                .take(2)
                .map(|p| BattingEntry::named(&p.name)),
        );
        next.batting_card = card;
        next.striker = 1;
        next.non_striker = 2;
        next.bowling_card = Vec::new();
        self.select_bowler(next);
    }

    fn next_batter(&self, state: &MatchState) -> Option<&Player> {
        self.roster
            .players(&state.batting_team)
            .find(|p| !state.batting_card.iter().any(|e| e.player == p.name))
    }

    /// Bowling rotates through the eligible attack in roster order, one over
    /// each. No further constraint is applied.
    fn select_bowler(&self, next: &mut MatchState) {
        let eligible: Vec<&Player> = {
            let bowlers: Vec<&Player> = self
                .roster
                .players(&next.bowling_team)
                .filter(|p| p.role != Role::Batter)
                .collect();
            if bowlers.is_empty() {
                self.roster.players(&next.bowling_team).collect()
            } else {
                bowlers
            }
        };
        if eligible.is_empty() {
            return;
        }
        let pick = &eligible[next.completed_overs as usize % eligible.len()];
        let idx = match next
            .bowling_card
            .iter()
            .position(|e| e.player == pick.name)
        {
            Some(idx) => idx,
            None => {
                next.bowling_card.push(BowlingEntry::named(&pick.name));
                next.bowling_card.len() - 1
            }
        };
        next.bowler = idx;
    }
}

fn push_commentary(next: &mut MatchState, text: String) {
    next.commentary.push_front(CommentaryEntry {
        at: Utc::now(),
        text,
    });
    next.commentary.truncate(COMMENTARY_LIMIT);
}
