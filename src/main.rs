use std::env;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use rand::RngCore;

use jpl_live::ball_outcome::WeightedOutcomes;
use jpl_live::match_sim::{EXTRAS_SLOT, Fixture, MatchSimulation, MatchState};
use jpl_live::roster::Roster;
use jpl_live::sim_feed::{SimCommand, SimDelta, spawn_sim_feed};
use jpl_live::squad::{CREDIT_BUDGET, Squad};
use jpl_live::squad_recommend::{pick_captaincy, smart_fill};

fn main() -> Result<()> {
    let roster = Roster::embedded()?;

    let seed = env::var("SIM_SEED")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or_else(|| rand::thread_rng().next_u64());
    let tick = Duration::from_millis(
        env::var("SIM_TICK_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(1000)
            .max(10),
    );

    let fixture = Fixture::featured();
    println!(
        "JPL 9: {} vs {} at {} (seed {seed})",
        roster.team_name(&fixture.home),
        roster.team_name(&fixture.away),
        fixture.venue
    );

    let sim = MatchSimulation::new(roster.clone(), WeightedOutcomes::seeded(seed));
    let state = sim.create(fixture);

    let (tx, rx) = mpsc::channel();
    let (_cmd_tx, cmd_rx) = mpsc::channel::<SimCommand>();
    let handle = spawn_sim_feed(sim, state, tick, tx, cmd_rx);

    let mut over_mark = (0u8, String::new());
    for delta in rx {
        match delta {
            SimDelta::Log(line) => println!("{line}"),
            SimDelta::Snapshot(snap) => {
                let mark = (snap.completed_overs, snap.batting_team.clone());
                if snap.balls_in_over == 0 && snap.completed_overs > 0 && mark != over_mark {
                    over_mark = mark;
                    println!(
                        "       end of over {}: {}",
                        snap.completed_overs,
                        snap.score_line()
                    );
                }
            }
        }
    }

    let final_state = handle
        .join()
        .map_err(|_| anyhow!("simulation thread panicked"))?;
    print_scorecards(&roster, &final_state);

    println!();
    println!("FLAMES AI suggested XI ({CREDIT_BUDGET} credit budget)");
    let squad = smart_fill(roster.all_players(), &Squad::new(), CREDIT_BUDGET);
    for slot in squad.slots() {
        println!(
            "  {:<16} {:<3} {:>5.1} cr",
            slot.name,
            slot.role.label(),
            slot.credit
        );
    }
    println!(
        "  spent {:.1}, remaining {:.1}",
        squad.spent(),
        squad.remaining_credits()
    );
    if let Some(pick) = pick_captaincy(roster.all_players()) {
        println!(
            "  captain: {}  vice-captain: {}",
            pick.captain.name, pick.vice_captain.name
        );
    }

    Ok(())
}

fn print_scorecards(roster: &Roster, state: &MatchState) {
    println!();
    if let Some(close) = &state.first_innings {
        println!(
            "1st innings: {} {}-{} ({}.{})",
            roster.team_name(&state.bowling_team),
            close.runs,
            close.wickets,
            close.overs,
            close.balls
        );
    }
    println!(
        "2nd innings: {} {}-{} ({})",
        roster.team_name(&state.batting_team),
        state.runs,
        state.wickets,
        state.overs_label()
    );

    println!();
    println!("Batting: {}", roster.team_name(&state.batting_team));
    for (idx, entry) in state.batting_card.iter().enumerate() {
        if idx == EXTRAS_SLOT {
            continue;
        }
        let status = if entry.out { "out" } else { "not out" };
        println!(
            "  {:<16} {:>3} ({} balls, {}x4, {}x6) {}",
            entry.player, entry.runs, entry.balls, entry.fours, entry.sixes, status
        );
    }
    println!("  {:<16} {:>3}", "Extras", state.batting_card[EXTRAS_SLOT].runs);

    println!();
    println!("Bowling: {}", roster.team_name(&state.bowling_team));
    for entry in &state.bowling_card {
        println!(
            "  {:<16} {:>4} ov {:>3} runs {} wkts (econ {:.2})",
            entry.player,
            entry.overs_label(),
            entry.runs,
            entry.wickets,
            entry.economy()
        );
    }

    if let Some(result) = &state.result {
        println!();
        println!("RESULT: {result}");
    }
}
