use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::ball_outcome::OutcomeSource;
use crate::match_sim::{MatchSimulation, MatchState};

/// Control messages for a running feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCommand {
    Pause,
    Resume,
    Stop,
}

/// Updates published to the host. `Log` lines carry the commentary stream in
/// chronological order; `Snapshot` is the full state after each delivery.
#[derive(Debug, Clone)]
pub enum SimDelta {
    Snapshot(Box<MatchState>),
    Log(String),
}

/// Drives one fixture on a fixed tick from its own thread, the single owner
/// of the live state. Commands are drained both before and after the tick
/// sleep, so a pause observed during the wait wins over the pending ball:
/// nothing is bowled after a pause lands, and a resume waits a full fresh
/// interval before the next delivery.
pub fn spawn_sim_feed<S>(
    mut sim: MatchSimulation<S>,
    state: MatchState,
    tick: Duration,
    tx: Sender<SimDelta>,
    cmd_rx: Receiver<SimCommand>,
) -> JoinHandle<MatchState>
where
    S: OutcomeSource + Send + 'static,
{
    thread::spawn(move || {
        let mut state = sim.start(&state);
        let _ = tx.send(SimDelta::Log(format!("[INFO] {}", state.fixture.toss)));
        send_new_commentary(&tx, None, &state);

        loop {
            match drain_commands(&sim, &mut state, &cmd_rx, &tx) {
                Drained::Stop => return state,
                Drained::Disconnected => return state,
                Drained::Open => {}
            }

            if state.phase == crate::match_sim::MatchPhase::Completed {
                return state;
            }

            if !state.is_live() {
                // Paused (or never started): block until the next command.
                match cmd_rx.recv() {
                    Ok(cmd) => {
                        if apply_command(&sim, &mut state, cmd, &tx) {
                            return state;
                        }
                        continue;
                    }
                    Err(_) => return state,
                }
            }

            thread::sleep(tick);
            match drain_commands(&sim, &mut state, &cmd_rx, &tx) {
                Drained::Stop => return state,
                Drained::Disconnected => return state,
                Drained::Open => {}
            }
            if !state.is_live() {
                continue;
            }

            let prev = state.clone();
            state = sim.advance(&prev);
            send_new_commentary(&tx, Some(&prev), &state);
            let _ = tx.send(SimDelta::Snapshot(Box::new(state.clone())));
        }
    })
}

enum Drained {
    Open,
    Stop,
    Disconnected,
}

fn drain_commands<S: OutcomeSource>(
    sim: &MatchSimulation<S>,
    state: &mut MatchState,
    cmd_rx: &Receiver<SimCommand>,
    tx: &Sender<SimDelta>,
) -> Drained {
    loop {
        match cmd_rx.try_recv() {
            Ok(cmd) => {
                if apply_command(sim, state, cmd, tx) {
                    return Drained::Stop;
                }
            }
            Err(TryRecvError::Empty) => return Drained::Open,
            Err(TryRecvError::Disconnected) => return Drained::Disconnected,
        }
    }
}

/// Returns true when the feed should shut down.
fn apply_command<S: OutcomeSource>(
    sim: &MatchSimulation<S>,
    state: &mut MatchState,
    cmd: SimCommand,
    tx: &Sender<SimDelta>,
) -> bool {
    match cmd {
        SimCommand::Pause => {
            *state = sim.pause(state);
            let _ = tx.send(SimDelta::Log("[INFO] Simulation paused".to_string()));
            false
        }
        SimCommand::Resume => {
            *state = sim.resume(state);
            let _ = tx.send(SimDelta::Log("[INFO] Simulation resumed".to_string()));
            false
        }
        SimCommand::Stop => true,
    }
}

/// Publish commentary entries added since `prev`, oldest first.
fn send_new_commentary(tx: &Sender<SimDelta>, prev: Option<&MatchState>, state: &MatchState) {
    let boundary = prev.and_then(|p| p.commentary.front());
    let fresh: Vec<&str> = state
        .commentary
        .iter()
        .take_while(|entry| Some(*entry) != boundary)
        .map(|entry| entry.text.as_str())
        .collect();
    for text in fresh.into_iter().rev() {
        let _ = tx.send(SimDelta::Log(format!("[BALL] {text}")));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;
    use crate::ball_outcome::{BallOutcome, ScriptedOutcomes};
    use crate::match_sim::{Fixture, MatchPhase};
    use crate::roster::Roster;

    fn feed_parts(
        script: Vec<BallOutcome>,
    ) -> (MatchSimulation<ScriptedOutcomes>, MatchState) {
        let roster = Roster::embedded().unwrap();
        let sim = MatchSimulation::new(roster, ScriptedOutcomes::new(script));
        let state = sim.create(Fixture::featured());
        (sim, state)
    }

    #[test]
    fn feed_publishes_snapshots_and_stops_on_command() {
        let (sim, state) = feed_parts(vec![BallOutcome::Runs(4); 8]);
        let (tx, rx) = mpsc::channel();
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let handle = spawn_sim_feed(sim, state, Duration::from_millis(5), tx, cmd_rx);

        let mut snapshots = 0;
        while snapshots < 3 {
            match rx.recv_timeout(Duration::from_secs(5)).expect("feed alive") {
                SimDelta::Snapshot(_) => snapshots += 1,
                SimDelta::Log(_) => {}
            }
        }
        cmd_tx.send(SimCommand::Stop).unwrap();
        let final_state = handle.join().expect("feed thread joins");
        assert!(final_state.legal_balls_total() >= 3);
    }

    #[test]
    fn pause_stops_the_ball_stream_until_resume() {
        let (sim, state) = feed_parts(vec![BallOutcome::Runs(1); 200]);
        let (tx, rx) = mpsc::channel();
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let handle = spawn_sim_feed(sim, state, Duration::from_millis(5), tx, cmd_rx);

        // Let a few balls through, then pause.
        let mut seen = 0;
        while seen < 2 {
            if let SimDelta::Snapshot(_) = rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                seen += 1;
            }
        }
        cmd_tx.send(SimCommand::Pause).unwrap();

        // Drain anything already in flight, then expect silence.
        while rx.recv_timeout(Duration::from_millis(100)).is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

        cmd_tx.send(SimCommand::Resume).unwrap();
        let resumed = (0..50).any(|_| {
            matches!(
                rx.recv_timeout(Duration::from_secs(5)),
                Ok(SimDelta::Snapshot(_))
            )
        });
        assert!(resumed);

        cmd_tx.send(SimCommand::Stop).unwrap();
        let final_state = handle.join().unwrap();
        assert_ne!(final_state.phase, MatchPhase::NotStarted);
    }

    #[test]
    fn feed_runs_a_short_match_to_completion() {
        // All-wicket script: ten wickets per innings ends the match quickly.
        let (sim, state) = feed_parts(vec![BallOutcome::Wicket; 24]);
        let (tx, rx) = mpsc::channel();
        let (_cmd_tx, cmd_rx) = mpsc::channel();
        let handle = spawn_sim_feed(sim, state, Duration::from_millis(1), tx, cmd_rx);
        // Drain until the feed closes its channel.
        while rx.recv_timeout(Duration::from_secs(30)).is_ok() {}
        let final_state = handle.join().unwrap();
        assert_eq!(final_state.phase, MatchPhase::Completed);
        assert!(final_state.result.is_some());
    }
}
