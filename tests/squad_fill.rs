use jpl_live::roster::{Player, Role, Roster};
use jpl_live::squad::{CREDIT_BUDGET, SQUAD_SIZE, Squad, SquadRejection};
use jpl_live::squad_recommend::{fill_by_form, pick_captaincy, recommend, smart_fill};

fn candidate(id: &str, credit: f64, form: u8) -> Player {
    Player {
        id: id.to_string(),
        team: "T1".to_string(),
        name: format!("Player {id}"),
        role: Role::Batter,
        credit,
        season_runs: 200,
        season_wickets: 0,
        strike_rate: 120.0,
        economy: 0.0,
        form: vec![form; 5],
    }
}

#[test]
fn scenario_d_greedy_fill_stops_at_the_budget() {
    // Descending form so the greedy walk meets credits 11.0, 10.5, 9.8, ...
    let mut pool = vec![candidate("P01", 11.0, 99), candidate("P02", 10.5, 98)];
    for i in 0..14 {
        pool.push(candidate(&format!("P{:02}", i + 3), 9.8, 97 - i as u8));
    }

    let squad = fill_by_form(&pool, CREDIT_BUDGET);

    assert!(squad.len() <= SQUAD_SIZE);
    assert!(squad.spent() <= CREDIT_BUDGET);
    // 11.0 + 10.5 + 8 * 9.8 = 99.9; the ninth 9.8 would breach 100.
    assert_eq!(squad.len(), 10);
    assert!((squad.spent() - 99.9).abs() < 1e-6);
}

#[test]
fn smart_fill_completes_an_eleven_within_budget() {
    let roster = Roster::embedded().unwrap();
    let squad = smart_fill(roster.all_players(), &Squad::new(), CREDIT_BUDGET);
    assert_eq!(squad.len(), SQUAD_SIZE);
    assert!(squad.spent() <= CREDIT_BUDGET);
}

#[test]
fn smart_fill_keeps_existing_picks() {
    let roster = Roster::embedded().unwrap();
    let mut seeded = Squad::new();
    let cheap_pick = roster.player("KK01").unwrap();
    seeded.add(cheap_pick).unwrap();

    let squad = smart_fill(roster.all_players(), &seeded, CREDIT_BUDGET);
    assert!(squad.contains("KK01"));
    assert_eq!(squad.len(), SQUAD_SIZE);
}

#[test]
fn recommend_never_lists_current_members() {
    let roster = Roster::embedded().unwrap();
    let squad = smart_fill(roster.all_players(), &Squad::new(), CREDIT_BUDGET);
    let ranked = recommend(roster.all_players(), &squad);
    assert_eq!(ranked.len(), roster.all_players().len() - SQUAD_SIZE);
    assert!(ranked.iter().all(|p| !squad.contains(&p.id)));
}

#[test]
fn captaincy_pick_is_distinct_for_the_full_catalog() {
    let roster = Roster::embedded().unwrap();
    let pick = pick_captaincy(roster.all_players()).expect("catalog has players");
    assert_ne!(pick.captain.id, pick.vice_captain.id);
}

#[test]
fn filled_squad_passes_contest_validation_with_elected_captaincy() {
    let roster = Roster::embedded().unwrap();
    let mut squad = smart_fill(roster.all_players(), &Squad::new(), CREDIT_BUDGET);

    let members: Vec<Player> = squad
        .slots()
        .iter()
        .map(|s| roster.player(&s.id).unwrap().clone())
        .collect();
    let pick = pick_captaincy(&members).expect("eleven candidates");
    squad.set_captain(&pick.captain.id).unwrap();
    squad.set_vice_captain(&pick.vice_captain.id).unwrap();

    assert!(squad.validate_for_contest().is_ok());
}

#[test]
fn contest_validation_rejects_missing_captaincy() {
    let roster = Roster::embedded().unwrap();
    let squad = smart_fill(roster.all_players(), &Squad::new(), CREDIT_BUDGET);
    assert_eq!(
        squad.validate_for_contest(),
        Err(SquadRejection::CaptaincyUnset)
    );
}

#[test]
fn squad_serializes_structurally() {
    let roster = Roster::embedded().unwrap();
    let squad = smart_fill(roster.all_players(), &Squad::new(), CREDIT_BUDGET);
    let raw = serde_json::to_string(&squad).expect("squad serializes");
    let back: Squad = serde_json::from_str(&raw).expect("squad deserializes");
    assert_eq!(back, squad);
}
