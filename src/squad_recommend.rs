use crate::roster::{Player, ROLES, Role};
use crate::squad::{SQUAD_SIZE, Squad};

/// Ideal XI composition the role-need bonus steers toward.
pub const ROLE_TARGETS: [(Role, usize); 3] =
    [(Role::Batter, 5), (Role::AllRounder, 2), (Role::Bowler, 4)];

const ROLE_NEED_BONUS: f64 = 12.0;
const FORM_WEIGHT: f64 = 0.4;
const ALL_ROUNDER_SCALE: f64 = 0.7;
const AR_IMPACT_BONUS: f64 = 15.0;

/// Selection score for a candidate against the squad being built. Season
/// output and form carry the weight; the role-need bonus nudges picks toward
/// the composition target and the value term slightly favors cheap players.
pub fn score(player: &Player, squad: &Squad) -> f64 {
    let batting = player.season_runs as f64 / 8.0 + player.strike_rate / 3.0;
    let bowling = player.season_wickets as f64 * 8.0 - player.economy * 2.0;
    let base = match player.role {
        Role::Batter => batting,
        Role::Bowler => bowling,
        Role::AllRounder => ALL_ROUNDER_SCALE * (batting + bowling),
    };
    let need = if player.role == most_deficient_role(squad) {
        ROLE_NEED_BONUS
    } else {
        0.0
    };
    let value = 10.0 - player.credit;
    base + player.form_average() * FORM_WEIGHT + need + value
}

/// The single role furthest below its composition target. Ties resolve in
/// role enumeration order.
fn most_deficient_role(squad: &Squad) -> Role {
    let mut best = ROLES[0];
    let mut best_deficit = i64::MIN;
    for (role, target) in ROLE_TARGETS {
        let deficit = target as i64 - squad.role_count(role) as i64;
        if deficit > best_deficit {
            best = role;
            best_deficit = deficit;
        }
    }
    best
}

/// Candidates not yet picked, best first. The sort is stable so equal scores
/// keep catalog order and reruns are reproducible.
pub fn recommend<'a>(pool: &'a [Player], squad: &Squad) -> Vec<&'a Player> {
    let mut scored: Vec<(f64, &Player)> = pool
        .iter()
        .filter(|p| !squad.contains(&p.id))
        .map(|p| (score(p, squad), p))
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(_, p)| p).collect()
}

/// Greedy budget-constrained fill: walk the recommendation list once and
/// take every candidate that still fits. This is a heuristic, not a knapsack
/// solve; it can leave budget unused that a cheaper later combination would
/// have spent better.
pub fn smart_fill(pool: &[Player], squad: &Squad, budget: f64) -> Squad {
    let mut filled = squad.clone();
    for candidate in recommend(pool, squad) {
        if filled.len() >= SQUAD_SIZE {
            break;
        }
        if filled.spent() + candidate.credit > budget {
            continue;
        }
        let _ = filled.add(candidate);
    }
    filled
}

/// The simpler fill-from-scratch mode: the whole pool by current form, best
/// first, same greedy walk.
pub fn fill_by_form(pool: &[Player], budget: f64) -> Squad {
    let mut by_form: Vec<&Player> = pool.iter().collect();
    by_form.sort_by(|a, b| {
        b.form_average()
            .partial_cmp(&a.form_average())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut squad = Squad::new();
    for candidate in by_form {
        if squad.len() >= SQUAD_SIZE {
            break;
        }
        if squad.spent() + candidate.credit > budget {
            continue;
        }
        let _ = squad.add(candidate);
    }
    squad
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptaincyPick<'a> {
    pub captain: &'a Player,
    pub vice_captain: &'a Player,
}

/// Match-impact score used only for the captaincy election.
pub fn impact(player: &Player) -> f64 {
    let mut score = player.season_runs as f64 * 0.2
        + player.season_wickets as f64 * 10.0
        + player.form_average();
    if player.role == Role::AllRounder {
        score += AR_IMPACT_BONUS;
    }
    score
}

/// Captain and vice-captain are ranks 1 and 2 by impact; a pool with fewer
/// than two players has no pick.
pub fn pick_captaincy(pool: &[Player]) -> Option<CaptaincyPick<'_>> {
    if pool.len() < 2 {
        return None;
    }
    let mut ranked: Vec<&Player> = pool.iter().collect();
    ranked.sort_by(|a, b| {
        impact(b)
            .partial_cmp(&impact(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Some(CaptaincyPick {
        captain: ranked[0],
        vice_captain: ranked[1],
    })
}
