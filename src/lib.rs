//! Core engines for the JPL fantasy companion: a ball-by-ball live match
//! simulation and a budget-constrained squad recommender, both running on an
//! in-memory season catalog.

pub mod ball_outcome;
pub mod match_sim;
pub mod roster;
pub mod sim_feed;
pub mod squad;
pub mod squad_recommend;
