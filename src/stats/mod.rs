//! Basketball statistics helpers

pub mod game;
pub mod parser;
pub mod player;

pub use game::{predict_winner, team_stats};
pub use parser::{parse_game_score, parse_player_line};
pub use player::{compare_players, rank_players, PlayerStats, Stat};

/// Round half away from zero to `places` decimals
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
