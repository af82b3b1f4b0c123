//! Team aggregates and a naive game predictor

use serde::Serialize;

use super::player::PlayerStats;
use super::round_to;

const BASE_PROBABILITY: f64 = 50.0;
const PROBABILITY_PER_POINT: f64 = 2.0;
const MAX_PROBABILITY: f64 = 90.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStats {
    pub team_ppg: f64,
    pub team_rpg: f64,
    pub team_apg: f64,
    pub total_players: usize,
}

/// Sum player totals and average them over the team's games
pub fn team_stats(players: &[PlayerStats], games_played: u32) -> TeamStats {
    let games = f64::from(games_played.max(1));
    let points: f64 = players.iter().map(|p| p.points).sum();
    let rebounds: f64 = players.iter().map(|p| p.rebounds).sum();
    let assists: f64 = players.iter().map(|p| p.assists).sum();

    TeamStats {
        team_ppg: round_to(points / games, 1),
        team_rpg: round_to(rebounds / games, 1),
        team_apg: round_to(assists / games, 1),
        total_players: players.len(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictedWinner {
    Team1,
    Team2,
    EvenOdds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub predicted_winner: PredictedWinner,
    /// Percent, capped at 90
    pub probability: f64,
    pub team1_ppg: f64,
    pub team2_ppg: f64,
    pub point_difference: f64,
}

/// Favor the team scoring more per game: 50% plus 2% per point of difference
pub fn predict_winner(team1_ppg: f64, team2_ppg: f64) -> Prediction {
    let diff = (team1_ppg - team2_ppg).abs();
    let (predicted_winner, probability) = if team1_ppg > team2_ppg {
        (PredictedWinner::Team1, favored_probability(diff))
    } else if team2_ppg > team1_ppg {
        (PredictedWinner::Team2, favored_probability(diff))
    } else {
        (PredictedWinner::EvenOdds, BASE_PROBABILITY)
    };

    Prediction {
        predicted_winner,
        probability: round_to(probability, 1),
        team1_ppg,
        team2_ppg,
        point_difference: round_to(diff, 1),
    }
}

fn favored_probability(diff: f64) -> f64 {
    (BASE_PROBABILITY + diff * PROBABILITY_PER_POINT).min(MAX_PROBABILITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_stats() {
        let players = vec![
            PlayerStats::new("A", 500.0, 200.0, 100.0, 10),
            PlayerStats::new("B", 305.0, 100.0, 150.0, 10),
        ];
        let stats = team_stats(&players, 10);
        assert_eq!(stats.team_ppg, 80.5);
        assert_eq!(stats.team_rpg, 30.0);
        assert_eq!(stats.team_apg, 25.0);
        assert_eq!(stats.total_players, 2);
    }

    #[test]
    fn test_prediction_scales_with_difference() {
        let prediction = predict_winner(110.0, 100.0);
        assert_eq!(prediction.predicted_winner, PredictedWinner::Team1);
        assert_eq!(prediction.probability, 70.0);
        assert_eq!(prediction.point_difference, 10.0);

        let prediction = predict_winner(98.5, 101.0);
        assert_eq!(prediction.predicted_winner, PredictedWinner::Team2);
        assert_eq!(prediction.probability, 55.0);
    }

    #[test]
    fn test_prediction_is_capped() {
        assert_eq!(predict_winner(130.0, 90.0).probability, 90.0);
    }

    #[test]
    fn test_equal_teams() {
        let prediction = predict_winner(105.0, 105.0);
        assert_eq!(prediction.predicted_winner, PredictedWinner::EvenOdds);
        assert_eq!(prediction.probability, 50.0);
    }
}
