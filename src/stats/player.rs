//! Player statistics and comparison

use serde::Serialize;
use std::fmt;

use super::round_to;

/// Label used when two players are level on a stat
pub const TIE: &str = "Tie";

/// Season totals for one player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub name: String,
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub games_played: u32,
}

/// Per-game averages derived from `PlayerStats`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub name: String,
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
    pub efficiency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Ppg,
    Rpg,
    Apg,
    Efficiency,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Ppg, Stat::Rpg, Stat::Apg, Stat::Efficiency];

    pub fn of(&self, summary: &PlayerSummary) -> f64 {
        match self {
            Stat::Ppg => summary.ppg,
            Stat::Rpg => summary.rpg,
            Stat::Apg => summary.apg,
            Stat::Efficiency => summary.efficiency,
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stat::Ppg => "ppg",
            Stat::Rpg => "rpg",
            Stat::Apg => "apg",
            Stat::Efficiency => "efficiency",
        };
        f.write_str(name)
    }
}

impl PlayerStats {
    pub fn new(name: impl Into<String>, points: f64, rebounds: f64, assists: f64, games_played: u32) -> Self {
        Self {
            name: name.into(),
            points,
            rebounds,
            assists,
            games_played,
        }
    }

    // Zero games would divide by zero; count it as one.
    fn games(&self) -> f64 {
        f64::from(self.games_played.max(1))
    }

    pub fn ppg(&self) -> f64 {
        round_to(self.points / self.games(), 1)
    }

    pub fn rpg(&self) -> f64 {
        round_to(self.rebounds / self.games(), 1)
    }

    pub fn apg(&self) -> f64 {
        round_to(self.assists / self.games(), 1)
    }

    /// (points + rebounds + assists) per game
    pub fn efficiency(&self) -> f64 {
        round_to((self.points + self.rebounds + self.assists) / self.games(), 2)
    }

    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            name: self.name.clone(),
            ppg: self.ppg(),
            rpg: self.rpg(),
            apg: self.apg(),
            efficiency: self.efficiency(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatComparison {
    pub stat: Stat,
    /// player1 minus player2
    pub difference: f64,
    pub leader: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub player1: PlayerSummary,
    pub player2: PlayerSummary,
    pub stats: Vec<StatComparison>,
    pub overall_winner: String,
}

fn leader(difference: f64, first: &str, second: &str) -> String {
    if difference > 0.0 {
        first.to_string()
    } else if difference < 0.0 {
        second.to_string()
    } else {
        TIE.to_string()
    }
}

/// Compare two players stat by stat; the overall winner is decided by efficiency
pub fn compare_players(player1: &PlayerStats, player2: &PlayerStats) -> Comparison {
    let s1 = player1.summary();
    let s2 = player2.summary();

    let stats = Stat::ALL
        .iter()
        .map(|stat| {
            let difference = round_to(stat.of(&s1) - stat.of(&s2), 2);
            StatComparison {
                stat: *stat,
                difference,
                leader: leader(difference, &s1.name, &s2.name),
            }
        })
        .collect();

    let overall_winner = leader(s1.efficiency - s2.efficiency, &s1.name, &s2.name);

    Comparison {
        player1: s1,
        player2: s2,
        stats,
        overall_winner,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlayer {
    pub rank: usize,
    #[serde(flatten)]
    pub summary: PlayerSummary,
}

/// Rank players by a stat, best first; ties keep input order
pub fn rank_players(players: &[PlayerStats], by: Stat) -> Vec<RankedPlayer> {
    let mut summaries: Vec<PlayerSummary> = players.iter().map(PlayerStats::summary).collect();
    summaries.sort_by(|a, b| by.of(b).total_cmp(&by.of(a)));

    summaries
        .into_iter()
        .enumerate()
        .map(|(i, summary)| RankedPlayer { rank: i + 1, summary })
        .collect()
}
