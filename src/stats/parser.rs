//! Parsing of free-form stat strings
//!
//! Malformed input yields `None`; callers decide what to do with it.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use super::player::PlayerStats;

/// A player line such as `LeBron James: 25.7 PPG, 7.8 RPG, 10.2 APG`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedPlayer {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ppg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apg: Option<f64>,
}

impl ParsedPlayer {
    /// Treat the averages as a single game's totals; missing stats count as zero
    pub fn to_stats(&self) -> PlayerStats {
        PlayerStats::new(
            self.name.clone(),
            self.ppg.unwrap_or(0.0),
            self.rpg.unwrap_or(0.0),
            self.apg.unwrap_or(0.0),
            1,
        )
    }
}

/// A final score such as `Lakers 105 - 98 Celtics`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameScore {
    pub team1: String,
    pub score1: u32,
    pub team2: String,
    pub score2: u32,
    /// `None` for a tied score
    pub winner: Option<String>,
    pub margin: u32,
}

fn number_pattern() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| Regex::new(r"[\d.]+").expect("number pattern is valid"))
}

fn score_pattern() -> &'static Regex {
    static SCORE: OnceLock<Regex> = OnceLock::new();
    SCORE.get_or_init(|| {
        Regex::new(r"(\w+)\s+(\d+)\s*-\s*(\d+)\s+(\w+)").expect("score pattern is valid")
    })
}

fn parse_number(text: &str) -> Option<f64> {
    number_pattern().find(text)?.as_str().parse().ok()
}

pub fn parse_player_line(line: &str) -> Option<ParsedPlayer> {
    let (name, stats) = line.split_once(':')?;
    if stats.contains(':') {
        return None;
    }

    let mut player = ParsedPlayer {
        name: name.trim().to_string(),
        ppg: None,
        rpg: None,
        apg: None,
    };

    for part in stats.split(',').map(str::trim) {
        if part.contains("PPG") {
            player.ppg = Some(parse_number(part)?);
        } else if part.contains("RPG") {
            player.rpg = Some(parse_number(part)?);
        } else if part.contains("APG") {
            player.apg = Some(parse_number(part)?);
        }
    }

    Some(player)
}

pub fn parse_game_score(line: &str) -> Option<GameScore> {
    let caps = score_pattern().captures(line)?;
    let team1 = caps[1].to_string();
    let score1: u32 = caps[2].parse().ok()?;
    let score2: u32 = caps[3].parse().ok()?;
    let team2 = caps[4].to_string();

    let winner = match score1.cmp(&score2) {
        std::cmp::Ordering::Greater => Some(team1.clone()),
        std::cmp::Ordering::Less => Some(team2.clone()),
        std::cmp::Ordering::Equal => None,
    };

    Some(GameScore {
        team1,
        score1,
        team2,
        score2,
        winner,
        margin: score1.abs_diff(score2),
    })
}
