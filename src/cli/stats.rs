//! Stats command - basketball number crunching without the AI
//!
//! Every subcommand prints pretty JSON on stdout.

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;

use crate::stats::{
    compare_players, parse_game_score, parse_player_line, predict_winner, rank_players,
    team_stats, PlayerStats, Stat,
};

#[derive(Subcommand)]
pub enum StatsCommand {
    /// Parse a player line, e.g. "LeBron James: 25.7 PPG, 7.8 RPG, 10.2 APG"
    Player {
        line: String,
    },

    /// Compare two players given as player lines
    Compare {
        first: String,
        second: String,
    },

    /// Rank players given as player lines
    Rank {
        #[arg(required = true)]
        lines: Vec<String>,

        /// Stat to rank by
        #[arg(short, long, value_enum, default_value = "efficiency")]
        by: Stat,
    },

    /// Team per-game totals from player lines
    Team {
        #[arg(required = true)]
        lines: Vec<String>,
    },

    /// Parse a final score, e.g. "Lakers 105 - 98 Celtics"
    Score {
        line: String,
    },

    /// Predict a winner from two teams' points per game
    Predict {
        team1_ppg: f64,
        team2_ppg: f64,
    },
}

pub fn run(command: StatsCommand) -> Result<()> {
    match command {
        StatsCommand::Player { line } => print_json(&parse_player(&line)?),
        StatsCommand::Compare { first, second } => {
            let first = parse_player(&first)?.to_stats();
            let second = parse_player(&second)?.to_stats();
            print_json(&compare_players(&first, &second))
        }
        StatsCommand::Rank { lines, by } => print_json(&rank_players(&parse_players(&lines)?, by)),
        StatsCommand::Team { lines } => print_json(&team_stats(&parse_players(&lines)?, 1)),
        StatsCommand::Score { line } => {
            let score = parse_game_score(&line)
                .with_context(|| format!("Could not parse score: {:?}", line))?;
            print_json(&score)
        }
        StatsCommand::Predict { team1_ppg, team2_ppg } => {
            print_json(&predict_winner(team1_ppg, team2_ppg))
        }
    }
}

fn parse_player(line: &str) -> Result<crate::stats::parser::ParsedPlayer> {
    parse_player_line(line).with_context(|| format!("Could not parse player line: {:?}", line))
}

fn parse_players(lines: &[String]) -> Result<Vec<PlayerStats>> {
    lines
        .iter()
        .map(|line| parse_player(line).map(|p| p.to_stats()))
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{}", json);
    Ok(())
}
