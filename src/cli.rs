use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::{ByeSelection, CircuitId, PlayerId, TiebreakKind};

#[derive(Parser, Debug)]
#[command(name = "swiss", author, version, about = "Swiss tournament pairing and ranking")]
pub struct Cli {
    /// SQLite database file (overrides DATABASE_PATH)
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create the database schema
    Init,
    /// Start the HTTP server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Manage players
    Player {
        #[clap(subcommand)]
        action: PlayerCommand,
    },
    /// Manage tournaments
    Tournament {
        #[clap(subcommand)]
        action: TournamentCommand,
    },
    /// Manage circuits and their cumulative standings
    Circuit {
        #[clap(subcommand)]
        action: CircuitCommand,
    },
    /// Generate the next round (the first one if none exists)
    Pair {
        tournament_id: i64,
        /// Seed for a reproducible pairing
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Submit raw scores for a match
    Result {
        match_id: i64,
        /// PLAYER=POINTS, once per player in the match
        #[arg(long = "score", value_parser = parse_score, required = true, num_args = 1..)]
        scores: Vec<(PlayerId, i64)>,
        /// Player who started the match
        #[arg(long)]
        first_player: Option<PlayerId>,
    },
    /// Print the current standings
    Standings { tournament_id: i64 },
    /// Print every round with its matches and results
    Rounds { tournament_id: i64 },
    /// Compare two players across all tournaments
    H2h { player1_id: PlayerId, player2_id: PlayerId },
    /// Career statistics of a player over completed tournaments
    Stats { player_id: PlayerId },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// Add a player
    Add {
        name: String,
        #[arg(long)]
        bga_username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// List all players
    List,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum TournamentCommand {
    /// Create a tournament in draft status
    Create {
        name: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value_t = 2)]
        players_per_match: u32,
        /// Fixed number of rounds; computed from the player count when omitted
        #[arg(long)]
        rounds: Option<u32>,
        /// Circuit the tournament counts towards; a qualifier when omitted
        #[arg(long)]
        circuit: Option<CircuitId>,
    },
    /// List all tournaments
    List,
    /// Register players for a tournament
    Register {
        tournament_id: i64,
        #[arg(required = true)]
        player_ids: Vec<PlayerId>,
    },
    /// Remove players from a tournament that has not started
    Unregister {
        tournament_id: i64,
        #[arg(required = true)]
        player_ids: Vec<PlayerId>,
    },
    /// Show or change the pairing and ranking configuration
    Config {
        tournament_id: i64,
        #[arg(long)]
        avoid_rematches: Option<bool>,
        /// worst, random or round_robin
        #[arg(long)]
        bye_selection: Option<ByeSelection>,
        /// Enabled tiebreaks in order, e.g. wins,head_to_head
        #[arg(long, value_delimiter = ',')]
        tiebreaks: Option<Vec<TiebreakKind>>,
        /// POSITION=POINTS pairs, e.g. 1=3,2=1,3=0
        #[arg(long, value_delimiter = ',', value_parser = parse_scoring)]
        scoring: Option<Vec<(u32, f64)>>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CircuitCommand {
    /// Create a circuit
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// YYYY-MM-DD
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },
    /// List all circuits
    List,
    /// Print the cumulative standings over the circuit's completed tournaments
    Standings { circuit_id: CircuitId },
}

fn parse_score(s: &str) -> Result<(PlayerId, i64), String> {
    let (player, points) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PLAYER=POINTS, got '{s}'"))?;
    let player = player.trim().parse().map_err(|_| format!("invalid player id '{player}'"))?;
    let points = points.trim().parse().map_err(|_| format!("invalid points '{points}'"))?;
    Ok((player, points))
}

fn parse_scoring(s: &str) -> Result<(u32, f64), String> {
    let (position, points) = s
        .split_once('=')
        .ok_or_else(|| format!("expected POSITION=POINTS, got '{s}'"))?;
    let position = position.trim().parse().map_err(|_| format!("invalid position '{position}'"))?;
    let points = points.trim().parse().map_err(|_| format!("invalid points '{points}'"))?;
    Ok((position, points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("12=40"), Ok((12, 40)));
        assert_eq!(parse_score(" 3 = -5 "), Ok((3, -5)));
        assert!(parse_score("12").is_err());
        assert!(parse_score("x=1").is_err());
    }

    #[test]
    fn test_result_command() {
        let cli = Cli::try_parse_from([
            "swiss", "result", "5", "--score", "1=10", "--score", "2=10", "--first-player", "2",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Result {
                match_id: 5,
                scores: vec![(1, 10), (2, 10)],
                first_player: Some(2),
            }
        );
    }

    #[test]
    fn test_tournament_config_command() {
        let cli = Cli::try_parse_from([
            "swiss",
            "--database",
            "t.db",
            "tournament",
            "config",
            "1",
            "--bye-selection",
            "round_robin",
            "--tiebreaks",
            "wins,head_to_head",
            "--scoring",
            "1=3,2=1,3=0",
        ])
        .unwrap();
        assert_eq!(cli.database.as_deref(), Some("t.db"));
        assert_eq!(
            cli.command,
            Command::Tournament {
                action: TournamentCommand::Config {
                    tournament_id: 1,
                    avoid_rematches: None,
                    bye_selection: Some(ByeSelection::RoundRobin),
                    tiebreaks: Some(vec![TiebreakKind::Wins, TiebreakKind::HeadToHead]),
                    scoring: Some(vec![(1, 3.0), (2, 1.0), (3, 0.0)]),
                },
            }
        );
    }

    #[test]
    fn test_multi_word_flags_are_kebab_case() {
        let cli = Cli::try_parse_from([
            "swiss", "tournament", "create", "Spring Open", "--players-per-match", "3", "--rounds", "4", "--circuit", "2",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Tournament {
                action: TournamentCommand::Create {
                    name: "Spring Open".to_string(),
                    date: None,
                    players_per_match: 3,
                    rounds: Some(4),
                    circuit: Some(2),
                },
            }
        );

        let cli = Cli::try_parse_from(["swiss", "player", "add", "Ann", "--bga-username", "ann_b"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Player {
                action: PlayerCommand::Add {
                    name: "Ann".to_string(),
                    bga_username: Some("ann_b".to_string()),
                    email: None,
                    phone: None,
                },
            }
        );

        assert!(Cli::try_parse_from(["swiss", "tournament", "create", "X", "--players_per_match", "3"]).is_err());
    }

    #[test]
    fn test_circuit_and_stats_commands() {
        let cli = Cli::try_parse_from([
            "swiss", "circuit", "create", "Winter", "--start-date", "2024-01-01", "--end-date", "2024-03-31",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Circuit {
                action: CircuitCommand::Create {
                    name: "Winter".to_string(),
                    description: None,
                    start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                    end_date: NaiveDate::from_ymd_opt(2024, 3, 31),
                },
            }
        );

        let cli = Cli::try_parse_from(["swiss", "stats", "7"]).unwrap();
        assert_eq!(cli.command, Command::Stats { player_id: 7 });

        let cli = Cli::try_parse_from(["swiss", "tournament", "unregister", "1", "4", "5"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Tournament {
                action: TournamentCommand::Unregister { tournament_id: 1, player_ids: vec![4, 5] },
            }
        );
    }
}
