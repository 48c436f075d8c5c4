pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod services;
pub mod store;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::{Cli, CircuitCommand, PlayerCommand, TournamentCommand};
use crate::config::settings::AppConfig;
use crate::database::{NewCircuit, NewPlayer, NewTournament};
use crate::domain::{PlayerId, ScoringSystem, TiebreakCriterion, TiebreakKind, TournamentId};
use crate::engine::{ScoreEntry, Standing};
use crate::services::circuits::CircuitService;
use crate::services::head_to_head::HeadToHeadService;
use crate::services::player_stats::{FinishStats, PlayerStatsService};
use crate::services::rounds::{ResultSubmission, RoundService};
use crate::services::server::ServerService;
use crate::services::tournaments::TournamentService;
use crate::store::SqliteStore;

pub fn interpret() -> Cli {
    Cli::parse()
}

pub fn app_config(database: Option<&str>) -> AppConfig {
    match database {
        Some(path) => AppConfig::new().with_database_path(path),
        None => AppConfig::new(),
    }
}

fn open_store(config: &AppConfig) -> Result<SqliteStore> {
    SqliteStore::open(&config.database_path)
}

pub fn handle_init(config: &AppConfig) -> Result<()> {
    open_store(config)?;
    println!("Database ready at {}", config.database_path.bold());
    Ok(())
}

pub fn handle_serve(port: u16, config: AppConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_player(action: &PlayerCommand, config: &AppConfig) -> Result<()> {
    let service = TournamentService::new(open_store(config)?, config.defaults.clone());

    match action {
        PlayerCommand::Add { name, bga_username, email, phone } => {
            let player = service.add_player(&NewPlayer {
                name: name.clone(),
                bga_username: bga_username.clone(),
                email: email.clone(),
                phone: phone.clone(),
            })?;
            println!("Added player {} with id {}", player.name.bold(), player.id);
        }
        PlayerCommand::List => {
            println!("{}", format!("{:>5}  {:<24} {}", "ID", "Name", "BGA").bold());
            for player in service.players()? {
                println!(
                    "{:>5}  {:<24} {}",
                    player.id,
                    player.name,
                    player.bga_username.unwrap_or_default()
                );
            }
        }
    }
    Ok(())
}

pub fn handle_tournament(action: &TournamentCommand, config: &AppConfig) -> Result<()> {
    let service = TournamentService::new(open_store(config)?, config.defaults.clone());

    match action {
        TournamentCommand::Create { name, date, players_per_match, rounds, circuit } => {
            let tournament = service.create_tournament(&NewTournament {
                name: name.clone(),
                date: date.unwrap_or_else(|| Local::now().date_naive()),
                players_per_match: *players_per_match,
                number_of_rounds: *rounds,
                circuit_id: *circuit,
            })?;
            println!(
                "Created {} tournament {} with id {}",
                tournament.tournament_type,
                tournament.name.bold(),
                tournament.id
            );
        }
        TournamentCommand::List => {
            println!(
                "{}",
                format!(
                    "{:>5}  {:<24} {:<10} {:<12} {:<10} {:>4} {:>6}",
                    "ID", "Name", "Date", "Status", "Type", "PPM", "Rounds"
                )
                .bold()
            );
            for t in service.tournaments()? {
                println!(
                    "{:>5}  {:<24} {:<10} {:<12} {:<10} {:>4} {:>6}",
                    t.id,
                    t.name,
                    t.date,
                    t.status,
                    t.tournament_type,
                    t.players_per_match,
                    t.number_of_rounds.map(|n| n.to_string()).unwrap_or_else(|| "auto".to_string())
                );
            }
        }
        TournamentCommand::Register { tournament_id, player_ids } => {
            for &player_id in player_ids {
                service.register(*tournament_id, player_id)?;
            }
            let registered = service.registered_players(*tournament_id)?.len();
            println!("Tournament {} now has {} players", tournament_id, registered);
        }
        TournamentCommand::Unregister { tournament_id, player_ids } => {
            for &player_id in player_ids {
                if !service.unregister(*tournament_id, player_id)? {
                    println!("{}", format!("Player {player_id} was not registered").yellow());
                }
            }
            let registered = service.registered_players(*tournament_id)?.len();
            println!("Tournament {} now has {} players", tournament_id, registered);
        }
        TournamentCommand::Config { tournament_id, avoid_rematches, bye_selection, tiebreaks, scoring } => {
            let mut tournament_config = service.config(*tournament_id)?;
            let changed = avoid_rematches.is_some() || bye_selection.is_some() || tiebreaks.is_some() || scoring.is_some();

            if let Some(avoid) = avoid_rematches {
                tournament_config.avoid_rematches = *avoid;
            }
            if let Some(selection) = bye_selection {
                tournament_config.bye_selection = *selection;
            }
            if let Some(kinds) = tiebreaks {
                tournament_config.tiebreak_criteria = criteria_from_order(kinds);
            }
            if let Some(pairs) = scoring {
                tournament_config.scoring_system = ScoringSystem::from_pairs(pairs);
            }
            if changed {
                service.configure(*tournament_id, &tournament_config)?;
            }

            println!("{}", serde_json::to_string_pretty(&tournament_config)?);
        }
    }
    Ok(())
}

pub fn handle_circuit(action: &CircuitCommand, config: &AppConfig) -> Result<()> {
    let service = CircuitService::new(open_store(config)?);

    match action {
        CircuitCommand::Create { name, description, start_date, end_date } => {
            let circuit = service.create(&NewCircuit {
                name: name.clone(),
                description: description.clone(),
                start_date: *start_date,
                end_date: *end_date,
            })?;
            println!("Created circuit {} with id {}", circuit.name.bold(), circuit.id);
        }
        CircuitCommand::List => {
            println!("{}", format!("{:>5}  {:<24} {:<10} {:<10}", "ID", "Name", "Start", "End").bold());
            for c in service.circuits()? {
                println!(
                    "{:>5}  {:<24} {:<10} {:<10}",
                    c.id,
                    c.name,
                    c.start_date.map(|d| d.to_string()).unwrap_or_default(),
                    c.end_date.map(|d| d.to_string()).unwrap_or_default()
                );
            }
        }
        CircuitCommand::Standings { circuit_id } => {
            let overview = service.overview(*circuit_id)?;
            let completed = overview
                .tournaments
                .iter()
                .filter(|t| t.status == crate::domain::TournamentStatus::Completed)
                .count();
            println!(
                "{} ({} of {} tournaments completed)",
                overview.circuit.name.bold(),
                completed,
                overview.tournaments.len()
            );

            println!("{}", format!("{:>4}  {:<24} {:>7} {:>11} {:>5}", "#", "Player", "Points", "Tournaments", "Wins").bold());
            for (idx, row) in overview.standings.iter().enumerate() {
                let line = format!(
                    "{:>4}  {:<24} {:>7.2} {:>11} {:>5}",
                    idx + 1,
                    row.player_name,
                    row.total_points,
                    row.tournaments_played,
                    row.wins
                );
                if idx == 0 {
                    println!("{}", line.green());
                } else {
                    println!("{line}");
                }
            }
        }
    }
    Ok(())
}

/// Enables `kinds` in the given order and disables every other criterion
fn criteria_from_order(kinds: &[TiebreakKind]) -> Vec<TiebreakCriterion> {
    let mut criteria: Vec<TiebreakCriterion> = kinds
        .iter()
        .enumerate()
        .map(|(idx, &kind)| TiebreakCriterion::new(kind, true, idx as u32 + 1))
        .collect();

    for kind in TiebreakKind::ALL {
        if !kinds.contains(&kind) {
            criteria.push(TiebreakCriterion::new(kind, false, criteria.len() as u32 + 1));
        }
    }
    criteria
}

pub fn handle_pair(tournament_id: TournamentId, seed: Option<u64>, config: &AppConfig) -> Result<()> {
    let service = RoundService::new(open_store(config)?);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let round = service.generate_round(tournament_id, &mut rng)?;
    println!("{}", format!("Round {} generated", round.round_number).green().bold());
    print_rounds(&service, tournament_id, Some(round.round_number))
}

pub fn handle_result(
    match_id: i64,
    scores: &[(PlayerId, i64)],
    first_player: Option<PlayerId>,
    config: &AppConfig,
) -> Result<()> {
    let service = RoundService::new(open_store(config)?);
    let results = service.submit_results(&ResultSubmission {
        match_id,
        scores: scores.iter().map(|&(id, points)| ScoreEntry::new(id, points)).collect(),
        first_player_id: first_player,
    })?;

    println!("{}", format!("{:>8} {:>8} {:>8} {:>8}", "Player", "Pos", "Points", "TP").bold());
    for r in results {
        println!("{:>8} {:>8} {:>8} {:>8}", r.player_id, r.position, r.points, r.tournament_points);
    }
    Ok(())
}

pub fn handle_standings(tournament_id: TournamentId, config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;
    let criteria = TournamentService::new(store.clone(), config.defaults.clone())
        .config(tournament_id)?
        .enabled_criteria();
    let standings = RoundService::new(store).standings(tournament_id)?;

    print_standings(&standings, &criteria);
    Ok(())
}

fn print_standings(standings: &[Standing], criteria: &[TiebreakKind]) {
    let mut header = format!("{:>4}  {:<24} {:>7} {:>5}", "#", "Player", "Points", "Wins");
    for kind in criteria {
        header.push_str(&format!(" {:>10}", kind.label()));
    }
    println!("{}", header.bold());

    for (idx, standing) in standings.iter().enumerate() {
        let mut line = format!(
            "{:>4}  {:<24} {:>7} {:>5}",
            idx + 1,
            standing.player_name,
            standing.total_points,
            standing.wins
        );
        for kind in criteria {
            line.push_str(&format!(" {:>10}", standing.tiebreak(*kind)));
        }

        if idx == 0 {
            println!("{}", line.green());
        } else {
            println!("{line}");
        }
    }
}

pub fn handle_rounds(tournament_id: TournamentId, config: &AppConfig) -> Result<()> {
    let service = RoundService::new(open_store(config)?);
    print_rounds(&service, tournament_id, None)
}

fn print_rounds(service: &RoundService<SqliteStore>, tournament_id: TournamentId, only: Option<u32>) -> Result<()> {
    for overview in service.rounds(tournament_id)? {
        if only.is_some_and(|n| n != overview.round.round_number) {
            continue;
        }

        println!(
            "{}",
            format!("Round {} ({})", overview.round.round_number, overview.round.status).bold()
        );
        for m in &overview.matches {
            let players = m
                .player_ids
                .iter()
                .map(|id| match m.results.iter().find(|r| r.player_id == *id) {
                    Some(r) => format!("{id} [{}: {} pts]", r.position, r.points),
                    None => id.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" vs ");

            if m.is_bye() {
                println!("  #{:<3} {} {}", m.game.match_number, players, "BYE".yellow());
            } else {
                println!("  #{:<3} (match {}) {} {}", m.game.match_number, m.game.id, players, m.game.status);
            }
        }
    }
    Ok(())
}

pub fn handle_head_to_head(player1_id: PlayerId, player2_id: PlayerId, config: &AppConfig) -> Result<()> {
    let service = HeadToHeadService::new(open_store(config)?);
    let Some(record) = service.compare(player1_id, player2_id)? else {
        anyhow::bail!("Player {player1_id} or {player2_id} not found");
    };

    println!(
        "{} vs {}",
        record.player1.name.bold(),
        record.player2.name.bold()
    );
    for m in &record.matches {
        println!(
            "  {:<24} round {:<3} {} ({}) - {} ({})",
            m.tournament_name, m.round_number, m.p1_position, m.p1_points, m.p2_position, m.p2_points
        );
    }
    let stats = &record.stats;
    println!(
        "{}",
        format!(
            "{} matches: {} wins, {} losses, {} ties; points {} - {}",
            stats.total_matches,
            stats.player1_wins,
            stats.player2_wins,
            stats.ties,
            stats.player1_points,
            stats.player2_points
        )
        .bold()
    );
    Ok(())
}

pub fn handle_stats(player_id: PlayerId, config: &AppConfig) -> Result<()> {
    let stats = PlayerStatsService::new(open_store(config)?).statistics(player_id)?;

    println!("{}", stats.player.name.bold());
    println!(
        "{:<12} {:>11} {:>7} {:>8}",
        "", "Tournaments", "Titles", "Avg pos"
    );
    for (label, finishes) in [("Overall", &stats.overall), ("Qualifiers", &stats.qualifier), ("Circuit", &stats.circuit)] {
        print_finishes(label, finishes);
    }
    println!(
        "Matches played: {}, best finish: {}, worst finish: {}",
        stats.matches_played, stats.best_position, stats.worst_position
    );

    if !stats.recent.is_empty() {
        println!("{}", "Recent tournaments".bold());
        for finish in &stats.recent {
            println!(
                "  {:<24} {:<10} #{:<3} {} pts",
                finish.tournament.name, finish.tournament.date, finish.position, finish.points
            );
        }
    }
    Ok(())
}

fn print_finishes(label: &str, finishes: &FinishStats) {
    println!(
        "{:<12} {:>11} {:>7} {:>8.2}",
        label, finishes.tournaments, finishes.titles, finishes.average_position
    );
}
