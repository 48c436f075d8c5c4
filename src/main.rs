use anyhow::Result;

use swiss_tournament::cli::{Cli, Command};
use swiss_tournament::{
    app_config, handle_circuit, handle_head_to_head, handle_init, handle_pair, handle_player,
    handle_result, handle_rounds, handle_serve, handle_standings, handle_stats, handle_tournament,
    interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let cli = interpret();
    execute_command(cli)
}

fn execute_command(cli: Cli) -> Result<()> {
    let config = app_config(cli.database.as_deref());

    match &cli.command {
        Command::Init => handle_init(&config),
        Command::Serve { port } => handle_serve(*port, config),
        Command::Player { action } => handle_player(action, &config),
        Command::Tournament { action } => handle_tournament(action, &config),
        Command::Circuit { action } => handle_circuit(action, &config),
        Command::Pair { tournament_id, seed } => handle_pair(*tournament_id, *seed, &config),
        Command::Result { match_id, scores, first_player } => {
            handle_result(*match_id, scores, *first_player, &config)
        }
        Command::Standings { tournament_id } => handle_standings(*tournament_id, &config),
        Command::Rounds { tournament_id } => handle_rounds(*tournament_id, &config),
        Command::H2h { player1_id, player2_id } => handle_head_to_head(*player1_id, *player2_id, &config),
        Command::Stats { player_id } => handle_stats(*player_id, &config),
    }
}
