use serde::{Deserialize, Serialize};

use crate::database::{Circuit, CircuitStandingRow, HeadToHeadMatchRow, MatchResult, Player, Tournament};
use crate::domain::{
    CircuitId, MatchId, MatchStatus, PlayerId, RoundStatus, TournamentStatus, TournamentType,
};
use crate::engine::{ScoreEntry, Standing};
use crate::services::circuits::CircuitOverview;
use crate::services::head_to_head::{HeadToHeadRecord, HeadToHeadStats};
use crate::services::player_stats::{FinishStats, PlayerStatistics, TournamentFinish};
use crate::services::rounds::{MatchOverview, ResultSubmission, RoundOverview};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentItem {
    pub id: i64,
    pub name: String,
    pub date: String,
    pub status: TournamentStatus,
    pub players_per_match: u32,
    pub number_of_rounds: Option<u32>,
    pub tournament_type: TournamentType,
    pub circuit_id: Option<CircuitId>,
}

impl From<Tournament> for TournamentItem {
    fn from(t: Tournament) -> Self {
        Self {
            id: t.id,
            name: t.name,
            date: t.date.to_string(),
            status: t.status,
            players_per_match: t.players_per_match,
            number_of_rounds: t.number_of_rounds,
            tournament_type: t.tournament_type,
            circuit_id: t.circuit_id,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingItem {
    pub rank: usize,
    #[serde(flatten)]
    pub standing: Standing,
}

pub fn ranked(standings: Vec<Standing>) -> Vec<StandingItem> {
    standings
        .into_iter()
        .enumerate()
        .map(|(i, standing)| StandingItem { rank: i + 1, standing })
        .collect()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub player_id: PlayerId,
    pub position: u32,
    pub points: i64,
    pub tournament_points: f64,
}

impl From<MatchResult> for ResultItem {
    fn from(r: MatchResult) -> Self {
        Self {
            player_id: r.player_id,
            position: r.position,
            points: r.points,
            tournament_points: r.tournament_points,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchItem {
    pub id: MatchId,
    pub match_number: u32,
    pub status: MatchStatus,
    pub is_bye: bool,
    pub player_ids: Vec<PlayerId>,
    pub first_player_id: Option<PlayerId>,
    pub results: Vec<ResultItem>,
}

impl From<MatchOverview> for MatchItem {
    fn from(m: MatchOverview) -> Self {
        Self {
            is_bye: m.is_bye(),
            id: m.game.id,
            match_number: m.game.match_number,
            status: m.game.status,
            first_player_id: m.game.first_player_id,
            player_ids: m.player_ids,
            results: m.results.into_iter().map(ResultItem::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundItem {
    pub id: i64,
    pub round_number: u32,
    pub status: RoundStatus,
    pub matches: Vec<MatchItem>,
}

impl From<RoundOverview> for RoundItem {
    fn from(r: RoundOverview) -> Self {
        Self {
            id: r.round.id,
            round_number: r.round.round_number,
            status: r.round.status,
            matches: r.matches.into_iter().map(MatchItem::from).collect(),
        }
    }
}

#[derive(Deserialize, Default)]
pub struct GenerateRoundParams {
    pub seed: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreInput {
    pub player_id: PlayerId,
    pub points: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultsRequest {
    pub scores: Vec<ScoreInput>,
    pub first_player_id: Option<PlayerId>,
}

impl SubmitResultsRequest {
    pub fn into_submission(self, match_id: MatchId) -> ResultSubmission {
        ResultSubmission {
            match_id,
            scores: self
                .scores
                .into_iter()
                .map(|s| ScoreEntry::new(s.player_id, s.points))
                .collect(),
            first_player_id: self.first_player_id,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub player_id: PlayerId,
    pub name: String,
    pub bga_username: Option<String>,
}

impl From<Player> for PlayerSummary {
    fn from(p: Player) -> Self {
        Self {
            player_id: p.id,
            name: p.name,
            bga_username: p.bga_username,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadMatch {
    pub tournament_id: i64,
    pub tournament_name: String,
    pub round_number: u32,
    pub player1_position: u32,
    pub player2_position: u32,
    pub player1_points: i64,
    pub player2_points: i64,
}

impl From<HeadToHeadMatchRow> for HeadToHeadMatch {
    fn from(row: HeadToHeadMatchRow) -> Self {
        Self {
            tournament_id: row.tournament_id,
            tournament_name: row.tournament_name,
            round_number: row.round_number,
            player1_position: row.p1_position,
            player2_position: row.p2_position,
            player1_points: row.p1_points,
            player2_points: row.p2_points,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadSummary {
    pub total_matches: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub ties: u32,
    pub player1_points: i64,
    pub player2_points: i64,
}

impl From<HeadToHeadStats> for HeadToHeadSummary {
    fn from(s: HeadToHeadStats) -> Self {
        Self {
            total_matches: s.total_matches,
            player1_wins: s.player1_wins,
            player2_wins: s.player2_wins,
            ties: s.ties,
            player1_points: s.player1_points,
            player2_points: s.player2_points,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadResponse {
    pub player1: PlayerSummary,
    pub player2: PlayerSummary,
    pub stats: HeadToHeadSummary,
    pub matches: Vec<HeadToHeadMatch>,
}

impl From<HeadToHeadRecord> for HeadToHeadResponse {
    fn from(record: HeadToHeadRecord) -> Self {
        Self {
            player1: record.player1.into(),
            player2: record.player2.into(),
            stats: record.stats.into(),
            matches: record.matches.into_iter().map(HeadToHeadMatch::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitItem {
    pub id: CircuitId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl From<Circuit> for CircuitItem {
    fn from(c: Circuit) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            start_date: c.start_date.map(|d| d.to_string()),
            end_date: c.end_date.map(|d| d.to_string()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitStandingItem {
    pub rank: usize,
    pub player_id: PlayerId,
    pub player_name: String,
    pub total_points: f64,
    pub tournaments_played: u32,
    pub wins: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitStandingsResponse {
    pub circuit: CircuitItem,
    pub tournaments: Vec<TournamentItem>,
    pub standings: Vec<CircuitStandingItem>,
}

impl From<CircuitOverview> for CircuitStandingsResponse {
    fn from(overview: CircuitOverview) -> Self {
        Self {
            circuit: overview.circuit.into(),
            tournaments: overview.tournaments.into_iter().map(TournamentItem::from).collect(),
            standings: overview
                .standings
                .into_iter()
                .enumerate()
                .map(|(i, row): (usize, CircuitStandingRow)| CircuitStandingItem {
                    rank: i + 1,
                    player_id: row.player_id,
                    player_name: row.player_name,
                    total_points: row.total_points,
                    tournaments_played: row.tournaments_played,
                    wins: row.wins,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishSummary {
    pub tournaments: u32,
    pub titles: u32,
    pub average_position: f64,
}

impl From<FinishStats> for FinishSummary {
    fn from(s: FinishStats) -> Self {
        Self {
            tournaments: s.tournaments,
            titles: s.titles,
            average_position: s.average_position,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFinish {
    pub tournament: TournamentItem,
    pub position: usize,
    pub points: f64,
}

impl From<TournamentFinish> for RecentFinish {
    fn from(f: TournamentFinish) -> Self {
        Self {
            tournament: f.tournament.into(),
            position: f.position,
            points: f.points,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatsResponse {
    pub player: PlayerSummary,
    pub overall: FinishSummary,
    pub qualifier: FinishSummary,
    pub circuit: FinishSummary,
    pub matches_played: u32,
    pub best_position: usize,
    pub worst_position: usize,
    pub recent_tournaments: Vec<RecentFinish>,
}

impl From<PlayerStatistics> for PlayerStatsResponse {
    fn from(stats: PlayerStatistics) -> Self {
        Self {
            player: stats.player.into(),
            overall: stats.overall.into(),
            qualifier: stats.qualifier.into(),
            circuit: stats.circuit.into(),
            matches_played: stats.matches_played,
            best_position: stats.best_position,
            worst_position: stats.worst_position,
            recent_tournaments: stats.recent.into_iter().map(RecentFinish::from).collect(),
        }
    }
}
