//! League records, simulated scores and standings.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::numbers::point_differential;

const FRANCHISES: [(&str, &str); 8] = [
    ("Eagles", "Philadelphia"),
    ("Cowboys", "Dallas"),
    ("Giants", "New York"),
    ("Patriots", "New England"),
    ("Steelers", "Pittsburgh"),
    ("Packers", "Green Bay"),
    ("49ers", "San Francisco"),
    ("Chiefs", "Kansas City"),
];

/// Highest value [`simulate_score`] can produce.
pub const MAX_SIMULATED_SCORE: u32 = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamStats {
    pub passing_yards: u32,
    pub rushing_yards: u32,
    pub turnovers: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub name: String,
    pub city: String,
    pub wins: u32,
    pub losses: u32,
    pub points: u32,
    pub points_allowed: u32,
    #[serde(default)]
    pub stats: TeamStats,
}

impl TeamRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            city: city.into(),
            wins: 0,
            losses: 0,
            points: 0,
            points_allowed: 0,
            stats: TeamStats::default(),
        }
    }

    #[must_use]
    pub const fn games_played(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }

    #[must_use]
    pub fn point_differential(&self) -> i64 {
        point_differential(self.points, self.points_allowed)
    }

    /// Record one resolved game.
    pub const fn record_game(&mut self, scored: u32, allowed: u32, won: bool) {
        self.points = self.points.saturating_add(scored);
        self.points_allowed = self.points_allowed.saturating_add(allowed);
        if won {
            self.wins = self.wins.saturating_add(1);
        } else {
            self.losses = self.losses.saturating_add(1);
        }
    }

    /// Zero the season totals, keeping identity.
    pub fn reset_season(&mut self) {
        self.wins = 0;
        self.losses = 0;
        self.points = 0;
        self.points_allowed = 0;
        self.stats = TeamStats::default();
    }
}

/// The eight fixed franchises.
#[must_use]
pub fn franchises() -> Vec<TeamRecord> {
    FRANCHISES
        .iter()
        .map(|&(name, city)| TeamRecord::new(name, city))
        .collect()
}

/// Touchdowns, field goals and a remainder: `7*U(0..3) + 3*U(0..3) + U(0..6)`.
pub fn simulate_score<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    let touchdowns: u32 = rng.gen_range(0..=3);
    let field_goals: u32 = rng.gen_range(0..=3);
    let extra: u32 = rng.gen_range(0..=6);
    7 * touchdowns + 3 * field_goals + extra
}

/// One score pair for an adjacent-index matchup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueResult {
    pub home: String,
    pub away: String,
    pub home_score: u32,
    pub away_score: u32,
}

/// Play every adjacent pair `(0,1), (2,3), ...`. A tie goes to the second team.
pub fn simulate_league_games<R: Rng + ?Sized>(
    league: &mut [TeamRecord],
    rng: &mut R,
) -> Vec<LeagueResult> {
    let mut results = Vec::with_capacity(league.len() / 2);
    for pair in league.chunks_exact_mut(2) {
        let [first, second] = pair else {
            continue;
        };
        let first_score = simulate_score(rng);
        let second_score = simulate_score(rng);
        let first_won = first_score > second_score;
        first.record_game(first_score, second_score, first_won);
        second.record_game(second_score, first_score, !first_won);
        results.push(LeagueResult {
            home: first.name.clone(),
            away: second.name.clone(),
            home_score: first_score,
            away_score: second_score,
        });
    }
    results
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub name: String,
    pub city: String,
    pub wins: u32,
    pub losses: u32,
    pub point_differential: i64,
    pub is_player: bool,
}

impl StandingsRow {
    fn from_record(record: &TeamRecord, is_player: bool) -> Self {
        Self {
            name: record.name.clone(),
            city: record.city.clone(),
            wins: record.wins,
            losses: record.losses,
            point_differential: record.point_differential(),
            is_player,
        }
    }
}

/// Player team first, then the league, ordered by wins then point
/// differential, both descending. Equal rows keep their input order.
#[must_use]
pub fn standings(player: &TeamRecord, league: &[TeamRecord]) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = std::iter::once(StandingsRow::from_record(player, true))
        .chain(league.iter().map(|r| StandingsRow::from_record(r, false)))
        .collect();
    rows.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.point_differential.cmp(&a.point_differential))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::rngs::mock::StepRng;

    fn record(name: &str, wins: u32, points: u32, allowed: u32) -> TeamRecord {
        TeamRecord {
            wins,
            points,
            points_allowed: allowed,
            ..TeamRecord::new(name, "Anywhere")
        }
    }

    #[test]
    fn simulated_scores_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(17);
        let mut seen_max = 0;
        for _ in 0..5_000 {
            let score = simulate_score(&mut rng);
            assert!(score <= MAX_SIMULATED_SCORE);
            seen_max = seen_max.max(score);
        }
        assert!(seen_max > 21);
    }

    #[test]
    fn ties_go_to_the_second_team() {
        let mut league = vec![record("A", 0, 0, 0), record("B", 0, 0, 0)];
        let mut rng = StepRng::new(0, 0);
        let results = simulate_league_games(&mut league, &mut rng);
        assert_eq!(results[0].home_score, results[0].away_score);
        assert_eq!((league[0].wins, league[0].losses), (0, 1));
        assert_eq!((league[1].wins, league[1].losses), (1, 0));
    }

    #[test]
    fn every_team_plays_once_per_week() {
        let mut league = franchises();
        let mut rng = SmallRng::seed_from_u64(4);
        let results = simulate_league_games(&mut league, &mut rng);
        assert_eq!(results.len(), 4);
        for team in &league {
            assert_eq!(team.games_played(), 1);
        }
        let scored: u32 = league.iter().map(|t| t.points).sum();
        let allowed: u32 = league.iter().map(|t| t.points_allowed).sum();
        assert_eq!(scored, allowed);
    }

    #[test]
    fn standings_break_ties_on_differential() {
        let player = record("Home Team", 3, 10, 40);
        let league = vec![record("A", 5, 30, 20), record("B", 5, 40, 20)];
        let rows = standings(&player, &league);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "Home Team"]);
        assert!(rows[2].is_player);
        assert_eq!(rows, standings(&player, &league));
    }
}
