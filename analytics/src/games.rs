use std::collections::{BTreeMap, HashMap, HashSet};
use crate::record::Record;

/// Per-game performance block, one row of the game analysis table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub game: u32,
    pub turnover: f64,
    pub payout: f64,
    pub ggr: f64,
    pub rtp: f64,
    pub volatility: f64,
    pub hit_rate: f64,
    pub winner_pct: f64,
    pub small_wins: u64,
    pub big_wins: u64,
    pub mega_wins: u64,
    pub super_wins: u64,
    pub avg_multiplier: f64,
}

impl GameStats {
    pub fn compute_all(records: &[Record]) -> Vec<GameStats> {
        let mut groups: BTreeMap<u32, Vec<&Record>> = BTreeMap::new();
        for record in records {
            groups.entry(record.game).or_insert_with(Vec::new).push(record);
        }
        groups.iter()
            .map(|(&game, group)| GameStats::compute(game, group))
            .collect()
    }

    fn compute(game: u32, group: &[&Record]) -> GameStats {
        let bets: Vec<f64> = group.iter()
            .filter(|r| r.is_bet())
            .map(|r| r.amount.abs())
            .collect();
        let wins: Vec<f64> = group.iter()
            .filter(|r| r.is_win())
            .map(|r| r.amount)
            .collect();

        let turnover: f64 = bets.iter().sum();
        let payout: f64 = wins.iter().sum();
        let ggr = turnover - payout;
        let rtp = if turnover > 0.0 { payout / turnover * 100.0 } else { 0.0 };

        let amounts: Vec<f64> = group.iter().map(|r| r.amount).collect();
        let volatility = sample_std(&amounts);

        let hit_rate = if !bets.is_empty() {
            wins.len() as f64 / bets.len() as f64 * 100.0
        } else {
            0.0
        };

        let mut net_per_user: HashMap<&str, f64> = HashMap::new();
        for record in group {
            *net_per_user.entry(record.user.as_str()).or_insert(0.0) +=
                record.amount;
        }
        let user_count = group.iter()
            .map(|r| r.user.as_str())
            .collect::<HashSet<_>>()
            .len();
        let winner_count = net_per_user.values().filter(|&&net| net > 0.0).count();
        let winner_pct = if user_count > 0 {
            winner_count as f64 / user_count as f64 * 100.0
        } else {
            0.0
        };

        // Win multipliers are relative to the mean bet of this game
        let avg_bet = if !bets.is_empty() {
            turnover / bets.len() as f64
        } else {
            1.0
        };
        let multipliers: Vec<f64> = wins.iter().map(|w| w / avg_bet).collect();

        let band = |low: f64, high: f64| {
            multipliers.iter().filter(|&&m| m > low && m <= high).count() as u64
        };
        let small_wins = band(0.0, 5.0);
        let big_wins = band(5.0, 20.0);
        let mega_wins = band(20.0, 50.0);
        let super_wins = multipliers.iter().filter(|&&m| m > 50.0).count() as u64;

        let avg_multiplier = if !multipliers.is_empty() {
            multipliers.iter().sum::<f64>() / multipliers.len() as f64
        } else {
            0.0
        };

        GameStats {
            game,
            turnover,
            payout,
            ggr,
            rtp,
            volatility,
            hit_rate,
            winner_pct,
            small_wins,
            big_wins,
            mega_wins,
            super_wins,
            avg_multiplier,
        }
    }
}

// Sample standard deviation, 0 for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter()
        .map(|v| (v - mean) * (v - mean))
        .sum::<f64>() / (n as f64 - 1.0);
    variance.sqrt()
}
