use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};
use crate::record::Record;

/// Core KPI block of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub spins: u64,
    pub wins: u64,
    pub turnover: f64,
    pub payout: f64,
    pub ggr: f64,
    pub rtp: f64,
    pub avg_bet: f64,
    pub hit_rate: f64,
}

impl Overview {
    pub fn compute(records: &[Record]) -> Self {
        let spins = records.iter().filter(|r| r.is_bet()).count() as u64;
        let wins = records.iter().filter(|r| r.is_win()).count() as u64;
        let turnover: f64 = records.iter()
            .filter(|r| r.is_bet())
            .map(|r| r.amount.abs())
            .sum();
        let payout: f64 = records.iter()
            .filter(|r| r.is_win())
            .map(|r| r.amount)
            .sum();
        let ggr = turnover - payout;
        let rtp = if turnover > 0.0 { payout / turnover * 100.0 } else { 0.0 };
        let avg_bet = if spins > 0 { turnover / spins as f64 } else { 0.0 };
        let hit_rate = if spins > 0 { wins as f64 / spins as f64 * 100.0 } else { 0.0 };

        Overview {
            spins,
            wins,
            turnover,
            payout,
            ggr,
            rtp,
            avg_bet,
            hit_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DauPoint {
    pub date: String,
    pub users: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub threshold: u64,
    pub users: u64,
}

/// Operational health block: activity, acquisition, retention and the
/// cumulative-bet distribution of the player base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub avg_dau: f64,
    pub avg_new_users: f64,
    pub avg_retention: f64,
    pub spins_per_user: f64,
    pub total_users: u64,
    pub dau: Vec<DauPoint>,
    pub tiers: Vec<Tier>,
}

pub const BET_TIERS: [u64; 6] =
    [10_000, 100_000, 200_000, 500_000, 1_000_000, 2_000_000];

impl Health {
    /// New-user counts are derived from the unfiltered log on purpose: a
    /// returning player inside the filter window is not "new" just because
    /// the window hides their earlier activity.
    pub fn compute(all: &[Record], filtered: &[Record]) -> Self {
        let mut active: BTreeMap<NaiveDate, HashSet<&str>> = BTreeMap::new();
        for record in filtered {
            active.entry(record.created.date())
                .or_insert_with(HashSet::new)
                .insert(record.user.as_str());
        }

        let dau: Vec<DauPoint> = active.iter()
            .map(|(date, users)| DauPoint {
                date: date.format("%Y-%m-%d").to_string(),
                users: users.len() as u64,
            })
            .collect();
        let avg_dau = mean(dau.iter().map(|p| p.users as f64));

        let mut first_seen: HashMap<&str, NaiveDate> = HashMap::new();
        for record in all {
            let date = record.created.date();
            let entry = first_seen.entry(record.user.as_str()).or_insert(date);
            if date < *entry {
                *entry = date;
            }
        }
        let mut new_users: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for date in first_seen.values() {
            *new_users.entry(*date).or_insert(0) += 1;
        }
        let avg_new_users = mean(new_users.values().map(|&n| n as f64));

        let mut retention_rates = Vec::new();
        let days: Vec<&NaiveDate> = active.keys().collect();
        for pair in days.windows(2) {
            let current = &active[pair[0]];
            let next = &active[pair[1]];
            let retained = current.intersection(next).count();
            retention_rates.push(retained as f64 / current.len() as f64 * 100.0);
        }
        let avg_retention = mean(retention_rates.iter().cloned());

        let total_users = filtered.iter()
            .map(|r| r.user.as_str())
            .collect::<HashSet<_>>()
            .len() as u64;
        let spins = filtered.iter().filter(|r| r.is_bet()).count() as u64;
        let spins_per_user = if total_users > 0 {
            spins as f64 / total_users as f64
        } else {
            0.0
        };

        let mut bet_per_user: HashMap<&str, f64> = HashMap::new();
        for record in filtered.iter().filter(|r| r.is_bet()) {
            *bet_per_user.entry(record.user.as_str()).or_insert(0.0) +=
                record.amount.abs();
        }
        let tiers = BET_TIERS.iter()
            .map(|&threshold| Tier {
                threshold,
                users: bet_per_user.values()
                    .filter(|&&bet| bet >= threshold as f64)
                    .count() as u64,
            })
            .collect();

        Health {
            avg_dau,
            avg_new_users,
            avg_retention,
            spins_per_user,
            total_users,
            dau,
            tiers,
        }
    }
}

fn mean<I: Iterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count > 0 { sum / count as f64 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, user: &str, amount: f64) -> Record {
        Record {
            id: 0,
            created: NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
                .and_hms_opt(12, 0, 0).unwrap(),
            user: user.to_string(),
            game: 1,
            amount,
            pool: None,
        }
    }

    #[test]
    fn test_overview_numbers() {
        let records = vec![
            record(1, "a", -100.0),
            record(1, "a", 40.0),
            record(1, "b", -50.0),
            record(2, "b", -50.0),
            record(2, "b", 120.0),
        ];
        let overview = Overview::compute(&records);
        assert_eq!(3, overview.spins);
        assert_eq!(2, overview.wins);
        assert_eq!(200.0, overview.turnover);
        assert_eq!(160.0, overview.payout);
        assert_eq!(40.0, overview.ggr);
        assert_eq!(80.0, overview.rtp);
        assert!((overview.avg_bet - 200.0 / 3.0).abs() < 1e-9);
        assert!((overview.hit_rate - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_overview_with_no_bets() {
        let records = vec![record(1, "a", 40.0)];
        let overview = Overview::compute(&records);
        assert_eq!(0, overview.spins);
        assert_eq!(0.0, overview.rtp);
        assert_eq!(0.0, overview.avg_bet);
        assert_eq!(0.0, overview.hit_rate);
    }

    #[test]
    fn test_health_dau_and_retention() {
        let records = vec![
            record(1, "a", -10.0),
            record(1, "b", -10.0),
            record(2, "a", -10.0),
            record(3, "c", -10.0),
        ];
        let health = Health::compute(&records, &records);

        assert_eq!(vec![
            DauPoint { date: "2024-01-01".to_string(), users: 2 },
            DauPoint { date: "2024-01-02".to_string(), users: 1 },
            DauPoint { date: "2024-01-03".to_string(), users: 1 },
        ], health.dau);
        assert!((health.avg_dau - 4.0 / 3.0).abs() < 1e-9);

        // day 1 -> day 2 keeps a (50%), day 2 -> day 3 keeps nobody
        assert!((health.avg_retention - 25.0).abs() < 1e-9);

        assert_eq!(3, health.total_users);
        assert!((health.spins_per_user - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_health_new_users_come_from_the_unfiltered_log() {
        let all = vec![
            record(1, "a", -10.0),
            record(2, "a", -10.0),
            record(2, "b", -10.0),
        ];
        // window limited to day 2
        let filtered = vec![all[1].clone(), all[2].clone()];
        let health = Health::compute(&all, &filtered);

        // first-seen: a on day 1, b on day 2 => one new user per day
        assert_eq!(1.0, health.avg_new_users);
    }

    #[test]
    fn test_health_bet_tiers() {
        let records = vec![
            record(1, "whale", -1_500_000.0),
            record(1, "mid", -150_000.0),
            record(1, "small", -500.0),
        ];
        let health = Health::compute(&records, &records);
        let users: Vec<u64> = health.tiers.iter().map(|t| t.users).collect();
        assert_eq!(vec![2, 2, 1, 1, 1, 0], users);
    }
}
