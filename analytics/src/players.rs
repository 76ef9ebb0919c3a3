use chrono::Duration;
use std::collections::BTreeMap;
use crate::overview::Overview;
use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyPoint {
    pub seq: u64,
    pub created: String,
    pub game: u32,
    pub amount: f64,
    pub cumulative_pnl: f64,
    /// True when this spin is on a different game than the previous one.
    pub switched: bool,
    pub pool: Option<f64>,
}

/// Single-user insight: headline numbers, behavioural tags and the full
/// spin-by-spin journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserReport {
    pub user: String,
    pub tags: Vec<String>,
    pub turnover: f64,
    pub pnl: f64,
    pub spins: u64,
    pub rtp: f64,
    pub max_win: f64,
    pub ggr_share: f64,
    pub journey: Vec<JourneyPoint>,
}

impl UserReport {
    pub fn compute(records: &[Record], user: &str) -> Option<UserReport> {
        let mut own: Vec<&Record> = records.iter()
            .filter(|r| r.user == user)
            .collect();
        if own.is_empty() {
            return None;
        }
        own.sort_by_key(|r| r.created);

        let overview = Overview::compute(records);

        let turnover: f64 = own.iter()
            .filter(|r| r.is_bet())
            .map(|r| r.amount.abs())
            .sum();
        let payout: f64 = own.iter()
            .filter(|r| r.is_win())
            .map(|r| r.amount)
            .sum();
        let pnl: f64 = own.iter().map(|r| r.amount).sum();
        let spins = own.iter().filter(|r| r.is_bet()).count() as u64;
        let rtp = if turnover > 0.0 { payout / turnover * 100.0 } else { 0.0 };
        let max_win = own.iter()
            .map(|r| r.amount)
            .fold(f64::MIN, f64::max);
        let ggr_share = if overview.ggr != 0.0 {
            (turnover - payout) / overview.ggr * 100.0
        } else {
            0.0
        };

        let mut tags = Vec::new();
        if turnover > overview.avg_bet * 10.0 {
            tags.push("Whale".to_string());
        } else if turnover < overview.avg_bet * 0.1 {
            tags.push("Minnow".to_string());
        }
        if pnl > 0.0 {
            tags.push("Winner".to_string());
        } else {
            tags.push("Loser".to_string());
        }

        let mut journey = Vec::new();
        let mut cumulative = 0.0;
        let mut previous_game = None;
        for (index, record) in own.iter().enumerate() {
            cumulative += record.amount;
            journey.push(JourneyPoint {
                seq: index as u64 + 1,
                created: record.created.format("%Y-%m-%d %H:%M:%S").to_string(),
                game: record.game,
                amount: record.amount,
                cumulative_pnl: cumulative,
                switched: previous_game != Some(record.game),
                pool: record.real_pool(),
            });
            previous_game = Some(record.game);
        }

        Some(UserReport {
            user: user.to_string(),
            tags,
            turnover,
            pnl,
            spins,
            rtp,
            max_win,
            ggr_share,
            journey,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPoint {
    pub user: String,
    pub cum_bet: f64,
    pub cum_pnl: f64,
    pub winner: bool,
}

/// State of the player base at one instant of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub at: String,
    pub points: Vec<UserPoint>,
}

/// Evenly spaced snapshots of per-user cumulative bet and PnL between the
/// first and the last record, both inclusive.
pub fn timeline(records: &[Record], steps: u64) -> Vec<Snapshot> {
    if records.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by_key(|r| r.created);

    let first = sorted.first().unwrap().created;
    let last = sorted.last().unwrap().created;

    let instants = if first == last || steps < 2 {
        vec![last]
    } else {
        let span = (last - first).num_milliseconds();
        (0..steps)
            .map(|i| {
                let offset = span as f64 * i as f64 / (steps - 1) as f64;
                first + Duration::milliseconds(offset.round() as i64)
            })
            .collect()
    };

    let mut snapshots = Vec::new();
    let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    let mut cursor = 0;
    for instant in instants {
        while cursor < sorted.len() && sorted[cursor].created <= instant {
            let record = sorted[cursor];
            let entry = totals.entry(record.user.as_str()).or_insert((0.0, 0.0));
            if record.is_bet() {
                entry.0 += record.amount.abs();
            }
            entry.1 += record.amount;
            cursor += 1;
        }
        snapshots.push(Snapshot {
            at: instant.format("%Y-%m-%d %H:%M:%S").to_string(),
            points: totals.iter()
                .map(|(user, &(cum_bet, cum_pnl))| UserPoint {
                    user: user.to_string(),
                    cum_bet,
                    cum_pnl,
                    winner: cum_pnl > 0.0,
                })
                .collect(),
        });
    }

    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(hour: u32, user: &str, game: u32, amount: f64) -> Record {
        Record {
            id: 0,
            created: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                .and_hms_opt(hour, 0, 0).unwrap(),
            user: user.to_string(),
            game,
            amount,
            pool: None,
        }
    }

    #[test]
    fn test_unknown_user() {
        let records = vec![record(1, "a", 1, -10.0)];
        assert!(UserReport::compute(&records, "nobody").is_none());
    }

    #[test]
    fn test_user_numbers_and_tags() {
        let records = vec![
            record(1, "a", 1, -100.0),
            record(2, "a", 1, 160.0),
            record(3, "a", 2, -100.0),
            record(4, "b", 1, -100.0),
        ];
        // global: turnover 300, payout 160, ggr 140, avg_bet 100
        let report = UserReport::compute(&records, "a").unwrap();
        assert_eq!(200.0, report.turnover);
        assert_eq!(-40.0, report.pnl);
        assert_eq!(2, report.spins);
        assert_eq!(80.0, report.rtp);
        assert_eq!(160.0, report.max_win);
        assert!((report.ggr_share - 40.0 / 140.0 * 100.0).abs() < 1e-9);
        assert_eq!(vec!["Loser".to_string()], report.tags);
    }

    #[test]
    fn test_whale_and_winner_tags() {
        let mut records = vec![record(1, "w", 1, -6_000.0), record(2, "w", 1, 9_000.0)];
        for hour in 3..13 {
            records.push(record(hour, "m", 1, -10.0));
        }
        // global avg_bet = 6100 / 11
        let whale = UserReport::compute(&records, "w").unwrap();
        assert_eq!(vec!["Whale".to_string(), "Winner".to_string()], whale.tags);

        let minnow = UserReport::compute(&records, "m").unwrap();
        assert_eq!(vec!["Loser".to_string()], minnow.tags);
    }

    #[test]
    fn test_journey_marks_game_switches() {
        let records = vec![
            record(1, "a", 1, -10.0),
            record(2, "a", 1, -10.0),
            record(3, "a", 2, -10.0),
            record(4, "a", 1, 30.0),
        ];
        let report = UserReport::compute(&records, "a").unwrap();
        let switched: Vec<bool> =
            report.journey.iter().map(|p| p.switched).collect();
        assert_eq!(vec![true, false, true, true], switched);
        let pnl: Vec<f64> =
            report.journey.iter().map(|p| p.cumulative_pnl).collect();
        assert_eq!(vec![-10.0, -20.0, -30.0, 0.0], pnl);
    }

    #[test]
    fn test_timeline_snapshots() {
        let records = vec![
            record(0, "a", 1, -10.0),
            record(6, "b", 1, -10.0),
            record(6, "b", 1, 50.0),
            record(12, "a", 1, -10.0),
        ];
        let snapshots = timeline(&records, 3);
        assert_eq!(3, snapshots.len());

        assert_eq!("2024-01-01 00:00:00", snapshots[0].at);
        assert_eq!(1, snapshots[0].points.len());

        assert_eq!("2024-01-01 06:00:00", snapshots[1].at);
        assert_eq!(2, snapshots[1].points.len());
        let b = &snapshots[1].points[1];
        assert_eq!("b", b.user);
        assert_eq!(40.0, b.cum_pnl);
        assert!(b.winner);

        assert_eq!("2024-01-01 12:00:00", snapshots[2].at);
        let a = &snapshots[2].points[0];
        assert_eq!(20.0, a.cum_bet);
        assert_eq!(-20.0, a.cum_pnl);
        assert!(!a.winner);
    }

    #[test]
    fn test_timeline_with_single_instant() {
        let records = vec![record(5, "a", 1, -10.0)];
        let snapshots = timeline(&records, 100);
        assert_eq!(1, snapshots.len());
        assert_eq!(1, snapshots[0].points.len());
    }
}
