use common::query::{Query, ReportKind};
use crate::filter::Filter;
use crate::games::GameStats;
use crate::overview::{Health, Overview};
use crate::players::{timeline, Snapshot, UserReport};
use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub id: u64,
    pub created: String,
    pub user: String,
    pub game: u32,
    pub amount: f64,
    pub kind: String,
    pub pool: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Report {
    Overview(Overview),
    Health(Health),
    Games(Vec<GameStats>),
    Timeline(Vec<Snapshot>),
    User(UserReport),
    Detail(Vec<DetailRow>),
}

/// Answers one client query against a loaded dataset. Errors are plain
/// strings, sent back over the ERROR signal.
pub fn build_report(records: &[Record], query: &Query) -> Result<Report, String> {
    let filter = Filter::from_query(query)?;
    let filtered = filter.apply(records);
    if filtered.is_empty() {
        return Err("No records under the current filters".to_string());
    }

    match query.kind {
        ReportKind::Overview =>
            Ok(Report::Overview(Overview::compute(&filtered))),
        ReportKind::Health =>
            Ok(Report::Health(Health::compute(records, &filtered))),
        ReportKind::Games =>
            Ok(Report::Games(GameStats::compute_all(&filtered))),
        ReportKind::Timeline =>
            Ok(Report::Timeline(timeline(&filtered, query.steps))),
        ReportKind::User => {
            let user = query.user.as_ref()
                .ok_or_else(|| "No user id in the query".to_string())?;
            UserReport::compute(&filtered, user)
                .map(Report::User)
                .ok_or_else(|| format!("Unknown user id: {}", user))
        },
        ReportKind::Detail => {
            let mut sorted: Vec<&Record> = filtered.iter().collect();
            sorted.sort_by_key(|r| std::cmp::Reverse(r.created));
            let rows = sorted.iter()
                .take(query.limit as usize)
                .map(|r| DetailRow {
                    id: r.id,
                    created: r.created.format("%Y-%m-%d %H:%M:%S").to_string(),
                    user: r.user.clone(),
                    game: r.game,
                    amount: r.amount,
                    kind: r.kind().to_string(),
                    pool: r.real_pool(),
                })
                .collect();
            Ok(Report::Detail(rows))
        },
    }
}
