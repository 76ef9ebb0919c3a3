use chrono::NaiveDate;
use common::query::Query;
use crate::record::Record;

/// Record filter shared by every report: inclusive date bounds and an
/// optional game id allow list (empty list keeps everything).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub games: Vec<u32>,
}

impl Filter {
    pub fn from_query(query: &Query) -> Result<Self, String> {
        let from = match &query.from {
            Some(date) => Some(parse_date(date)?),
            None       => None,
        };
        let to = match &query.to {
            Some(date) => Some(parse_date(date)?),
            None       => None,
        };
        Ok(Filter {
            from,
            to,
            games: query.games.clone(),
        })
    }

    pub fn keep(&self, record: &Record) -> bool {
        let date = record.created.date();
        if let Some(from) = self.from {
            if date < from { return false; }
        }
        if let Some(to) = self.to {
            if date > to { return false; }
        }
        self.games.is_empty() || self.games.contains(&record.game)
    }

    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records.iter().filter(|r| self.keep(r)).cloned().collect()
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date: {}", text))
}
