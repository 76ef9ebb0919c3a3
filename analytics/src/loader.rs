use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use crate::error::AnalyticsError;
use crate::record::Record;

/// Loads the transaction log from the first worksheet of an xlsx file. The
/// header row names the columns; `id` and `pool` are optional, the rest are
/// required.
pub fn load_records(path: &Path) -> Result<Vec<Record>, AnalyticsError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let sheet_name = sheet_names.first().ok_or_else(|| {
        AnalyticsError::InvalidFormat("Workbook contains no sheets".to_string())
    })?;

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| AnalyticsError::InvalidFormat(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| {
        AnalyticsError::InvalidFormat("Log sheet is empty".to_string())
    })?;
    let columns = Columns::resolve(header)?;

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        // 1-based position in the sheet, the header being row 1
        let row_number = index + 2;
        if row.iter().all(|cell| *cell == Data::Empty) {
            continue;
        }
        let fallback_id = records.len() as u64 + 1;
        records.push(columns.parse_row(row, row_number, fallback_id)?);
    }

    info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

pub struct Columns {
    created: usize,
    user: usize,
    game: usize,
    amount: usize,
    id: Option<usize>,
    pool: Option<usize>,
}

impl Columns {
    pub fn resolve(header: &[Data]) -> Result<Self, AnalyticsError> {
        let find = |name: &str| {
            header.iter().position(|cell| match cell {
                Data::String(s) => s.trim().eq_ignore_ascii_case(name),
                _               => false,
            })
        };

        let require = |name: &str| {
            find(name).ok_or_else(|| AnalyticsError::MissingColumn(name.to_string()))
        };

        Ok(Columns {
            created: require("create_date")?,
            user: require("user_id")?,
            game: require("gid")?,
            amount: require("amount")?,
            id: find("id"),
            pool: find("pool"),
        })
    }

    pub fn parse_row(&self, row: &[Data], row_number: usize, fallback_id: u64)
            -> Result<Record, AnalyticsError> {
        let empty = Data::Empty;
        let cell = |index: usize| row.get(index).unwrap_or(&empty);

        let invalid = |reason: &str| AnalyticsError::InvalidRow {
            row: row_number,
            reason: reason.to_string(),
        };

        let created = parse_datetime(cell(self.created))
            .ok_or_else(|| invalid("unreadable create_date"))?;

        let user = parse_text(cell(self.user))
            .ok_or_else(|| invalid("unreadable user_id"))?;

        let game = parse_number(cell(self.game))
            .map(|g| g as u32)
            .ok_or_else(|| invalid("unreadable gid"))?;

        let amount = parse_number(cell(self.amount))
            .ok_or_else(|| invalid("unreadable amount"))?;

        let id = match self.id {
            Some(index) => match cell(index) {
                Data::Empty => fallback_id,
                value       => parse_number(value)
                    .map(|v| v as u64)
                    .ok_or_else(|| invalid("unreadable id"))?,
            },
            None => fallback_id,
        };

        let pool = match self.pool {
            Some(index) => parse_number(cell(index)),
            None        => None,
        };

        Ok(Record {
            id,
            created,
            user,
            game,
            amount,
            pool,
        })
    }
}

fn parse_datetime(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime(),
        Data::DateTimeIso(s) =>
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok(),
        Data::String(s) => {
            let s = s.trim();
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()
                .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0)))
        },
        _ => None,
    }
}

fn parse_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f)  => Some(*f),
        Data::Int(i)    => Some(*i as f64),
        Data::String(s) => s.trim().parse().ok(),
        _               => None,
    }
}

fn parse_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => Some(s.trim().to_string()),
        Data::Float(f) if f.fract() == 0.0 => Some(format!("{:.0}", f)),
        Data::Float(f)  => Some(f.to_string()),
        Data::Int(i)    => Some(i.to_string()),
        _               => None,
    }
}
