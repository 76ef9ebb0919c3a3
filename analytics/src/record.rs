use chrono::NaiveDateTime;

/// One row of the game transaction log. A negative amount is a bet, a
/// positive one a win.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: u64,
    pub created: NaiveDateTime,
    pub user: String,
    pub game: u32,
    pub amount: f64,
    pub pool: Option<f64>,
}

impl Record {
    pub fn is_bet(&self) -> bool {
        self.amount < 0.0
    }

    pub fn is_win(&self) -> bool {
        self.amount > 0.0
    }

    pub fn kind(&self) -> &'static str {
        if self.is_bet() { "Bet" } else { "Win" }
    }

    // The log stores the pool level scaled by 100.
    pub fn real_pool(&self) -> Option<f64> {
        self.pool.map(|p| p / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_record_kind_and_pool() {
        let record = Record {
            id: 1,
            created: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                .and_hms_opt(12, 0, 0).unwrap(),
            user: "7".to_string(),
            game: 3,
            amount: -50.0,
            pool: Some(12_345.0),
        };
        assert!(record.is_bet());
        assert!(!record.is_win());
        assert_eq!("Bet", record.kind());
        assert_eq!(Some(123.45), record.real_pool());
    }
}
