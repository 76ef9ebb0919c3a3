use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}
