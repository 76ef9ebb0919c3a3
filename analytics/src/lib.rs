extern crate calamine;
extern crate chrono;
extern crate common;
extern crate thiserror;

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

pub mod error;
pub mod filter;
pub mod games;
pub mod loader;
pub mod overview;
pub mod players;
pub mod record;
pub mod report;

pub use error::AnalyticsError;
pub use record::Record;
pub use report::{build_report, Report};
