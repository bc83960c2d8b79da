use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::fmt::Debug;

use crate::error::AppError;

pub trait TimeProvider: Send + Sync + Debug {
    fn now(&self) -> i64; // Returns the current time as a Unix UTC timestamp

    fn now_utc(&self) -> Result<DateTime<Utc>, AppError> {
        Utc.timestamp_opt(self.now(), 0)
            .single()
            .ok_or_else(|| AppError::InternalError(format!("Invalid clock timestamp {}", self.now())))
    }

    fn today(&self) -> Result<NaiveDate, AppError> {
        Ok(self.now_utc()?.date_naive())
    }
}

#[derive(Debug)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}
