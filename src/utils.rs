use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tracing_subscriber::{
    fmt::{format::Writer, time::FormatTime},
    EnvFilter,
};

use crate::time::TimeProvider;

/// Round to 2 decimal places from the exact decimal value of `value`, the way
/// `Number.prototype.toFixed(2)` does: 2.675 is stored as 2.67499.. and becomes 2.67.
/// Exact ties (multiples of 1/8 such as 0.125) go away from zero.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= 1e21 {
        return value;
    }
    let scaled = value * 100.;
    if (value * 8.).fract() == 0. && scaled.fract().abs() == 0.5 {
        return scaled.round() / 100.;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

pub fn display_time(utc_time: chrono::DateTime<Utc>) -> String {
    utc_time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Log timestamps taken from a `TimeProvider`, so mocked clocks show up in test logs
pub struct ProviderTimeFormatter<T: TimeProvider> {
    pub time_provider: Arc<T>,
}

impl<T: TimeProvider> FormatTime for ProviderTimeFormatter<T> {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        match Utc.timestamp_opt(self.time_provider.now(), 0).single() {
            Some(time) => write!(w, "{}", time.to_rfc3339()),
            None => write!(w, "{}", self.time_provider.now()),
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default `info` level.
/// Later calls are no-ops, so every test may call it.
pub fn start_log<T: TimeProvider + 'static>(time_provider: Option<Arc<T>>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let res = match time_provider {
        Some(time_provider) => builder.with_timer(ProviderTimeFormatter { time_provider }).try_init(),
        None => builder.try_init(),
    };
    if res.is_err() {
        tracing::debug!("Log subscriber already installed.");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::utils::mock_time::MockTimeProvider;

    #[test]
    fn rounding() {
        assert_eq!(round2(50.), 50.);
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(0.004), 0.);
        assert_eq!(round2(-1.236), -1.24);
    }

    #[test]
    fn rounding_uses_the_stored_decimal_value() {
        // stored just below the midpoint
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(-2.675), -2.67);
        assert_eq!(round2(1.005), 1.);
        // stored just above
        assert_eq!(round2(8.345), 8.35);
        // exact ties
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn display() {
        let time = Utc.with_ymd_and_hms(2023, 11, 25, 22, 0, 0).unwrap();
        assert_eq!(display_time(time), "2023-11-25 22:00:00");
    }

    #[test]
    fn start_log_twice_is_harmless() {
        let clock = Arc::new(MockTimeProvider::new(1_700_000_000));
        start_log(Some(clock));
        start_log::<MockTimeProvider>(None);
    }
}
