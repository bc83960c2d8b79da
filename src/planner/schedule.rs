use chrono::{Days, NaiveDate};

use super::{
    calculator::{daily_loss_fractions, simulate_moisture},
    coefficients::CoefficientTable,
    ds::{ScheduleRequest, SoilType, WateringSchedule},
    SIMULATION_DAYS,
};
use crate::{config, error::AppError};

/// Days until the amended soil first drops to `critical_moisture`; the whole horizon when it
/// never does. Never less than one day.
pub fn watering_interval(treated: &[u32], critical_moisture: u32) -> u32 {
    treated
        .iter()
        .position(|&moisture| moisture <= critical_moisture)
        .map_or(SIMULATION_DAYS as u32, |idx| idx as u32)
        .max(1)
}

/// `events` dates starting at `start`, spaced `interval_days` apart
pub fn watering_dates(start: NaiveDate, interval_days: u32, events: usize) -> Result<Vec<NaiveDate>, AppError> {
    (0..events as u64)
        .map(|idx| {
            start
                .checked_add_days(Days::new(idx * interval_days as u64))
                .ok_or_else(|| AppError::InternalError(format!("Watering date out of range after {}", start)))
        })
        .collect()
}

pub fn watering_schedule(
    request: &ScheduleRequest, coefficients: &CoefficientTable, cfg: config::Schedule, today: NaiveDate,
) -> Result<WateringSchedule, AppError> {
    let soil_type = request.soil_type.as_deref().ok_or_else(|| AppError::missing_field("soilType"))?.parse::<SoilType>()?;
    let (_, treated_loss) = daily_loss_fractions(soil_type, coefficients)?;

    let interval_days = watering_interval(&simulate_moisture(treated_loss), cfg.critical_moisture);
    Ok(WateringSchedule {
        soil_type,
        critical_moisture: cfg.critical_moisture,
        interval_days,
        dates: watering_dates(today, interval_days, cfg.events)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn interval_is_first_day_at_or_below_threshold() {
        assert_eq!(watering_interval(&[100, 80, 60, 40, 30], 40), 3);
        assert_eq!(watering_interval(&[100, 80, 60, 45, 41], 40), SIMULATION_DAYS as u32);
        assert_eq!(watering_interval(&[], 40), SIMULATION_DAYS as u32);
    }

    #[test]
    fn interval_is_at_least_one_day() {
        assert_eq!(watering_interval(&[100, 90], 100), 1);
    }

    #[test]
    fn dates_are_spaced_by_interval() {
        let dates = watering_dates(date(2026, 10, 19), 9, 4).unwrap();
        assert_eq!(dates, vec![date(2026, 10, 19), date(2026, 10, 28), date(2026, 11, 6), date(2026, 11, 15)]);
    }

    #[test]
    fn sandy_soil_schedule() {
        let table = CoefficientTable::default();
        let request = ScheduleRequest { soil_type: Some("Sandy".into()) };
        let schedule = watering_schedule(&request, &table, config::Schedule::default(), date(2026, 1, 30)).unwrap();
        // treated loss 5 %/day: 0.95^17 ≈ 0.418, 0.95^18 ≈ 0.397
        assert_eq!(schedule.interval_days, 18);
        assert_eq!(schedule.dates.len(), 4);
        assert_eq!(schedule.dates[1], date(2026, 2, 17));
    }

    #[test]
    fn clay_soil_never_reaches_threshold() {
        let table = CoefficientTable::default();
        let request = ScheduleRequest { soil_type: Some("Clay".into()) };
        let schedule = watering_schedule(&request, &table, config::Schedule::default(), date(2026, 1, 1)).unwrap();
        assert_eq!(schedule.interval_days, 20);
    }

    #[test]
    fn unknown_soil_is_rejected() {
        let table = CoefficientTable::default();
        let request = ScheduleRequest { soil_type: Some("Marsh".into()) };
        let res = watering_schedule(&request, &table, config::Schedule::default(), date(2026, 1, 1));
        assert!(matches!(res, Err(AppError::ValidationError(_))));
    }
}
