use tracing::debug;

use super::{
    coefficients::CoefficientTable,
    ds::{PlanRequest, PlanResult, RawPlanRequest, Recipe, SimulationData, SoilType},
    pest::resolve_ipm,
    SIMULATION_DAYS, START_MOISTURE,
};
use crate::{error::AppError, utils::round2};

/// Validates a wire request. Plot size is converted to m²; the crop name is kept as supplied.
pub fn validate(raw: &RawPlanRequest) -> Result<PlanRequest, AppError> {
    let plot_size = raw.plot_size.ok_or_else(|| AppError::missing_field("plotSize"))?;
    if !plot_size.is_finite() || plot_size <= 0. {
        return Err(AppError::ValidationError(format!("plotSize must be a positive number, got {}", plot_size)));
    }
    let soil_type = raw.soil_type.as_deref().ok_or_else(|| AppError::missing_field("soilType"))?.parse::<SoilType>()?;
    let crop_type = match raw.crop_type.as_deref() {
        None | Some("") => return Err(AppError::missing_field("cropType")),
        Some(crop_type) => crop_type,
    };

    let plot_size = raw.plot_unit.unwrap_or_default().to_square_metres(plot_size);
    if !plot_size.is_finite() {
        return Err(too_large(plot_size));
    }
    Ok(PlanRequest { plot_size, soil_type, crop_type: crop_type.to_owned() })
}

fn too_large(plot_size: f64) -> AppError {
    AppError::ValidationError(format!("plotSize is too large to compute a plan, got {} m²", plot_size))
}

pub fn calculate(raw: &RawPlanRequest, coefficients: &CoefficientTable) -> Result<PlanResult, AppError> {
    let request = validate(raw)?;
    compute(&request, coefficients)
}

/// Recipe, cost, moisture simulation and pest advice for a validated request.
pub fn compute(request: &PlanRequest, coefficients: &CoefficientTable) -> Result<PlanResult, AppError> {
    let (biochar, hydrogel) = calc_recipe(request.plot_size, request.soil_type, coefficients)?;
    let cost = calc_cost(biochar, hydrogel, coefficients);
    if !(biochar.is_finite() && hydrogel.is_finite() && cost.is_finite()) {
        return Err(too_large(request.plot_size));
    }

    let (normal_loss, treated_loss) = daily_loss_fractions(request.soil_type, coefficients)?;
    let simulation_data = SimulationData {
        labels: day_labels(),
        normal_soil: simulate_moisture(normal_loss),
        aqua_spnge_soil: simulate_moisture(treated_loss),
    };
    debug!(
        "Plan for {:.2} m² of {} soil growing {}: biochar {:.2} kg, hydrogel {:.2} kg, cost {:.2}.",
        request.plot_size, request.soil_type, request.crop_type, biochar, hydrogel, cost
    );

    Ok(PlanResult {
        recipe: Recipe { biochar: round2(biochar), hydrogel: round2(hydrogel) },
        cost: round2(cost),
        simulation_data,
        ipm_solution: resolve_ipm(coefficients, &request.crop_type),
    })
}

/// Unrounded (biochar kg, hydrogel kg)
pub fn calc_recipe(plot_size: f64, soil_type: SoilType, coefficients: &CoefficientTable) -> Result<(f64, f64), AppError> {
    let biochar = plot_size * coefficients.soil(soil_type)?.biochar_kg_per_sqm;
    let hydrogel = plot_size * coefficients.amendments.hydrogel.recipe_kg_per_sqm;
    Ok((biochar, hydrogel))
}

pub fn calc_cost(biochar: f64, hydrogel: f64, coefficients: &CoefficientTable) -> f64 {
    biochar * coefficients.amendments.biochar.cost_per_kg + hydrogel * coefficients.amendments.hydrogel.cost_per_kg
}

/// (untreated, treated) share of moisture lost per day
pub fn daily_loss_fractions(soil_type: SoilType, coefficients: &CoefficientTable) -> Result<(f64, f64), AppError> {
    let normal = coefficients.soil(soil_type)?.daily_water_loss_percent / 100.;
    let treated = normal * (1. - coefficients.amendments.hydrogel.water_loss_reduction_percent / 100.);
    Ok((normal, treated))
}

/// Moisture (%) at the start of each day, before that day's loss is applied.
pub fn simulate_moisture(daily_loss: f64) -> Vec<u32> {
    let mut moisture = START_MOISTURE;
    let mut series = Vec::with_capacity(SIMULATION_DAYS);
    for _ in 0..SIMULATION_DAYS {
        series.push(moisture.round() as u32);
        moisture = (moisture * (1. - daily_loss)).max(0.);
    }
    series
}

pub fn day_labels() -> Vec<String> {
    (1..=SIMULATION_DAYS).map(|day| format!("Day {}", day)).collect()
}
