use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SoilType {
    Sandy,
    Loamy,
    Clay,
}

impl SoilType {
    pub const ALL: [SoilType; 3] = [SoilType::Sandy, SoilType::Loamy, SoilType::Clay];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Sandy => "Sandy",
            SoilType::Loamy => "Loamy",
            SoilType::Clay => "Clay",
        }
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoilType {
    type Err = AppError;

    /// Strict: only the exact names are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoilType::ALL.into_iter().find(|soil| soil.as_str() == s).ok_or_else(|| {
            AppError::ValidationError(format!("Invalid soilType '{}'. Expected one of: Sandy, Loamy, Clay", s))
        })
    }
}

/// Unit the client entered the plot size in
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AreaUnit {
    #[default]
    #[serde(rename = "m²", alias = "m2")]
    SquareMetres,
    #[serde(rename = "ha")]
    Hectares,
    #[serde(rename = "acres")]
    Acres,
}

impl AreaUnit {
    pub fn square_metres(&self) -> f64 {
        match self {
            AreaUnit::SquareMetres => 1.,
            AreaUnit::Hectares => 10_000.,
            AreaUnit::Acres => 4_046.86,
        }
    }

    pub fn to_square_metres(&self, value: f64) -> f64 {
        value * self.square_metres()
    }
}

/// Wire form of a calculation request. Every field is optional so that each missing one
/// gets its own validation message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlanRequest {
    pub plot_size: Option<f64>,
    pub soil_type: Option<String>,
    pub crop_type: Option<String>,
    pub plot_unit: Option<AreaUnit>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    /// m²
    pub plot_size: f64,
    pub soil_type: SoilType,
    pub crop_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// kg
    pub biochar: f64,
    /// kg
    pub hydrogel: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationData {
    pub labels: Vec<String>,
    pub normal_soil: Vec<u32>,
    pub aqua_spnge_soil: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpmSolution {
    pub title: String,
    pub technique: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub recipe: Recipe,
    pub cost: f64,
    pub simulation_data: SimulationData,
    pub ipm_solution: IpmSolution,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub soil_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WateringSchedule {
    pub soil_type: SoilType,
    pub critical_moisture: u32,
    pub interval_days: u32,
    pub dates: Vec<NaiveDate>,
}
