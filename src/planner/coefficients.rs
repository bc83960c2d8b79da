//! Static coefficient table: per-soil recipe and water-loss figures, amendment prices and the
//! crop → IPM recommendation table.
//!
//! Soil lookups are strict (every `SoilType` must be present once the table is loaded); crop
//! lookups match the name exactly and fall back to generic advice in `planner::pest`.

use serde::Deserialize;
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};
use tracing::info;

use super::ds::{IpmSolution, SoilType};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SoilCoefficients {
    /// kg of biochar per m²
    pub biochar_kg_per_sqm: f64,
    /// share of moisture lost per day without amendment, in %
    pub daily_water_loss_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BiocharCoefficients {
    pub cost_per_kg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HydrogelCoefficients {
    pub cost_per_kg: f64,
    /// kg of hydrogel per m², independent of soil
    pub recipe_kg_per_sqm: f64,
    /// reduction applied to the daily water loss, in %
    pub water_loss_reduction_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Amendments {
    pub biochar: BiocharCoefficients,
    pub hydrogel: HydrogelCoefficients,
}

/// File layout, keyed by names as written in the TOML
#[derive(Debug, Deserialize)]
struct CoefficientFile {
    soil: BTreeMap<String, SoilCoefficients>,
    amendments: Amendments,
    #[serde(default)]
    crops: BTreeMap<String, IpmSolution>,
}

#[derive(Debug, Clone)]
pub struct CoefficientTable {
    soil: HashMap<SoilType, SoilCoefficients>,
    pub amendments: Amendments,
    /// keyed by crop name exactly as written
    crops: HashMap<String, IpmSolution>,
}

impl CoefficientTable {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)?;
        let table = Self::load_from_str(&content)?;
        info!(file = %path.display(), crops = table.crops.len(), "Loaded coefficient table.");
        Ok(table)
    }

    pub fn load_from_str(content: &str) -> Result<Self, AppError> {
        let file: CoefficientFile = toml::from_str(content)?;

        let mut soil = HashMap::with_capacity(file.soil.len());
        for (name, coefficients) in file.soil {
            let soil_type = name
                .parse::<SoilType>()
                .map_err(|_| AppError::ConfigError(format!("Unknown soil type '{}' in coefficient table", name)))?;
            soil.insert(soil_type, coefficients);
        }
        let crops = file.crops.into_iter().collect();

        let table = Self { soil, amendments: file.amendments, crops };
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), AppError> {
        for soil_type in SoilType::ALL {
            let Some(soil) = self.soil.get(&soil_type) else {
                return Err(AppError::ConfigError(format!("Coefficient table has no entry for soil '{}'", soil_type)));
            };
            check_non_negative(&format!("soil.{}.biochar_kg_per_sqm", soil_type), soil.biochar_kg_per_sqm)?;
            check_percent(&format!("soil.{}.daily_water_loss_percent", soil_type), soil.daily_water_loss_percent)?;
        }
        let hydrogel = &self.amendments.hydrogel;
        check_non_negative("amendments.biochar.cost_per_kg", self.amendments.biochar.cost_per_kg)?;
        check_non_negative("amendments.hydrogel.cost_per_kg", hydrogel.cost_per_kg)?;
        check_non_negative("amendments.hydrogel.recipe_kg_per_sqm", hydrogel.recipe_kg_per_sqm)?;
        check_percent("amendments.hydrogel.water_loss_reduction_percent", hydrogel.water_loss_reduction_percent)
    }

    pub fn soil(&self, soil_type: SoilType) -> Result<&SoilCoefficients, AppError> {
        self.soil
            .get(&soil_type)
            .ok_or_else(|| AppError::InternalError(format!("No coefficients for soil '{}'", soil_type)))
    }

    pub fn crop(&self, crop_type: &str) -> Option<&IpmSolution> {
        self.crops.get(crop_type)
    }
}

impl Default for CoefficientTable {
    fn default() -> Self {
        let soil = HashMap::from([
            (SoilType::Sandy, SoilCoefficients { biochar_kg_per_sqm: 0.5, daily_water_loss_percent: 10. }),
            (SoilType::Loamy, SoilCoefficients { biochar_kg_per_sqm: 0.3, daily_water_loss_percent: 6. }),
            (SoilType::Clay, SoilCoefficients { biochar_kg_per_sqm: 0.2, daily_water_loss_percent: 4. }),
        ]);
        let amendments = Amendments {
            biochar: BiocharCoefficients { cost_per_kg: 0.8 },
            hydrogel: HydrogelCoefficients {
                cost_per_kg: 6.,
                recipe_kg_per_sqm: 0.05,
                water_loss_reduction_percent: 50.,
            },
        };
        let crops = [
            (
                "Maize",
                "Push-Pull for Fall Armyworm",
                "Push-Pull",
                "Intercrop maize with Desmodium to repel fall armyworm moths and border the plot with \
                 Napier grass to trap them. Scout leaf whorls twice a week and hand-pick egg masses.",
            ),
            (
                "Tomato",
                "Trap and Exclude Tuta absoluta",
                "Pheromone Trapping",
                "Hang pheromone traps at 20 per hectare to monitor and mass-trap tomato leaf miner. \
                 Remove and bury mined leaves, and use insect netting on nursery beds.",
            ),
            (
                "Cabbage",
                "Diamondback Moth Control",
                "Biological Control",
                "Spray Bacillus thuringiensis in the evening when larvae are feeding, and plant \
                 mustard as a trap crop along the edges. Rotate away from brassicas each season.",
            ),
        ]
        .into_iter()
        .map(|(crop, title, technique, description)| {
            let ipm = IpmSolution { title: title.into(), technique: technique.into(), description: description.into() };
            (crop.to_owned(), ipm)
        })
        .collect();

        Self { soil, amendments, crops }
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<(), AppError> {
    if value.is_finite() && value >= 0. {
        Ok(())
    } else {
        Err(AppError::ConfigError(format!("{} must be a non-negative number, got {}", field, value)))
    }
}

fn check_percent(field: &str, value: f64) -> Result<(), AppError> {
    if value.is_finite() && (0. ..=100.).contains(&value) {
        Ok(())
    } else {
        Err(AppError::ConfigError(format!("{} must be within 0..=100, got {}", field, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
[soil.Sandy]
biochar_kg_per_sqm = 0.5
daily_water_loss_percent = 10.0

[soil.Loamy]
biochar_kg_per_sqm = 0.3
daily_water_loss_percent = 6.0

[soil.Clay]
biochar_kg_per_sqm = 0.2
daily_water_loss_percent = 4.0

[amendments.biochar]
cost_per_kg = 1.0

[amendments.hydrogel]
cost_per_kg = 5.0
recipe_kg_per_sqm = 0.1
water_loss_reduction_percent = 40.0

[crops.Maize]
title = "Push-Pull"
technique = "Intercropping"
description = "Desmodium and Napier grass."
"#;

    #[test]
    fn loads_from_toml() {
        let table = CoefficientTable::load_from_str(TABLE).unwrap();
        assert_eq!(table.soil(SoilType::Sandy).unwrap().biochar_kg_per_sqm, 0.5);
        assert_eq!(table.amendments.hydrogel.recipe_kg_per_sqm, 0.1);
        assert_eq!(table.crop("Maize").unwrap().title, "Push-Pull");
    }

    #[test]
    fn crop_lookup_is_exact() {
        let table = CoefficientTable::default();
        assert!(table.crop("Maize").is_some());
        assert!(table.crop("maize").is_none());
        assert!(table.crop(" Maize ").is_none());
        assert!(table.crop("TOMATO").is_none());
        assert!(table.crop("Cassava").is_none());
    }

    #[test]
    fn every_soil_must_be_present() {
        let without_clay = TABLE.replace("[soil.Clay]", "[soil.Peat]");
        assert!(matches!(CoefficientTable::load_from_str(&without_clay), Err(AppError::ConfigError(_))));

        let start = TABLE.find("[soil.Clay]").unwrap();
        let end = TABLE.find("[amendments.biochar]").unwrap();
        let dropped = format!("{}{}", &TABLE[..start], &TABLE[end..]);
        assert!(matches!(CoefficientTable::load_from_str(&dropped), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn out_of_range_coefficients_are_rejected() {
        let bad_loss = TABLE.replace("daily_water_loss_percent = 10.0", "daily_water_loss_percent = 120.0");
        assert!(matches!(CoefficientTable::load_from_str(&bad_loss), Err(AppError::ConfigError(_))));

        let bad_cost = TABLE.replace("cost_per_kg = 1.0", "cost_per_kg = -1.0");
        assert!(matches!(CoefficientTable::load_from_str(&bad_cost), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn default_table_is_valid() {
        CoefficientTable::default().validate().unwrap();
    }
}
