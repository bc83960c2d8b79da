use super::{coefficients::CoefficientTable, ds::IpmSolution};

pub const GENERIC_IPM_TITLE: &str = "General Integrated Pest Management";
pub const GENERIC_IPM_TECHNIQUE: &str = "Integrated Pest Management (IPM)";

/// Table entry for the crop when there is one, generic IPM advice otherwise. Never fails.
pub fn resolve_ipm(coefficients: &CoefficientTable, crop_type: &str) -> IpmSolution {
    match coefficients.crop(crop_type) {
        Some(ipm) => ipm.clone(),
        None => generic_ipm(crop_type),
    }
}

pub fn generic_ipm(crop_type: &str) -> IpmSolution {
    IpmSolution {
        title: GENERIC_IPM_TITLE.to_owned(),
        technique: GENERIC_IPM_TECHNIQUE.to_owned(),
        description: format!(
            "For {}, scout the plot at least once a week and identify pests before acting. \
             Encourage natural enemies with flowering borders, rotate crops between seasons, \
             remove infested plant material, and treat only when damage passes the action threshold, \
             starting with the least toxic option.",
            crop_type
        ),
    }
}
