pub mod calculator;
pub mod coefficients;
pub mod ds;
pub mod pest;
pub mod schedule;

pub const SIMULATION_DAYS: usize = 20;
pub const START_MOISTURE: f64 = 100.; // %
