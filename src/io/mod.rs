pub mod debug_log;
pub mod population;
pub mod population_pg;
pub mod synthetic;
