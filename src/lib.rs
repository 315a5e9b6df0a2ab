pub mod config;
pub mod dates;
pub mod engine;
pub mod error;
pub mod integrate;
pub mod io;
pub mod math;
pub mod model;
pub mod query;
pub mod rank;
pub mod solve;
pub mod source;
pub mod surface;

pub use config::EngineConfig;
pub use engine::{PopRank, RankPoint};
pub use error::{PopRankError, Result};
pub use model::{ModelKind, PopulationModel};
pub use solve::RankDate;
pub use source::{PopulationSource, WppTable};
pub use surface::{Interpolation, Sex};
