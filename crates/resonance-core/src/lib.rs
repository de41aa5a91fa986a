pub mod analysis;
pub mod config;
pub mod energy;
pub mod error;
pub mod inspect;
pub mod io;
pub mod manifest;
pub mod parfile;
pub mod paths;
pub mod plot;
pub mod series;
pub mod solver;
pub mod sweep;
pub mod targets;
pub mod zeta;

pub use error::{ResonanceError, Result};
