pub mod config;
pub mod error;
pub mod types;

pub use config::{
    CoverConfig, CoverPolicy, GridlessDistanceMode, GridlessTokenShape, HostFeatures,
    ProneCoverPolicy, SizeHeights,
};
pub use error::{CoverError, Result};
pub use types::{Disposition, OccupantId, SizeCategory, TokenShape};
