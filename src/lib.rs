//! Tactical Cover - Cover and Line-of-Sight Evaluation for Battle Maps

pub mod core;
pub mod cover;
pub mod grid;
pub mod measure;
pub mod scenario;
