//! Chapter model and response normalization.

pub mod chapter;
pub mod normalize;
