pub mod classify;
pub mod model;
pub mod normalize;
pub mod synthesize;
