pub mod lifecycle;
pub mod media;
pub mod render;
pub mod report;

pub mod error;
