pub mod fixes;
pub mod journal;
