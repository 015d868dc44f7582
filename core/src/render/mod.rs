pub mod colors;
pub mod csv;
pub mod urls;
