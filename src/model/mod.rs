pub mod decimal;
pub mod profile;
pub mod scores;
pub mod weights;
