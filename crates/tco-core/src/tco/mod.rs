pub mod params;
pub mod projection;
pub mod risk;
