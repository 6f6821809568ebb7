pub mod lead;
pub mod projection;
pub mod sensitivity;
