pub mod geo;
pub mod order;
