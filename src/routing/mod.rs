pub mod directions;
pub mod geocoder;
pub mod resolver;
