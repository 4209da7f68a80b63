// Domain layer: listing models and the ports to the view engine.

pub mod model;
pub mod ports;
