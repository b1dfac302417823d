// Domain layer: template constants, row/document models and ports (interfaces).

pub mod mapping;
pub mod model;
pub mod ports;
