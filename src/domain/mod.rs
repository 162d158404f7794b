// Domain layer: entity models and ports (interfaces) of the content portal.

pub mod model;
pub mod ports;
