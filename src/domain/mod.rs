// Domain layer: records returned by the portal API and the ports used to reach it.

pub mod model;
pub mod ports;
