// Domain layer: core models and ports (interfaces). No external dependencies beyond std/serde when needed.

pub mod model;
pub mod ports;
pub mod template;
