// Domain layer: table model and ports (interfaces) for storage, configuration and the pipeline.

pub mod model;
pub mod ports;
