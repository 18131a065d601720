//! Fractal module: The escape-time sampler used by the animated payload.

mod sampler;

pub use sampler::{sample, SampleParams, ESCAPE_RADIUS_SQUARED};
