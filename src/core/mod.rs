pub mod artifact;
pub mod codec;
pub mod percentiles;
pub mod sampler;
pub mod summary;
