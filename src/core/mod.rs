//! Core building blocks: job parameters, pixel resampling and UCI line parsing.
//! These are internal primitives consumed by the high-level `api` module.
pub mod params;
pub mod resize;
pub mod uci;
