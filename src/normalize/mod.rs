pub mod error;
pub mod normalizer;
mod response;
