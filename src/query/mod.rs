pub mod builder;
pub mod request;
