pub mod filter;
pub mod into_service_time;
pub mod sensor;
pub mod volume;
pub mod window;
