pub mod error;
pub mod series;
pub mod time_index;
