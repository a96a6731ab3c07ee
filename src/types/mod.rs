pub mod defaults;
pub mod fetched;
pub mod measurement;
pub mod station;
