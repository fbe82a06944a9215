pub mod accessor;
pub mod lids;
pub mod range;
pub mod reports;
pub mod snapshot;
pub mod states;
pub mod timestamp;
pub mod vehicle;
pub mod vehicle_status;
