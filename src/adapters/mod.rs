pub mod snapshot_file;
pub mod source;
