//! Temporary files and their process-lifetime cleanup.

pub mod create;
pub mod registry;

pub use create::{find_tmp, save_data_to_temp_file, temp_dir, temp_file};
pub use registry::{DrainGuard, DrainReport, RegistryState, TempRegistry};
