//! Host platform utility functions

use std::env;
use std::path::PathBuf;

/// Name of the environment variable pointing at the software root directory.
///
/// The root holds the `params` directory and is where session directories are
/// created.
pub const SW_ROOT_ENV_VAR: &str = "CAR_CTRL_SW_ROOT";

/// Get the path to the software root directory.
pub fn get_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
