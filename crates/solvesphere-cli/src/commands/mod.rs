pub mod credential;
pub mod history;
pub mod modules;
pub mod solve;

use solvesphere_core::module::AppMode;

/// Parses the `--mode` flag.
pub fn parse_mode(value: &str) -> Result<AppMode, String> {
    match value.to_lowercase().as_str() {
        "student" => Ok(AppMode::Student),
        "business" => Ok(AppMode::Business),
        other => Err(format!(
            "unknown mode '{other}' (expected 'student' or 'business')"
        )),
    }
}
