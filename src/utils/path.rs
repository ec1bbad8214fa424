//! `~` expansion for user-supplied database and export paths.

use std::path::PathBuf;

/// `~/x` becomes `<home>/x`; anything else is returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

pub fn expand_home_str(path: &str) -> String {
    expand_home(path).to_string_lossy().into_owned()
}
