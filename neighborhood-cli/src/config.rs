//! Environment loading
//!
//! `.env` files are read before arguments are parsed so `DB_*` settings can
//! live in either place. Variables already set in the environment win.

use std::path::PathBuf;

/// Get the neighborhood config directory path (~/.neighborhood)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".neighborhood"))
}

/// Load environment variables from .env files in multiple locations
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. Current directory .env
/// 3. ~/.neighborhood/.env
///
/// Runs before tracing is up, so it reports what it loaded instead of
/// logging.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        // dotenvy doesn't overwrite existing vars, so this is safe
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded_from.push(env_file);
        }
    }

    loaded_from
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_ends_with_neighborhood() {
        if let Some(path) = config_dir() {
            assert!(path.ends_with(".neighborhood"));
        }
    }

    #[test]
    fn load_dotenv_doesnt_panic() {
        // Should never panic, even if no .env exists
        let _ = load_dotenv();
    }
}
