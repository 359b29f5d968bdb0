//! File utility functions

use std::path::PathBuf;

/// Expand a user-supplied path to an absolute path.
///
/// `~` and `~/...` resolve against the home directory. Relative paths resolve
/// against the current directory. Surrounding whitespace is ignored.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();
    let cwd = || std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if path.is_empty() {
        return cwd();
    }

    let expanded = match path.strip_prefix('~') {
        Some("") => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        Some(rest) if rest.starts_with('/') => dirs::home_dir()
            .map(|home| home.join(rest.trim_start_matches('/')))
            .unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    };

    if expanded.is_relative() {
        cwd().join(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_absolute() {
        assert_eq!(expand_path("/srv/media"), PathBuf::from("/srv/media"));
    }

    #[test]
    fn test_expand_path_relative() {
        let result = expand_path("./vidhive.json");
        assert!(result.is_absolute());
        assert!(result.ends_with("vidhive.json"));
    }

    #[test]
    fn test_expand_path_tilde() {
        let result = expand_path("~/.vidhive");
        assert!(result.is_absolute());
        assert!(!result.to_string_lossy().contains('~'));
        assert!(result.ends_with(".vidhive"));
    }

    #[test]
    fn test_expand_path_tilde_only() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~"), home);
        }
    }

    #[test]
    fn test_expand_path_trims_and_defaults() {
        assert_eq!(expand_path("  /a/b  "), PathBuf::from("/a/b"));
        assert!(expand_path("   ").is_absolute());
    }
}
