//! App directory resolution

use anyhow::Result;
use std::path::PathBuf;

/// The sheetchat home directory (`~/.sheetchat`, or `$SHEETCHAT_HOME`)
pub fn sheetchat_dir() -> Result<PathBuf> {
    resolve_dir(std::env::var("SHEETCHAT_HOME").ok())
}

// Env access stays in the caller so tests don't mutate process globals
fn resolve_dir(override_path: Option<String>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(PathBuf::from(path));
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("No home directory"))?;
    Ok(home.join(".sheetchat"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_override() {
        assert_eq!(
            resolve_dir(Some("/tmp/sheetchat-test".to_string())).unwrap(),
            PathBuf::from("/tmp/sheetchat-test")
        );
    }

    #[test]
    fn test_default_under_home() {
        let dir = resolve_dir(None).unwrap();
        assert!(dir.ends_with(".sheetchat"));
    }
}
