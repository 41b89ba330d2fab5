//! Version command implementation.
//!
//! Reports the crate version alongside the SQLite library the store is
//! built against, since the database file format follows the latter.

use crate::error::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: &'static str,
    build: &'static str,
    sqlite: &'static str,
}

impl VersionInfo {
    fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            build: if cfg!(debug_assertions) {
                "dev"
            } else {
                "release"
            },
            sqlite: rusqlite::version(),
        }
    }

    fn line(&self) -> String {
        format!(
            "missions version {} ({}), SQLite {}",
            self.version, self.build, self.sqlite
        )
    }
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let info = VersionInfo::current();

    if json {
        println!("{}", serde_json::to_string(&info)?);
    } else {
        println!("{}", info.line());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_names_sqlite_library() {
        let info = VersionInfo::current();
        let line = info.line();

        assert!(line.starts_with(&format!("missions version {}", env!("CARGO_PKG_VERSION"))));
        assert!(line.ends_with(&format!("SQLite {}", rusqlite::version())));
    }

    #[test]
    fn test_json_fields() {
        let value = serde_json::to_value(VersionInfo::current()).unwrap();
        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
        assert!(value["sqlite"].as_str().unwrap().starts_with('3'));
    }
}
