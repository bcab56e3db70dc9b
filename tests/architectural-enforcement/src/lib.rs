//! Architectural Enforcement Helpers
//!
//! Shared scanning code for the integration tests in `tests/`, which enforce:
//! - The core crate stays free of UI frameworks
//! - Production code propagates errors instead of panicking
//! - Library code does not print to the terminal
//! - No thread sleeps in production code
//!
//! "Production code" is every line of a source file before its first
//! `#[cfg(test)]`, with comments skipped.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, two levels above this crate
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// A line of production code
#[derive(Debug)]
pub struct SourceLine {
    /// File the line is in
    pub path: PathBuf,
    /// 1-based line number
    pub number: usize,
    /// Code with any trailing `//` comment removed
    pub code: String,
}

impl std::fmt::Display for SourceLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.number, self.code.trim())
    }
}

/// All `.rs` files under `dir` (relative to the workspace root)
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Production lines of one file
pub fn production_lines(path: &Path) -> Vec<SourceLine> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };

    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .map(|(idx, line)| SourceLine {
            path: path.to_path_buf(),
            number: idx + 1,
            code: line.split("//").next().unwrap_or(line).to_string(),
        })
        .collect()
}

/// Production lines under `dir` matching `pred`
pub fn find_violations(dir: &str, pred: impl Fn(&SourceLine) -> bool) -> Vec<SourceLine> {
    rust_files(dir)
        .iter()
        .flat_map(|path| production_lines(path))
        .filter(|line| pred(line))
        .collect()
}

/// Panic with a readable report when `violations` is not empty
pub fn assert_clean(rule: &str, violations: &[SourceLine]) {
    if violations.is_empty() {
        return;
    }
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!("\n{rule}: found {} violation(s)", violations.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let dir = tempfile_dir();
        let file = dir.join("sample.rs");
        fs::write(
            &file,
            "fn a() {}\n// comment\nlet x = y.unwrap(); // trailing\n#[cfg(test)]\nmod tests {}\n",
        )
        .unwrap();

        let lines = production_lines(&file);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].number, 3);
        assert_eq!(lines[1].code.trim(), "let x = y.unwrap();");
        fs::remove_dir_all(dir).unwrap();
    }

    fn tempfile_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("arch-enforcement-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}
