//! Integration Test: Layering and Panic Policy
//!
//! **Policy**:
//! - `conductor/core` is headless: no ratatui or crossterm, in code or manifest
//! - Production code propagates errors; no `.unwrap()` / `.expect(` / `panic!`
//! - Library code logs through `tracing`; only binaries print
//! - No `std::thread::sleep` anywhere outside tests

use std::fs;

use architectural_enforcement::{assert_clean, find_violations, workspace_root};

const PRODUCTION_DIRS: &[&str] = &["conductor/core/src", "conductor/cli/src", "tui/src"];

#[test]
fn test_core_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("conductor/core/Cargo.toml"))
        .expect("core manifest should be readable");
    for ui_crate in ["ratatui", "crossterm"] {
        assert!(
            !manifest.contains(ui_crate),
            "conductor/core must not depend on {ui_crate}"
        );
    }

    let violations = find_violations("conductor/core/src", |line| {
        line.code.contains("ratatui") || line.code.contains("crossterm")
    });
    assert_clean("UI framework used in conductor/core", &violations);
}

#[test]
fn test_no_panicking_shortcuts_in_production_code() {
    for dir in PRODUCTION_DIRS {
        let violations = find_violations(dir, |line| {
            line.code.contains(".unwrap()")
                || line.code.contains(".expect(")
                || line.code.contains("panic!(")
                || line.code.contains("unreachable!(")
        });
        assert_clean("Panicking call in production code", &violations);
    }
}

#[test]
fn test_library_code_does_not_print() {
    let violations = find_violations("conductor/core/src", |line| {
        line.code.contains("println!") || line.code.contains("eprintln!")
    });
    assert_clean("Printing from conductor/core", &violations);

    let violations = find_violations("tui/src", |line| {
        !line.path.ends_with("main.rs")
            && (line.code.contains("println!") || line.code.contains("eprintln!"))
    });
    assert_clean("Printing from the TUI library", &violations);
}

#[test]
fn test_no_thread_sleep_in_production_code() {
    for dir in PRODUCTION_DIRS {
        let violations = find_violations(dir, |line| line.code.contains("thread::sleep"));
        assert_clean("Blocking sleep in production code", &violations);
    }
}
