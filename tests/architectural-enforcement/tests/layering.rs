//! Integration Test: Layering
//!
//! **Policy**: `nava-core` is headless. Terminal, clipboard and rendering
//! crates belong to surfaces. Neither crate blocks a thread to wait; reveal,
//! copy and tagline timers advance from the frame clock.

use architectural_enforcement::{production_lines, workspace_root};

const SURFACE_CRATES: &[&str] = &["ratatui", "crossterm", "arboard"];

#[test]
fn test_core_has_no_surface_dependencies() {
    let core = workspace_root().join("conductor/core");
    let manifest = std::fs::read_to_string(core.join("Cargo.toml")).expect("core manifest");

    for krate in SURFACE_CRATES {
        assert!(
            !manifest.lines().any(|l| l.trim_start().starts_with(krate)),
            "nava-core must not depend on {krate}"
        );
    }

    let violations: Vec<String> = production_lines(&core.join("src"))
        .into_iter()
        .filter(|(_, _, line)| SURFACE_CRATES.iter().any(|k| line.contains(&format!("{k}::"))))
        .map(|(path, n, line)| format!("{}:{} {}", path.display(), n, line.trim()))
        .collect();

    assert!(
        violations.is_empty(),
        "surface crates used in nava-core:\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_no_thread_sleep_in_production_code() {
    let root = workspace_root();
    let mut violations = Vec::new();

    for dir in ["conductor/core/src", "tui/src"] {
        let path = root.join(dir);
        assert!(path.exists(), "{} missing", path.display());

        violations.extend(
            production_lines(&path)
                .into_iter()
                .filter(|(_, _, line)| line.contains("thread::sleep"))
                .map(|(path, n, line)| format!("{}:{} {}", path.display(), n, line.trim())),
        );
    }

    assert!(
        violations.is_empty(),
        "thread sleeps found (use frame-driven timers or tokio::time):\n{}",
        violations.join("\n")
    );
}
