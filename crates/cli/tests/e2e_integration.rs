//! End-to-end tests for the `selene` binary.
//!
//! Each test writes its inputs to a temp dir and points `--config` at a file
//! inside it, so the user's own configuration never leaks in.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("context.toml")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_selene"))
            .args(args)
            .arg("--config")
            .arg(self.config_path())
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ── chunk ────────────────────────────────────────────────────────────────

#[test]
fn chunk_prints_json_with_file_stem_as_document_id() {
    let ws = Workspace::new();
    let body = vec!["promotion"; 70].join(" ");
    let other = vec!["running"; 80].join(" ");
    let file = ws.write("journal.md", &format!("# Career\n{body}\n\n# Health\n{other}"));

    let out = stdout(&ws.run(&["chunk", arg(&file)]));
    let chunks: serde_json::Value = serde_json::from_str(&out).unwrap();
    let chunks = chunks.as_array().unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0]["document_id"], "journal");
    assert_eq!(chunks[0]["index"], 0);
    assert_eq!(chunks[1]["index"], 1);
    assert_ne!(chunks[0]["topic"], chunks[1]["topic"]);
}

#[test]
fn chunk_missing_file_fails() {
    let ws = Workspace::new();
    let output = ws.run(&["chunk", "does-not-exist.md"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}

// ── render ───────────────────────────────────────────────────────────────

const ENTITIES: &str = r#"[
    {"kind": "thread", "id": 1, "name": "Career", "note_count": 3, "digest": "Weighing the offer."},
    {"kind": "note", "id": 2, "title": "Offer", "content": "Salary and start date.",
     "primary_theme": "work", "fidelity_tier": "skeleton"},
    {"kind": "note", "id": 3, "title": "Call", "content": "Talked to the recruiter."}
]"#;

#[test]
fn render_assembles_entities_in_order() {
    let ws = Workspace::new();
    let file = ws.write("entities.json", ENTITIES);

    let out = stdout(&ws.run(&["render", arg(&file), "--use-case", "synthesis"]));
    assert_eq!(
        out.trim_end(),
        "=== Thread: Career (3 notes) ===\nWeighing the offer.\n\n- Offer [work]\n\n--- Call ---\nTalked to the recruiter."
    );
}

#[test]
fn render_respects_configured_budget() {
    let ws = Workspace::new();
    ws.write("context.toml", "[budgets]\nbriefing = 12\n");
    let file = ws.write("entities.json", ENTITIES);

    let out = stdout(&ws.run(&["render", arg(&file), "--json"]));
    let assembled: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(assembled["use_case"], "briefing");
    assert_eq!(assembled["stats"]["budget_tokens"], 12);
    let text = assembled["text"].as_str().unwrap();
    assert!(text.chars().count() <= 48);
    assert!(assembled["stats"]["blocks_dropped"].as_u64().unwrap() >= 1);
}

#[test]
fn render_rejects_unknown_use_case() {
    let ws = Workspace::new();
    let file = ws.write("entities.json", ENTITIES);
    let output = ws.run(&["render", arg(&file), "--use-case", "poetry"]);
    assert!(!output.status.success());
}

// ── history ──────────────────────────────────────────────────────────────

#[test]
fn history_keeps_recent_turns_verbatim() {
    let ws = Workspace::new();
    let messages: Vec<serde_json::Value> = (0..12)
        .map(|i| {
            let role = if i % 2 == 0 { "user" } else { "assistant" };
            serde_json::json!({"role": role, "content": format!("message {i}")})
        })
        .collect();
    let file = ws.write("messages.json", &serde_json::to_string(&messages).unwrap());

    let out = stdout(&ws.run(&["history", arg(&file)]));
    assert!(out.starts_with("[Earlier in conversation:]"));
    assert!(out.contains("[Recent:]\n\nUser: message 4"));
    assert!(out.trim_end().ends_with("Selene: message 11"));
}

#[test]
fn history_recent_turns_flag_overrides_config() {
    let ws = Workspace::new();
    let file = ws.write(
        "messages.json",
        r#"[{"role": "user", "content": "first"}, {"role": "assistant", "content": "second"}]"#,
    );

    let out = stdout(&ws.run(&["history", arg(&file), "--recent-turns", "0"]));
    assert_eq!(
        out.trim_end(),
        "[Earlier in conversation:]\n\nUser: first\n\nSelene: second"
    );
}

// ── config ───────────────────────────────────────────────────────────────

#[test]
fn config_shows_effective_values() {
    let ws = Workspace::new();
    ws.write("context.toml", "[history]\nassistant_name = \"Luna\"\n");

    let out = stdout(&ws.run(&["config"]));
    assert!(out.contains("assistant_name = \"Luna\""));
    assert!(out.contains("max_tokens = 256"));
}

#[test]
fn config_defaults_and_path() {
    let ws = Workspace::new();
    let defaults = stdout(&ws.run(&["config", "--defaults"]));
    assert!(defaults.contains("[budgets]"));
    assert!(defaults.contains("deep_dive = 3000"));

    let path = stdout(&ws.run(&["config", "--path"]));
    assert_eq!(path.trim_end(), ws.config_path().display().to_string());
}

#[test]
fn invalid_config_is_reported() {
    let ws = Workspace::new();
    ws.write("context.toml", "[chunking]\nmin_tokens = 500\nmax_tokens = 100\n");

    let output = ws.run(&["config"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("min_tokens"));
}
