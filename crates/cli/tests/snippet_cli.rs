// Integration tests for the `letsgo-snippet` binary against a mock endpoint.
// Run with: cargo test -p letsgo-cli --test snippet_cli

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use httpmock::prelude::*;
use tempfile::TempDir;

const HELLO: &str = "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"hi\")\n}\n";

/// Temp workspace with a settings file and a static content dir.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let static_dir = dir.path().join("static");
        std::fs::create_dir_all(static_dir.join("basics")).unwrap();
        std::fs::write(static_dir.join("basics/hello.go"), HELLO).unwrap();

        let settings = serde_json::json!({
            "execution.endpoint": "http://127.0.0.1:9/",
            "copy.feedbackMillis": 50,
            "content.staticDir": static_dir,
        });
        std::fs::write(dir.path().join("settings.json"), settings.to_string()).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn settings(&self) -> PathBuf {
        self.path().join("settings.json")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_letsgo-snippet"));
        cmd.env_remove("LETSGO_EXEC_ENDPOINT");
        cmd.arg("--settings").arg(self.settings());
        cmd
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_prints_program_output() {
    let ws = Workspace::new();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/")
            .json_body(serde_json::json!({ "code": HELLO }));
        then.status(200).json_body(serde_json::json!({ "output": "hi\n" }));
    });

    let output = ws
        .cmd()
        .args(["run", "--src", "basics/hello.go", "--endpoint", &server.url("/")])
        .output()
        .expect("letsgo-snippet run");

    mock.assert();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "hi\n");
}

#[test]
fn run_with_edit_sends_edited_buffer() {
    let ws = Workspace::new();
    let edited = ws.path().join("edited.go");
    std::fs::write(&edited, "package main\nfunc main() { println(1) }\n").unwrap();

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).json_body(serde_json::json!({
            "code": "package main\nfunc main() { println(1) }\n"
        }));
        then.status(200).json_body(serde_json::json!({ "output": "1\n" }));
    });

    let output = ws
        .cmd()
        .args(["run", "--src", "basics/hello.go", "--endpoint", &server.url("/")])
        .arg("--edit")
        .arg(&edited)
        .output()
        .unwrap();

    mock.assert();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "1\n");
}

#[test]
fn run_program_error_exits_1() {
    let ws = Workspace::new();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200)
            .json_body(serde_json::json!({ "error": "./prog.go:1:1: expected 'package'" }));
    });

    let output = ws
        .cmd()
        .args(["run", "--code", "nope", "--endpoint", &server.url("/")])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("./prog.go:1:1: expected 'package'"));
}

#[test]
fn run_server_error_exits_4_with_api_message() {
    let ws = Workspace::new();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(500).body("panic: boom");
    });

    let output = ws
        .cmd()
        .args(["run", "--code", "package main", "--endpoint", &server.url("/")])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("API error (500): panic: boom"), "stderr: {}", stderr(&output));
}

#[test]
fn run_unreachable_endpoint_exits_4() {
    let ws = Workspace::new();
    // Endpoint from the settings file
    let output = ws
        .cmd()
        .args(["run", "--code", "package main"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output)
        .contains("Failed to communicate with the execution environment: "));
}

#[test]
fn run_not_permitted_exits_2_without_request() {
    let ws = Workspace::new();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(serde_json::json!({ "output": "" }));
    });

    let output = ws
        .cmd()
        .args(["run", "--code", "package main", "--no-execute", "--endpoint", &server.url("/")])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    mock.assert_hits(0);
}

#[test]
fn run_edit_not_permitted_exits_2() {
    let ws = Workspace::new();
    let edited = ws.path().join("edited.go");
    std::fs::write(&edited, "package main").unwrap();

    let output = ws
        .cmd()
        .args(["run", "--code", "package main", "--no-edit", "--edit"])
        .arg(&edited)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("editing is not enabled"));
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

#[test]
fn show_plain_renders_controls_in_order() {
    let ws = Workspace::new();
    let output = ws
        .cmd()
        .args(["show", "--src", "basics/hello.go", "--plain"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("── Source (Go) ── main.go (read-only)\n"));
    assert!(out.contains("fmt.Println(\"hi\")"));
    assert!(out.contains("[▶ Run] [✎ Edit] [⎘ Copy] [⤓ Download]"));
    assert!(!out.contains("Result"));
}

#[test]
fn show_without_capabilities_hides_run_and_edit() {
    let ws = Workspace::new();
    let output = ws
        .cmd()
        .args(["show", "--code", "package main", "--plain", "--no-execute", "--no-edit"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("[⎘ Copy] [⤓ Download]"));
    assert!(!out.contains("Run"));
    assert!(!out.contains("Edit"));
}

#[test]
fn show_missing_src_uses_placeholder() {
    let ws = Workspace::new();
    let output = ws
        .cmd()
        .args(["show", "--src", "basics/missing.go", "--plain"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("Error loading basics/missing.go."));
}

#[test]
fn show_reads_manifest() {
    let ws = Workspace::new();
    let manifest = ws.path().join("snippet.toml");
    std::fs::write(
        &manifest,
        "src = \"basics/hello.go\"\nfile_name = \"hello.go\"\nallow_execute = false\n",
    )
    .unwrap();

    let output = ws
        .cmd()
        .args(["show", "--plain", "--manifest"])
        .arg(&manifest)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("hello.go (read-only)"));
    assert!(out.contains("[✎ Edit] [⎘ Copy] [⤓ Download]"));
}

#[test]
fn bad_settings_file_exits_2() {
    let ws = Workspace::new();
    std::fs::write(ws.settings(), "{ not json").unwrap();
    let output = ws.cmd().args(["show", "--code", "x"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("invalid JSON"));
}

// ---------------------------------------------------------------------------
// download
// ---------------------------------------------------------------------------

#[test]
fn download_writes_buffer_under_file_name() {
    let ws = Workspace::new();
    let out_dir = ws.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();

    let output = ws
        .cmd()
        .args(["download", "--src", "basics/hello.go", "--file-name", "hello.go", "--out-dir"])
        .arg(&out_dir)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(std::fs::read_to_string(out_dir.join("hello.go")).unwrap(), HELLO);

    // Staged file is released
    let entries: Vec<_> = std::fs::read_dir(&out_dir).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn download_to_missing_dir_exits_3() {
    let ws = Workspace::new();
    let output = ws
        .cmd()
        .args(["download", "--code", "package main", "--out-dir"])
        .arg(ws.path().join("nope"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
}

// ---------------------------------------------------------------------------
// copy
// ---------------------------------------------------------------------------

/// Directory holding a fake `wl-copy` that runs `script`.
#[cfg(unix)]
fn fake_clipboard_bin(ws: &Workspace, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let bin = ws.path().join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let tool = bin.join("wl-copy");
    std::fs::write(&tool, format!("#!/bin/sh\n{}\n", script)).unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
    bin
}

#[cfg(unix)]
fn path_with(bin: &Path) -> String {
    format!("{}:/usr/bin:/bin", bin.display())
}

#[cfg(unix)]
#[test]
fn copy_writes_clipboard_and_reverts_label() {
    let ws = Workspace::new();
    let sink = ws.path().join("clipboard.txt");
    let bin = fake_clipboard_bin(&ws, &format!("cat > '{}'", sink.display()));

    let output = ws
        .cmd()
        .env("PATH", path_with(&bin))
        .args(["copy", "--src", "basics/hello.go"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "✓ Copied!\n⎘ Copy\n");
    assert_eq!(std::fs::read_to_string(&sink).unwrap(), HELLO);
}

#[cfg(unix)]
#[test]
fn failed_clipboard_write_keeps_label_and_succeeds() {
    let ws = Workspace::new();
    let bin = fake_clipboard_bin(&ws, "cat > /dev/null; echo 'no display' >&2; exit 1");

    let output = ws
        .cmd()
        .env("PATH", path_with(&bin))
        .args(["copy", "--code", "package main"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "⎘ Copy\n");
    let err = stderr(&output);
    assert!(!err.contains("error:"), "stderr: {}", err);
    assert!(err.contains("Failed to copy code"), "stderr: {}", err);
}

#[cfg(unix)]
#[test]
fn copy_without_clipboard_tool_exits_3() {
    let ws = Workspace::new();
    let empty = ws.path().join("empty-bin");
    std::fs::create_dir(&empty).unwrap();

    let output = ws
        .cmd()
        .env("PATH", &empty)
        .args(["copy", "--code", "package main"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("no clipboard tool found"));
}
