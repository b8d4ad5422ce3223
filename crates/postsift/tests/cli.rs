//! End-to-end tests that drive the `sift` binary.
//!
//! Each test gets its own config file and data directories under a temp dir,
//! passed through `POSTSIFT_CONFIG`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for sub in ["queries", "run", "results"] {
            fs::create_dir_all(root.join(sub)).unwrap();
        }
        let config = format!(
            "version = 1\n\n[paths]\nquery_dir = {:?}\ninput_dir = {:?}\nresults_dir = {:?}\n\n[run]\nworkers = 2\nbackup_count = 1\n",
            root.join("queries"),
            root.join("run"),
            root.join("results"),
        );
        fs::write(root.join("config.toml"), config).unwrap();
        Self { dir }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn write(&self, rel: &str, contents: &str) {
        fs::write(self.path(rel), contents).unwrap();
    }

    fn sift(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_sift"))
            .args(args)
            .env("POSTSIFT_CONFIG", self.path("config.toml"))
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_eval_prints_verdict() {
    let ws = Workspace::new();

    let out = ws.sift(&["--no-color", "eval", "camera* OR lens", "Nice cameras!"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Y\n");

    let out = ws.sift(&["--no-color", "eval", "camera NOT phone", "camera phone"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "N\n");
}

#[test]
fn test_eval_json_reports_near_span() {
    let ws = Workspace::new();
    let out = ws.sift(&["--json", "eval", "galaxy NEAR/1 camera", "galaxy s23 camera"]);
    assert!(out.status.success());

    let value = json(&out);
    assert_eq!(value["verdict"], "Y");
    assert_eq!(value["word_indices"], serde_json::json!([0, 1, 2]));
}

#[test]
fn test_parse_prints_canonical_tree() {
    let ws = Workspace::new();
    let out = ws.sift(&["parse", "(A or B) and c"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "(a OR b) AND c\n");
}

#[test]
fn test_invalid_query_exit_code_and_json_error() {
    let ws = Workspace::new();
    let out = ws.sift(&["--json", "parse", "a NEAR b"]);
    assert_eq!(out.status.code(), Some(1));

    let err: Value = serde_json::from_slice(&out.stderr).unwrap();
    assert_eq!(err["error"]["code"], "QUERY_ERROR");
}

#[test]
fn test_check_end_to_end() {
    let ws = Workspace::new();
    ws.write("queries/camera.txt", "camera* OR lens\n");
    ws.write("queries/phone.txt", "phone NOT case\n");
    ws.write(
        "run/posts.txt",
        "text\tid\nMy phone camera is great\t1\nSelling a phone case\t2\n",
    );

    let out = ws.sift(&["--json", "check", "camera", "--columns", "phone"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let summary = json(&out);
    assert_eq!(summary["rows"], 2);
    assert_eq!(summary["queries"][0]["matches"], 1);
    assert_eq!(summary["queries"][1]["matches"], 1);

    let result = ws.path("results/posts_result.txt");
    assert_eq!(read(&result), "id\tcamera\tphone\n1\tY\tY\n2\tN\tN\n");

    // A second run keeps one backup of the first result.
    let out = ws.sift(&["--quiet", "check", "camera"]);
    assert!(out.status.success());
    assert!(stdout(&out).is_empty());
    assert_eq!(read(&ws.path("results/posts_result.txt.1")), "id\tcamera\tphone\n1\tY\tY\n2\tN\tN\n");
    assert_eq!(read(&result), "id\tcamera\n1\tY\n2\tN\n");
}

#[test]
fn test_check_missing_input_dir_file() {
    let ws = Workspace::new();
    ws.write("queries/camera.txt", "camera");

    let out = ws.sift(&["check", "camera"]);
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn test_bad_config_exit_code() {
    let ws = Workspace::new();
    ws.write("config.toml", "[run]\nchunk_len = 0\n");

    let out = ws.sift(&["config", "show"]);
    assert_eq!(out.status.code(), Some(5));
}

#[test]
fn test_config_path_uses_env() {
    let ws = Workspace::new();
    let out = ws.sift(&["config", "path"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), ws.path("config.toml").display().to_string());
}
