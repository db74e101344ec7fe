//! Launch and publish workflows driven through a recording runner

use std::io::Cursor;
use std::path::PathBuf;

use ballroll::launch::{self, LaunchOptions};
use ballroll::publish::{self, PublishOptions};
use ballroll::{Config, RecordingRunner};

#[test]
fn test_launch_uses_configured_interpreter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[launch]\ninterpreter = \"python3.12\"\napp = \"/opt/ui/app.py\"\n",
    )
    .unwrap();
    let config = Config::load_from(&path).unwrap();

    let runner = RecordingRunner::new().with_program("python3.12");
    assert_eq!(launch::run(&runner, &config.launch).unwrap(), 0);
    assert_eq!(
        runner.calls(),
        [
            "python3.12 -c \"import streamlit\"",
            "python3.12 -m streamlit run /opt/ui/app.py",
        ]
    );
}

#[test]
fn test_launch_without_python_stops_immediately() {
    let runner = RecordingRunner::new().with_program("git");
    let opts = LaunchOptions {
        app: PathBuf::from("ui.py"),
        ..LaunchOptions::default()
    };
    assert_eq!(launch::run(&runner, &opts).unwrap(), 1);
    assert!(runner.calls().is_empty());
}

#[test]
fn test_publish_failed_push_propagates_code() {
    let url = "https://example.com/physlab/ballroll.git";
    let runner = RecordingRunner::new().failing("git push -u origin main", 128);
    let mut input = Cursor::new(format!("{url}\n").into_bytes());
    let mut output = Vec::new();

    let code = publish::run(&runner, &mut input, &mut output, &PublishOptions::default()).unwrap();
    assert_eq!(code, 128);
    assert_eq!(runner.calls().len(), 6);
    let out = String::from_utf8(output).unwrap();
    assert!(out.contains("git push -u origin main failed (exit 128)"));
}

#[test]
fn test_publish_empty_url_runs_nothing() {
    let runner = RecordingRunner::new();
    let mut input = Cursor::new(b"\n".to_vec());
    let mut output = Vec::new();
    let code = publish::run(&runner, &mut input, &mut output, &PublishOptions::default()).unwrap();
    assert_eq!(code, 1);
    assert!(runner.calls().is_empty());
}
