use montage_process::OutputDiscovery;
use std::fs;
use std::time::{Duration, SystemTime};

fn touch(path: &std::path::Path, age: Duration) {
    fs::write(path, b"data").unwrap();
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
}

#[test]
fn test_stdout_path_wins_over_newer_file() {
    let dir = tempfile::tempdir().unwrap();
    let announced = dir.path().join("render_final.mp4");
    let newer = dir.path().join("preview.mp4");
    touch(&announced, Duration::from_secs(120));
    touch(&newer, Duration::from_secs(1));

    let stdout = format!("progress 100%\nSaved video to {}\ndone\n", announced.display());
    let found = OutputDiscovery::videos().discover(&stdout, dir.path());

    assert_eq!(found, Some(announced));
}

#[test]
fn test_quoted_and_relative_stdout_paths() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("clip.webm"), Duration::from_secs(5));

    let policy = OutputDiscovery::videos();
    assert_eq!(
        policy.from_stdout("output='clip.webm'", dir.path()),
        Some(dir.path().join("clip.webm"))
    );
    assert_eq!(
        policy.from_stdout("wrote clip.webm, 24 frames", dir.path()),
        Some(dir.path().join("clip.webm"))
    );
}

#[test]
fn test_missing_stdout_path_falls_back_to_newest_file() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("a.mp4");
    let new = dir.path().join("b.mp4");
    touch(&old, Duration::from_secs(300));
    touch(&new, Duration::from_secs(10));
    touch(&dir.path().join("c.json"), Duration::from_secs(0));

    let stdout = "Saved video to /nonexistent/elsewhere.mp4";
    let found = OutputDiscovery::videos().discover(stdout, dir.path());

    assert_eq!(found, Some(new));
}

#[test]
fn test_nothing_found_in_empty_or_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let policy = OutputDiscovery::json_reports();
    assert_eq!(policy.discover("", dir.path()), None);
    assert_eq!(policy.discover("", &dir.path().join("missing")), None);
}

#[test]
fn test_scoped_discovery_ignores_paths_outside_dir() {
    let dir = tempfile::tempdir().unwrap();
    let elsewhere = tempfile::tempdir().unwrap();
    let foreign = elsewhere.path().join("reference.mp4");
    let produced = dir.path().join("render_0001.mp4");
    touch(&foreign, Duration::from_secs(1));
    touch(&produced, Duration::from_secs(30));

    let stdout = format!("Loaded reference clip {}\n", foreign.display());
    let policy = OutputDiscovery::videos();

    assert_eq!(policy.discover(&stdout, dir.path()), Some(foreign));
    assert_eq!(policy.discover_within(&stdout, dir.path()), Some(produced));
}
