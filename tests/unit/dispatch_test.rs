use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use wastwalk::walker::{run, walk};
use wastwalk::{ConversionJob, ConversionOutcome, Converter, HarnessConfig, HarnessErrorKind, RunReport};

/// Records every job and answers with a fixed outcome
struct Recorder {
    jobs: Vec<ConversionJob>,
    outcome: ConversionOutcome,
    /// Output directories that existed when the converter was called
    dirs_present: Vec<bool>,
}

impl Recorder {
    fn answering(outcome: ConversionOutcome) -> Self {
        Self {
            jobs: Vec::new(),
            outcome,
            dirs_present: Vec::new(),
        }
    }

    fn inputs(&self) -> Vec<PathBuf> {
        let mut inputs: Vec<PathBuf> = self.jobs.iter().map(|j| j.input.clone()).collect();
        inputs.sort();
        inputs
    }
}

impl Converter for Recorder {
    fn convert(&mut self, job: &ConversionJob) -> ConversionOutcome {
        self.dirs_present.push(job.output_dir.is_dir());
        self.jobs.push(job.clone());
        self.outcome.clone()
    }
}

fn suite(files: &[&str]) -> (TempDir, HarnessConfig) {
    let tmp = TempDir::new().unwrap();
    let config = HarnessConfig::for_root(tmp.path());
    let root = config.testsuite_root();
    fs::create_dir_all(&root).unwrap();
    for file in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "(module)").unwrap();
    }
    (tmp, config)
}

#[test]
fn test_each_source_dispatched_once_with_directory_ready() {
    let (_tmp, config) = suite(&[
        "a.wast",
        "one/b.wast",
        "one/two/c-d.wast",
        "one/two/notes.md",
        "three/empty.wasm",
    ]);

    let mut recorder = Recorder::answering(ConversionOutcome::Succeeded);
    let report = run(&config, &mut recorder).unwrap();

    let root = config.testsuite_root();
    assert_eq!(
        recorder.inputs(),
        vec![root.join("a.wast"), root.join("one/b.wast"), root.join("one/two/c-d.wast")]
    );
    assert!(recorder.dirs_present.iter().all(|present| *present));
    // testsuite, one, one/two, three
    assert_eq!(report.directories_visited, 4);
    assert_eq!(report.files_ignored, 2);
    assert!(config.output_root().join("one/two/c_d").is_dir());
}

#[test]
fn test_failed_conversions_are_reported_not_raised() {
    let (_tmp, config) = suite(&["x.wast", "y.wast"]);

    let mut recorder = Recorder::answering(ConversionOutcome::Failed { code: Some(1) });
    let report = run(&config, &mut recorder).unwrap();

    assert_eq!(report.dispatched, 2);
    assert_eq!(report.failed, 2);
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failures.len(), 2);
}

#[test]
fn test_existing_output_directory_is_reused() {
    let (_tmp, config) = suite(&["x.wast"]);
    let existing = config.output_root().join("x");
    fs::create_dir_all(&existing).unwrap();
    fs::write(existing.join("keep.txt"), "kept").unwrap();

    let mut recorder = Recorder::answering(ConversionOutcome::Succeeded);
    run(&config, &mut recorder).unwrap();

    assert!(existing.join("keep.txt").exists());
    assert_eq!(recorder.jobs.len(), 1);
}

#[test]
fn test_directory_creation_failure_is_fatal() {
    let (_tmp, config) = suite(&["x.wast"]);
    // A file where the output root should be makes create_dir_all fail
    fs::write(config.output_root(), "in the way").unwrap();

    let mut recorder = Recorder::answering(ConversionOutcome::Succeeded);
    let err = run(&config, &mut recorder).unwrap_err();

    assert_matches!(err.kind(), Some(HarnessErrorKind::Io { .. }));
    assert!(recorder.jobs.is_empty());
}

#[test]
fn test_walk_twice_produces_identical_jobs() {
    let (_tmp, config) = suite(&["p/q-r.wast", "s.wast"]);

    let mut first = Recorder::answering(ConversionOutcome::Succeeded);
    run(&config, &mut first).unwrap();
    let mut second = Recorder::answering(ConversionOutcome::Succeeded);
    run(&config, &mut second).unwrap();

    let mut a = first.jobs;
    let mut b = second.jobs;
    a.sort_by(|x, y| x.input.cmp(&y.input));
    b.sort_by(|x, y| x.input.cmp(&y.input));
    assert_eq!(a, b);
}

#[test]
fn test_walk_subdirectory_directly() {
    let (_tmp, config) = suite(&["only/this.wast", "not/that.wast"]);
    let mut report = RunReport::new(config.testsuite_root().join("only"));

    let mut recorder = Recorder::answering(ConversionOutcome::Succeeded);
    walk(&config, &config.testsuite_root().join("only"), &mut recorder, &mut report).unwrap();

    assert_eq!(recorder.jobs.len(), 1);
    assert_eq!(recorder.jobs[0].name, "this");
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_aborts_walk() {
    use std::os::unix::fs::PermissionsExt;

    let (_tmp, config) = suite(&["locked/x.wast"]);
    let locked = config.testsuite_root().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        // Privileged users read through mode 000
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let mut recorder = Recorder::answering(ConversionOutcome::Succeeded);
    let result = run(&config, &mut recorder);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_matches!(result.unwrap_err().kind(), Some(HarnessErrorKind::Walk { .. }));
    assert!(recorder.jobs.is_empty());
}

#[cfg(unix)]
#[test]
fn test_symlink_loop_aborts_walk() {
    let (_tmp, config) = suite(&["a.wast"]);
    let root = config.testsuite_root();
    std::os::unix::fs::symlink(&root, root.join("again")).unwrap();

    let mut recorder = Recorder::answering(ConversionOutcome::Succeeded);
    let err = run(&config, &mut recorder).unwrap_err();

    assert_matches!(err.kind(), Some(HarnessErrorKind::Walk { .. }));
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_is_an_ignored_file() {
    let (_tmp, config) = suite(&["a.wast"]);
    let root = config.testsuite_root();
    std::os::unix::fs::symlink("/nonexistent/target", root.join("stale-link.txt")).unwrap();

    let mut recorder = Recorder::answering(ConversionOutcome::Succeeded);
    let report = run(&config, &mut recorder).unwrap();

    assert_eq!(recorder.inputs(), vec![root.join("a.wast")]);
    assert_eq!(report.files_ignored, 1);
    assert_eq!(report.directories_visited, 1);
}

#[cfg(unix)]
#[test]
fn test_dangling_source_link_is_still_dispatched() {
    let (_tmp, config) = suite(&[]);
    let root = config.testsuite_root();
    std::os::unix::fs::symlink("/nonexistent/broken.wast", root.join("broken.wast")).unwrap();

    let mut recorder = Recorder::answering(ConversionOutcome::Failed { code: Some(1) });
    let report = run(&config, &mut recorder).unwrap();

    assert_eq!(recorder.inputs(), vec![root.join("broken.wast")]);
    assert_eq!(report.failed, 1);
    assert!(config.output_root().join("broken").is_dir());
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_directory_maps_byte_for_byte() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = OsStr::from_bytes(b"dir\xFF");
    let (_tmp, config) = suite(&[]);
    let source_dir = config.testsuite_root().join(dir);
    fs::create_dir_all(&source_dir).unwrap();
    fs::write(source_dir.join("a.wast"), "(module)").unwrap();

    let mut recorder = Recorder::answering(ConversionOutcome::Succeeded);
    run(&config, &mut recorder).unwrap();

    let expected = config.output_root().join(dir).join("a");
    assert_eq!(recorder.jobs.len(), 1);
    assert_eq!(recorder.jobs[0].output_dir, expected);
    assert!(expected.is_dir());
    assert!(!config.output_root().join("dir\u{FFFD}").exists());
}
