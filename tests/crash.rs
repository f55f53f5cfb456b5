mod common;

use common::setup_test_env;
use ea_desktop_emu_lib::core::crash::CrashReporter;
use ea_desktop_emu_lib::utils::host::HostInfo;

fn reports(dir: &camino::Utf8Path) -> Vec<String> {
    let mut texts: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| std::fs::read_to_string(e.path()).unwrap())
                .collect()
        })
        .unwrap_or_default();
    texts.sort();
    texts
}

// The hook is process-wide, so every scenario lives in this one test.
#[test]
fn panics_are_written_with_their_context() {
    let (_tmp, paths) = setup_test_env();
    let reporter = CrashReporter::new(&paths.crash_dir, HostInfo::collect()).install();
    assert_eq!(reporter.crash_dir(), paths.crash_dir.as_path());

    let worker = std::thread::Builder::new()
        .name("worker".into())
        .spawn(|| panic!("worker blew up"))
        .unwrap();
    assert!(worker.join().is_err());

    let texts = reports(&paths.crash_dir);
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Context: Thread"));
    assert!(texts[0].contains("Message: worker blew up"));
    assert!(texts[0].contains("thread worker"));

    let caught = std::panic::catch_unwind(|| panic!("{}", String::from("ui blew up")));
    assert!(caught.is_err());

    let texts = reports(&paths.crash_dir);
    assert_eq!(texts.len(), 2);
    assert!(texts
        .iter()
        .any(|t| t.contains("Context: Foreground") && t.contains("Message: ui blew up")));

    // a second install keeps the first reporter
    let other = setup_test_env();
    let again = CrashReporter::new(&other.1.crash_dir, HostInfo::collect()).install();
    assert_eq!(again.crash_dir(), paths.crash_dir.as_path());
}
