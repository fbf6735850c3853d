// Integration test harness for `endline-ide`.
//
// Keep integration tests as submodules of this harness (under `tests/suite/`) rather than
// adding new top-level `tests/*.rs` files, which would compile as additional test binaries.
mod suite;
mod text_fixture;

#[test]
fn tests_root_contains_only_tests_rs_harness() {
    use std::path::Path;

    let tests_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests");
    let mut root_rs_files: Vec<String> = std::fs::read_dir(&tests_dir)
        .expect("read endline-ide tests/ directory")
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                Some(path.file_name()?.to_string_lossy().into_owned())
            } else {
                None
            }
        })
        .collect();
    root_rs_files.sort();

    assert_eq!(
        root_rs_files,
        vec!["tests.rs".to_string()],
        "unexpected root integration test files in {tests_dir:?}; put tests under tests/suite/"
    );
}

#[test]
fn suite_mod_is_in_sync_with_suite_directory() {
    use std::collections::BTreeSet;
    use std::path::Path;

    let suite_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("suite");
    let suite_mod_source =
        std::fs::read_to_string(suite_dir.join("mod.rs")).expect("read tests/suite/mod.rs");

    let suite_files: BTreeSet<String> = std::fs::read_dir(&suite_dir)
        .expect("read tests/suite directory")
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                let stem = path.file_stem()?.to_string_lossy().into_owned();
                (stem != "mod").then_some(stem)
            } else {
                None
            }
        })
        .collect();

    let mod_decls: BTreeSet<String> = suite_mod_source
        .lines()
        .filter_map(|line| line.trim().strip_prefix("mod "))
        .filter_map(|rest| rest.strip_suffix(';'))
        .map(|name| name.trim().to_string())
        .collect();

    assert_eq!(
        suite_files, mod_decls,
        "tests/suite/mod.rs is out of sync with tests/suite/*.rs"
    );
}
