// tests/integration_test.rs

//! Integration tests for atxpkg
//!
//! These tests build real package archives, install them into a scratch
//! prefix and check the disk and the ledger after every step.

use atxpkg::commands::{self, Options, Session};
use atxpkg::config::Config;
use atxpkg::db::Ledger;
use atxpkg::operator::FixedAnswer;
use atxpkg::packages::{self, UnpackedPackage};
use atxpkg::reconcile::{self, FileAction};
use atxpkg::{Error, hash};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};
use zip::write::SimpleFileOptions;

/// Write `name-version.atxpkg.zip` into `repo`
///
/// `files` are prefix-relative paths with their content; `preserve` becomes
/// the archive's `.atxpkg_backup` list.
fn build_archive(repo: &Path, filename: &str, files: &[(&str, &str)], preserve: &[&str]) -> PathBuf {
    let path = repo.join(filename);
    let mut writer = zip::ZipWriter::new(fs::File::create(&path).unwrap());
    let options = SimpleFileOptions::default();

    let mut directories: Vec<String> = Vec::new();
    for (file, _) in files {
        let mut parts: Vec<&str> = file.split('/').collect();
        parts.pop();
        for i in 1..=parts.len() {
            let dir = format!("{}/", parts[..i].join("/"));
            if !directories.contains(&dir) {
                directories.push(dir);
            }
        }
    }
    for dir in &directories {
        writer.add_directory(dir.as_str(), options).unwrap();
    }

    for (file, content) in files {
        writer.start_file(*file, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }

    if !preserve.is_empty() {
        writer.start_file(".atxpkg_backup", options).unwrap();
        writer.write_all(preserve.join("\n").as_bytes()).unwrap();
    }

    writer.finish().unwrap();
    path
}

fn unpack(archive: &Path, tmp: &TempDir) -> UnpackedPackage {
    packages::unpack(archive, tmp.path()).unwrap()
}

fn read(prefix: &Path, path: &str) -> String {
    fs::read_to_string(prefix.join(path)).unwrap()
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).unwrap().next().is_none()
}

/// Scratch root, prefix and repository wired together for command flows
struct Fixture {
    root: TempDir,
    prefix: TempDir,
    repo: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            root: tempdir().unwrap(),
            prefix: tempdir().unwrap(),
            repo: tempdir().unwrap(),
        };
        fs::write(
            fixture.root.path().join("repos.txt"),
            format!("# local repository\n{}\n", fixture.repo.path().display()),
        )
        .unwrap();
        fixture
    }

    fn config(&self) -> Config {
        let config = Config::new(self.root.path(), self.prefix.path());
        config.ensure_dirs().unwrap();
        config
    }

    fn session<'a>(&self, options: Options, operator: &'a FixedAnswer) -> Session<'a> {
        Session::open(self.config(), options, operator).unwrap()
    }

    fn publish(&self, filename: &str, files: &[(&str, &str)], preserve: &[&str]) {
        build_archive(self.repo.path(), filename, files, preserve);
    }
}

fn yes() -> Options {
    Options {
        yes: true,
        offline: true,
        ..Options::default()
    }
}

fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

#[test]
fn test_update_writes_changed_files_and_skips_unchanged_preserved() {
    let repo = tempdir().unwrap();
    let tmp = tempdir().unwrap();
    let prefix = tempdir().unwrap();

    let v1 = build_archive(
        repo.path(),
        "pkg-1.0-1.atxpkg.zip",
        &[("app/a.txt", "one\n"), ("app/conf/c.cfg", "setting=1\n")],
        &["app/conf/c.cfg"],
    );
    let v2 = build_archive(
        repo.path(),
        "pkg-1.0-2.atxpkg.zip",
        &[("app/a.txt", "two\n"), ("app/conf/c.cfg", "setting=1\n")],
        &["app/conf/c.cfg"],
    );

    let unpacked = unpack(&v1, &tmp);
    let installed =
        reconcile::install(&unpacked.manifest, &unpacked.version, prefix.path(), false).unwrap();
    assert_eq!(installed.package.version.to_string(), "1.0-1");
    assert!(installed.package.directories.contains("app/conf"));

    let unpacked = unpack(&v2, &tmp);
    let updated = reconcile::update(
        &unpacked.manifest,
        &installed.package,
        &unpacked.version,
        prefix.path(),
        false,
    )
    .unwrap();

    assert_eq!(updated.report.written(), vec!["app/a.txt"]);
    assert_eq!(updated.report.skipped(), vec!["app/conf/c.cfg"]);
    assert!(updated.report.artifacts().is_empty());
    assert_eq!(read(prefix.path(), "app/a.txt"), "two\n");
    assert_eq!(updated.package.version.to_string(), "1.0-2");
    assert_eq!(
        updated.package.fingerprints["app/a.txt"],
        hash::fingerprint(&prefix.path().join("app/a.txt")).unwrap()
    );
}

#[test]
fn test_install_then_remove_restores_prefix() {
    let repo = tempdir().unwrap();
    let tmp = tempdir().unwrap();
    let prefix = tempdir().unwrap();
    fs::create_dir(prefix.path().join("shared")).unwrap();
    fs::write(prefix.path().join("shared/keep.txt"), "mine").unwrap();

    let archive = build_archive(
        repo.path(),
        "tool-2.1-1.atxpkg.zip",
        &[
            ("tool/bin/run", "#!/bin/sh\n"),
            ("tool/etc/tool.cfg", "a=1\n"),
            ("shared/tool.txt", "x"),
        ],
        &["tool/etc/tool.cfg"],
    );

    let unpacked = unpack(&archive, &tmp);
    let installed =
        reconcile::install(&unpacked.manifest, &unpacked.version, prefix.path(), false).unwrap();
    assert_eq!(read(prefix.path(), "tool/bin/run"), "#!/bin/sh\n");

    let report = reconcile::remove(&installed.package, prefix.path()).unwrap();
    assert!(report.artifacts().is_empty());
    assert_eq!(report.deleted().len(), 3);

    assert!(!prefix.path().join("tool").exists());
    assert!(!prefix.path().join("shared/tool.txt").exists());
    assert_eq!(read(prefix.path(), "shared/keep.txt"), "mine");
}

#[test]
fn test_identical_update_writes_nothing() {
    let repo = tempdir().unwrap();
    let tmp = tempdir().unwrap();
    let prefix = tempdir().unwrap();

    let archive = build_archive(
        repo.path(),
        "pkg-1.0-1.atxpkg.zip",
        &[("app/a.txt", "one\n"), ("app/conf/c.cfg", "setting=1\n")],
        &["app/conf/c.cfg"],
    );

    let unpacked = unpack(&archive, &tmp);
    let installed =
        reconcile::install(&unpacked.manifest, &unpacked.version, prefix.path(), false).unwrap();

    let unpacked = unpack(&archive, &tmp);
    let updated = reconcile::update(
        &unpacked.manifest,
        &installed.package,
        &unpacked.version,
        prefix.path(),
        false,
    )
    .unwrap();

    assert!(
        updated
            .report
            .actions
            .iter()
            .all(|action| matches!(action, FileAction::Skipped(_))),
        "unexpected actions: {:?}",
        updated.report.actions
    );
    assert_eq!(updated.report.skipped().len(), 2);
    assert_eq!(updated.package.fingerprints, installed.package.fingerprints);
}

#[test]
fn test_update_of_modified_preserved_file_installs_new_beside_it() {
    let repo = tempdir().unwrap();
    let tmp = tempdir().unwrap();
    let prefix = tempdir().unwrap();

    let v1 = build_archive(
        repo.path(),
        "pkg-1.0-1.atxpkg.zip",
        &[("app/conf/c.cfg", "setting=1\n")],
        &["app/conf/c.cfg"],
    );
    let v2 = build_archive(
        repo.path(),
        "pkg-1.1-1.atxpkg.zip",
        &[("app/conf/c.cfg", "setting=2\n")],
        &["app/conf/c.cfg"],
    );

    let unpacked = unpack(&v1, &tmp);
    let installed =
        reconcile::install(&unpacked.manifest, &unpacked.version, prefix.path(), false).unwrap();
    fs::write(prefix.path().join("app/conf/c.cfg"), "edited\n").unwrap();

    let unpacked = unpack(&v2, &tmp);
    let updated = reconcile::update(
        &unpacked.manifest,
        &installed.package,
        &unpacked.version,
        prefix.path(),
        false,
    )
    .unwrap();

    assert_eq!(read(prefix.path(), "app/conf/c.cfg"), "edited\n");
    assert_eq!(read(prefix.path(), "app/conf/c.cfg.new"), "setting=2\n");
    assert_eq!(
        updated.report.artifacts(),
        vec![prefix.path().join("app/conf/c.cfg.new").as_path()]
    );
    // The ledger records the packaged content, not the user's edit
    assert_eq!(
        updated.package.fingerprints["app/conf/c.cfg"],
        hash::fingerprint(&prefix.path().join("app/conf/c.cfg.new")).unwrap()
    );
}

#[test]
fn test_remove_keeps_modified_preserved_file_as_backup() {
    let repo = tempdir().unwrap();
    let tmp = tempdir().unwrap();
    let prefix = tempdir().unwrap();

    let archive = build_archive(
        repo.path(),
        "pkg-1.0-1.atxpkg.zip",
        &[("app/a.txt", "one\n"), ("app/conf/c.cfg", "setting=1\n")],
        &["app/conf/c.cfg"],
    );

    let unpacked = unpack(&archive, &tmp);
    let installed =
        reconcile::install(&unpacked.manifest, &unpacked.version, prefix.path(), false).unwrap();
    fs::write(prefix.path().join("app/conf/c.cfg"), "edited\n").unwrap();

    let report = reconcile::remove(&installed.package, prefix.path()).unwrap();

    assert_eq!(report.deleted(), vec!["app/a.txt"]);
    assert!(!prefix.path().join("app/a.txt").exists());
    assert!(!prefix.path().join("app/conf/c.cfg").exists());
    assert_eq!(read(prefix.path(), "app/conf/c.cfg.backup"), "edited\n");
    // The directory still holds the backup, so it stays
    assert!(prefix.path().join("app/conf").is_dir());
}

#[test]
fn test_install_refuses_untracked_file_unless_forced() {
    let repo = tempdir().unwrap();
    let tmp = tempdir().unwrap();
    let prefix = tempdir().unwrap();
    fs::create_dir(prefix.path().join("app")).unwrap();
    fs::write(prefix.path().join("app/a.txt"), "someone else's").unwrap();

    let archive = build_archive(
        repo.path(),
        "pkg-1.0-1.atxpkg.zip",
        &[("app/a.txt", "one\n"), ("app/b.txt", "two\n")],
        &[],
    );

    let unpacked = unpack(&archive, &tmp);
    let result = reconcile::install(&unpacked.manifest, &unpacked.version, prefix.path(), false);
    assert!(matches!(result, Err(Error::ConflictError(_))));
    // Nothing was written before the conflict was detected
    assert!(!prefix.path().join("app/b.txt").exists());
    assert_eq!(read(prefix.path(), "app/a.txt"), "someone else's");

    let installed =
        reconcile::install(&unpacked.manifest, &unpacked.version, prefix.path(), true).unwrap();
    assert_eq!(read(prefix.path(), "app/a.txt"), "one\n");
    assert_eq!(installed.package.fingerprints.len(), 2);
}

#[test]
fn test_install_update_remove_through_commands() {
    let fixture = Fixture::new();
    fixture.publish(
        "tool-1.0-1.atxpkg.zip",
        &[("tool/run.txt", "v1\n"), ("tool/old.txt", "old\n"), ("tool/tool.cfg", "a=1\n")],
        &["tool/tool.cfg"],
    );
    let operator = FixedAnswer(true);

    let mut session = fixture.session(yes(), &operator);
    assert!(commands::install_packages(&mut session, &args(&["tool"])).unwrap());
    assert_eq!(read(fixture.prefix.path(), "tool/run.txt"), "v1\n");
    assert_eq!(
        commands::list_installed(&session.ledger)
            .into_iter()
            .map(|(name, version, installed_at)| {
                assert!(installed_at.is_some());
                format!("{}-{}", name, version)
            })
            .collect::<Vec<_>>(),
        vec!["tool-1.0-1"]
    );
    assert_eq!(commands::check_packages(&session, &[]).unwrap(), 0);
    commands::if_installed(&session.ledger, &args(&["tool", "tool-1.0-1"])).unwrap();
    assert!(matches!(
        commands::if_installed(&session.ledger, &args(&["tool-2.0-1"])),
        Err(Error::NotFoundError(_))
    ));

    // Installing again is refused without --force
    assert!(matches!(
        commands::install_packages(&mut session, &args(&["tool"])),
        Err(Error::AlreadyInstalled(_))
    ));

    // Nothing newer published yet
    assert!(!commands::update_packages(&mut session, &[]).unwrap());

    fixture.publish(
        "tool-1.1-1.atxpkg.zip",
        &[("tool/run.txt", "v2\n"), ("tool/tool.cfg", "a=1\n")],
        &["tool/tool.cfg"],
    );
    assert!(commands::update_packages(&mut session, &[]).unwrap());
    assert_eq!(read(fixture.prefix.path(), "tool/run.txt"), "v2\n");
    assert!(!fixture.prefix.path().join("tool/old.txt").exists());
    assert_eq!(
        session.ledger.get("tool").unwrap().version.to_string(),
        "1.1-1"
    );

    // A fresh session sees what the previous one saved
    drop(session);
    let mut session = fixture.session(yes(), &operator);
    assert_eq!(session.ledger.len(), 1);

    assert!(commands::remove_packages(&mut session, &args(&["tool-1.1-1"])).unwrap());
    assert!(session.ledger.is_empty());
    assert!(is_empty_dir(fixture.prefix.path()));

    let reloaded = Ledger::open(&fixture.config().db_path).unwrap();
    assert!(reloaded.is_empty());
}

#[test]
fn test_update_renames_package() {
    let fixture = Fixture::new();
    fixture.publish(
        "tool-1.0-1.atxpkg.zip",
        &[("tool/run.txt", "v1\n"), ("tool/legacy.txt", "legacy\n")],
        &[],
    );
    fixture.publish(
        "tool_ng-2.0-1.atxpkg.zip",
        &[("tool/run.txt", "ng\n"), ("tool_ng/extra.txt", "extra\n")],
        &[],
    );
    let operator = FixedAnswer(true);
    let mut session = fixture.session(yes(), &operator);

    assert!(commands::install_packages(&mut session, &args(&["tool-1.0-1"])).unwrap());
    assert!(commands::update_packages(&mut session, &args(&["tool..tool_ng"])).unwrap());

    assert!(!session.ledger.contains("tool"));
    let entry = session.ledger.get("tool_ng").unwrap();
    assert_eq!(entry.version.to_string(), "2.0-1");
    assert!(entry.fingerprints.contains_key("tool_ng/extra.txt"));

    assert_eq!(read(fixture.prefix.path(), "tool/run.txt"), "ng\n");
    assert!(!fixture.prefix.path().join("tool/legacy.txt").exists());

    // The old name is no longer installed
    assert!(matches!(
        commands::update_packages(&mut session, &args(&["tool..tool_ng"])),
        Err(Error::NotFoundError(_))
    ));
}

#[test]
fn test_answering_no_changes_nothing() {
    let fixture = Fixture::new();
    fixture.publish("tool-1.0-1.atxpkg.zip", &[("tool/run.txt", "v1\n")], &[]);
    let operator = FixedAnswer(false);
    let options = Options {
        offline: true,
        ..Options::default()
    };
    let mut session = fixture.session(options, &operator);

    assert!(!commands::install_packages(&mut session, &args(&["tool"])).unwrap());
    assert!(session.ledger.is_empty());
    assert!(is_empty_dir(fixture.prefix.path()));
    assert!(!fixture.config().db_path.exists());
}

#[test]
fn test_download_only_installs_nothing() {
    let fixture = Fixture::new();
    fixture.publish("tool-1.0-1.atxpkg.zip", &[("tool/run.txt", "v1\n")], &[]);
    let operator = FixedAnswer(true);
    let options = Options {
        download_only: true,
        ..yes()
    };
    let mut session = fixture.session(options, &operator);

    assert!(!commands::install_packages(&mut session, &args(&["tool"])).unwrap());
    assert!(session.ledger.is_empty());
    assert!(is_empty_dir(fixture.prefix.path()));
}

#[test]
fn test_unknown_package_fails_before_any_change() {
    let fixture = Fixture::new();
    fixture.publish("tool-1.0-1.atxpkg.zip", &[("tool/run.txt", "v1\n")], &[]);
    let operator = FixedAnswer(true);
    let mut session = fixture.session(yes(), &operator);

    let result = commands::install_packages(&mut session, &args(&["tool", "missing"]));
    assert!(matches!(result, Err(Error::NotFoundError(_))));
    assert!(session.ledger.is_empty());
    assert!(is_empty_dir(fixture.prefix.path()));
}

#[test]
fn test_check_and_untracked_report_drift() {
    let fixture = Fixture::new();
    fixture.publish(
        "tool-1.0-1.atxpkg.zip",
        &[
            ("tool/run.txt", "v1\n"),
            ("tool/data.txt", "data\n"),
            ("tool/tool.cfg", "a=1\n"),
        ],
        &["tool/tool.cfg"],
    );
    let operator = FixedAnswer(true);
    let mut session = fixture.session(yes(), &operator);
    assert!(commands::install_packages(&mut session, &args(&["tool"])).unwrap());

    let prefix = fixture.prefix.path();
    fs::write(prefix.join("tool/run.txt"), "tampered\n").unwrap();
    fs::remove_file(prefix.join("tool/data.txt")).unwrap();
    // Edits to preserved files are expected and not reported
    fs::write(prefix.join("tool/tool.cfg"), "a=2\n").unwrap();
    fs::write(prefix.join("tool/local.txt"), "mine\n").unwrap();

    assert_eq!(commands::check_packages(&session, &[]).unwrap(), 2);
    assert_eq!(
        commands::show_untracked(&session, &[]).unwrap(),
        vec!["tool/local.txt"]
    );
    assert_eq!(
        commands::show_untracked(&session, &args(&["tool/"])).unwrap(),
        vec!["tool/local.txt"]
    );
}

#[test]
fn test_ledger_on_disk_format() {
    let fixture = Fixture::new();
    fixture.publish(
        "tool-1.0-1.atxpkg.zip",
        &[("tool/run.txt", "v1\n"), ("tool/tool.cfg", "a=1\n")],
        &["tool/tool.cfg"],
    );
    let operator = FixedAnswer(true);
    let mut session = fixture.session(yes(), &operator);
    assert!(commands::install_packages(&mut session, &args(&["tool"])).unwrap());

    let content = fs::read_to_string(&session.config.db_path).unwrap();
    let document: serde_json::Value = serde_json::from_str(&content).unwrap();
    let entry = &document["tool"];

    assert_eq!(entry["version"], "1.0-1");
    assert!(entry["t"].is_f64());
    assert!(entry["md5sums"]["tool"].is_null());
    assert_eq!(
        entry["md5sums"]["tool/run.txt"],
        hash::fingerprint(&fixture.prefix.path().join("tool/run.txt")).unwrap()
    );
    assert_eq!(entry["backup"], serde_json::json!(["tool/tool.cfg"]));

    let reloaded = Ledger::open(&session.config.db_path).unwrap();
    let (saved, current) = (reloaded.get("tool").unwrap(), session.ledger.get("tool").unwrap());
    assert_eq!(saved.version, current.version);
    assert_eq!(saved.fingerprints, current.fingerprints);
    assert_eq!(saved.directories, current.directories);
    assert_eq!(saved.preserve, current.preserve);
}

#[test]
fn test_list_available_and_clean_cache() {
    let fixture = Fixture::new();
    fixture.publish("tool-1.1-1.atxpkg.zip", &[("tool/run.txt", "v2\n")], &[]);
    fixture.publish("tool-1.0-1.atxpkg.zip", &[("tool/run.txt", "v1\n")], &[]);
    fixture.publish("other-2.0-1.atxpkg.zip", &[("other/run.txt", "o\n")], &[]);
    fs::write(fixture.repo.path().join("notes.txt"), "not a package").unwrap();
    let operator = FixedAnswer(true);
    let session = fixture.session(yes(), &operator);

    let names: Vec<String> = commands::list_available(&session, &[])
        .unwrap()
        .into_iter()
        .map(|(name, version)| {
            assert!(version.is_none());
            name
        })
        .collect();
    assert_eq!(names, vec!["other", "tool"]);

    let versions: Vec<String> = commands::list_available(&session, &args(&["tool"]))
        .unwrap()
        .into_iter()
        .filter_map(|(_, version)| version.map(|v| v.to_string()))
        .collect();
    assert_eq!(versions, vec!["1.0-1", "1.1-1"]);

    assert!(matches!(
        commands::list_available(&session, &args(&["missing"])),
        Err(Error::NotFoundError(_))
    ));

    fs::write(session.config.cache_dir.join("tool-1.1-1.atxpkg.zip"), "zip").unwrap();
    fs::write(session.config.cache_dir.join("tool-1.2-1.atxpkg.zip_"), "part").unwrap();
    assert_eq!(commands::clean_cache(&session).unwrap().len(), 2);
    assert!(is_empty_dir(&session.config.cache_dir));
}

#[test]
fn test_merge_config_requires_interactive_merge() {
    let fixture = Fixture::new();
    fixture.publish(
        "tool-1.0-1.atxpkg.zip",
        &[("tool/tool.cfg", "a=1\n")],
        &["tool/tool.cfg"],
    );
    let operator = FixedAnswer(true);
    let mut session = fixture.session(yes(), &operator);
    assert!(commands::install_packages(&mut session, &args(&["tool"])).unwrap());

    // No side artifacts, nothing to merge
    assert_eq!(commands::merge_config(&session, &[]).unwrap(), 0);

    fs::write(fixture.prefix.path().join("tool/tool.cfg.new"), "a=2\n").unwrap();
    assert!(matches!(
        commands::merge_config(&session, &args(&["tool"])),
        Err(Error::MergeError(_))
    ));
    // A failed merge leaves the artifact for the next attempt
    assert!(fixture.prefix.path().join("tool/tool.cfg.new").exists());

    assert!(matches!(
        commands::merge_config(&session, &args(&["tool-9.9-1"])),
        Err(Error::NotFoundError(_))
    ));
}

#[test]
fn test_untouched_config_follows_package_updates() {
    let fixture = Fixture::new();
    fixture.publish(
        "tool-1.0-1.atxpkg.zip",
        &[("tool/run.txt", "v1\n"), ("tool/tool.cfg", "a=1\n")],
        &["tool/tool.cfg"],
    );
    let operator = FixedAnswer(true);
    let mut session = fixture.session(yes(), &operator);
    assert!(commands::install_packages(&mut session, &args(&["tool"])).unwrap());

    fixture.publish(
        "tool-1.1-1.atxpkg.zip",
        &[("tool/run.txt", "v2\n"), ("tool/tool.cfg", "a=2\n")],
        &["tool/tool.cfg"],
    );
    assert!(commands::update_packages(&mut session, &args(&["tool"])).unwrap());

    let prefix = fixture.prefix.path();
    assert_eq!(read(prefix, "tool/tool.cfg"), "a=2\n");
    assert!(!prefix.join("tool/tool.cfg.new").exists());
    assert_eq!(commands::check_packages(&session, &[]).unwrap(), 0);

    assert!(commands::remove_packages(&mut session, &args(&["tool"])).unwrap());
    assert!(is_empty_dir(prefix));
}

#[test]
fn test_duplicate_requests_are_rejected_up_front() {
    let fixture = Fixture::new();
    fixture.publish("tool-1.0-1.atxpkg.zip", &[("tool/run.txt", "v1\n")], &[]);
    fixture.publish("other-1.0-1.atxpkg.zip", &[("other/run.txt", "o\n")], &[]);
    let operator = FixedAnswer(true);
    let mut session = fixture.session(yes(), &operator);

    let result = commands::install_packages(&mut session, &args(&["tool", "other", "tool-1.0-1"]));
    assert!(matches!(result, Err(Error::ParseError(_))));
    assert!(session.ledger.is_empty());
    assert!(is_empty_dir(fixture.prefix.path()));

    assert!(commands::install_packages(&mut session, &args(&["tool", "other"])).unwrap());
    let result = commands::update_packages(&mut session, &args(&["tool", "tool-1.0-1"]));
    assert!(matches!(result, Err(Error::ParseError(_))));
    assert_eq!(
        session.ledger.get("other").unwrap().version.to_string(),
        "1.0-1"
    );
}
