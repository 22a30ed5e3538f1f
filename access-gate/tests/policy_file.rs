//! Policy file loading and hot reload

use std::io::Write;

use access_gate::{AccessGate, FilePolicySource, Identity, View};

fn write_policy(file: &mut tempfile::NamedTempFile, yaml: &str) {
    let f = file.as_file_mut();
    f.set_len(0).expect("truncate");
    use std::io::Seek;
    f.seek(std::io::SeekFrom::Start(0)).expect("seek");
    f.write_all(yaml.as_bytes()).expect("write policy");
    f.flush().expect("flush");
}

#[test]
fn test_policy_changes_apply_without_restart() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write_policy(
        &mut file,
        "roles:\n  viewer:\n    tabs: [Overview]\n  no_access:\n    tabs: []\n",
    );

    let gate = AccessGate::new(FilePolicySource::new(file.path()));
    let viewer = Identity::new("v@example.com", "viewer");
    assert_eq!(gate.decide(Some(&viewer)).views(), &[View::Overview]);

    write_policy(
        &mut file,
        "roles:\n  viewer:\n    tabs: [Heater Health, Overview]\n  no_access:\n    tabs: []\n",
    );
    assert_eq!(
        gate.decide(Some(&viewer)).views(),
        &[View::Overview, View::HeaterHealth]
    );
}

#[test]
fn test_missing_file_fails_closed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let gate = AccessGate::new(FilePolicySource::new(dir.path().join("roles.yaml")));
    let admin = Identity::new("a@example.com", "admin");

    let set = gate.decide(Some(&admin));
    assert!(set.is_empty());
    assert!(set.shows_request_access());
}

#[test]
fn test_shipped_policy_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../governance/roles.yaml");
    let gate = AccessGate::new(FilePolicySource::new(path));
    let policy = gate.snapshot().expect("shipped policy parses");
    assert!(policy.no_access().is_some());
}
