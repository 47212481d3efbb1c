mod common;

use mmdb_rs::errors::{ExportError, KeyError, OpenError};
use mmdb_rs::{Config, Error, HexKey};
use std::fs;

#[test]
fn convert_with_derived_key() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::create_derived_fixture(dir.path());
    let out = dir.path().join("plain.db");

    mmdb_rs::convert(&Config::derived(&db, &out)).unwrap();

    let lines = common::dump(&out);
    assert!(lines.iter().any(|l| l.contains("messageTalkerIndex")));
    assert!(lines.contains(&"Integer(2)|Text(\"wxid_bob\")|Text(\"it's me\")".to_string()));
    assert!(lines.contains(&"Text(\"wxid_bob\")|Text(\"Bob\")".to_string()));
}

#[test]
fn output_is_plaintext_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::create_derived_fixture(dir.path());
    let out = dir.path().join("plain.db");

    mmdb_rs::convert(&Config::derived(&db, &out)).unwrap();

    let header = fs::read(&out).unwrap();
    assert_eq!(&header[..16], b"SQLite format 3\0");
    let source = fs::read(&db).unwrap();
    assert_ne!(&source[..16], b"SQLite format 3\0");
}

#[test]
fn source_is_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::create_derived_fixture(dir.path());
    let before = fs::read(&db).unwrap();

    mmdb_rs::convert(&Config::derived(&db, dir.path().join("plain.db"))).unwrap();

    assert_eq!(fs::read(&db).unwrap(), before);
}

#[test]
fn repeated_exports_match() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::create_raw_fixture(dir.path(), common::RAW_KEY);
    let first = dir.path().join("first.db");
    let second = dir.path().join("second.db");
    let key = HexKey::parse(common::RAW_KEY).unwrap();

    mmdb_rs::convert(&Config::explicit(&db, &first, key.clone())).unwrap();
    mmdb_rs::convert(&Config::explicit(&db, &second, key)).unwrap();

    let first_dump = common::dump(&first);
    assert_eq!(first_dump.len(), 9);
    assert_eq!(first_dump, common::dump(&second));
}

#[test]
fn explicit_key_does_not_need_config_files() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::create_raw_fixture(dir.path(), common::RAW_KEY);
    assert!(!dir.path().join("CompatibleInfo.cfg").exists());
    assert!(!dir.path().join("systemInfo.cfg").exists());
    let out = dir.path().join("plain.db");

    let config = Config::explicit(&db, &out, HexKey::parse(common::RAW_KEY).unwrap());
    mmdb_rs::convert(&config).unwrap();

    assert!(common::dump(&out).iter().any(|l| l.contains("wxid_alice")));
}

#[test]
fn wrong_key_fails_before_output_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::create_raw_fixture(dir.path(), common::RAW_KEY);
    let out = dir.path().join("plain.db");

    let config = Config::explicit(&db, &out, HexKey::parse(common::OTHER_RAW_KEY).unwrap());
    let err = mmdb_rs::convert(&config).unwrap_err();

    assert!(matches!(err, Error::Key(KeyError::Rejected(_))));
    assert!(!out.exists());
}

#[test]
fn derived_key_with_wrong_identity_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::create_derived_fixture(dir.path());
    common::write_companions(dir.path(), "000000000000000", &[common::UIN]);
    let out = dir.path().join("plain.db");

    let err = mmdb_rs::convert(&Config::derived(&db, &out)).unwrap_err();

    assert!(matches!(err, Error::Key(KeyError::Rejected(_))));
    assert!(!out.exists());
}

#[test]
fn missing_config_files_abort_derived_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::create_raw_fixture(dir.path(), common::RAW_KEY);
    let out = dir.path().join("plain.db");

    let err = mmdb_rs::convert(&Config::derived(&db, &out)).unwrap_err();

    assert!(matches!(err, Error::Identity(_)));
    assert!(!out.exists());
}

#[test]
fn missing_source_is_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("EnMicroMsg.db");
    let out = dir.path().join("plain.db");

    let config = Config::explicit(&db, &out, HexKey::parse(common::RAW_KEY).unwrap());
    let err = mmdb_rs::convert(&config).unwrap_err();

    assert!(matches!(err, Error::Open(OpenError::Engine { .. })));
    assert!(!db.exists());
    assert!(!out.exists());
}

#[test]
fn invalid_output_path_is_attach_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::create_raw_fixture(dir.path(), common::RAW_KEY);
    let out = dir.path().join("missing").join("plain.db");

    let config = Config::explicit(&db, &out, HexKey::parse(common::RAW_KEY).unwrap());
    let err = mmdb_rs::convert(&config).unwrap_err();

    assert!(matches!(err, Error::Export(ExportError::Attach { .. })));
    assert!(!out.exists());
}

#[test]
fn existing_output_needs_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::create_derived_fixture(dir.path());
    let out = dir.path().join("plain.db");
    fs::write(&out, b"previous").unwrap();

    let err = mmdb_rs::convert(&Config::derived(&db, &out)).unwrap_err();
    assert!(matches!(err, Error::Export(ExportError::OutputExists { .. })));
    assert_eq!(fs::read(&out).unwrap(), b"previous");

    mmdb_rs::convert(&Config::derived(&db, &out).with_overwrite(true)).unwrap();
    assert!(common::dump(&out).iter().any(|l| l.contains("wxid_alice")));
}

#[test]
fn output_path_with_quote() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::create_derived_fixture(dir.path());
    let out = dir.path().join("it's plain.db");

    mmdb_rs::convert(&Config::derived(&db, &out)).unwrap();

    assert!(common::dump(&out).iter().any(|l| l.contains("wxid_bob")));
}

#[test]
fn source_cannot_be_its_own_output() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::create_raw_fixture(dir.path(), common::RAW_KEY);
    let before = fs::read(&db).unwrap();

    let config = Config::explicit(&db, &db, HexKey::parse(common::RAW_KEY).unwrap())
        .with_overwrite(true);
    let err = mmdb_rs::convert(&config).unwrap_err();

    assert!(matches!(err, Error::Export(ExportError::OutputIsSource { .. })));
    assert_eq!(fs::read(&db).unwrap(), before);
}
