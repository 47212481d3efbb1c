#![allow(dead_code)]

use mmdb_rs::binary::signature::{ACCOUNT_ID, DEVICE_ID};
use rusqlite::Connection;
use std::fs;
use std::path::Path;

pub const DEVICE: &str = "123456789012345";
pub const UIN: i32 = 12345;
/// First 7 hex characters of md5("12345678901234512345")
pub const DERIVED_KEY: &str = "511a75b";
pub const RAW_KEY: &str = "2dd29ca851e7b56e4697b0e1f08507293d761a05ce4d1b628663f411a8086d99";
pub const OTHER_RAW_KEY: &str = "0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0";

const STREAM_HEADER: [u8; 4] = [0xac, 0xed, 0x00, 0x05];
const CLASS_DESC: [u8; 12] = [
    0x73, 0x72, 0x00, 0x11, 0x6a, 0x61, 0x76, 0x61, 0x2e, 0x75, 0x74, 0x69,
];

pub fn device_config(device_id: &str) -> Vec<u8> {
    let mut buf = STREAM_HEADER.to_vec();
    buf.extend_from_slice(&CLASS_DESC);
    buf.extend_from_slice(DEVICE_ID.marker);
    buf.extend_from_slice(&(device_id.len() as u16).to_be_bytes());
    buf.extend_from_slice(device_id.as_bytes());
    buf.extend_from_slice(&[0x78, 0x70]);
    buf
}

pub fn account_config(uins: &[i32]) -> Vec<u8> {
    let mut buf = STREAM_HEADER.to_vec();
    buf.extend_from_slice(&CLASS_DESC);
    for uin in uins {
        buf.extend_from_slice(ACCOUNT_ID.marker);
        buf.extend_from_slice(&[0x73, 0x71, 0x00, 0x7e, 0x00, 0x02]);
        buf.extend_from_slice(&uin.to_be_bytes());
        buf.extend_from_slice(&[0x74, 0x00, 0x01, 0x41]);
    }
    buf.extend_from_slice(&[0x78, 0x70]);
    buf
}

pub fn write_companions(dir: &Path, device_id: &str, uins: &[i32]) {
    fs::write(dir.join("CompatibleInfo.cfg"), device_config(device_id)).unwrap();
    fs::write(dir.join("systemInfo.cfg"), account_config(uins)).unwrap();
}

/// Create an encrypted database with a couple of tables
///
/// `key` is the value given to `PRAGMA key`, already quoted.
pub fn create_database(path: &Path, key: &str, disable_hmac: bool) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(&format!("PRAGMA key = {};", key)).unwrap();
    if disable_hmac {
        conn.execute_batch("PRAGMA cipher_use_hmac = OFF;").unwrap();
    }
    conn.execute_batch(
        "CREATE TABLE message (msgId INTEGER PRIMARY KEY, talker TEXT NOT NULL, content TEXT);
         CREATE INDEX messageTalkerIndex ON message(talker);
         CREATE TABLE rcontact (username TEXT PRIMARY KEY, nickname TEXT);
         INSERT INTO message (talker, content) VALUES ('wxid_alice', 'hello');
         INSERT INTO message (talker, content) VALUES ('wxid_bob', 'it''s me');
         INSERT INTO message (talker, content) VALUES ('wxid_alice', NULL);
         INSERT INTO rcontact VALUES ('wxid_alice', 'Alice');
         INSERT INTO rcontact VALUES ('wxid_bob', 'Bob');",
    )
    .unwrap();
    conn.close().unwrap();
}

/// A database encrypted the way the client does it, with the derived key
pub fn create_derived_fixture(dir: &Path) -> std::path::PathBuf {
    write_companions(dir, DEVICE, &[UIN]);
    let db = dir.join("EnMicroMsg.db");
    create_database(&db, &format!("\"{}\"", DERIVED_KEY), true);
    db
}

/// A database encrypted with `hex` as its raw key, HMAC left on
pub fn create_raw_fixture(dir: &Path, hex: &str) -> std::path::PathBuf {
    let db = dir.join("EnMicroMsg.db");
    create_database(&db, &format!("\"x'{}'\"", hex), false);
    db
}

fn collect(conn: &Connection, sql: &str, lines: &mut Vec<String>) {
    let mut stmt = conn.prepare(sql).unwrap();
    let columns = stmt.column_count();
    let rows = stmt
        .query_map([], |row| {
            let mut fields = Vec::with_capacity(columns);
            for i in 0..columns {
                let value: rusqlite::types::Value = row.get(i)?;
                fields.push(format!("{:?}", value));
            }
            Ok(fields.join("|"))
        })
        .unwrap();
    for row in rows {
        lines.push(row.unwrap());
    }
}

/// Schema and rows of a plaintext database, one line per item
pub fn dump(path: &Path) -> Vec<String> {
    let conn = Connection::open(path).unwrap();
    let mut lines = Vec::new();
    collect(
        &conn,
        "SELECT type, name, tbl_name, sql FROM sqlite_master ORDER BY type, name",
        &mut lines,
    );
    collect(&conn, "SELECT * FROM message ORDER BY msgId", &mut lines);
    collect(&conn, "SELECT * FROM rcontact ORDER BY username", &mut lines);
    lines
}
