use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use kana_engine::engine::{CONNECTION_STORE_FILE, LEARNING_STORE_FILE, SYSTEM_STORE_FILE};
use kana_engine::settings::SearchSettings;
use kana_engine::store::{bundle, interchange, DictionaryStore, FileStore};
use kana_engine::{Candidate, CommitCycle, Dictionaries, DictionaryEngine};

const SEED: &str = "\
かい\t会\t貝
かいぎ\t会議
かいしゃ\t会社
わたし\t私\t渡し
は\tは\t葉
";

fn open_engine(dir: &Path) -> DictionaryEngine {
    DictionaryEngine::with_settings(Dictionaries::open(dir), SearchSettings::default())
}

fn values(candidates: &[Candidate]) -> Vec<&str> {
    candidates.iter().map(|c| c.value()).collect()
}

#[test]
fn compiled_system_dictionary_is_searchable() {
    let dir = tempfile::tempdir().unwrap();
    bundle::compile_seed(SEED.as_bytes(), &dir.path().join(SYSTEM_STORE_FILE)).unwrap();

    let engine = open_engine(dir.path());
    assert!(engine.dictionaries().system.as_store().is_available());
    assert_eq!(
        values(&engine.search("kai")),
        vec!["会", "貝", "会議", "会社", "かい", "カイ", "kai", "ｋａｉ"]
    );
}

#[test]
fn learning_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    bundle::compile_seed(SEED.as_bytes(), &dir.path().join(SYSTEM_STORE_FILE)).unwrap();

    {
        let mut engine = open_engine(dir.path());
        let mut cycle = CommitCycle::new();
        cycle.commit(&mut engine, Candidate::new("かい", "貝"));
        cycle.commit(&mut engine, Candidate::new("わたし", "私"));
        cycle.commit(&mut engine, Candidate::new("は", "は"));
        // Dropped without flush; every commit is already durable.
    }

    assert!(dir.path().join(LEARNING_STORE_FILE).with_extension("kdic.wal").exists());

    let engine = open_engine(dir.path());
    assert_eq!(&values(&engine.search("kai"))[..2], &["貝", "会"]);
    assert_eq!(engine.search("watashiha")[0].value(), "私は");
    let next = engine
        .predict(Some(&Candidate::new("わたし", "私")))
        .unwrap();
    assert_eq!(next, vec![Candidate::new("は", "は")]);
}

#[test]
fn missing_system_dictionary_degrades() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open_engine(dir.path());
    assert!(!engine.dictionaries().system.as_store().is_available());

    assert_eq!(values(&engine.search("ka")), vec!["か", "カ", "ka", "ｋａ"]);
    engine.commit("ka", "蚊").unwrap();
    assert_eq!(engine.search("ka")[0].value(), "蚊");
}

#[test]
fn corrupt_learning_store_does_not_break_search() {
    let dir = tempfile::tempdir().unwrap();
    bundle::compile_seed(SEED.as_bytes(), &dir.path().join(SYSTEM_STORE_FILE)).unwrap();
    fs::write(dir.path().join(LEARNING_STORE_FILE), b"garbage").unwrap();

    let mut engine = open_engine(dir.path());
    assert!(engine.commit("kai", "貝").is_err());
    assert_eq!(engine.search("kai")[0].value(), "会");

    // Connection store is independent of the broken learning store.
    engine
        .commit_connection(&Candidate::new("かい", "会"), &Candidate::new("は", "は"))
        .unwrap();
    assert!(dir.path().join(CONNECTION_STORE_FILE).with_extension("kdic.wal").exists());
}

#[test]
fn installed_archive_is_opened() {
    let staging = tempfile::tempdir().unwrap();
    let snapshot = staging.path().join(SYSTEM_STORE_FILE);
    bundle::compile_seed(SEED.as_bytes(), &snapshot).unwrap();

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(SYSTEM_STORE_FILE, zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(&fs::read(&snapshot).unwrap()).unwrap();
    let archive = writer.finish().unwrap().into_inner();

    let data = tempfile::tempdir().unwrap();
    assert_eq!(bundle::install_archive(Cursor::new(archive), data.path()).unwrap(), 1);

    let engine = open_engine(data.path());
    assert_eq!(engine.search("watashi")[0].value(), "私");
}

#[test]
fn exported_learning_imports_into_fresh_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open_engine(dir.path());
    engine.commit("ka", "買").unwrap();
    engine.commit("ka", "家").unwrap();
    engine.commit("ki", "木").unwrap();

    let mut exported = Vec::new();
    interchange::export(&*engine.dictionaries().learning, &mut exported).unwrap();
    let text = String::from_utf8(exported).unwrap();
    assert_eq!(text, "か\t家\t買\nき\t木\n");

    let target_dir = tempfile::tempdir().unwrap();
    let target_path = target_dir.path().join("imported.kdic");
    {
        let mut target = FileStore::open(&target_path).unwrap();
        interchange::import(&mut target, text.as_bytes()).unwrap();
        target.checkpoint().unwrap();
        assert_eq!(target.pending_log_entries(), 0);
    }

    let reopened = FileStore::open_read_only(&target_path).unwrap();
    assert_eq!(interchange::export_lines(&reopened), vec!["か\t家\t買", "き\t木"]);
}

#[test]
fn export_includes_words_only_in_log() {
    let dir = tempfile::tempdir().unwrap();
    let learning_path = dir.path().join(LEARNING_STORE_FILE);
    {
        let mut engine = open_engine(dir.path());
        engine.commit("ka", "家").unwrap();
    }
    assert!(!learning_path.exists());

    let store = FileStore::open_read_only_with_log(&learning_path).unwrap();
    assert_eq!(interchange::export_lines(&store), vec!["か\t家"]);

    {
        let mut writer = FileStore::open(&learning_path).unwrap();
        writer.checkpoint().unwrap();
        drop(writer);
        let mut engine = open_engine(dir.path());
        engine.commit("ka", "買").unwrap();
    }
    let store = FileStore::open_read_only_with_log(&learning_path).unwrap();
    assert_eq!(interchange::export_lines(&store), vec!["か\t買\t家"]);
}
