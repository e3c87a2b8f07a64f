use std::fs;
use std::path::Path;
use tempfile::TempDir;

use ipabot_core::config::{expand_path, resolve_with_base};
use ipabot_core::dataset::{load_or_empty, JsonFileSource};
use ipabot_core::traits::DatasetSource;

const DOC: &str = r#"{
  "ipa_smp": {
    "topics": {
      "Fisika": { "subtopics": { "Gaya": [
        { "patterns": ["apa itu gaya"], "keywords": ["gaya"],
          "responses": ["Gaya adalah tarikan atau dorongan."] }
      ] } },
      "Biologi": { "subtopics": { "Sel": [
        { "patterns": ["apa itu sel"], "keywords": ["sel"],
          "responses": ["Sel adalah unit terkecil makhluk hidup."], "diagram": "sel.png" },
        { "patterns": ["fungsi mitokondria"], "responses": ["Mitokondria menghasilkan energi."] }
      ] } }
    },
    "fallback_responses": ["Maaf, coba tanyakan hal lain."]
  }
}"#;

#[test]
fn json_file_source_reads_wrapped_document() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("dataseek.json");
    fs::write(&path, DOC).unwrap();

    let dataset = JsonFileSource::new(&path, "ipa_smp").load().expect("load");

    assert_eq!(dataset.topics.len(), 2);
    assert_eq!(dataset.item_count(), 3);
    assert_eq!(dataset.topics.get_index(0).map(|(k, _)| k.as_str()), Some("Fisika"));
    let sel = &dataset.topics["Biologi"].subtopics["Sel"].items[0];
    assert_eq!(sel.diagram.as_deref(), Some("sel.png"));
    assert_eq!(dataset.fallback_responses, vec!["Maaf, coba tanyakan hal lain."]);
}

#[test]
fn missing_file_falls_back_to_empty_dataset() {
    let tmp = TempDir::new().unwrap();
    let source = JsonFileSource::new(tmp.path().join("absent.json"), "ipa_smp");

    assert!(source.load().is_err());
    let outcome = load_or_empty(&source);
    assert!(outcome.failed, "load failure is reported to the host");
    assert!(outcome.dataset.is_empty());
}

#[test]
fn schema_mismatch_is_a_load_failure() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.json");
    let doc = r#"{"ipa_smp":{"topics":{"Biologi":{"subtopics":{"Sel":"not a list"}}}}}"#;
    fs::write(&path, doc).unwrap();

    let outcome = load_or_empty(&JsonFileSource::new(&path, "ipa_smp"));
    assert!(outcome.failed);
}

#[test]
fn paths_expand_env_and_resolve_relative() {
    std::env::set_var("IPABOT_TEST_DATA_DIR", "/srv/ipabot");
    assert_eq!(
        expand_path("$IPABOT_TEST_DATA_DIR/dataseek.json"),
        Path::new("/srv/ipabot/dataseek.json")
    );

    let base = Path::new("/opt/app");
    assert_eq!(resolve_with_base(base, "data/ds.json"), Path::new("/opt/app/data/ds.json"));
    assert_eq!(resolve_with_base(base, "/abs/ds.json"), Path::new("/abs/ds.json"));
}
