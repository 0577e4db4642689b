//! End-to-end form flows against the in-memory backend.

use coopex_forms::{screens, FormError, FormMode, FormSession, MemoryBackend, SourceError};
use coopex_record::{Record, Value};
use coopex_test_utils::fixture_json;
use pretty_assertions::assert_eq;
use std::io::Write;

fn backend() -> MemoryBackend {
    MemoryBackend::from_json(fixture_json()).unwrap()
}

fn stored_parcel() -> Record {
    Record::new()
        .with("refpar", "P1")
        .with("nompar", "Parcelle 1")
        .with("superficie", 2.5)
        .with("nbrarbres", 400)
        .with("refver", "V1")
        .with("numcul", 5)
        .with("codvar", "20")
        .with("codsvar", 77)
}

#[tokio::test]
async fn edit_restores_every_level() {
    let backend = backend();
    let mut session = FormSession::new(screens::parcelle_form().unwrap());
    session.open_for_edit(&stored_parcel());
    assert!(session.mount(&backend).await.is_empty());

    let location = session.cascade("location").unwrap();
    assert_eq!(location.selection("producer").single(), Some(&Value::from(7)));
    assert_eq!(location.selected_option("orchard").unwrap().label, "Verger Nord");
    let orchards: Vec<String> = location
        .visible_options("orchard")
        .iter()
        .map(|o| o.value.to_string())
        .collect();
    assert_eq!(orchards, vec!["V1", "V2"]);

    let variety = session.cascade("variety").unwrap();
    assert_eq!(variety.visible_options("variety").len(), 2);
    assert_eq!(variety.selected_option("sub_variety").unwrap().label, "Muscat d'Italie");
    assert_eq!(session.field("superficie"), Value::from(2.5));
}

#[tokio::test]
async fn edit_submit_updates_in_place() {
    let backend = backend();
    let mut session = FormSession::new(screens::parcelle_form().unwrap());
    session.mount(&backend).await;
    session.open_for_edit(&Record::new().with("refpar", "P2").with("refver", "V1"));
    assert_eq!(session.mode(), &FormMode::Edit { key: Value::text("P2") });

    session.set_field("superficie", "3.75");
    session.select("variety", "culture", "2");
    session.select("variety", "variety", 12);
    let stored = session.submit(&backend).await.unwrap();

    assert_eq!(stored.value("superficie"), Value::text("3.75"));
    assert_eq!(stored.value("nompar"), Value::text("Parcelle 2"));
    assert_eq!(backend.records("parcelles").len(), 3);
    assert_eq!(session.mode(), &FormMode::Create);
}

#[tokio::test]
async fn changing_producer_clears_orchard_choice() {
    let backend = backend();
    let mut session = FormSession::new(screens::parcelle_form().unwrap());
    session.mount(&backend).await;

    session.select("location", "producer", 7);
    session.select("location", "orchard", "V2");
    session.select("location", "producer", "8");

    let location = session.cascade("location").unwrap();
    assert!(location.selection("orchard").is_empty());
    assert_eq!(location.visible_options("orchard").len(), 1);

    let err = session.validate().unwrap_err();
    assert!(err.for_field("refver").is_some());
    assert!(err.for_field("refpar").is_some());
}

#[tokio::test]
async fn create_rejects_existing_key() {
    let backend = backend();
    let mut session = FormSession::new(screens::parcelle_form().unwrap());
    session.mount(&backend).await;

    session.set_field("refpar", "P3");
    session.set_field("superficie", 1);
    session.select("location", "producer", 8);
    session.select("location", "orchard", "V3");
    session.select("variety", "culture", 1);
    session.select("variety", "variety", 10);

    let err = session.submit(&backend).await.unwrap_err();
    assert!(matches!(err, FormError::DuplicateKey { ref key, .. } if key == "P3"));
    assert_eq!(backend.records("parcelles").len(), 3);
}

#[tokio::test]
async fn outage_degrades_only_affected_levels() {
    let backend = backend();
    backend.set_unavailable("vergers", true);
    let mut session = FormSession::new(screens::certificat_form());

    let failures = session.mount(&backend).await;
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0].error, SourceError::Unavailable(_)));

    session.select("orchard", "producer", 7);
    let parcel = session.cascade("orchard").unwrap();
    assert!(parcel.visible_options("orchard").is_empty());
    assert_eq!(parcel.visible_options("producer").len(), 2);

    backend.set_unavailable("vergers", false);
    assert!(session.retry_failed(&backend).await.is_empty());
    assert_eq!(session.cascade("orchard").unwrap().visible_options("orchard").len(), 2);
}

#[tokio::test]
async fn retry_keeps_selections_made_after_edit() {
    let backend = backend();
    backend.set_unavailable("sousvarietes", true);
    let mut session = FormSession::new(screens::parcelle_form().unwrap());
    session.open_for_edit(
        &Record::new()
            .with("refpar", "P1")
            .with("numcul", 5)
            .with("codvar", 20)
            .with("refver", "V1"),
    );
    assert_eq!(session.mount(&backend).await.len(), 1);

    session.select("variety", "culture", 2);
    session.select("variety", "variety", 11);
    session.select("location", "producer", 8);
    session.select("location", "orchard", "V3");

    backend.set_unavailable("sousvarietes", false);
    assert!(session.retry_failed(&backend).await.is_empty());

    let variety = session.cascade("variety").unwrap();
    assert_eq!(variety.selection("culture").single(), Some(&Value::from(2)));
    assert_eq!(variety.selection("variety").single(), Some(&Value::from(11)));
    assert_eq!(variety.visible_options("sub_variety").len(), 1);

    let location = session.cascade("location").unwrap();
    assert_eq!(location.selection("producer").single(), Some(&Value::from(8)));
    assert_eq!(location.selection("orchard").single(), Some(&Value::text("V3")));
    assert_eq!(session.mode(), &FormMode::Edit { key: Value::text("P1") });
}

#[tokio::test]
async fn backend_from_fixture_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", fixture_json()).unwrap();
    let backend = MemoryBackend::from_file(file.path()).await.unwrap();
    assert_eq!(backend.records("exportations").len(), 23);
}
