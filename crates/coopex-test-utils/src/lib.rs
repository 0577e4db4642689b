//! Testing utilities for the Coopex workspace
//!
//! Shared fixtures shaped like the cooperative API's responses. Identifiers
//! deliberately mix JSON numbers and numeric strings.

#![allow(missing_docs)]

use coopex_record::Record;
use serde_json::json;

pub fn cultures() -> Vec<Record> {
    vec![
        Record::new().with("codcul", 1).with("nomcul", "Agrumes"),
        Record::new().with("codcul", 2).with("nomcul", "Pomme"),
        Record::new().with("codcul", "5").with("nomcul", "Raisin"),
    ]
}

pub fn varieties() -> Vec<Record> {
    vec![
        Record::new().with("codvar", 10).with("codcul", 1).with("nomvar", "Orange"),
        Record::new().with("codvar", 11).with("codcul", "2").with("nomvar", "Gala"),
        Record::new().with("codvar", "12").with("codcul", 2).with("nomvar", "Golden"),
        Record::new().with("codvar", 20).with("codcul", 5).with("nomvar", "Muscat"),
        Record::new().with("codvar", 21).with("codcul", "5").with("nomvar", "Dattier"),
    ]
}

pub fn sub_varieties() -> Vec<Record> {
    vec![
        Record::new().with("codsvar", 100).with("codvar", 10).with("nomsvar", "Navel"),
        Record::new().with("codsvar", 101).with("codvar", "10").with("nomsvar", "Maroc Late"),
        Record::new().with("codsvar", 110).with("codvar", 11).with("nomsvar", "Royal Gala"),
        Record::new().with("codsvar", 77).with("codvar", "20").with("nomsvar", "Muscat d'Italie"),
    ]
}

pub fn producers() -> Vec<Record> {
    vec![
        Record::new().with("codpro", 7).with("nompro", "Domaine Sidi"),
        Record::new().with("codpro", 8).with("nompro", "Coop Oued"),
    ]
}

pub fn orchards() -> Vec<Record> {
    vec![
        Record::new().with("refver", "V1").with("codpro", 7).with("nomver", "Verger Nord"),
        Record::new().with("refver", "V2").with("codpro", "7").with("nomver", "Verger Sud"),
        Record::new().with("refver", "V3").with("codpro", 8).with("nomver", "Verger Oued"),
    ]
}

pub fn parcels() -> Vec<Record> {
    vec![
        Record::new().with("refpar", "P1").with("refver", "V1").with("nompar", "Parcelle 1"),
        Record::new().with("refpar", "P2").with("refver", "V1").with("nompar", "Parcelle 2"),
        Record::new().with("refpar", "P3").with("refver", "V3").with("nompar", "Parcelle 3"),
    ]
}

/// `count` export rows with deterministic, partly repeating values
pub fn exports(count: usize) -> Vec<Record> {
    const DESTINATIONS: [&str; 4] = ["France", "espagne", "Russie", "Canada"];
    (0..count)
        .map(|i| {
            Record::new()
                .with("numexp", i + 1)
                .with("destination", DESTINATIONS[i % DESTINATIONS.len()])
                .with("poidsExporte", ((i * 37) % 100 + 1) as f64 * 10.5)
                .with("codvar", if i % 2 == 0 { 10 } else { 11 })
        })
        .collect()
}

/// Every fixture list keyed by API endpoint
pub fn fixture_json() -> serde_json::Value {
    json!({
        "cultures": cultures(),
        "varietes": varieties(),
        "sousvarietes": sub_varieties(),
        "producteurs": producers(),
        "vergers": orchards(),
        "parcelles": parcels(),
        "exportations": exports(23),
    })
}
