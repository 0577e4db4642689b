//! Preset forms and list tables of the dashboard

use crate::form::{CascadeBinding, FormDefinition};
use crate::validation::FieldRule;
use coopex_cascade::{
    culture_filter_chain, orchard_chain, variety_chain, CascadeChain, ChainError, Level,
};
use coopex_table::{SortState, TableSpec};

fn variety_binding() -> CascadeBinding {
    CascadeBinding::new("variety", variety_chain())
        .endpoint("culture", "cultures")
        .endpoint("variety", "varietes")
        .endpoint("sub_variety", "sousvarietes")
        .require("culture")
        .require("variety")
}

fn orchard_binding() -> CascadeBinding {
    CascadeBinding::new("orchard", orchard_chain())
        .endpoint("producer", "producteurs")
        .endpoint("orchard", "vergers")
        .endpoint("parcel", "parcelles")
}

/// Preset chain by registry name, bound to its endpoints
#[must_use]
pub fn chain_binding(name: &str) -> Option<CascadeBinding> {
    match name {
        "variety" => Some(variety_binding()),
        "orchard" => Some(orchard_binding()),
        "culture_filter" => Some(
            CascadeBinding::new("culture_filter", culture_filter_chain())
                .endpoint("culture", "cultures")
                .endpoint("variety", "varietes"),
        ),
        _ => None,
    }
}

/// Parcel form: producer → orchard location plus the planted variety
///
/// # Errors
/// Returns error if the location chain is malformed
pub fn parcelle_form() -> Result<FormDefinition, ChainError> {
    let location = CascadeChain::builder()
        .level(Level::root("producer", "codpro", "nompro"))
        .level(Level::child("orchard", "refver", "nomver", "producer", "codpro"))
        .build()?;

    Ok(FormDefinition::new("parcelles", "refpar")
        .cascade(
            CascadeBinding::new("location", location)
                .endpoint("producer", "producteurs")
                .endpoint("orchard", "vergers")
                .require("orchard"),
        )
        .cascade(variety_binding())
        .field(FieldRule::text("refpar", "Référence").required().max_len(10))
        .field(FieldRule::text("nompar", "Nom").max_len(50))
        .field(FieldRule::decimal("superficie", "Superficie (ha)").required().min(0.0))
        .field(FieldRule::integer("nbrarbres", "Nombre d'arbres").min(0.0)))
}

/// Orchard form: owning producer
///
/// # Errors
/// Returns error if the producer chain is malformed
pub fn verger_form() -> Result<FormDefinition, ChainError> {
    let owner = CascadeChain::builder()
        .level(Level::root("producer", "codpro", "nompro"))
        .build()?;

    Ok(FormDefinition::new("vergers", "refver")
        .cascade(
            CascadeBinding::new("owner", owner)
                .endpoint("producer", "producteurs")
                .require("producer"),
        )
        .field(FieldRule::text("refver", "Référence").required().max_len(10))
        .field(FieldRule::text("nomver", "Nom").required().max_len(50))
        .field(FieldRule::text("localisation", "Localisation")))
}

/// Certificate form: certified parcel and variety
#[must_use]
pub fn certificat_form() -> FormDefinition {
    FormDefinition::new("certificats", "numcert")
        .cascade(orchard_binding().require("parcel"))
        .cascade(variety_binding())
        .field(FieldRule::text("numcert", "Numéro").required().max_len(20))
        .field(FieldRule::text("organisme", "Organisme").required())
        .field(FieldRule::integer("annee", "Année").min(2000.0))
}

/// Variety list
#[must_use]
pub fn variety_table() -> TableSpec {
    TableSpec::new(["codvar", "nomvar", "codcul"])
}

/// Export list, heaviest shipments first
#[must_use]
pub fn export_table() -> TableSpec {
    TableSpec::new(["numexp", "destination", "codvar"])
        .with_default_sort(SortState::descending("poidsExporte"))
}

/// Producer list
#[must_use]
pub fn producer_table() -> TableSpec {
    TableSpec::new(["codpro", "nompro"]).with_default_sort(SortState::ascending("nompro"))
}

/// Table spec by short name (`variety`, `export`, `producer`)
#[must_use]
pub fn table_spec(name: &str) -> Option<TableSpec> {
    match name {
        "variety" => Some(variety_table()),
        "export" => Some(export_table()),
        "producer" => Some(producer_table()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_forms_build() {
        let parcelle = parcelle_form().unwrap();
        assert_eq!(parcelle.cascades.len(), 2);
        assert_eq!(parcelle.key_field, "refpar");

        let verger = verger_form().unwrap();
        assert_eq!(verger.cascades[0].required_levels(), ["producer"]);

        let certificat = certificat_form();
        assert_eq!(certificat.cascades[0].endpoint_of("parcel"), Some("parcelles"));
    }

    #[test]
    fn bindings_cover_every_level() {
        for name in ["variety", "orchard", "culture_filter"] {
            let binding = chain_binding(name).unwrap();
            for level in binding.chain().levels() {
                assert!(binding.endpoint_of(level.name()).is_some(), "{name}.{}", level.name());
            }
        }
        assert!(chain_binding("nope").is_none());
    }

    #[test]
    fn table_lookup() {
        assert!(table_spec("export").is_some());
        assert!(table_spec("unknown").is_none());
    }
}
