//! Form container
//!
//! A [`FormDefinition`] describes one entity form: the endpoint it writes
//! to, its key field, the cascades it embeds and the rules of its
//! independent fields. A [`FormSession`] is one mounted instance of it.
//!
//! # Lifecycle
//!
//! 1. [`FormSession::mount`] loads every cascade level's full list
//! 2. [`FormSession::open_for_edit`] (edit mode only) restores selections
//! 3. The user edits fields and dropdowns
//! 4. [`FormSession::submit`] validates and writes, or
//!    [`FormSession::cancel`] discards; both reset the session

use crate::error::{FieldViolation, FormError, SourceError, ValidationErrors, ViolationKind};
use crate::source::{OptionSource, RecordStore};
use crate::validation::{validate_record, FieldRule};
use coopex_cascade::{CascadeChain, CascadeController, Selection};
use coopex_record::{Record, Value};
use futures::future::join_all;
use indexmap::IndexMap;

/// A cascade embedded in a form, with the endpoint feeding each level
#[derive(Debug, Clone)]
pub struct CascadeBinding {
    name: String,
    chain: CascadeChain,
    endpoints: IndexMap<String, String>,
    required: Vec<String>,
}

impl CascadeBinding {
    /// Bind `chain` under `name`
    #[must_use]
    pub fn new(name: impl Into<String>, chain: CascadeChain) -> Self {
        Self {
            name: name.into(),
            chain,
            endpoints: IndexMap::new(),
            required: Vec::new(),
        }
    }

    /// Feed `level` from `endpoint`
    #[must_use]
    pub fn endpoint(mut self, level: impl Into<String>, endpoint: impl Into<String>) -> Self {
        self.endpoints.insert(level.into(), endpoint.into());
        self
    }

    /// Reject submission while `level` has no selection
    #[must_use]
    pub fn require(mut self, level: impl Into<String>) -> Self {
        self.required.push(level.into());
        self
    }

    /// Binding name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bound chain
    #[inline]
    #[must_use]
    pub fn chain(&self) -> &CascadeChain {
        &self.chain
    }

    /// Endpoint feeding `level`
    #[must_use]
    pub fn endpoint_of(&self, level: &str) -> Option<&str> {
        self.endpoints.get(level).map(String::as_str)
    }

    /// Levels that must be selected
    #[inline]
    #[must_use]
    pub fn required_levels(&self) -> &[String] {
        &self.required
    }
}

/// Static description of an entity form
#[derive(Debug, Clone)]
pub struct FormDefinition {
    /// Endpoint records are written to
    pub entity: String,

    /// Field identifying a record
    pub key_field: String,

    /// Embedded cascades
    pub cascades: Vec<CascadeBinding>,

    /// Rules of the independent fields
    pub fields: Vec<FieldRule>,
}

impl FormDefinition {
    /// Create definition with no cascades or fields
    #[must_use]
    pub fn new(entity: impl Into<String>, key_field: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            key_field: key_field.into(),
            cascades: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Add cascade
    #[must_use]
    pub fn cascade(mut self, binding: CascadeBinding) -> Self {
        self.cascades.push(binding);
        self
    }

    /// Add field rule
    #[must_use]
    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    /// Distinct endpoints and the `(cascade, level)` pairs they feed
    fn endpoint_plan(&self) -> IndexMap<String, Vec<(String, String)>> {
        let mut plan: IndexMap<String, Vec<(String, String)>> = IndexMap::new();
        for binding in &self.cascades {
            for (level, endpoint) in &binding.endpoints {
                plan.entry(endpoint.clone())
                    .or_default()
                    .push((binding.name.clone(), level.clone()));
            }
        }
        plan
    }
}

/// Whether a submission creates or replaces a record
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormMode {
    /// New record
    #[default]
    Create,

    /// Existing record with this key
    Edit {
        /// Key of the record being edited
        key: Value,
    },
}

/// An option list that could not be loaded
#[derive(Debug)]
pub struct LoadFailure {
    /// Endpoint that failed
    pub endpoint: String,

    /// `cascade.level` names left empty
    pub levels: Vec<String>,

    /// Underlying error
    pub error: SourceError,
}

/// One mounted form
#[derive(Debug, Clone)]
pub struct FormSession {
    definition: FormDefinition,
    controllers: IndexMap<String, CascadeController>,
    fields: Record,
    mode: FormMode,
    pending_edit: Option<Record>,
    failed: Vec<String>,
}

impl FormSession {
    /// Create unmounted session in create mode
    #[must_use]
    pub fn new(definition: FormDefinition) -> Self {
        let controllers = definition
            .cascades
            .iter()
            .map(|b| (b.name.clone(), CascadeController::new(b.chain.clone())))
            .collect();
        Self {
            definition,
            controllers,
            fields: Record::new(),
            mode: FormMode::Create,
            pending_edit: None,
            failed: Vec::new(),
        }
    }

    /// Form definition
    #[inline]
    #[must_use]
    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    /// Load every option list concurrently
    ///
    /// Lists shared by several levels are fetched once. A failed endpoint
    /// leaves its levels empty; the form stays usable. A record opened
    /// before mounting is applied once the lists are in.
    pub async fn mount<S>(&mut self, source: &S) -> Vec<LoadFailure>
    where
        S: OptionSource + ?Sized,
    {
        let plan = self.definition.endpoint_plan();
        let failures = self.load(source, plan).await;
        if let Some(record) = self.pending_edit.take() {
            for controller in self.controllers.values_mut() {
                controller.initialize_from_record(&record);
            }
        }
        tracing::info!(
            entity = %self.definition.entity,
            failed = failures.len(),
            "form mounted"
        );
        failures
    }

    /// Reload only the lists that failed last time
    ///
    /// Current selections are kept.
    pub async fn retry_failed<S>(&mut self, source: &S) -> Vec<LoadFailure>
    where
        S: OptionSource + ?Sized,
    {
        let mut plan = self.definition.endpoint_plan();
        plan.retain(|endpoint, _| self.failed.contains(endpoint));
        self.load(source, plan).await
    }

    /// Endpoints whose lists are currently missing
    #[inline]
    #[must_use]
    pub fn load_errors(&self) -> &[String] {
        &self.failed
    }

    async fn load<S>(
        &mut self,
        source: &S,
        plan: IndexMap<String, Vec<(String, String)>>,
    ) -> Vec<LoadFailure>
    where
        S: OptionSource + ?Sized,
    {
        let results = join_all(plan.keys().map(|endpoint| source.fetch_all(endpoint))).await;

        let mut failures = Vec::new();
        for ((endpoint, targets), result) in plan.into_iter().zip(results) {
            match result {
                Ok(records) => {
                    self.failed.retain(|e| e != &endpoint);
                    for (cascade, level) in &targets {
                        if let Some(controller) = self.controllers.get_mut(cascade) {
                            controller.set_source(level, records.iter().cloned());
                        }
                    }
                    tracing::debug!(%endpoint, records = records.len(), "options loaded");
                }
                Err(error) => {
                    tracing::warn!(%endpoint, %error, "failed to load options");
                    if !self.failed.contains(&endpoint) {
                        self.failed.push(endpoint.clone());
                    }
                    failures.push(LoadFailure {
                        endpoint,
                        levels: targets.iter().map(|(c, l)| format!("{c}.{l}")).collect(),
                        error,
                    });
                }
            }
        }
        failures
    }

    /// Switch to edit mode for an existing record
    ///
    /// Independent fields are copied from the record and every cascade
    /// restores its selections from it.
    pub fn open_for_edit(&mut self, record: &Record) {
        let key = record.value(&self.definition.key_field);
        self.fields = self
            .definition
            .fields
            .iter()
            .filter_map(|rule| {
                record
                    .get(&rule.field)
                    .map(|v| (rule.field.clone(), v.clone()))
            })
            .collect();
        self.fields
            .insert(self.definition.key_field.clone(), key.clone());
        for controller in self.controllers.values_mut() {
            controller.initialize_from_record(record);
        }
        self.pending_edit = Some(record.clone());
        self.mode = FormMode::Edit { key };
    }

    /// Current mode
    #[inline]
    #[must_use]
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Set an independent field
    pub fn set_field(&mut self, field: &str, value: impl Into<Value>) {
        self.fields.insert(field, value);
    }

    /// Value of an independent field
    #[must_use]
    pub fn field(&self, field: &str) -> Value {
        self.fields.value(field)
    }

    /// Choose one value in a cascade level
    pub fn select(&mut self, cascade: &str, level: &str, value: impl Into<Value>) {
        self.select_many(cascade, level, Selection::from(value.into()));
    }

    /// Change a cascade level's selection
    pub fn select_many(&mut self, cascade: &str, level: &str, selection: Selection) {
        match self.controllers.get_mut(cascade) {
            Some(controller) => controller.set_selection(level, selection),
            None => tracing::warn!(cascade, "unknown cascade"),
        }
    }

    /// Controller of a cascade
    #[must_use]
    pub fn cascade(&self, name: &str) -> Option<&CascadeController> {
        self.controllers.get(name)
    }

    /// Independent fields merged with every cascade's selections
    #[must_use]
    pub fn payload(&self) -> Record {
        let mut payload = self.fields.clone();
        for controller in self.controllers.values() {
            payload.merge(&controller.payload());
        }
        payload
    }

    /// Check field rules and required cascade levels
    ///
    /// # Errors
    /// Returns every violation found
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let payload = self.payload();
        let mut violations = validate_record(&self.definition.fields, &payload)
            .err()
            .map(|e| e.violations)
            .unwrap_or_default();

        for binding in &self.definition.cascades {
            let Some(controller) = self.controllers.get(&binding.name) else {
                continue;
            };
            for level in &binding.required {
                if !controller.selection(level).is_empty() {
                    continue;
                }
                let field = binding
                    .chain
                    .index_of(level)
                    .and_then(|i| binding.chain.level(i))
                    .map_or_else(|| level.clone(), |l| l.record_field().to_string());
                violations.push(FieldViolation {
                    field,
                    label: level.clone(),
                    kind: ViolationKind::Required,
                });
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { violations })
        }
    }

    /// Validate and write the payload, then reset
    ///
    /// # Errors
    /// Returns error on validation failure, duplicate key in create mode,
    /// or backend failure; the session is left untouched in that case
    pub async fn submit<S>(&mut self, store: &S) -> Result<Record, FormError>
    where
        S: RecordStore + ?Sized,
    {
        self.validate()?;
        let payload = self.payload();
        let entity = &self.definition.entity;
        let key_field = &self.definition.key_field;

        let stored = match &self.mode {
            FormMode::Create => {
                let key = payload.value(key_field);
                if !key.is_empty() && store.exists(entity, key_field, &key).await? {
                    return Err(FormError::DuplicateKey {
                        entity: entity.clone(),
                        key_field: key_field.clone(),
                        key: key.to_string(),
                    });
                }
                store.create(entity, &payload).await?
            }
            FormMode::Edit { key } => store.update(entity, key_field, key, &payload).await?,
        };

        tracing::info!(
            entity = %entity,
            key = %stored.value(key_field),
            "record saved"
        );
        self.reset();
        Ok(stored)
    }

    /// Discard all edits
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.fields = Record::new();
        self.mode = FormMode::Create;
        self.pending_edit = None;
        for controller in self.controllers.values_mut() {
            controller.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryBackend;
    use coopex_cascade::variety_chain;
    use coopex_test_utils::{cultures, sub_varieties, varieties};

    fn definition() -> FormDefinition {
        FormDefinition::new("varietes_export", "code")
            .cascade(
                CascadeBinding::new("variety", variety_chain())
                    .endpoint("culture", "cultures")
                    .endpoint("variety", "varietes")
                    .endpoint("sub_variety", "sousvarietes")
                    .require("culture")
                    .require("variety"),
            )
            .field(FieldRule::text("code", "Code").required())
    }

    fn backend() -> MemoryBackend {
        MemoryBackend::new()
            .with_table("cultures", cultures())
            .with_table("varietes", varieties())
            .with_table("sousvarietes", sub_varieties())
            .with_table("varietes_export", Vec::new())
    }

    #[tokio::test]
    async fn mount_fills_roots_only() {
        let backend = backend();
        let mut session = FormSession::new(definition());
        assert!(session.mount(&backend).await.is_empty());

        let ctl = session.cascade("variety").unwrap();
        assert_eq!(ctl.visible_options("culture").len(), 3);
        assert!(ctl.visible_options("variety").is_empty());
        assert_eq!(ctl.source_options("variety").len(), 5);
    }

    #[tokio::test]
    async fn failed_load_and_retry() {
        let backend = backend();
        backend.set_unavailable("varietes", true);
        let mut session = FormSession::new(definition());

        let failures = session.mount(&backend).await;
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].levels, vec!["variety.variety"]);
        assert_eq!(session.load_errors(), ["varietes"]);

        backend.set_unavailable("varietes", false);
        assert!(session.retry_failed(&backend).await.is_empty());
        assert!(session.load_errors().is_empty());
        assert_eq!(session.cascade("variety").unwrap().source_options("variety").len(), 5);
    }

    #[tokio::test]
    async fn validate_reports_fields_and_levels() {
        let backend = backend();
        let mut session = FormSession::new(definition());
        session.mount(&backend).await;

        let err = session.validate().unwrap_err();
        let fields: Vec<&str> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["code", "numcul", "codvar"]);

        session.set_field("code", "X1");
        session.select("variety", "culture", 1);
        session.select("variety", "variety", "10");
        assert!(session.validate().is_ok());
        assert_eq!(session.payload().value("numcul"), Value::from(1));
    }

    #[tokio::test]
    async fn submit_create_then_duplicate() {
        let backend = backend();
        let mut session = FormSession::new(definition());
        session.mount(&backend).await;

        session.set_field("code", "X1");
        session.select("variety", "culture", 1);
        session.select("variety", "variety", 10);
        session.submit(&backend).await.unwrap();
        assert_eq!(backend.records("varietes_export").len(), 1);
        assert!(session.cascade("variety").unwrap().selection("culture").is_empty());

        session.set_field("code", "X1");
        session.select("variety", "culture", 1);
        session.select("variety", "variety", 10);
        let err = session.submit(&backend).await.unwrap_err();
        assert!(matches!(err, FormError::DuplicateKey { .. }));
        assert_eq!(session.field("code"), Value::text("X1"));
    }

    #[test]
    fn cancel_resets_mode() {
        let mut session = FormSession::new(definition());
        session.open_for_edit(&Record::new().with("code", "X1").with("numcul", 2));
        assert_eq!(session.mode(), &FormMode::Edit { key: Value::text("X1") });
        session.cancel();
        assert_eq!(session.mode(), &FormMode::Create);
        assert!(session.field("code").is_empty());
    }
}
