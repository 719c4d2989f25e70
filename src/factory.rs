//! Mock factory functions from schema descriptions.
//!
//! Every schema node gets a `xFactory(initial?)` function returning a fully
//! populated mock merged with the caller's partial override. Shared helper
//! functions are requested while walking and appended once per document.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ast::{
    BaseType, CustomFieldOverride, Diagnostic, FieldDescriptor, GeneratedFunction, ModelSchema,
    Parameter, SchemaDescription,
};
use crate::classify::classify_value;
use crate::document::{render_property_name, ImportClause, ImportStatement, SourceDocument};
use crate::naming::{declaration_name, factory_name, sub_schema_name};

const DEFAULT_FILE_NAME: &str = "tmp.ts";
const FAKER_MODULE: &str = "faker";
const DTO_NAMESPACE: &str = "dto";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Shared function emitted at most once per factory document.
pub enum Helper {
    /// `mongoObjectId()`: timestamp-prefixed random hex identifier.
    ObjectId,
    /// `enumPicker(values)()`: uniform random pick from literal values.
    EnumPick,
}

impl Helper {
    pub fn function_name(self) -> &'static str {
        match self {
            Self::ObjectId => "mongoObjectId",
            Self::EnumPick => "enumPicker",
        }
    }

    pub fn function(self) -> GeneratedFunction {
        match self {
            Self::ObjectId => GeneratedFunction {
                name: self.function_name().to_string(),
                exported: false,
                type_parameters: Vec::new(),
                parameters: Vec::new(),
                return_type: Some("string".to_string()),
                body: vec![
                    "const timestamp = (new Date().getTime() / 1000 | 0).toString(16)".to_string(),
                    "return timestamp + 'xxxxxxxxxxxxxxxx'.replace(/[x]/g, () => (Math.random() * 16 | 0).toString(16)).toLowerCase()".to_string(),
                ],
            },
            Self::EnumPick => GeneratedFunction {
                name: self.function_name().to_string(),
                exported: false,
                type_parameters: vec!["T".to_string()],
                parameters: vec![Parameter {
                    name: "values".to_string(),
                    type_expression: "T[]".to_string(),
                    optional: false,
                }],
                return_type: Some("() => T".to_string()),
                body: vec![
                    "return () => values[Math.floor(Math.random() * values.length)]".to_string(),
                ],
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Requested-versus-emitted bookkeeping for helper functions.
pub struct HelperRegistry {
    requested: BTreeSet<Helper>,
    emitted: BTreeSet<Helper>,
}

impl HelperRegistry {
    pub fn request(&mut self, helper: Helper) {
        self.requested.insert(helper);
    }

    pub fn is_requested(&self, helper: Helper) -> bool {
        self.requested.contains(&helper)
    }

    pub fn is_emitted(&self, helper: Helper) -> bool {
        self.emitted.contains(&helper)
    }

    /// Records a helper that is already present in the target document.
    pub fn mark_emitted(&mut self, helper: Helper) {
        self.emitted.insert(helper);
    }

    /// Helpers requested but not yet emitted, in declaration order; marks them emitted.
    pub fn take_pending(&mut self) -> Vec<Helper> {
        let pending: Vec<Helper> = self.requested.difference(&self.emitted).copied().collect();
        self.emitted.extend(pending.iter().copied());
        self.requested.clear();
        pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Value expressions used for scalar fields.
pub struct Randomizers {
    pub boolean: String,
    pub number: String,
    pub string: String,
    pub date: String,
}

impl Default for Randomizers {
    fn default() -> Self {
        Self {
            boolean: "faker.random.boolean()".to_string(),
            number: "faker.random.number()".to_string(),
            string: "faker.lorem.word()".to_string(),
            date: "faker.date.recent()".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Settings for one factory generator.
pub struct FactoryOptions {
    /// Module path the declaration file is imported from as `dto`.
    pub dto_import_path: String,
    /// Suffix of the declarations the factories return.
    pub declaration_suffix: String,
    /// Checked in order; the first match wins.
    pub overrides: Vec<CustomFieldOverride>,
    /// Require an override's `type` to match the field type when given.
    pub match_override_type: bool,
    pub randomizers: Randomizers,
    pub file_name: String,
    pub header: Option<String>,
}

impl FactoryOptions {
    pub fn new(dto_import_path: impl Into<String>) -> Self {
        Self {
            dto_import_path: dto_import_path.into(),
            declaration_suffix: "Dto".to_string(),
            overrides: Vec::new(),
            match_override_type: true,
            randomizers: Randomizers::default(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            header: None,
        }
    }

    pub fn with_override(mut self, custom: CustomFieldOverride) -> Self {
        self.overrides.push(custom);
        self
    }

    /// First override whose name (and type, when checked) matches `field`.
    pub fn find_override(&self, field: &FieldDescriptor) -> Option<&CustomFieldOverride> {
        self.overrides.iter().find(|custom| {
            custom.field_name == field.key
                && (!self.match_override_type
                    || custom
                        .match_base_type
                        .as_ref()
                        .map_or(true, |ty| ty == &field.base_type))
        })
    }
}

#[derive(Debug, Default)]
/// Output of one top-level factory walk.
pub struct FactorySession {
    pub functions: Vec<GeneratedFunction>,
    pub helpers: HelperRegistry,
    pub diagnostics: Vec<Diagnostic>,
    /// Factory names emitted so far. Sub-factories already present are reused;
    /// top-level factories are always emitted.
    pub factory_names: HashSet<String>,
}

/// Walks one top-level schema and returns its factories plus helper requests.
///
/// `known_factories` are names already present in the target document.
pub fn emit_factories(
    fields: &SchemaDescription,
    name: &str,
    options: &FactoryOptions,
    known_factories: HashSet<String>,
) -> FactorySession {
    let mut session = FactorySession {
        factory_names: known_factories,
        ..FactorySession::default()
    };
    let functions = emit_node(fields, name, false, options, &mut session);
    session.functions = functions;
    session
}

fn emit_node(
    fields: &SchemaDescription,
    name: &str,
    is_sub: bool,
    options: &FactoryOptions,
    session: &mut FactorySession,
) -> Vec<GeneratedFunction> {
    let function_name = factory_name(name);
    if !session.factory_names.insert(function_name.clone()) {
        if is_sub {
            debug!(factory = %function_name, "reusing existing factory");
            return Vec::new();
        }
        warn!(factory = %function_name, "factory name already present in document");
    }

    let dto_type = format!(
        "{DTO_NAMESPACE}.{}",
        declaration_name(name, &options.declaration_suffix)
    );
    let mut subtrees = Vec::new();
    let mut body = vec![format!("const mock: {dto_type} = {{")];

    for field in fields {
        if field.base_type == BaseType::NestedSchema && options.find_override(field).is_none() {
            let sub_name = sub_schema_name(name, &field.key);
            let empty = SchemaDescription::new();
            let sub_fields = field.schema.as_ref().unwrap_or(&empty);
            subtrees.extend(emit_node(sub_fields, &sub_name, true, options, session));
        }

        let classified = classify_value(field, name, options);
        if let Some(helper) = classified.helper {
            session.helpers.request(helper);
        }
        if let Some(diagnostic) = classified.diagnostic {
            session.diagnostics.push(diagnostic);
        }
        match classified.expression {
            Some(expression) => body.push(format!(
                "  {}: {expression},",
                render_property_name(&field.key)
            )),
            None => debug!(factory = %function_name, field = %field.key, "no mock value for field"),
        }
    }

    body.push("}".to_string());
    body.push("return { ...mock, ...initial }".to_string());

    let function = GeneratedFunction {
        name: function_name,
        exported: !is_sub,
        type_parameters: Vec::new(),
        parameters: vec![Parameter {
            name: "initial".to_string(),
            type_expression: format!("Partial<{dto_type}>"),
            optional: true,
        }],
        return_type: Some(dto_type),
        body,
    };
    debug!(factory = %function.name, nested = subtrees.len(), "emitted factory");

    let mut out = Vec::with_capacity(1 + subtrees.len());
    out.push(function);
    out.extend(subtrees);
    out
}

#[derive(Debug)]
/// Appends mock factories for one or more schemas to a shared document.
pub struct FactoryGenerator {
    options: FactoryOptions,
    document: SourceDocument,
    helpers: HelperRegistry,
    factory_names: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl FactoryGenerator {
    /// Creates a fresh document importing `faker` and the declaration module.
    pub fn new(options: FactoryOptions) -> Self {
        let mut document = SourceDocument::new(options.file_name.clone());
        if let Some(header) = &options.header {
            document.add_header_comment(header.clone());
        }
        Self::with_document(options, document)
    }

    /// Generates into an existing document; missing factory imports are added to it.
    ///
    /// Functions and helpers the document already holds count as emitted.
    pub fn with_document(options: FactoryOptions, mut document: SourceDocument) -> Self {
        ensure_namespace_import(&mut document, FAKER_MODULE, FAKER_MODULE);
        ensure_namespace_import(&mut document, DTO_NAMESPACE, &options.dto_import_path);

        let factory_names: HashSet<String> =
            document.functions().map(|f| f.name.clone()).collect();
        let mut helpers = HelperRegistry::default();
        for helper in [Helper::ObjectId, Helper::EnumPick] {
            if factory_names.contains(helper.function_name()) {
                helpers.mark_emitted(helper);
            }
        }

        Self {
            options,
            document,
            helpers,
            factory_names,
            diagnostics: Vec::new(),
        }
    }

    pub fn options(&self) -> &FactoryOptions {
        &self.options
    }

    /// Generates factories for `schema` under its own name.
    pub fn generate(&mut self, schema: &ModelSchema) {
        self.generate_as(schema, &schema.name);
    }

    pub fn generate_as(&mut self, schema: &ModelSchema, name: &str) {
        self.generate_fields(&schema.fields, name);
    }

    /// Walks the whole tree, then appends helpers that are still missing.
    pub fn generate_fields(&mut self, fields: &SchemaDescription, name: &str) {
        let known = std::mem::take(&mut self.factory_names);
        let session = emit_factories(fields, name, &self.options, known);

        for function in session.functions {
            self.document.add_function(function);
        }
        self.factory_names = session.factory_names;
        self.diagnostics.extend(session.diagnostics);

        for helper in [Helper::ObjectId, Helper::EnumPick] {
            if session.helpers.is_requested(helper) {
                self.helpers.request(helper);
            }
        }
        for helper in self.helpers.take_pending() {
            debug!(helper = helper.function_name(), "emitted helper");
            self.document.add_function(helper.function());
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn helpers(&self) -> &HelperRegistry {
        &self.helpers
    }

    pub fn render(&self) -> String {
        self.document.render()
    }

    pub fn document(&self) -> &SourceDocument {
        &self.document
    }

    pub fn into_document(self) -> SourceDocument {
        self.document
    }
}

fn ensure_namespace_import(document: &mut SourceDocument, alias: &str, module: &str) {
    let existing = document.imports().iter().find(|import| {
        matches!(&import.clause, ImportClause::Namespace(existing) if existing == alias)
    });
    match existing {
        Some(import) if import.module == module => {}
        Some(import) => warn!(
            alias,
            module = %import.module,
            requested = module,
            "namespace alias already imported from another module"
        ),
        None => document.add_import(ImportStatement::namespace(alias, module)),
    }
}
