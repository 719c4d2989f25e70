//! Type declarations (DTOs and models) from schema descriptions.
//!
//! Emission is depth-first: a schema node's declaration comes first, followed
//! by the complete subtree of its first nested field, then of its second, and
//! so on. Self-referencing schemas recurse without bound; callers must not
//! pass cyclic descriptions.

use tracing::debug;

use crate::ast::{
    BaseType, DeclarationShape, Diagnostic, GeneratedDeclaration, ModelSchema, Property,
    SchemaDescription, TimestampConfig, TimestampPolicy,
};
use crate::classify::{classify_type, identifier_type, ReferenceStyle, DOCUMENT_IMPORT, TYPES_IMPORT};
use crate::document::SourceDocument;
use crate::imports::{ImportTracker, DEFAULT_IMPORT_MODULE};
use crate::naming::{declaration_name, sub_schema_name};
use crate::schema::resolve_timestamp_policy;

const DEFAULT_FILE_NAME: &str = "tmp.ts";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Settings for one declaration generator.
pub struct DeclarationOptions {
    pub shape: DeclarationShape,
    /// Appended to every declaration name (`Dto`, `Model`).
    pub suffix: String,
    /// Render string enums as unions of their literals.
    pub string_enum_union: bool,
    pub reference_style: ReferenceStyle,
    /// Top-level declarations extend `Document`.
    pub extend_document: bool,
    /// Sub-declarations get an optional `_id` identifier property.
    pub sub_document_id: bool,
    /// Module auxiliary types are imported from.
    pub import_module: String,
    pub file_name: String,
    /// Comment placed at the top of newly created documents.
    pub header: Option<String>,
}

impl DeclarationOptions {
    /// Data transfer objects: `XDto`, literal enum unions, plain populated references.
    pub fn dto() -> Self {
        Self {
            shape: DeclarationShape::ClassLike,
            suffix: "Dto".to_string(),
            string_enum_union: true,
            reference_style: ReferenceStyle::Plain,
            extend_document: true,
            sub_document_id: false,
            import_module: DEFAULT_IMPORT_MODULE.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            header: None,
        }
    }

    /// Model typings: `XModel`, references intersected with `Document`.
    pub fn model() -> Self {
        Self {
            shape: DeclarationShape::ClassLike,
            suffix: "Model".to_string(),
            string_enum_union: false,
            reference_style: ReferenceStyle::DocumentIntersection,
            extend_document: false,
            sub_document_id: false,
            import_module: DEFAULT_IMPORT_MODULE.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            header: Some("This file is created by ts-mongoose-codegen".to_string()),
        }
    }

    pub fn with_shape(mut self, shape: DeclarationShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_string_enum_union(mut self, enabled: bool) -> Self {
        self.string_enum_union = enabled;
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

impl Default for DeclarationOptions {
    fn default() -> Self {
        Self::dto()
    }
}

#[derive(Debug, Default)]
/// Everything one top-level generation produced, in emission order.
pub struct DeclarationSession {
    pub declarations: Vec<GeneratedDeclaration>,
    /// Auxiliary imports requested anywhere in the tree.
    pub imports: ImportTracker,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Clone, Copy)]
enum NodeKind<'a> {
    Root(&'a TimestampPolicy),
    Sub,
}

/// Walks one top-level schema and returns its declarations plus side requests.
pub fn emit_declarations(
    fields: &SchemaDescription,
    name: &str,
    timestamps: Option<&TimestampConfig>,
    options: &DeclarationOptions,
) -> DeclarationSession {
    let mut session = DeclarationSession {
        imports: ImportTracker::new(options.import_module.clone()),
        ..DeclarationSession::default()
    };
    let policy = resolve_timestamp_policy(timestamps);
    let declarations = emit_node(fields, name, NodeKind::Root(&policy), options, &mut session);
    session.declarations = declarations;
    session
}

fn emit_node(
    fields: &SchemaDescription,
    name: &str,
    kind: NodeKind<'_>,
    options: &DeclarationOptions,
    session: &mut DeclarationSession,
) -> Vec<GeneratedDeclaration> {
    let mut declaration = GeneratedDeclaration::new(declaration_name(name, &options.suffix), options.shape);
    let mut subtrees = Vec::new();

    match kind {
        NodeKind::Root(_) if options.extend_document => {
            declaration.extends = Some(DOCUMENT_IMPORT.to_string());
            session.imports.register(DOCUMENT_IMPORT);
        }
        NodeKind::Sub if options.sub_document_id => {
            declaration
                .properties
                .push(Property::new("_id", identifier_type().to_string(), true));
            session.imports.register(TYPES_IMPORT);
        }
        _ => {}
    }

    for field in fields {
        if field.base_type == BaseType::NestedSchema {
            let sub_name = sub_schema_name(name, &field.key);
            let empty = SchemaDescription::new();
            let sub_fields = field.schema.as_ref().unwrap_or(&empty);
            subtrees.extend(emit_node(sub_fields, &sub_name, NodeKind::Sub, options, session));
        }

        let classified = classify_type(field, name, options);
        for import in classified.imports {
            session.imports.register(import);
        }
        if let Some(diagnostic) = classified.diagnostic {
            session.diagnostics.push(diagnostic);
        }
        declaration.properties.push(Property::new(
            field.key.clone(),
            classified.expression.to_string(),
            field.is_optional(),
        ));
    }

    if let NodeKind::Root(policy) = kind {
        for timestamp in policy.fields() {
            declaration
                .properties
                .push(Property::new(timestamp, "Date", true));
        }
    }

    debug!(
        declaration = %declaration.name,
        properties = declaration.properties.len(),
        nested = subtrees.len(),
        "emitted declaration"
    );

    let mut out = Vec::with_capacity(1 + subtrees.len());
    out.push(declaration);
    out.extend(subtrees);
    out
}

#[derive(Debug)]
/// Appends declarations for one or more schemas to a shared document.
///
/// Auxiliary imports accumulate across `generate` calls and are flushed into
/// the document as a single statement the next time the output is read.
pub struct DeclarationGenerator {
    options: DeclarationOptions,
    document: SourceDocument,
    imports: ImportTracker,
    diagnostics: Vec<Diagnostic>,
}

impl DeclarationGenerator {
    pub fn new(options: DeclarationOptions) -> Self {
        let mut document = SourceDocument::new(options.file_name.clone());
        if let Some(header) = &options.header {
            document.add_header_comment(header.clone());
        }
        Self::with_document(options, document)
    }

    /// Generates into an existing document instead of a fresh one.
    pub fn with_document(options: DeclarationOptions, document: SourceDocument) -> Self {
        Self {
            imports: ImportTracker::new(options.import_module.clone()),
            options,
            document,
            diagnostics: Vec::new(),
        }
    }

    pub fn options(&self) -> &DeclarationOptions {
        &self.options
    }

    /// Generates declarations for `schema` under its own name.
    pub fn generate(&mut self, schema: &ModelSchema) {
        self.generate_as(schema, &schema.name);
    }

    /// Generates declarations for `schema` rooted at `name`.
    pub fn generate_as(&mut self, schema: &ModelSchema, name: &str) {
        self.generate_fields(&schema.fields, name, schema.timestamps.as_ref());
    }

    pub fn generate_fields(
        &mut self,
        fields: &SchemaDescription,
        name: &str,
        timestamps: Option<&TimestampConfig>,
    ) {
        let session = emit_declarations(fields, name, timestamps, &self.options);
        for declaration in session.declarations {
            self.document.add_declaration(declaration);
        }
        self.imports.absorb(session.imports);
        self.diagnostics.extend(session.diagnostics);
    }

    /// Imports requested since the last flush.
    pub fn pending_imports(&self) -> &ImportTracker {
        &self.imports
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Flushes pending imports and renders the full document text.
    pub fn render(&mut self) -> String {
        self.flush_imports();
        self.document.render()
    }

    /// Flushes pending imports and returns the underlying document.
    pub fn document(&mut self) -> &SourceDocument {
        self.flush_imports();
        &self.document
    }

    pub fn into_document(mut self) -> SourceDocument {
        self.flush_imports();
        self.document
    }

    fn flush_imports(&mut self) {
        if let Some(statement) = self.imports.flush() {
            self.document.add_import(statement);
        }
    }
}
