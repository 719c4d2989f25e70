//! In-memory TypeScript source document and its renderer.
//!
//! The generators only append to a document; nothing is removed or rewritten.
//! Rendering is deterministic: two-space indentation, single quotes, imports
//! before all other statements, one blank line between statements.

use std::sync::OnceLock;

use regex::Regex;

use crate::ast::{DeclarationShape, GeneratedDeclaration, GeneratedFunction, Parameter, Property};

const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportClause {
    /// `import { A, B } from 'module';`
    Named(Vec<String>),
    /// `import * as alias from 'module';`
    Namespace(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    pub module: String,
    pub clause: ImportClause,
}

impl ImportStatement {
    pub fn named(module: impl Into<String>, names: Vec<String>) -> Self {
        Self {
            module: module.into(),
            clause: ImportClause::Named(names),
        }
    }

    pub fn namespace(alias: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            clause: ImportClause::Namespace(alias.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Declaration(GeneratedDeclaration),
    Function(GeneratedFunction),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Output document shared by one or more generator calls.
pub struct SourceDocument {
    file_name: String,
    header: Vec<String>,
    imports: Vec<ImportStatement>,
    statements: Vec<Statement>,
}

impl SourceDocument {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    /// Label of the file this document is written to.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Adds a `//` comment line at the top of the file.
    pub fn add_header_comment(&mut self, text: impl Into<String>) {
        self.header.push(text.into());
    }

    pub fn add_import(&mut self, import: ImportStatement) {
        self.imports.push(import);
    }

    pub fn add_declaration(&mut self, declaration: GeneratedDeclaration) {
        self.statements.push(Statement::Declaration(declaration));
    }

    pub fn add_function(&mut self, function: GeneratedFunction) {
        self.statements.push(Statement::Function(function));
    }

    pub fn imports(&self) -> &[ImportStatement] {
        &self.imports
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn declarations(&self) -> impl Iterator<Item = &GeneratedDeclaration> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Declaration(d) => Some(d),
            Statement::Function(_) => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &GeneratedFunction> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Function(f) => Some(f),
            Statement::Declaration(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.imports.is_empty() && self.statements.is_empty()
    }

    /// Renders the full file text.
    pub fn render(&self) -> String {
        let mut blocks = Vec::new();

        if !self.header.is_empty() {
            let lines: Vec<String> = self.header.iter().map(|c| format!("// {c}")).collect();
            blocks.push(lines.join("\n"));
        }
        if !self.imports.is_empty() {
            let lines: Vec<String> = self.imports.iter().map(render_import).collect();
            blocks.push(lines.join("\n"));
        }
        for statement in &self.statements {
            blocks.push(match statement {
                Statement::Declaration(d) => render_declaration(d),
                Statement::Function(f) => render_function(f),
            });
        }

        if blocks.is_empty() {
            return String::new();
        }
        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }
}

fn render_import(import: &ImportStatement) -> String {
    let module = quote_literal(&import.module);
    match &import.clause {
        ImportClause::Named(names) => format!("import {{ {} }} from {module};", names.join(", ")),
        ImportClause::Namespace(alias) => format!("import * as {alias} from {module};"),
    }
}

fn render_declaration(declaration: &GeneratedDeclaration) -> String {
    let keyword = match declaration.shape {
        DeclarationShape::ClassLike => "class",
        DeclarationShape::InterfaceLike => "interface",
    };

    let mut out = format!("export {keyword} {}", declaration.name);
    if let Some(base) = &declaration.extends {
        out.push_str(&format!(" extends {base}"));
    }
    out.push_str(" {\n");
    for property in &declaration.properties {
        out.push_str(INDENT);
        out.push_str(&render_property(property));
        out.push('\n');
    }
    out.push('}');
    out
}

fn render_property(property: &Property) -> String {
    let optional_suffix = if property.optional { "?" } else { "" };
    format!(
        "{}{optional_suffix}: {};",
        render_property_name(&property.name),
        property.type_expression
    )
}

fn render_function(function: &GeneratedFunction) -> String {
    let mut out = String::new();
    if function.exported {
        out.push_str("export ");
    }
    out.push_str("function ");
    out.push_str(&function.name);
    if !function.type_parameters.is_empty() {
        out.push_str(&format!("<{}>", function.type_parameters.join(", ")));
    }

    let params: Vec<String> = function.parameters.iter().map(render_parameter).collect();
    out.push_str(&format!("({})", params.join(", ")));
    if let Some(return_type) = &function.return_type {
        out.push_str(&format!(": {return_type}"));
    }
    out.push_str(" {\n");
    for line in &function.body {
        if !line.is_empty() {
            out.push_str(INDENT);
            out.push_str(line);
        }
        out.push('\n');
    }
    out.push('}');
    out
}

fn render_parameter(param: &Parameter) -> String {
    let optional_suffix = if param.optional { "?" } else { "" };
    format!("{}{optional_suffix}: {}", param.name, param.type_expression)
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid regex"))
}

/// Property names that are not plain identifiers are emitted as string literals.
pub fn render_property_name(raw: &str) -> String {
    if identifier_regex().is_match(raw) {
        raw.to_string()
    } else {
        quote_literal(raw)
    }
}

/// Single-quoted TypeScript string literal.
pub fn quote_literal(raw: &str) -> String {
    format!("'{}'", raw.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
    use super::{quote_literal, render_property_name, ImportStatement, SourceDocument};
    use crate::ast::{
        DeclarationShape, GeneratedDeclaration, GeneratedFunction, Parameter, Property,
    };

    #[test]
    fn renders_empty_document_as_empty_text() {
        assert_eq!(SourceDocument::new("tmp.ts").render(), "");
    }

    #[test]
    fn renders_imports_before_statements() {
        let mut doc = SourceDocument::new("tmp.ts");
        let mut decl = GeneratedDeclaration::new("ADto", DeclarationShape::InterfaceLike);
        decl.extends = Some("Document".to_string());
        decl.properties.push(Property::new("name", "string", true));
        decl.properties.push(Property::new("count", "number", false));
        doc.add_declaration(decl);
        doc.add_import(ImportStatement::named(
            "mongoose",
            vec!["Document".to_string(), "Types".to_string()],
        ));

        assert_eq!(
            doc.render(),
            "import { Document, Types } from 'mongoose';\n\n\
             export interface ADto extends Document {\n  name?: string;\n  count: number;\n}\n"
        );
    }

    #[test]
    fn renders_functions_with_indented_body() {
        let mut doc = SourceDocument::new("tmp.ts");
        doc.add_header_comment("generated");
        doc.add_import(ImportStatement::namespace("faker", "faker"));
        doc.add_function(GeneratedFunction {
            name: "pick".to_string(),
            exported: false,
            type_parameters: vec!["T".to_string()],
            parameters: vec![Parameter {
                name: "values".to_string(),
                type_expression: "T[]".to_string(),
                optional: false,
            }],
            return_type: Some("T".to_string()),
            body: vec!["return values[0]".to_string()],
        });

        assert_eq!(
            doc.render(),
            "// generated\n\nimport * as faker from 'faker';\n\n\
             function pick<T>(values: T[]): T {\n  return values[0]\n}\n"
        );
    }

    #[test]
    fn quotes_non_identifier_property_names() {
        assert_eq!(render_property_name("kebab-case"), "'kebab-case'");
        assert_eq!(render_property_name("_id"), "_id");
        assert_eq!(render_property_name("type"), "type");
        assert_eq!(quote_literal("it's"), "'it\\'s'");
    }

    #[test]
    fn empty_declarations_render_braces_on_separate_lines() {
        let mut doc = SourceDocument::new("tmp.ts");
        doc.add_declaration(GeneratedDeclaration::new("EmptyDto", DeclarationShape::ClassLike));
        assert_eq!(doc.render(), "export class EmptyDto {\n}\n");
    }
}
