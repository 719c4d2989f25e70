pub mod ast;
pub mod classify;
pub mod config;
pub mod declaration;
pub mod document;
pub mod error;
pub mod factory;
pub mod imports;
pub mod naming;
pub mod schema;
pub mod type_helpers;

use std::fs;
use std::path::Path;

pub use ast::{
    BaseType, CustomFieldOverride, DeclarationShape, Diagnostic, FieldDescriptor, FieldOptions,
    GeneratedCode, ModelSchema, SchemaBundle, SchemaDescription, TimestampConfig,
};
pub use config::CodegenConfig;
pub use declaration::{DeclarationGenerator, DeclarationOptions};
pub use document::SourceDocument;
pub use error::CodegenError;
pub use factory::{FactoryGenerator, FactoryOptions};
pub use schema::parse_schema_bundle;
pub use type_helpers::render_populate_helpers;

/// Generates declarations for every schema of `bundle` into one document.
pub fn generate_declarations(bundle: &SchemaBundle, options: DeclarationOptions) -> GeneratedCode {
    let mut generator = DeclarationGenerator::new(options);
    for schema in &bundle.schemas {
        generator.generate(schema);
    }
    let code = generator.render();
    GeneratedCode {
        code,
        warnings: generator.diagnostics().to_vec(),
    }
}

/// Generates mock factories for every schema of `bundle` into one document.
pub fn generate_factory_code(bundle: &SchemaBundle, options: FactoryOptions) -> GeneratedCode {
    let mut generator = FactoryGenerator::new(options);
    for schema in &bundle.schemas {
        generator.generate(schema);
    }
    GeneratedCode {
        code: generator.render(),
        warnings: generator.diagnostics().to_vec(),
    }
}

/// Data transfer object declarations (`XDto`) from schema JSON text.
pub fn generate_dto_types(input: &str) -> Result<GeneratedCode, CodegenError> {
    let bundle = parse_schema_bundle(input)?;
    Ok(generate_declarations(&bundle, DeclarationOptions::dto()))
}

/// Model declarations (`XModel`) from schema JSON text.
pub fn generate_model_types(input: &str) -> Result<GeneratedCode, CodegenError> {
    let bundle = parse_schema_bundle(input)?;
    Ok(generate_declarations(&bundle, DeclarationOptions::model()))
}

/// Mock factories from schema JSON text, typed against the module at `dto_import_path`.
pub fn generate_factories(input: &str, dto_import_path: &str) -> Result<GeneratedCode, CodegenError> {
    let bundle = parse_schema_bundle(input)?;
    Ok(generate_factory_code(
        &bundle,
        FactoryOptions::new(dto_import_path),
    ))
}

/// Reads and parses a schema file.
pub fn load_schema_bundle(path: impl AsRef<Path>) -> Result<SchemaBundle, CodegenError> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_schema_bundle(&text)
}

pub fn generate_dto_types_from_path(path: impl AsRef<Path>) -> Result<GeneratedCode, CodegenError> {
    let bundle = load_schema_bundle(path)?;
    Ok(generate_declarations(&bundle, DeclarationOptions::dto()))
}

pub fn generate_model_types_from_path(
    path: impl AsRef<Path>,
) -> Result<GeneratedCode, CodegenError> {
    let bundle = load_schema_bundle(path)?;
    Ok(generate_declarations(&bundle, DeclarationOptions::model()))
}

pub fn generate_factories_from_path(
    path: impl AsRef<Path>,
    dto_import_path: &str,
) -> Result<GeneratedCode, CodegenError> {
    let bundle = load_schema_bundle(path)?;
    Ok(generate_factory_code(
        &bundle,
        FactoryOptions::new(dto_import_path),
    ))
}

#[cfg(test)]
mod tests {
    use super::{generate_dto_types, generate_factories, generate_model_types};

    const REF_SCHEMA: &str = r#"{
      "name": "Test",
      "fields": {
        "owner": { "type": "ObjectId", "options": { "ref": "User" } },
        "status": { "type": "String", "enumValues": ["open", "closed"] }
      }
    }"#;

    #[test]
    fn dto_and_model_profiles_differ_in_references_and_enums() {
        let dto = generate_dto_types(REF_SCHEMA).unwrap().code;
        assert!(dto.contains("owner?: string | Types.ObjectId | UserDto;"));
        assert!(dto.contains("status?: 'open' | 'closed';"));
        assert!(dto.contains("export class TestDto extends Document {"));

        let model = generate_model_types(REF_SCHEMA).unwrap().code;
        assert!(model.starts_with("// This file is created by ts-mongoose-codegen\n\n"));
        assert!(model.contains("import { Types, Document } from 'mongoose';"));
        assert!(model.contains("owner?: string | Types.ObjectId | (UserModel & Document);"));
        assert!(model.contains("status?: string;"));
    }

    #[test]
    fn factories_pick_enum_literals() {
        let code = generate_factories(REF_SCHEMA, "./dto").unwrap().code;
        assert!(code.contains("    owner: mongoObjectId(),"));
        assert!(code.contains("    status: enumPicker(['open', 'closed'])(),"));
    }

    #[test]
    fn invalid_input_is_reported() {
        assert!(generate_dto_types("{").is_err());
    }
}
