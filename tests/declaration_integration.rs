use ts_mongoose_codegen::ast::{TimestampKey, TimestampKeys};
use ts_mongoose_codegen::{
    generate_declarations, generate_dto_types, generate_model_types, parse_schema_bundle,
    BaseType, DeclarationGenerator, DeclarationOptions, DeclarationShape, FieldDescriptor,
    ModelSchema, SchemaDescription, SourceDocument, TimestampConfig,
};

const TEST_SCHEMA: &str = r#"{
  "name": "Test",
  "fields": {
    "name": "String",
    "age": "Number",
    "requiredName": { "type": "String", "options": { "required": true } },
    "nested": {
      "type": "Schema",
      "schema": { "nestedName": "String" }
    }
  }
}"#;

#[test]
fn dto_classes_match_golden_output() {
    let generated = generate_dto_types(TEST_SCHEMA).unwrap();
    assert!(generated.warnings.is_empty());
    assert_eq!(
        generated.code,
        concat!(
            "import { Document } from 'mongoose';\n",
            "\n",
            "export class TestDto extends Document {\n",
            "  name?: string;\n",
            "  age?: number;\n",
            "  requiredName: string;\n",
            "  nested?: TestNestedSubDto;\n",
            "}\n",
            "\n",
            "export class TestNestedSubDto {\n",
            "  nestedName?: string;\n",
            "}\n",
        )
    );
}

#[test]
fn dto_interfaces_match_golden_output() {
    let bundle = parse_schema_bundle(TEST_SCHEMA).unwrap();
    let generated = generate_declarations(
        &bundle,
        DeclarationOptions::dto().with_shape(DeclarationShape::InterfaceLike),
    );
    assert_eq!(
        generated.code,
        concat!(
            "import { Document } from 'mongoose';\n",
            "\n",
            "export interface TestDto extends Document {\n",
            "  name?: string;\n",
            "  age?: number;\n",
            "  requiredName: string;\n",
            "  nested?: TestNestedSubDto;\n",
            "}\n",
            "\n",
            "export interface TestNestedSubDto {\n",
            "  nestedName?: string;\n",
            "}\n",
        )
    );
}

#[test]
fn models_carry_header_and_document_references() {
    let input = r#"{
      "name": "Test",
      "fields": {
        "ref": { "type": "ObjectId", "options": { "ref": "Ref" } },
        "refs": { "type": "ObjectId", "isArray": true, "options": { "ref": "Ref", "required": true } },
        "price": "Decimal128"
      }
    }"#;

    let generated = generate_model_types(input).unwrap();
    assert_eq!(
        generated.code,
        concat!(
            "// This file is created by ts-mongoose-codegen\n",
            "\n",
            "import { Types, Document } from 'mongoose';\n",
            "\n",
            "export class TestModel {\n",
            "  ref?: string | Types.ObjectId | (RefModel & Document);\n",
            "  refs: Array<string> | Array<Types.ObjectId> | Array<(RefModel & Document)>;\n",
            "  price?: Types.Decimal128;\n",
            "}\n",
        )
    );
}

#[test]
fn nested_declaration_count_matches_nested_field_occurrences() {
    let input = r#"{
      "name": "Test",
      "fields": {
        "nestedArr": {
          "type": "Schema",
          "isArray": true,
          "schema": {
            "nestedArr2": {
              "type": "Schema",
              "isArray": true,
              "schema": { "deep": "Boolean" }
            },
            "label": "String"
          }
        },
        "other": { "type": "Schema", "schema": { "deep": "Boolean" } },
        "same": { "type": "Schema", "schema": { "deep": "Boolean" } }
      }
    }"#;

    let code = generate_dto_types(input).unwrap().code;
    let order: Vec<&str> = code
        .lines()
        .filter_map(|line| line.strip_prefix("export class "))
        .map(|rest| rest.split_whitespace().next().unwrap_or_default())
        .collect();
    assert_eq!(
        order,
        vec![
            "TestDto",
            "TestNestedArrSubDto",
            "TestNestedArrSubNestedArr2SubDto",
            "TestOtherSubDto",
            "TestSameSubDto",
        ]
    );
    assert!(code.contains("  nestedArr?: Array<TestNestedArrSubDto>;\n"));
    assert!(code.contains("  nestedArr2?: Array<TestNestedArrSubNestedArr2SubDto>;\n"));
}

#[test]
fn timestamps_follow_the_schema_option() {
    let fields = SchemaDescription::new().field(FieldDescriptor::new("title", BaseType::String));

    let enabled = ModelSchema::new("Post", fields.clone()).with_timestamps(TimestampConfig::Enabled(true));
    let mut generator = DeclarationGenerator::new(
        DeclarationOptions::model().with_shape(DeclarationShape::InterfaceLike),
    );
    generator.generate(&enabled);
    let code = generator.render();
    assert!(code.contains("  title?: string;\n  createdAt?: Date;\n  updatedAt?: Date;\n}"));

    let renamed = ModelSchema::new("Post", fields).with_timestamps(TimestampConfig::PerKey(
        TimestampKeys {
            created_at: Some(TimestampKey::Named("created_at".to_string())),
            updated_at: Some(TimestampKey::Enabled(false)),
        },
    ));
    let mut generator = DeclarationGenerator::new(DeclarationOptions::dto());
    generator.generate(&renamed);
    let code = generator.render();
    assert!(code.contains("  created_at?: Date;\n}"));
    assert!(!code.contains("updatedAt"));
}

#[test]
fn timestamps_parse_from_json() {
    let input = r#"{
      "name": "Post",
      "timestamps": { "createdAt": "created_at", "updatedAt": false },
      "fields": { "title": "String" }
    }"#;
    let code = generate_dto_types(input).unwrap().code;
    assert!(code.contains("  title?: string;\n  created_at?: Date;\n}"));
}

#[test]
fn multiple_schemas_share_one_document_and_import() {
    let input = r#"{
      "schemas": [
        { "name": "Test", "fields": { "ref": { "type": "ObjectId", "options": { "ref": "Ref" } } } },
        { "name": "Ref", "fields": { "name": "String" } }
      ]
    }"#;

    let code = generate_dto_types(input).unwrap().code;
    assert_eq!(
        code,
        concat!(
            "import { Document, Types } from 'mongoose';\n",
            "\n",
            "export class TestDto extends Document {\n",
            "  ref?: string | Types.ObjectId | RefDto;\n",
            "}\n",
            "\n",
            "export class RefDto extends Document {\n",
            "  name?: string;\n",
            "}\n",
        )
    );
}

#[test]
fn generators_can_share_an_existing_document() {
    let mut document = SourceDocument::new("types.ts");
    document.add_header_comment("shared output");

    let schema = ModelSchema::new(
        "Test",
        SchemaDescription::new().field(FieldDescriptor::new("flag", BaseType::Boolean)),
    );
    let mut generator = DeclarationGenerator::with_document(DeclarationOptions::model(), document);
    generator.generate_as(&schema, "Renamed");
    let document = generator.into_document();

    assert_eq!(document.file_name(), "types.ts");
    assert_eq!(
        document.render(),
        "// shared output\n\nexport class RenamedModel {\n  flag?: boolean;\n}\n"
    );
}

#[test]
fn unknown_field_types_fall_back_to_any_with_warning() {
    let input = r#"{ "name": "Geo", "fields": { "point": "Point", "tags": { "type": "Point", "isArray": true } } }"#;
    let generated = generate_dto_types(input).unwrap();
    assert!(generated.code.contains("  point?: any;\n  tags?: Array<any>;\n"));
    assert_eq!(generated.warnings.len(), 2);
    assert_eq!(generated.warnings[0].path, "Geo.point");
    assert_eq!(generated.warnings[0].type_name, "Point");
}
