use ts_mongoose_codegen::factory::Randomizers;
use ts_mongoose_codegen::{
    generate_factories, generate_factory_code, parse_schema_bundle, BaseType, CustomFieldOverride,
    DeclarationGenerator, DeclarationOptions, FactoryGenerator, FactoryOptions, FieldDescriptor,
    ModelSchema, SchemaDescription,
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
fn factories_match_golden_output() {
    let generated = generate_factories(TEST_SCHEMA, "./dto").unwrap();
    assert!(generated.warnings.is_empty());
    assert_eq!(
        generated.code,
        concat!(
            "import * as faker from 'faker';\n",
            "import * as dto from './dto';\n",
            "\n",
            "export function testFactory(initial?: Partial<dto.TestDto>): dto.TestDto {\n",
            "  const mock: dto.TestDto = {\n",
            "    name: faker.lorem.word(),\n",
            "    age: faker.random.number(),\n",
            "    requiredName: faker.lorem.word(),\n",
            "    nested: testNestedSubFactory(),\n",
            "  }\n",
            "  return { ...mock, ...initial }\n",
            "}\n",
            "\n",
            "function testNestedSubFactory(initial?: Partial<dto.TestNestedSubDto>): dto.TestNestedSubDto {\n",
            "  const mock: dto.TestNestedSubDto = {\n",
            "    nestedName: faker.lorem.word(),\n",
            "  }\n",
            "  return { ...mock, ...initial }\n",
            "}\n",
        )
    );
}

#[test]
fn helpers_are_appended_after_the_first_schema_that_needs_them() {
    let input = r#"{
      "schemas": [
        {
          "name": "Test",
          "fields": {
            "owner": { "type": "ObjectId", "options": { "ref": "User" } },
            "kinds": { "type": "String", "isArray": true, "enumValues": ["a", "b"] },
            "createdOn": "Date",
            "active": "Boolean"
          }
        },
        { "name": "User", "fields": { "friends": { "type": "ObjectId", "isArray": true } } }
      ]
    }"#;

    let code = generate_factories(input, "../types").unwrap().code;
    assert!(code.contains("import * as dto from '../types';"));
    assert!(code.contains("    owner: mongoObjectId(),\n"));
    assert!(code.contains("    kinds: [enumPicker(['a', 'b'])()],\n"));
    assert!(code.contains("    createdOn: faker.date.recent(),\n"));
    assert!(code.contains("    active: faker.random.boolean(),\n"));
    assert!(code.contains("    friends: [mongoObjectId()],\n"));

    assert_eq!(code.matches("function mongoObjectId(): string {").count(), 1);
    assert_eq!(code.matches("function enumPicker<T>(values: T[]): () => T {").count(), 1);

    let object_id = code.find("function mongoObjectId(").unwrap();
    let enum_pick = code.find("function enumPicker<T>(").unwrap();
    let user = code.find("export function userFactory(").unwrap();
    assert!(object_id < enum_pick);
    assert!(enum_pick < user);
    assert!(code.contains("  return () => values[Math.floor(Math.random() * values.length)]\n"));
}

#[test]
fn custom_overrides_replace_values_verbatim() {
    let bundle = parse_schema_bundle(TEST_SCHEMA).unwrap();
    let options = FactoryOptions::new("./dto")
        .with_override(CustomFieldOverride::new("name", "'fixed'").with_type(BaseType::String))
        .with_override(CustomFieldOverride::new("age", "'ignored'").with_type(BaseType::String))
        .with_override(CustomFieldOverride::new("nested", "{ nestedName: 'x' }"));

    let code = generate_factory_code(&bundle, options).code;
    assert!(code.contains("    name: 'fixed',\n"));
    assert!(code.contains("    age: faker.random.number(),\n"));
    assert!(code.contains("    nested: { nestedName: 'x' },\n"));
    assert!(!code.contains("testNestedSubFactory"));
}

#[test]
fn unsupported_values_are_left_out_of_the_mock() {
    let schema = ModelSchema::new(
        "Test",
        SchemaDescription::new()
            .field(FieldDescriptor::new("meta", BaseType::Mixed))
            .field(FieldDescriptor::new("geo", BaseType::from_name("Point")))
            .field(FieldDescriptor::new("title", BaseType::String)),
    );
    let mut generator = FactoryGenerator::new(FactoryOptions::new("./dto"));
    generator.generate(&schema);

    let code = generator.render();
    assert!(!code.contains("meta:"));
    assert!(!code.contains("geo:"));
    assert!(code.contains("    title: faker.lorem.word(),\n"));
    assert_eq!(generator.diagnostics().len(), 1);
}

#[test]
fn randomizers_can_be_replaced() {
    let bundle = parse_schema_bundle(r#"{ "name": "A", "fields": { "n": "Number" } }"#).unwrap();
    let mut options = FactoryOptions::new("./dto");
    options.randomizers = Randomizers {
        number: "faker.datatype.number()".to_string(),
        ..Randomizers::default()
    };

    let code = generate_factory_code(&bundle, options).code;
    assert!(code.contains("    n: faker.datatype.number(),\n"));
}

#[test]
fn factories_can_follow_declarations_in_one_document() {
    let schema = ModelSchema::new(
        "Test",
        SchemaDescription::new().field(FieldDescriptor::new("name", BaseType::String)),
    );
    let mut declarations = DeclarationGenerator::new(DeclarationOptions::dto());
    declarations.generate(&schema);

    let mut factories =
        FactoryGenerator::with_document(FactoryOptions::new("./dto"), declarations.into_document());
    factories.generate(&schema);
    let code = factories.render();

    assert!(code.starts_with(
        "import { Document } from 'mongoose';\nimport * as faker from 'faker';\nimport * as dto from './dto';\n\n"
    ));
    let class = code.find("export class TestDto").unwrap();
    let factory = code.find("export function testFactory(").unwrap();
    assert!(class < factory);
}

#[test]
fn non_identifier_keys_are_quoted_like_the_declarations() {
    let input = r#"{ "name": "Person", "fields": { "first-name": "String", "age": "Number" } }"#;

    let dto = ts_mongoose_codegen::generate_dto_types(input).unwrap().code;
    assert!(dto.contains("  'first-name'?: string;\n"));

    let code = generate_factories(input, "./dto").unwrap().code;
    assert!(code.contains("    'first-name': faker.lorem.word(),\n"));
    assert!(code.contains("    age: faker.random.number(),\n"));
}
