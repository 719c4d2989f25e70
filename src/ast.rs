//! Public schema and output model used by the generators.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Base type of a single schema field, as reported by the ORM schema parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseType {
    Boolean,
    Number,
    String,
    Date,
    /// Opaque primary key / reference type (`ObjectID`).
    Identifier,
    /// Embedded sub-schema; the field carries its own [`SchemaDescription`].
    NestedSchema,
    Mixed,
    /// Raw bytes (`Buffer`).
    Binary,
    MapLike,
    /// High precision decimal (`Decimal128`).
    Decimal,
    /// Any type name the generators do not know. Keeps the raw spelling.
    Unknown(String),
}

impl BaseType {
    /// Maps an ORM type name onto a base type.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Boolean" => Self::Boolean,
            "Number" => Self::Number,
            "String" => Self::String,
            "Date" => Self::Date,
            "ObjectID" | "ObjectId" => Self::Identifier,
            "Schema" | "Embedded" => Self::NestedSchema,
            "Mixed" => Self::Mixed,
            "Buffer" => Self::Binary,
            "Map" => Self::MapLike,
            "Decimal128" => Self::Decimal,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Canonical ORM spelling of this type.
    pub fn name(&self) -> &str {
        match self {
            Self::Boolean => "Boolean",
            Self::Number => "Number",
            Self::String => "String",
            Self::Date => "Date",
            Self::Identifier => "ObjectID",
            Self::NestedSchema => "Schema",
            Self::Mixed => "Mixed",
            Self::Binary => "Buffer",
            Self::MapLike => "Map",
            Self::Decimal => "Decimal128",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for BaseType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for BaseType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Option block attached to a field definition.
pub struct FieldOptions {
    /// Whether the field must be present.
    #[serde(default)]
    pub required: bool,
    /// Name of the schema a reference field points at.
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_target: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// One field of a schema description.
pub struct FieldDescriptor {
    /// Property name as written in the schema.
    pub key: String,
    pub base_type: BaseType,
    pub is_array: bool,
    /// Allowed literal values for string enums.
    pub enum_values: Option<Vec<String>>,
    /// Option block; `None` when the field was declared without one.
    pub options: Option<FieldOptions>,
    /// Fields of the embedded schema for [`BaseType::NestedSchema`].
    pub schema: Option<SchemaDescription>,
}

impl FieldDescriptor {
    /// Creates a scalar field without an option block.
    pub fn new(key: impl Into<String>, base_type: BaseType) -> Self {
        Self {
            key: key.into(),
            base_type,
            is_array: false,
            enum_values: None,
            options: None,
            schema: None,
        }
    }

    /// Creates an embedded sub-schema field.
    pub fn nested(key: impl Into<String>, schema: SchemaDescription) -> Self {
        Self {
            schema: Some(schema),
            ..Self::new(key, BaseType::NestedSchema)
        }
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Attaches an (empty) option block.
    pub fn with_options(mut self) -> Self {
        self.options.get_or_insert_with(FieldOptions::default);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.options.get_or_insert_with(FieldOptions::default).required = required;
        self
    }

    pub fn reference(mut self, target: impl Into<String>) -> Self {
        self.options.get_or_insert_with(FieldOptions::default).ref_target = Some(target.into());
        self
    }

    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// `true` only when an option block exists and marks the field required.
    pub fn is_required(&self) -> bool {
        self.options.as_ref().map(|o| o.required).unwrap_or(false)
    }

    pub fn is_optional(&self) -> bool {
        !self.is_required()
    }

    pub fn ref_target(&self) -> Option<&str> {
        self.options.as_ref().and_then(|o| o.ref_target.as_deref())
    }
}

/// Field definition as it appears in JSON input: either a bare type name or a full body.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Shorthand(BaseType),
    Full(FieldBody),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FieldBody {
    #[serde(rename = "type")]
    base_type: BaseType,
    #[serde(default)]
    is_array: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<FieldOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema: Option<SchemaDescription>,
}

impl RawField {
    fn into_field(self, key: String) -> FieldDescriptor {
        match self {
            Self::Shorthand(base_type) => FieldDescriptor::new(key, base_type),
            Self::Full(body) => FieldDescriptor {
                key,
                base_type: body.base_type,
                is_array: body.is_array,
                enum_values: body.enum_values,
                options: body.options,
                schema: body.schema,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Ordered field key → descriptor mapping.
///
/// Order is significant: it drives property order and nested emission order.
/// JSON input keeps the document order of the object keys.
pub struct SchemaDescription {
    fields: Vec<FieldDescriptor>,
}

impl SchemaDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, builder style.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push(&mut self, field: FieldDescriptor) {
        self.fields.push(field);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldDescriptor> for SchemaDescription {
    fn from_iter<T: IntoIterator<Item = FieldDescriptor>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SchemaDescription {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl Serialize for SchemaDescription {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            let body = FieldBody {
                base_type: field.base_type.clone(),
                is_array: field.is_array,
                enum_values: field.enum_values.clone(),
                options: field.options.clone(),
                schema: field.schema.clone(),
            };
            map.serialize_entry(&field.key, &body)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SchemaDescription {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = SchemaDescription;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of field names to field definitions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, raw)) = access.next_entry::<String, RawField>()? {
                    fields.push(raw.into_field(key));
                }
                Ok(SchemaDescription { fields })
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// Schema-level timestamp configuration (`timestamps` schema option).
pub enum TimestampConfig {
    /// `timestamps: true` / `timestamps: false`.
    Enabled(bool),
    /// `timestamps: { createdAt: ..., updatedAt: ... }`.
    PerKey(TimestampKeys),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TimestampKeys {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<TimestampKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<TimestampKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// Per-key timestamp setting: toggled, or renamed.
pub enum TimestampKey {
    Enabled(bool),
    Named(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Resolved created-at / updated-at property names.
pub struct TimestampPolicy {
    pub created_at_field: Option<String>,
    pub updated_at_field: Option<String>,
}

impl TimestampPolicy {
    /// Property names to append, created-at first.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.created_at_field
            .as_deref()
            .into_iter()
            .chain(self.updated_at_field.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// A named top-level schema together with its schema-level options.
pub struct ModelSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<TimestampConfig>,
    pub fields: SchemaDescription,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>, fields: SchemaDescription) -> Self {
        Self {
            name: name.into(),
            timestamps: None,
            fields,
        }
    }

    pub fn with_timestamps(mut self, timestamps: TimestampConfig) -> Self {
        self.timestamps = Some(timestamps);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// Input file contents: schemas generated in order into one document.
pub struct SchemaBundle {
    pub schemas: Vec<ModelSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Factory-only replacement of the generated value for a field.
pub struct CustomFieldOverride {
    pub field_name: String,
    /// When set, the field's base type must match too.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub match_base_type: Option<BaseType>,
    /// TypeScript expression used verbatim.
    pub value: String,
}

impl CustomFieldOverride {
    pub fn new(field_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            match_base_type: None,
            value: value.into(),
        }
    }

    pub fn with_type(mut self, base_type: BaseType) -> Self {
        self.match_base_type = Some(base_type);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Output shape of a declaration.
pub enum DeclarationShape {
    /// `export class Name { ... }`
    #[default]
    #[serde(rename = "class")]
    ClassLike,
    /// `export interface Name { ... }`
    #[serde(rename = "interface")]
    InterfaceLike,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Single property line of a declaration.
pub struct Property {
    pub name: String,
    pub type_expression: String,
    pub optional: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, type_expression: impl Into<String>, optional: bool) -> Self {
        Self {
            name: name.into(),
            type_expression: type_expression.into(),
            optional,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Exported class or interface produced for one schema node.
pub struct GeneratedDeclaration {
    pub name: String,
    pub shape: DeclarationShape,
    /// Base type the declaration extends, if any.
    pub extends: Option<String>,
    pub properties: Vec<Property>,
}

impl GeneratedDeclaration {
    pub fn new(name: impl Into<String>, shape: DeclarationShape) -> Self {
        Self {
            name: name.into(),
            shape,
            extends: None,
            properties: Vec::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub type_expression: String,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Function statement; `body` lines are relative to the function body indentation.
pub struct GeneratedFunction {
    pub name: String,
    pub exported: bool,
    pub type_parameters: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub body: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Non-fatal finding reported while generating (for example an unsupported field type).
pub struct Diagnostic {
    /// Dotted path of the field, rooted at the schema name.
    pub path: String,
    pub type_name: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.path, self.type_name, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Rendered output of a generation run.
pub struct GeneratedCode {
    /// Complete TypeScript text.
    pub code: String,
    /// Non-fatal diagnostics collected during generation.
    pub warnings: Vec<Diagnostic>,
}
