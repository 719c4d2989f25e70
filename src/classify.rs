//! Field classification: one field descriptor to a TypeScript type expression,
//! or to a mock value expression for factories.
//!
//! Both dispatchers are pure. Side requests (imports, helpers, diagnostics)
//! are returned to the caller, which merges them into its generation session.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ast::{BaseType, Diagnostic, FieldDescriptor};
use crate::declaration::DeclarationOptions;
use crate::document::quote_literal;
use crate::factory::{FactoryOptions, Helper};
use crate::naming::{declaration_name, factory_name, sub_schema_name};

/// Type used for anything without a more precise mapping.
pub const FALLBACK_TYPE: &str = "any";
/// Import that provides `Types.ObjectId` and `Types.Decimal128`.
pub const TYPES_IMPORT: &str = "Types";
/// Import that provides the document capability type.
pub const DOCUMENT_IMPORT: &str = "Document";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Type expression made of one or more union alternatives.
pub struct TypeExpr {
    alternatives: Vec<String>,
}

impl TypeExpr {
    pub fn single(ty: impl Into<String>) -> Self {
        Self {
            alternatives: vec![ty.into()],
        }
    }

    pub fn union<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            alternatives: alternatives.into_iter().map(Into::into).collect(),
        }
    }

    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    /// Wraps every alternative in `Array<...>`; the joined union is never wrapped as a whole.
    pub fn wrap_array(self, is_array: bool) -> Self {
        if !is_array {
            return self;
        }
        Self {
            alternatives: self
                .alternatives
                .into_iter()
                .map(|alt| format!("Array<{alt}>"))
                .collect(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.alternatives.join(" | "))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// How a populated reference alternative is spelled.
pub enum ReferenceStyle {
    /// `RefDto`
    #[default]
    Plain,
    /// `(RefModel & Document)`
    DocumentIntersection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedType {
    pub expression: TypeExpr,
    pub imports: Vec<&'static str>,
    pub diagnostic: Option<Diagnostic>,
}

impl ClassifiedType {
    fn plain(expression: TypeExpr) -> Self {
        Self {
            expression,
            imports: Vec::new(),
            diagnostic: None,
        }
    }
}

/// `string | Types.ObjectId`, the unpopulated identifier type.
pub fn identifier_type() -> TypeExpr {
    TypeExpr::union(["string", "Types.ObjectId"])
}

/// Maps a field of schema node `parent` to its declaration type.
///
/// For [`BaseType::NestedSchema`] the result names the sub-declaration; the
/// caller is responsible for emitting it.
pub fn classify_type(
    field: &FieldDescriptor,
    parent: &str,
    options: &DeclarationOptions,
) -> ClassifiedType {
    let classified = match &field.base_type {
        BaseType::Boolean | BaseType::Number | BaseType::String => {
            match string_enum_literals(field, options) {
                Some(literals) => ClassifiedType::plain(TypeExpr::union(literals)),
                None => ClassifiedType::plain(TypeExpr::single(
                    field.base_type.name().to_ascii_lowercase(),
                )),
            }
        }
        BaseType::Date => ClassifiedType::plain(TypeExpr::single("Date")),
        BaseType::Identifier => classify_identifier(field, options),
        BaseType::NestedSchema => {
            let sub_name = sub_schema_name(parent, &field.key);
            ClassifiedType::plain(TypeExpr::single(declaration_name(
                &sub_name,
                &options.suffix,
            )))
        }
        BaseType::Mixed | BaseType::MapLike => {
            ClassifiedType::plain(TypeExpr::single(FALLBACK_TYPE))
        }
        BaseType::Binary => ClassifiedType::plain(TypeExpr::single("Buffer")),
        BaseType::Decimal => ClassifiedType {
            expression: TypeExpr::single("Types.Decimal128"),
            imports: vec![TYPES_IMPORT],
            diagnostic: None,
        },
        BaseType::Unknown(raw) => ClassifiedType {
            expression: TypeExpr::single(FALLBACK_TYPE),
            imports: Vec::new(),
            diagnostic: Some(unhandled_type(field, parent, raw)),
        },
    };

    ClassifiedType {
        expression: classified.expression.wrap_array(field.is_array),
        ..classified
    }
}

fn string_enum_literals(field: &FieldDescriptor, options: &DeclarationOptions) -> Option<Vec<String>> {
    if field.base_type != BaseType::String || !options.string_enum_union {
        return None;
    }
    let values = field.enum_values.as_ref().filter(|v| !v.is_empty())?;
    Some(values.iter().map(|v| quote_literal(v)).collect())
}

fn classify_identifier(field: &FieldDescriptor, options: &DeclarationOptions) -> ClassifiedType {
    let mut alternatives = identifier_type().alternatives;
    let mut imports = vec![TYPES_IMPORT];

    if let Some(target) = field.ref_target() {
        let target_name = declaration_name(target, &options.suffix);
        match options.reference_style {
            ReferenceStyle::Plain => alternatives.push(target_name),
            ReferenceStyle::DocumentIntersection => {
                alternatives.push(format!("({target_name} & {DOCUMENT_IMPORT})"));
                imports.push(DOCUMENT_IMPORT);
            }
        }
    }

    ClassifiedType {
        expression: TypeExpr { alternatives },
        imports,
        diagnostic: None,
    }
}

fn unhandled_type(field: &FieldDescriptor, parent: &str, raw: &str) -> Diagnostic {
    let diagnostic = Diagnostic {
        path: format!("{parent}.{}", field.key),
        type_name: raw.to_string(),
        message: format!("unhandled field type, falling back to '{FALLBACK_TYPE}'"),
    };
    warn!(path = %diagnostic.path, type_name = raw, "unhandled field type");
    diagnostic
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedValue {
    /// Value expression; `None` leaves the field out of the mock.
    pub expression: Option<String>,
    pub helper: Option<Helper>,
    pub diagnostic: Option<Diagnostic>,
}

impl ClassifiedValue {
    fn value(expression: impl Into<String>) -> Self {
        Self {
            expression: Some(expression.into()),
            helper: None,
            diagnostic: None,
        }
    }

    fn omitted() -> Self {
        Self {
            expression: None,
            helper: None,
            diagnostic: None,
        }
    }
}

/// Maps a field of schema node `parent` to a mock value expression.
///
/// Custom overrides win and are used verbatim; enum fields pick from their
/// literals; everything else dispatches on the base type.
pub fn classify_value(
    field: &FieldDescriptor,
    parent: &str,
    options: &FactoryOptions,
) -> ClassifiedValue {
    if let Some(custom) = options.find_override(field) {
        return ClassifiedValue::value(custom.value.clone());
    }

    let classified = if let Some(values) = field.enum_values.as_ref().filter(|v| !v.is_empty()) {
        let literals: Vec<String> = values.iter().map(|v| quote_literal(v)).collect();
        ClassifiedValue {
            expression: Some(format!(
                "{}([{}])()",
                Helper::EnumPick.function_name(),
                literals.join(", ")
            )),
            helper: Some(Helper::EnumPick),
            diagnostic: None,
        }
    } else {
        let randomizers = &options.randomizers;
        match &field.base_type {
            BaseType::Boolean => ClassifiedValue::value(&randomizers.boolean),
            BaseType::Number => ClassifiedValue::value(&randomizers.number),
            BaseType::String => ClassifiedValue::value(&randomizers.string),
            BaseType::Date => ClassifiedValue::value(&randomizers.date),
            BaseType::Identifier => ClassifiedValue {
                expression: Some(format!("{}()", Helper::ObjectId.function_name())),
                helper: Some(Helper::ObjectId),
                diagnostic: None,
            },
            BaseType::NestedSchema => {
                let sub_name = sub_schema_name(parent, &field.key);
                ClassifiedValue::value(format!("{}()", factory_name(&sub_name)))
            }
            BaseType::Mixed | BaseType::MapLike | BaseType::Binary | BaseType::Decimal => {
                ClassifiedValue::omitted()
            }
            BaseType::Unknown(raw) => ClassifiedValue {
                diagnostic: Some(unhandled_type(field, parent, raw)),
                ..ClassifiedValue::omitted()
            },
        }
    };

    ClassifiedValue {
        expression: classified
            .expression
            .map(|expr| if field.is_array { format!("[{expr}]") } else { expr }),
        ..classified
    }
}
