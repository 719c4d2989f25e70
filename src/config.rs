//! JSON configuration for the generators.
//!
//! Every key is optional. A section only overrides what it names; the rest
//! comes from the profile defaults (`dto`, `model`) or [`FactoryOptions::new`].
//!
//! ```json
//! {
//!   "dto": { "shape": "interface" },
//!   "model": { "stringEnumUnion": true },
//!   "factory": {
//!     "dtoImportPath": "./dto",
//!     "overrides": [{ "fieldName": "email", "type": "String", "value": "faker.internet.email()" }]
//!   }
//! }
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::ast::{BaseType, CustomFieldOverride, DeclarationShape};
use crate::classify::ReferenceStyle;
use crate::declaration::DeclarationOptions;
use crate::error::CodegenError;
use crate::factory::{FactoryOptions, Randomizers};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodegenConfig {
    pub dto: DeclarationConfig,
    pub model: DeclarationConfig,
    pub factory: FactoryConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct DeclarationConfig {
    pub shape: Option<DeclarationShape>,
    pub suffix: Option<String>,
    pub string_enum_union: Option<bool>,
    pub reference_style: Option<ReferenceStyle>,
    pub extend_document: Option<bool>,
    pub sub_document_id: Option<bool>,
    pub import_module: Option<String>,
    pub file_name: Option<String>,
    pub header: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FactoryConfig {
    pub dto_import_path: Option<String>,
    pub declaration_suffix: Option<String>,
    pub overrides: Vec<CustomFieldOverride>,
    pub match_override_type: Option<bool>,
    pub randomizers: Option<Randomizers>,
    pub file_name: Option<String>,
    pub header: Option<String>,
}

impl CodegenConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CodegenError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        text.parse().map_err(|e| match e {
            CodegenError::ConfigError(msg) => {
                CodegenError::ConfigError(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn dto_options(&self) -> DeclarationOptions {
        self.dto.apply(DeclarationOptions::dto())
    }

    pub fn model_options(&self) -> DeclarationOptions {
        self.model.apply(DeclarationOptions::model())
    }

    /// Factory options; `dto_import_path` wins over the configured path.
    pub fn factory_options(
        &self,
        dto_import_path: Option<&str>,
    ) -> Result<FactoryOptions, CodegenError> {
        let path = dto_import_path
            .or(self.factory.dto_import_path.as_deref())
            .ok_or_else(|| {
                CodegenError::ConfigError(
                    "factory generation requires a dto import path".to_string(),
                )
            })?;
        Ok(self.factory.apply(FactoryOptions::new(path)))
    }
}

impl FromStr for CodegenConfig {
    type Err = CodegenError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(input)
            .map_err(|e| CodegenError::ConfigError(format!("invalid config: {e}")))
    }
}

impl DeclarationConfig {
    /// Overlays the configured keys onto `base`.
    pub fn apply(&self, mut base: DeclarationOptions) -> DeclarationOptions {
        if let Some(shape) = self.shape {
            base.shape = shape;
        }
        if let Some(suffix) = &self.suffix {
            base.suffix = suffix.clone();
        }
        if let Some(enabled) = self.string_enum_union {
            base.string_enum_union = enabled;
        }
        if let Some(style) = self.reference_style {
            base.reference_style = style;
        }
        if let Some(enabled) = self.extend_document {
            base.extend_document = enabled;
        }
        if let Some(enabled) = self.sub_document_id {
            base.sub_document_id = enabled;
        }
        if let Some(module) = &self.import_module {
            base.import_module = module.clone();
        }
        if let Some(file_name) = &self.file_name {
            base.file_name = file_name.clone();
        }
        if let Some(header) = &self.header {
            base.header = (!header.is_empty()).then(|| header.clone());
        }
        base
    }
}

impl FactoryConfig {
    /// Overlays the configured keys onto `base`; overrides are appended.
    pub fn apply(&self, mut base: FactoryOptions) -> FactoryOptions {
        if let Some(suffix) = &self.declaration_suffix {
            base.declaration_suffix = suffix.clone();
        }
        base.overrides.extend(self.overrides.iter().cloned());
        if let Some(enabled) = self.match_override_type {
            base.match_override_type = enabled;
        }
        if let Some(randomizers) = &self.randomizers {
            base.randomizers = randomizers.clone();
        }
        if let Some(file_name) = &self.file_name {
            base.file_name = file_name.clone();
        }
        if let Some(header) = &self.header {
            base.header = (!header.is_empty()).then(|| header.clone());
        }
        base
    }
}

/// Parses a command-line override: `name=value` or `name:Type=value`.
pub fn parse_override(raw: &str) -> Result<CustomFieldOverride, CodegenError> {
    let (target, value) = raw.split_once('=').ok_or_else(|| {
        CodegenError::ConfigError(format!(
            "override '{raw}' must have the form name[:Type]=value"
        ))
    })?;

    let (name, base_type) = match target.split_once(':') {
        Some((name, ty)) => (name.trim(), Some(ty.trim())),
        None => (target.trim(), None),
    };
    if name.is_empty() {
        return Err(CodegenError::ConfigError(format!(
            "override '{raw}' is missing a field name"
        )));
    }

    let mut custom = CustomFieldOverride::new(name, value);
    if let Some(ty) = base_type {
        if ty.is_empty() {
            return Err(CodegenError::ConfigError(format!(
                "override '{raw}' has an empty type"
            )));
        }
        custom = custom.with_type(BaseType::from_name(ty));
    }
    Ok(custom)
}
