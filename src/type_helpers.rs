//! Static TypeScript module for narrowing populated reference fields.
//!
//! Reference properties are typed `string | Types.ObjectId | RefDto`; these
//! guards let callers assert which alternative a populated query returned.

use crate::imports::DEFAULT_IMPORT_MODULE;

/// Exported type aliases, in output order.
pub const POPULATE_TYPE_NAMES: [&str; 5] = [
    "PopulateType",
    "ArrayPopulateType",
    "NonPopulateModelType",
    "PopulateModelType",
    "ArrayPopulateModelType",
];

/// Exported type guard functions, in output order.
pub const POPULATE_GUARD_NAMES: [&str; 6] = [
    "forcePopulateModelType",
    "forcePopulateModelArrayType",
    "forceStringType",
    "forceStringArrayType",
    "forceObjectIDType",
    "forceObjectIDArrayType",
];

/// Renders the helper module, importing `Types` from `import_module`.
pub fn render_populate_helpers_from(import_module: &str) -> String {
    let mut out = format!("import {{ Types }} from '{import_module}';\n\n");
    out.push_str(concat!(
        "export type PopulateType<T> = NonPopulateModelType | T;\n",
        "export type ArrayPopulateType<T> = Array<string> | Array<Types.ObjectId> | Array<T>;\n",
        "export type NonPopulateModelType = string | Types.ObjectId;\n",
        "export type PopulateModelType<T> = T extends NonPopulateModelType ? never : T;\n",
        "export type ArrayPopulateModelType<T> = T extends Array<NonPopulateModelType> ? never : T;\n",
    ));
    for (name, parameter, predicate) in [
        ("forcePopulateModelType", "PopulateType<T>", "PopulateModelType<T>"),
        (
            "forcePopulateModelArrayType",
            "ArrayPopulateType<T>",
            "ArrayPopulateModelType<Array<T>>",
        ),
        ("forceStringType", "PopulateType<T>", "string"),
        ("forceStringArrayType", "ArrayPopulateType<T>", "Array<string>"),
        ("forceObjectIDType", "PopulateType<T>", "Types.ObjectId"),
        ("forceObjectIDArrayType", "ArrayPopulateType<T>", "Array<Types.ObjectId>"),
    ] {
        out.push_str(&format!(
            "\nexport function {name}<T>(_: {parameter}): _ is {predicate} {{\n  return true;\n}}\n"
        ));
    }
    out
}

/// Renders the helper module against the default `mongoose` import.
pub fn render_populate_helpers() -> String {
    render_populate_helpers_from(DEFAULT_IMPORT_MODULE)
}

#[cfg(test)]
mod tests {
    use super::{
        render_populate_helpers, render_populate_helpers_from, POPULATE_GUARD_NAMES,
        POPULATE_TYPE_NAMES,
    };

    #[test]
    fn exports_every_alias_and_guard() {
        let code = render_populate_helpers();
        assert!(code.starts_with("import { Types } from 'mongoose';\n\n"));
        for name in POPULATE_TYPE_NAMES {
            assert!(code.contains(&format!("export type {name}")), "{name}");
        }
        for name in POPULATE_GUARD_NAMES {
            assert!(code.contains(&format!("export function {name}<T>(")), "{name}");
        }
        assert!(code.contains(
            "export function forceStringType<T>(_: PopulateType<T>): _ is string {\n  return true;\n}\n"
        ));
    }

    #[test]
    fn honours_custom_import_module() {
        let code = render_populate_helpers_from("custom-odm");
        assert!(code.starts_with("import { Types } from 'custom-odm';"));
    }
}
