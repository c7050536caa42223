//! Declarative type descriptions.
//!
//! A [`TypeDescription`] is inert data describing the expected shape of a
//! JSON value. It is built once (from the catalog or from a file) and read
//! by the matcher for every check. No description owns a cycle: recursive
//! shapes go through [`TypeDescription::Ref`] and a [`Registry`].
pub mod record;
pub mod registry;

use std::fmt;
use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

pub use record::{Record, Union};
pub use registry::Registry;

// ------------------------------- Kinds ----------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Integer,
    Float,
    String,
    Boolean,
    Null,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "float",
            PrimitiveKind::String => "string",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Null => "null",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ----------------------------- Description ------------------------------- //

/// Expected shape of a JSON value.
///
/// Serialized adjacently tagged, e.g. `{"kind": "list", "of": {"kind":
/// "primitive", "of": "string"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeDescription {
    /// Exact runtime kind, no coercion between integer and float.
    Primitive(PrimitiveKind),
    /// Object with required and optional fields; unknown keys are tolerated.
    Record(Record),
    /// Ad-hoc field mapping, every field required.
    AnonymousRecord(#[serde(deserialize_with = "unique_fields")] IndexMap<String, TypeDescription>),
    #[serde(rename = "list")]
    ListOf(Box<TypeDescription>),
    Union(Union),
    /// Offset paging object: `{href, items, limit, next, offset, previous, total}`.
    Page(Box<TypeDescription>),
    /// Cursor paging object: `{cursors, href, items, limit, next, total}`.
    CursorPage(Box<TypeDescription>),
    /// Named shape, looked up in a [`Registry`] at match time.
    Ref(String),
    Any,
}

impl TypeDescription {
    pub fn integer() -> Self { Self::Primitive(PrimitiveKind::Integer) }
    pub fn float() -> Self { Self::Primitive(PrimitiveKind::Float) }
    pub fn string() -> Self { Self::Primitive(PrimitiveKind::String) }
    pub fn boolean() -> Self { Self::Primitive(PrimitiveKind::Boolean) }
    pub fn null() -> Self { Self::Primitive(PrimitiveKind::Null) }

    pub fn list_of(element: TypeDescription) -> Self {
        Self::ListOf(Box::new(element))
    }

    pub fn page(item: TypeDescription) -> Self {
        Self::Page(Box::new(item))
    }

    pub fn cursor_page(item: TypeDescription) -> Self {
        Self::CursorPage(Box::new(item))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Ref(name.into())
    }

    /// `T | null`. Never fails: the union has two alternatives.
    pub fn nullable(inner: TypeDescription) -> Self {
        Self::Union(Union::pair(inner, Self::null()))
    }

    /// Short human-readable name, used to key union alternatives in a
    /// match tree.
    pub fn display_name(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.to_string(),
            Self::Record(record) => record.name().unwrap_or("record").to_string(),
            Self::AnonymousRecord(_) => "dict".to_string(),
            Self::ListOf(element) => format!("list[{}]", element.display_name()),
            Self::Union(union) => {
                let names = union
                    .alternatives()
                    .iter()
                    .map(TypeDescription::display_name)
                    .collect::<Vec<_>>();
                names.join(" | ")
            }
            Self::Page(item) => format!("page[{}]", item.display_name()),
            Self::CursorPage(item) => format!("cursor_page[{}]", item.display_name()),
            Self::Ref(name) => name.clone(),
            Self::Any => "any".to_string(),
        }
    }

    /// Every `Ref` name reachable without going through the registry.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_refs(self, &mut out);
        out
    }
}

fn collect_refs<'a>(ty: &'a TypeDescription, out: &mut Vec<&'a str>) {
    match ty {
        TypeDescription::Primitive(_) | TypeDescription::Any => {}
        TypeDescription::Ref(name) => out.push(name.as_str()),
        TypeDescription::Record(record) => {
            for (_, field) in record.fields() {
                collect_refs(field, out);
            }
        }
        TypeDescription::AnonymousRecord(fields) => {
            for field in fields.values() {
                collect_refs(field, out);
            }
        }
        TypeDescription::ListOf(inner)
        | TypeDescription::Page(inner)
        | TypeDescription::CursorPage(inner) => collect_refs(inner, out),
        TypeDescription::Union(union) => {
            for alt in union.alternatives() {
                collect_refs(alt, out);
            }
        }
    }
}

/// Field maps from a file: a repeated key is an error, not last-wins.
pub(crate) fn unique_fields<'de, D>(deserializer: D) -> Result<IndexMap<String, TypeDescription>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FieldsVisitor;

    impl<'de> Visitor<'de> for FieldsVisitor {
        type Value = IndexMap<String, TypeDescription>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of field names to type descriptions")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut fields = IndexMap::new();
            while let Some((field, ty)) = access.next_entry::<String, TypeDescription>()? {
                if fields.contains_key(&field) {
                    return Err(de::Error::custom(format!("field `{field}` is declared more than once")));
                }
                fields.insert(field, ty);
            }
            Ok(fields)
        }
    }

    deserializer.deserialize_map(FieldsVisitor)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_nest() {
        let ty = TypeDescription::page(TypeDescription::nullable(TypeDescription::named("Track")));
        assert_eq!(ty.display_name(), "page[Track | null]");
        assert_eq!(TypeDescription::list_of(TypeDescription::float()).display_name(), "list[float]");
    }

    #[test]
    fn references_walk_every_branch() {
        let record = Record::builder("PlaylistTrack")
            .required("track", TypeDescription::named("Track"))
            .optional("added_by", TypeDescription::named("PublicUser"))
            .build()
            .unwrap();
        let ty = TypeDescription::list_of(TypeDescription::Record(record));
        assert_eq!(ty.references(), vec!["Track", "PublicUser"]);
    }

    #[test]
    fn deserializes_adjacently_tagged() {
        let src = serde_json::json!({
            "kind": "record",
            "of": {
                "name": "Image",
                "required": {
                    "url": {"kind": "primitive", "of": "string"},
                    "height": {"kind": "union", "of": [
                        {"kind": "primitive", "of": "integer"},
                        {"kind": "primitive", "of": "null"}
                    ]}
                }
            }
        });
        let ty: TypeDescription = serde_json::from_value(src).unwrap();
        let TypeDescription::Record(record) = &ty else { panic!("expected record") };
        assert_eq!(record.name(), Some("Image"));
        assert!(record.is_required("height"));
        assert_eq!(
            record.field("height"),
            Some(&TypeDescription::nullable(TypeDescription::integer()))
        );
    }

    #[test]
    fn repeated_anonymous_field_is_rejected() {
        let src = r#"{"kind": "anonymous_record", "of": {
            "id": {"kind": "primitive", "of": "string"},
            "id": {"kind": "primitive", "of": "integer"}
        }}"#;
        let err = serde_json::from_str::<TypeDescription>(src).unwrap_err();
        assert!(err.to_string().contains("field `id` is declared more than once"), "{err}");
    }

    #[test]
    fn deserialization_enforces_union_invariant() {
        let src = serde_json::json!({"kind": "union", "of": []});
        assert!(serde_json::from_value::<TypeDescription>(src).is_err());
    }
}
