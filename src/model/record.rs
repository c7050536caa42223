use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::TypeDescription;
use crate::error::ModelError;

// -------------------------------- Record --------------------------------- //

/// Object shape. A field name lives in at most one of `required` /
/// `optional`; [`Record::new`] enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordRepr", into = "RecordRepr")]
pub struct Record {
    name: Option<String>,
    required: IndexMap<String, TypeDescription>,
    optional: IndexMap<String, TypeDescription>,
}

#[derive(Serialize, Deserialize)]
struct RecordRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "super::unique_fields")]
    required: IndexMap<String, TypeDescription>,
    #[serde(default, deserialize_with = "super::unique_fields", skip_serializing_if = "IndexMap::is_empty")]
    optional: IndexMap<String, TypeDescription>,
}

impl Record {
    pub fn new(
        name: Option<String>,
        required: IndexMap<String, TypeDescription>,
        optional: IndexMap<String, TypeDescription>,
    ) -> Result<Self, ModelError> {
        if let Some(field) = required.keys().find(|k| optional.contains_key(*k)) {
            return Err(ModelError::DuplicateField {
                record: name.clone().unwrap_or_else(|| "record".to_string()),
                field: field.clone(),
            });
        }
        Ok(Self { name, required, optional })
    }

    pub fn builder(name: impl Into<String>) -> RecordBuilder {
        RecordBuilder { name: Some(name.into()), ..RecordBuilder::default() }
    }

    pub fn anonymous() -> RecordBuilder {
        RecordBuilder::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn required(&self) -> &IndexMap<String, TypeDescription> {
        &self.required
    }

    pub fn optional(&self) -> &IndexMap<String, TypeDescription> {
        &self.optional
    }

    pub fn field(&self, name: &str) -> Option<&TypeDescription> {
        self.required.get(name).or_else(|| self.optional.get(name))
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains_key(name)
    }

    /// Required fields first, then optional, each in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &TypeDescription)> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .map(|(k, v)| (k.as_str(), v))
    }
}

impl TryFrom<RecordRepr> for Record {
    type Error = ModelError;
    fn try_from(repr: RecordRepr) -> Result<Self, Self::Error> {
        Record::new(repr.name, repr.required, repr.optional)
    }
}

impl From<Record> for RecordRepr {
    fn from(record: Record) -> Self {
        RecordRepr { name: record.name, required: record.required, optional: record.optional }
    }
}

/// Accumulates fields; the duplicate check runs once in [`RecordBuilder::build`].
#[derive(Debug, Default)]
pub struct RecordBuilder {
    name: Option<String>,
    required: IndexMap<String, TypeDescription>,
    optional: IndexMap<String, TypeDescription>,
    repeated: Option<String>,
}

impl RecordBuilder {
    pub fn required(mut self, field: impl Into<String>, ty: TypeDescription) -> Self {
        let field = field.into();
        if self.required.insert(field.clone(), ty).is_some() {
            self.repeated.get_or_insert(field);
        }
        self
    }

    pub fn optional(mut self, field: impl Into<String>, ty: TypeDescription) -> Self {
        let field = field.into();
        if self.optional.insert(field.clone(), ty).is_some() {
            self.repeated.get_or_insert(field);
        }
        self
    }

    pub fn build(self) -> Result<Record, ModelError> {
        if let Some(field) = self.repeated {
            return Err(ModelError::RepeatedField {
                record: self.name.unwrap_or_else(|| "record".to_string()),
                field,
            });
        }
        Record::new(self.name, self.required, self.optional)
    }
}

// --------------------------------- Union --------------------------------- //

/// Non-empty, ordered set of alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TypeDescription>", into = "Vec<TypeDescription>")]
pub struct Union {
    alternatives: Vec<TypeDescription>,
}

impl Union {
    pub fn new(alternatives: Vec<TypeDescription>) -> Result<Self, ModelError> {
        if alternatives.is_empty() {
            return Err(ModelError::EmptyUnion);
        }
        Ok(Self { alternatives })
    }

    pub(crate) fn pair(a: TypeDescription, b: TypeDescription) -> Self {
        Self { alternatives: vec![a, b] }
    }

    pub fn alternatives(&self) -> &[TypeDescription] {
        &self.alternatives
    }
}

impl TryFrom<Vec<TypeDescription>> for Union {
    type Error = ModelError;
    fn try_from(alternatives: Vec<TypeDescription>) -> Result<Self, Self::Error> {
        Union::new(alternatives)
    }
}

impl From<Union> for Vec<TypeDescription> {
    fn from(union: Union) -> Self {
        union.alternatives
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_field_in_both_sets() {
        let err = Record::builder("Track")
            .required("id", TypeDescription::string())
            .optional("id", TypeDescription::string())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateField { record: "Track".into(), field: "id".into() }
        );
    }

    #[test]
    fn rejects_repeated_required_field() {
        let err = Record::anonymous()
            .required("id", TypeDescription::string())
            .required("id", TypeDescription::integer())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::RepeatedField { record: "record".into(), field: "id".into() }
        );
        assert_eq!(err.to_string(), "record `record` declares field `id` more than once");
    }

    #[test]
    fn repeated_field_in_source_is_rejected() {
        let src = r#"{"name": "Image", "required": {
            "url": {"kind": "primitive", "of": "string"},
            "url": {"kind": "primitive", "of": "integer"}
        }}"#;
        let err = serde_json::from_str::<Record>(src).unwrap_err();
        assert!(err.to_string().contains("field `url` is declared more than once"), "{err}");
    }

    #[test]
    fn field_lookup_spans_both_sets() {
        let record = Record::builder("Track")
            .required("name", TypeDescription::string())
            .optional("popularity", TypeDescription::integer())
            .build()
            .unwrap();
        assert!(record.is_required("name"));
        assert!(!record.is_required("popularity"));
        assert_eq!(record.field("popularity"), Some(&TypeDescription::integer()));
        assert_eq!(record.field("weird"), None);
        let names: Vec<_> = record.fields().map(|(k, _)| k).collect();
        assert_eq!(names, ["name", "popularity"]);
    }

    #[test]
    fn empty_union_is_rejected() {
        assert_eq!(Union::new(vec![]).unwrap_err(), ModelError::EmptyUnion);
    }
}
