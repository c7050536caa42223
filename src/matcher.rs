//! Structural matcher.
//!
//! Walks a parsed JSON value and a [`TypeDescription`] side by side and
//! builds a [`MatchResult`] tree holding only what failed. Dispatch is on
//! the description, never on the value.
//!
//! Rules worth knowing:
//! - Primitive kinds are exact: `1` is not a float, `1.0` is not an integer.
//! - Records are strict on missing required keys and lenient on extra keys.
//! - Pages are strict both ways, and a wrong key set stops the comparison
//!   before `items` is looked at.
//! - Lists report how many elements failed but only detail the first one.
//!
//! The `Err` arm is reserved for a broken model (an unresolvable `Ref`).
pub mod kind;
pub mod result;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::model::{PrimitiveKind, Registry, TypeDescription, Union};

pub use kind::ValueKind;
pub use result::{Children, MatchResult, Mismatch};

// ------------------------------- Policy ---------------------------------- //

/// Longest rendering of an offending value inside a message.
const VALUE_PREVIEW_MAX: usize = 60;

const PAGE_FIELDS: &[&str] = &["href", "items", "limit", "next", "offset", "previous", "total"];
const CURSOR_PAGE_FIELDS: &[&str] = &["cursors", "href", "items", "limit", "next", "total"];

#[derive(Debug, Clone, Copy)]
enum PageKind { Offset, Cursor }

impl PageKind {
    fn label(self) -> &'static str {
        match self {
            PageKind::Offset => "page",
            PageKind::Cursor => "cursor_page",
        }
    }

    fn fields(self) -> &'static [&'static str] {
        match self {
            PageKind::Offset => PAGE_FIELDS,
            PageKind::Cursor => CURSOR_PAGE_FIELDS,
        }
    }
}

// ------------------------------- Front API -------------------------------- //

/// Check `value` against `ty` with no registry; any `Ref` is a model error.
pub fn check(value: &Value, ty: &TypeDescription) -> Result<MatchResult, ModelError> {
    let registry = Registry::new();
    Matcher::new(&registry).check(value, ty)
}

/// Stateless; reusable across threads as long as the registry is.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'r> {
    registry: &'r Registry,
}

impl<'r> Matcher<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn check(&self, value: &Value, ty: &TypeDescription) -> Result<MatchResult, ModelError> {
        self.check_in_place(value, ty, &mut Vec::new())
    }

    /// `pending` holds the names entered since the last step into the value.
    /// Seeing one again means the model loops without consuming input.
    fn check_in_place(
        &self,
        value: &Value,
        ty: &TypeDescription,
        pending: &mut Vec<String>,
    ) -> Result<MatchResult, ModelError> {
        match ty {
            TypeDescription::Primitive(kind) => Ok(match_primitive(value, *kind)),
            TypeDescription::Record(record) => self.match_fields(
                value,
                record.name().unwrap_or("record"),
                record.required(),
                Some(record.optional()),
            ),
            TypeDescription::AnonymousRecord(fields) => self.match_fields(value, "dict", fields, None),
            TypeDescription::ListOf(element) => self.match_list(value, element),
            TypeDescription::Union(union) => self.match_union(value, union, pending),
            TypeDescription::Page(item) => self.match_page(value, PageKind::Offset, item),
            TypeDescription::CursorPage(item) => self.match_page(value, PageKind::Cursor, item),
            TypeDescription::Ref(name) => {
                if pending.contains(name) {
                    let mut chain = pending.clone();
                    chain.push(name.clone());
                    return Err(ModelError::RefCycle(chain));
                }
                let target = self
                    .registry
                    .get(name)
                    .ok_or_else(|| ModelError::UnknownType(name.clone()))?;
                tracing::trace!(name = %name, "resolving type reference");
                pending.push(name.clone());
                let result = self.check_in_place(value, target, pending);
                pending.pop();
                result
            }
            TypeDescription::Any => Ok(MatchResult::pass("any")),
        }
    }

    // ------------------------------ Branches ------------------------------ //

    fn match_fields(
        &self,
        value: &Value,
        label: &str,
        required: &IndexMap<String, TypeDescription>,
        optional: Option<&IndexMap<String, TypeDescription>>,
    ) -> Result<MatchResult, ModelError> {
        let Some(map) = value.as_object() else {
            return Ok(MatchResult::fail(
                label,
                vec![format!("expected a mapping but got {}", ValueKind::of(value))],
            ));
        };

        let mut errors = Vec::new();
        let missing = required
            .keys()
            .filter(|k| !map.contains_key(k.as_str()))
            .map(String::as_str)
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            errors.push(format!("missing required keys: {}", braced(&missing)));
        }

        // keys present in the value but not declared are tolerated
        let declared = required.iter().chain(optional.into_iter().flatten());
        let mut children = IndexMap::new();
        for (field, field_ty) in declared {
            let Some(field_value) = map.get(field) else { continue };
            let result = self.check(field_value, field_ty)?;
            if result.has_errors() {
                children.insert(field.clone(), result);
            }
        }

        Ok(MatchResult::new(label, errors, Children::Fields(children)))
    }

    fn match_list(&self, value: &Value, element: &TypeDescription) -> Result<MatchResult, ModelError> {
        let Some(items) = value.as_array() else {
            return Ok(MatchResult::fail("list", vec!["not a list".to_string()]));
        };

        let mut failed = 0usize;
        let mut first_error = None;
        for item in items {
            let result = self.check(item, element)?;
            if result.has_errors() {
                failed += 1;
                first_error.get_or_insert(result);
            }
        }

        let Some(first_error) = first_error else {
            return Ok(MatchResult::pass("list"));
        };
        let mut children = IndexMap::new();
        children.insert("first error".to_string(), first_error);
        Ok(MatchResult::new(
            "list",
            vec![format!("{failed} of {} elements do not match", items.len())],
            Children::Fields(children),
        ))
    }

    fn match_union(
        &self,
        value: &Value,
        union: &Union,
        pending: &mut Vec<String>,
    ) -> Result<MatchResult, ModelError> {
        let mut children = IndexMap::new();
        for (index, alternative) in union.alternatives().iter().enumerate() {
            let result = self.check_in_place(value, alternative, pending)?;
            if !result.has_errors() {
                return Ok(MatchResult::pass("union"));
            }
            let mut key = alternative.display_name();
            if children.contains_key(&key) {
                key = format!("{key}#{index}");
            }
            children.insert(key, result);
        }
        Ok(MatchResult::new(
            "union",
            vec!["no union alternative matched".to_string()],
            Children::Fields(children),
        ))
    }

    fn match_page(
        &self,
        value: &Value,
        page: PageKind,
        item: &TypeDescription,
    ) -> Result<MatchResult, ModelError> {
        let label = page.label();
        let Some(map) = value.as_object() else {
            return Ok(MatchResult::fail(
                label,
                vec![format!("expected {label} but got {}", ValueKind::of(value))],
            ));
        };

        let errors = page_key_errors(map, page.fields());
        if !errors.is_empty() {
            return Ok(MatchResult::fail(label, errors));
        }

        let items = map.get("items").unwrap_or(&Value::Null);
        let items = self.match_list(items, item)?;
        Ok(MatchResult::new(label, Vec::new(), Children::Single(Box::new(items))))
    }
}

// ------------------------------- Helpers ---------------------------------- //

fn match_primitive(value: &Value, expected: PrimitiveKind) -> MatchResult {
    let actual = ValueKind::of(value);
    if actual.as_primitive() == Some(expected) {
        return MatchResult::pass("primitive");
    }
    MatchResult::fail(
        "primitive",
        vec![format!("{}: expected {expected} but got {actual}", preview(value))],
    )
}

fn page_key_errors(map: &Map<String, Value>, fields: &[&str]) -> Vec<String> {
    let mut errors = Vec::new();
    let unrecognized = map
        .keys()
        .map(String::as_str)
        .filter(|k| !fields.contains(k))
        .collect::<Vec<_>>();
    if !unrecognized.is_empty() {
        errors.push(format!("unrecognized keys: {}", braced(&unrecognized)));
    }
    let missing = fields
        .iter()
        .copied()
        .filter(|k| !map.contains_key(*k))
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        errors.push(format!("missing required key: {}", braced(&missing)));
    }
    errors
}

fn braced(keys: &[&str]) -> String {
    format!("{{{}}}", keys.join(", "))
}

fn preview(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= VALUE_PREVIEW_MAX {
        return text;
    }
    let mut short: String = text.chars().take(VALUE_PREVIEW_MAX).collect();
    short.push('…');
    short
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use serde_json::json;

    fn track() -> TypeDescription {
        TypeDescription::Record(
            Record::builder("Track")
                .required("name", TypeDescription::string())
                .required("id", TypeDescription::string())
                .optional("popularity", TypeDescription::integer())
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn primitive_kinds_are_exact() {
        let cases = [
            (json!(1), PrimitiveKind::Float, true),
            (json!(1.0), PrimitiveKind::Integer, true),
            (json!(true), PrimitiveKind::Integer, true),
            (json!(0), PrimitiveKind::Boolean, true),
            (json!("1"), PrimitiveKind::Integer, true),
            (json!(null), PrimitiveKind::String, true),
            (json!(1), PrimitiveKind::Integer, false),
            (json!(0.5), PrimitiveKind::Float, false),
            (json!(null), PrimitiveKind::Null, false),
        ];
        for (value, kind, fails) in cases {
            let result = check(&value, &TypeDescription::Primitive(kind)).unwrap();
            assert_eq!(result.has_errors(), fails, "{value} vs {kind}");
        }
    }

    #[test]
    fn primitive_message_names_both_kinds() {
        let result = check(&json!(1.5), &TypeDescription::integer()).unwrap();
        assert_eq!(result.error_messages(), ["1.5: expected integer but got float"]);
    }

    #[test]
    fn long_values_are_truncated_in_messages() {
        let value = json!("x".repeat(200));
        let result = check(&value, &TypeDescription::integer()).unwrap();
        let message = &result.error_messages()[0];
        assert!(message.contains('…'));
        assert!(message.ends_with("expected integer but got string"));
    }

    #[test]
    fn optional_field_may_be_absent() {
        let result = check(&json!({"name": "Creep", "id": "6b2o"}), &track()).unwrap();
        assert!(!result.has_errors());
    }

    #[test]
    fn missing_required_field_is_named() {
        let result = check(&json!({"id": "6b2o"}), &track()).unwrap();
        assert!(result.has_errors());
        assert_eq!(result.label(), "Track");
        assert_eq!(result.error_messages(), ["missing required keys: {name}"]);
    }

    #[test]
    fn extra_fields_are_tolerated() {
        let value = json!({"name": "Creep", "id": "6b2o", "weird": true});
        assert!(!check(&value, &track()).unwrap().has_errors());
    }

    #[test]
    fn present_optional_field_is_checked() {
        let value = json!({"name": "Creep", "id": "6b2o", "popularity": 7.5});
        let result = check(&value, &track()).unwrap();
        assert!(result.error_messages().is_empty());
        let popularity = result.child("popularity").unwrap();
        assert_eq!(popularity.error_messages(), ["7.5: expected integer but got float"]);
    }

    #[test]
    fn record_rejects_non_mapping() {
        let result = check(&json!(["Creep"]), &track()).unwrap();
        assert_eq!(result.error_messages(), ["expected a mapping but got list"]);
    }

    #[test]
    fn anonymous_record_requires_every_field() {
        let mut fields = IndexMap::new();
        fields.insert("href".to_string(), TypeDescription::string());
        fields.insert("total".to_string(), TypeDescription::integer());
        let ty = TypeDescription::AnonymousRecord(fields);

        let result = check(&json!({"total": 3, "extra": []}), &ty).unwrap();
        assert_eq!(result.label(), "dict");
        assert_eq!(result.error_messages(), ["missing required keys: {href}"]);

        assert!(!check(&json!({"href": "h", "total": 3}), &ty).unwrap().has_errors());
    }

    #[test]
    fn list_counts_failures_and_keeps_first() {
        let ty = TypeDescription::list_of(TypeDescription::string());
        let value = json!(["a", 1, "b", false]);
        let result = check(&value, &ty).unwrap();
        assert_eq!(result.error_messages(), ["2 of 4 elements do not match"]);
        let first = result.child("first error").unwrap();
        assert_eq!(first, &check(&json!(1), &TypeDescription::string()).unwrap());
    }

    #[test]
    fn list_rejects_non_sequence() {
        let ty = TypeDescription::list_of(TypeDescription::string());
        let result = check(&json!({"a": 1}), &ty).unwrap();
        assert_eq!(result.error_messages(), ["not a list"]);
        assert!(!check(&json!([]), &ty).unwrap().has_errors());
    }

    #[test]
    fn union_passes_on_any_alternative() {
        let ty = TypeDescription::nullable(TypeDescription::string());
        assert!(!check(&json!(null), &ty).unwrap().has_errors());
        assert!(!check(&json!("x"), &ty).unwrap().has_errors());
    }

    #[test]
    fn union_failure_lists_every_attempt() {
        let ty = TypeDescription::Union(
            Union::new(vec![TypeDescription::string(), TypeDescription::integer(), track()]).unwrap(),
        );
        let result = check(&json!(1.5), &ty).unwrap();
        assert_eq!(result.error_messages(), ["no union alternative matched"]);
        let Children::Fields(children) = result.children() else { panic!("expected fields") };
        let keys: Vec<_> = children.keys().map(String::as_str).collect();
        assert_eq!(keys, ["string", "integer", "Track"]);
    }

    #[test]
    fn union_keys_stay_unique() {
        let ty = TypeDescription::Union(
            Union::new(vec![TypeDescription::string(), TypeDescription::string()]).unwrap(),
        );
        let result = check(&json!(1), &ty).unwrap();
        assert!(result.child("string").is_some());
        assert!(result.child("string#1").is_some());
    }

    fn page_value() -> Value {
        json!({
            "href": "h",
            "items": ["a", "b"],
            "limit": 2,
            "next": null,
            "offset": 0,
            "previous": null,
            "total": 2
        })
    }

    #[test]
    fn page_with_exact_fields_passes() {
        let ty = TypeDescription::page(TypeDescription::string());
        assert!(!check(&page_value(), &ty).unwrap().has_errors());
    }

    #[test]
    fn page_missing_field_short_circuits() {
        let ty = TypeDescription::page(TypeDescription::integer());
        let mut value = page_value();
        value.as_object_mut().unwrap().remove("total");
        let result = check(&value, &ty).unwrap();
        assert_eq!(result.error_messages(), ["missing required key: {total}"]);
        assert_eq!(result.children(), &Children::None);
    }

    #[test]
    fn page_extra_and_missing_fire_together() {
        let ty = TypeDescription::page(TypeDescription::string());
        let mut value = page_value();
        let map = value.as_object_mut().unwrap();
        map.remove("previous");
        map.insert("extra".into(), json!(1));
        let result = check(&value, &ty).unwrap();
        assert_eq!(
            result.error_messages(),
            ["unrecognized keys: {extra}", "missing required key: {previous}"]
        );
    }

    #[test]
    fn page_reports_item_failures_under_list() {
        let ty = TypeDescription::page(TypeDescription::integer());
        let result = check(&page_value(), &ty).unwrap();
        assert!(result.has_errors());
        let Children::Single(list) = result.children() else { panic!("expected list child") };
        assert_eq!(list.error_messages(), ["2 of 2 elements do not match"]);
    }

    #[test]
    fn cursor_page_uses_its_own_field_set() {
        let ty = TypeDescription::cursor_page(TypeDescription::string());
        let value = json!({
            "cursors": {"after": "x"},
            "href": "h",
            "items": ["a"],
            "limit": 1,
            "next": null,
            "total": 1
        });
        assert!(!check(&value, &ty).unwrap().has_errors());

        let result = check(&page_value(), &ty).unwrap();
        assert_eq!(result.label(), "cursor_page");
        assert_eq!(
            result.error_messages(),
            ["unrecognized keys: {offset, previous}", "missing required key: {cursors}"]
        );
    }

    #[test]
    fn dangling_ref_is_a_model_error() {
        let ty = TypeDescription::list_of(TypeDescription::named("Track"));
        assert_eq!(
            check(&json!([{}]), &ty),
            Err(ModelError::UnknownType("Track".into()))
        );
        // never reached: empty list has nothing to resolve
        assert!(check(&json!([]), &ty).is_ok());
    }

    #[test]
    fn refs_resolve_through_registry() {
        let mut registry = Registry::new();
        registry.register("Track", track()).unwrap();
        let matcher = Matcher::new(&registry);
        let ty = TypeDescription::list_of(TypeDescription::named("Track"));
        let result = matcher.check(&json!([{"name": "Creep", "id": "1"}, {"id": "2"}]), &ty).unwrap();
        assert_eq!(result.first_error_path(), vec!["first error"]);
        assert_eq!(
            result.child("first error").unwrap().error_messages(),
            ["missing required keys: {name}"]
        );
    }

    #[test]
    fn self_referencing_union_is_a_model_error() {
        // never validated, so the loop is only caught while matching
        let mut registry = Registry::new();
        let ty = Union::new(vec![TypeDescription::named("A"), TypeDescription::string()]).unwrap();
        registry.register("A", TypeDescription::Union(ty)).unwrap();
        let matcher = Matcher::new(&registry);
        assert_eq!(
            matcher.check(&json!(1), &TypeDescription::named("A")),
            Err(ModelError::RefCycle(vec!["A".into(), "A".into()]))
        );
    }

    #[test]
    fn recursion_through_the_value_is_not_a_cycle() {
        let node = Record::builder("Node")
            .required("children", TypeDescription::list_of(TypeDescription::named("Node")))
            .build()
            .unwrap();
        let mut registry = Registry::new();
        registry.register("Node", TypeDescription::Record(node)).unwrap();
        let value = json!({"children": [{"children": []}, {"children": [{"children": [1]}]}]});
        let result = Matcher::new(&registry).check(&value, &TypeDescription::named("Node")).unwrap();
        assert_eq!(
            result.first_error_path(),
            vec!["children", "first error", "children", "first error", "children", "first error"]
        );
    }

    #[test]
    fn any_accepts_everything() {
        for value in [json!(null), json!({"a": [1]}), json!(1.5)] {
            assert!(!check(&value, &TypeDescription::Any).unwrap().has_errors());
        }
    }

    #[test]
    fn repeated_checks_are_identical() {
        let value = json!({"id": 3, "popularity": "high"});
        assert_eq!(check(&value, &track()), check(&value, &track()));
    }
}
