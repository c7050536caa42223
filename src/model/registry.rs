use std::fmt;
use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use super::TypeDescription;
use crate::error::ModelError;

/// Name-indexed set of shapes. `Ref(name)` nodes resolve through here, so
/// recursive and mutually referencing shapes never form physical cycles.
///
/// Serialized as a `{name: description}` map. Deserialization goes through
/// [`Registry::register`], so a repeated name is an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Registry {
    types: IndexMap<String, TypeDescription>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        ty: TypeDescription,
    ) -> Result<(), ModelError> {
        let name = name.into();
        if self.types.contains_key(&name) {
            return Err(ModelError::DuplicateType(name));
        }
        self.types.insert(name, ty);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescription> {
        self.types.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDescription)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize { self.types.len() }
    pub fn is_empty(&self) -> bool { self.types.is_empty() }

    /// Adds every entry of `other`. Fails on the first name both define.
    pub fn merge(&mut self, other: Registry) -> Result<(), ModelError> {
        for (name, ty) in other.types {
            self.register(name, ty)?;
        }
        Ok(())
    }

    /// Follow a chain of `Ref`s down to a concrete shape.
    pub fn resolve<'a>(&'a self, ty: &'a TypeDescription) -> Result<&'a TypeDescription, ModelError> {
        match ty {
            TypeDescription::Ref(name) => self.resolve_name(name),
            concrete => Ok(concrete),
        }
    }

    /// Like [`Registry::resolve`], starting from a name.
    pub fn resolve_name(&self, name: &str) -> Result<&TypeDescription, ModelError> {
        let mut chain: Vec<&str> = Vec::new();
        let mut name = name;
        loop {
            if chain.contains(&name) {
                let mut names: Vec<String> = chain.iter().map(|s| s.to_string()).collect();
                names.push(name.to_string());
                return Err(ModelError::RefCycle(names));
            }
            chain.push(name);
            tracing::trace!(name, "resolving type reference");
            let ty = self
                .types
                .get(name)
                .ok_or_else(|| ModelError::UnknownType(name.to_string()))?;
            match ty {
                TypeDescription::Ref(next) => name = next,
                concrete => return Ok(concrete),
            }
        }
    }

    /// Check that every reference resolves and that no name can reach
    /// itself again without the value being stepped into.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, ty) in &self.types {
            let root = TypeDescription::Ref(name.clone());
            self.walk_in_place(&root, &mut Vec::new())?;
            for reference in ty.references() {
                self.resolve_name(reference)?;
            }
        }
        Ok(())
    }

    /// Descends through `Ref` and `Union` only; every other variant matches
    /// against a component of the value, which is where recursion is sound.
    fn walk_in_place<'a>(
        &'a self,
        ty: &'a TypeDescription,
        pending: &mut Vec<&'a str>,
    ) -> Result<(), ModelError> {
        match ty {
            TypeDescription::Ref(name) => {
                if pending.contains(&name.as_str()) {
                    let mut names: Vec<String> = pending.iter().map(|s| s.to_string()).collect();
                    names.push(name.clone());
                    return Err(ModelError::RefCycle(names));
                }
                let (key, target) = self
                    .types
                    .get_key_value(name.as_str())
                    .ok_or_else(|| ModelError::UnknownType(name.clone()))?;
                pending.push(key);
                self.walk_in_place(target, pending)?;
                pending.pop();
                Ok(())
            }
            TypeDescription::Union(union) => {
                for alternative in union.alternatives() {
                    self.walk_in_place(alternative, pending)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl<'de> Deserialize<'de> for Registry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RegistryVisitor;

        impl<'de> Visitor<'de> for RegistryVisitor {
            type Value = Registry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of type names to type descriptions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Registry, A::Error> {
                let mut registry = Registry::new();
                while let Some((name, ty)) = access.next_entry::<String, TypeDescription>()? {
                    registry.register(name, ty).map_err(de::Error::custom)?;
                }
                Ok(registry)
            }
        }

        deserializer.deserialize_map(RegistryVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Record, Union};

    fn artist() -> TypeDescription {
        TypeDescription::Record(
            Record::builder("SimplifiedArtist")
                .required("name", TypeDescription::string())
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = Registry::new();
        registry.register("SimplifiedArtist", artist()).unwrap();
        assert_eq!(
            registry.register("SimplifiedArtist", artist()),
            Err(ModelError::DuplicateType("SimplifiedArtist".into()))
        );
    }

    #[test]
    fn resolve_follows_alias_chains() {
        let mut registry = Registry::new();
        registry.register("SimplifiedArtist", artist()).unwrap();
        registry.register("Artist", TypeDescription::named("SimplifiedArtist")).unwrap();
        let alias = TypeDescription::named("Artist");
        assert_eq!(registry.resolve(&alias).unwrap(), &artist());
        assert_eq!(registry.resolve_name("Artist").unwrap(), &artist());
        assert_eq!(
            registry.resolve_name("Album"),
            Err(ModelError::UnknownType("Album".into()))
        );
    }

    #[test]
    fn validate_reports_dangling_reference() {
        let mut registry = Registry::new();
        registry
            .register("Tracks", TypeDescription::list_of(TypeDescription::named("Track")))
            .unwrap();
        assert_eq!(registry.validate(), Err(ModelError::UnknownType("Track".into())));
    }

    #[test]
    fn validate_reports_alias_cycle() {
        let mut registry = Registry::new();
        registry.register("A", TypeDescription::named("B")).unwrap();
        registry.register("B", TypeDescription::named("A")).unwrap();
        assert_eq!(
            registry.validate(),
            Err(ModelError::RefCycle(vec!["A".into(), "B".into(), "A".into()]))
        );
        assert!(matches!(registry.resolve_name("B"), Err(ModelError::RefCycle(_))));
    }

    #[test]
    fn validate_reports_cycle_through_union() {
        let mut registry = Registry::new();
        let ty = Union::new(vec![TypeDescription::named("A"), TypeDescription::string()]).unwrap();
        registry.register("A", TypeDescription::Union(ty)).unwrap();
        assert_eq!(
            registry.validate(),
            Err(ModelError::RefCycle(vec!["A".into(), "A".into()]))
        );
    }

    #[test]
    fn validate_reports_cycle_through_nested_unions() {
        let mut registry = Registry::new();
        let inner = Union::new(vec![TypeDescription::integer(), TypeDescription::named("A")]).unwrap();
        registry.register("A", TypeDescription::nullable(TypeDescription::named("B"))).unwrap();
        registry.register("B", TypeDescription::Union(inner)).unwrap();
        assert_eq!(
            registry.validate(),
            Err(ModelError::RefCycle(vec!["A".into(), "B".into(), "A".into()]))
        );
    }

    #[test]
    fn recursive_shape_through_a_list_is_fine() {
        let node = Record::builder("Node")
            .required("children", TypeDescription::list_of(TypeDescription::named("Node")))
            .optional("parent", TypeDescription::nullable(TypeDescription::named("Node")))
            .build()
            .unwrap();
        let mut registry = Registry::new();
        registry.register("Node", TypeDescription::Record(node)).unwrap();
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn repeated_name_in_source_is_rejected() {
        let src = r#"{
            "Ids": {"kind": "primitive", "of": "string"},
            "Ids": {"kind": "primitive", "of": "integer"}
        }"#;
        let err = serde_json::from_str::<Registry>(src).unwrap_err();
        assert!(err.to_string().contains("`Ids` is already registered"), "{err}");
    }
}
