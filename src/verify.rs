//! Entry points used by test harnesses: check a live response against the
//! shape declared for the endpoint that produced it.
use std::borrow::Cow;
use serde_json::Value;

use crate::catalog::{self, endpoints};
use crate::error::{ModelError, VerifyError};
use crate::matcher::{MatchResult, Matcher};
use crate::model::{Registry, TypeDescription};

/// Check `value` against an endpoint's declared return type, resolving
/// names through the built-in catalog.
pub fn verify_against_declared_return_type(
    value: &Value,
    endpoint_return_type: &TypeDescription,
) -> Result<MatchResult, ModelError> {
    Matcher::new(catalog::registry()).check(value, endpoint_return_type)
}

#[derive(Debug, Clone)]
pub struct Verifier {
    registry: Cow<'static, Registry>,
}

impl Default for Verifier {
    fn default() -> Self {
        Self { registry: Cow::Borrowed(catalog::registry()) }
    }
}

impl Verifier {
    pub fn new() -> Self { Self::default() }

    /// Catalog plus user-declared shapes. Names must not collide with the
    /// catalog and every reference must resolve.
    pub fn with_extra(extra: Registry) -> Result<Self, ModelError> {
        let mut registry = catalog::registry().clone();
        registry.merge(extra)?;
        registry.validate()?;
        Ok(Self { registry: Cow::Owned(registry) })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn verify(&self, value: &Value, ty: &TypeDescription) -> Result<MatchResult, ModelError> {
        Matcher::new(&self.registry).check(value, ty)
    }

    pub fn verify_type(&self, value: &Value, name: &str) -> Result<MatchResult, VerifyError> {
        let result = self.verify(value, &TypeDescription::named(name))?;
        tracing::debug!(shape = name, has_errors = result.has_errors(), "verified value");
        Ok(result)
    }

    pub fn verify_endpoint(&self, value: &Value, endpoint: &str) -> Result<MatchResult, VerifyError> {
        let ty = endpoints::declared_return_type(endpoint)
            .ok_or_else(|| VerifyError::UnknownEndpoint(endpoint.to_string()))?;
        let result = self.verify(value, ty)?;
        tracing::debug!(endpoint, has_errors = result.has_errors(), "verified response");
        Ok(result)
    }
}
