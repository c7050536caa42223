//! Structural runtime type-checking of Spotify Web API responses.
//!
//! Responses arrive as untyped `serde_json::Value`s; the client declares
//! what each endpoint returns as a [`TypeDescription`]. The [`matcher`]
//! proves (or disproves) that a concrete response has the declared shape
//! and explains every mismatch in a [`MatchResult`] tree.
//!
//! ```
//! use serde_json::json;
//! use shape_check::{check, Record, TypeDescription};
//!
//! let track = Record::builder("Track")
//!     .required("name", TypeDescription::string())
//!     .required("id", TypeDescription::string())
//!     .optional("popularity", TypeDescription::integer())
//!     .build()
//!     .unwrap();
//! let ty = TypeDescription::Record(track);
//!
//! let result = check(&json!({"id": "6b2o"}), &ty).unwrap();
//! assert!(result.has_errors());
//! assert_eq!(result.error_messages(), ["missing required keys: {name}"]);
//! ```
pub mod catalog;
pub mod error;
pub mod matcher;
pub mod model;
pub mod path_de;
pub mod skeleton;
pub mod verify;

pub use error::{LoadError, ModelError, VerifyError};
pub use matcher::{check, Children, MatchResult, Matcher, Mismatch, ValueKind};
pub use model::{PrimitiveKind, Record, Registry, TypeDescription, Union};
pub use verify::{verify_against_declared_return_type, Verifier};
