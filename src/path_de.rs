use std::path::Path;
use serde::de::DeserializeOwned;

use crate::error::LoadError;
use crate::model::Registry;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, LoadError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| LoadError::Parse {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

/// Load a `{name: description}` catalog file and check its invariants.
///
/// References are not validated here; a user catalog may point at names
/// from the built-in one.
pub fn load_registry(path: &Path) -> Result<Registry, LoadError> {
    let src = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_str_with_path::<Registry>(&src)
}
