//! YAML read / query / re-key / write steps of the extraction stage.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::io::{Read, Write};
use std::path::Path;

use super::emit::{self, EmitError};
use crate::error::GetError;
use crate::getter::open_with_mode;
use crate::yamlpath::YamlPath;

/// Reads the whole downloaded file. A missing file is created (and read as
/// empty) rather than reported; the handle is closed before returning.
pub(crate) fn read_document(path: &Path, mode: u32) -> Result<Vec<u8>, GetError> {
    let mut f = open_with_mode(path, mode, false)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf).map_err(|e| GetError::io(path, e))?;
    Ok(buf)
}

/// Parses the first YAML document in `bytes`. Empty input is `null`.
pub(crate) fn parse_document(path: &Path, bytes: &[u8]) -> Result<Value, GetError> {
    match serde_yaml::Deserializer::from_slice(bytes).next() {
        Some(doc) => Value::deserialize(doc).map_err(|source| GetError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        None => Ok(Value::Null),
    }
}

/// Truncates `path` and writes `bytes` as its entire content.
pub(crate) fn write_output(path: &Path, mode: u32, bytes: &[u8]) -> Result<(), GetError> {
    let mut f = open_with_mode(path, mode, true)?;
    f.write_all(bytes).map_err(|e| GetError::io(path, e))?;
    f.flush().map_err(|e| GetError::io(path, e))
}

/// What the query selected. Borrows from the parsed document.
pub(super) enum Selection<'a> {
    One(&'a Value),
    /// Only produced when the caller allows list results.
    Many(Vec<&'a Value>),
}

impl Serialize for Selection<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selection::One(v) => v.serialize(serializer),
            Selection::Many(vs) => vs.serialize(serializer),
        }
    }
}

/// `{key: value}` without copying `value`.
pub(super) struct Keyed<K, T> {
    pub(super) key: K,
    pub(super) value: T,
}

impl<K: Serialize, T: Serialize> Serialize for Keyed<K, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.value)?;
        map.end()
    }
}

/// Runs `path` against `doc` and encodes the result.
///
/// No match encodes to nothing. More than one match is an error unless
/// `allow_list`, in which case all matches are encoded as a sequence. A
/// non-empty `new_key` wraps the result in a single-entry mapping.
pub(crate) fn extract(
    doc: &Value,
    path: &YamlPath,
    allow_list: bool,
    new_key: &str,
) -> Result<Vec<u8>, GetError> {
    let mut found = path.find(doc);
    let selection = match found.len() {
        0 => return Ok(Vec::new()),
        1 => Selection::One(found.remove(0)),
        n if !allow_list => return Err(GetError::TooManyResults(n)),
        _ => Selection::Many(found),
    };

    let text = match emit::to_string(&selection, new_key) {
        Ok(text) => text,
        Err(EmitError::Yaml(e)) => return Err(GetError::Serialize(e)),
        Err(EmitError::ComplexKey) => {
            tracing::debug!("complex mapping key, using serde_yaml layout");
            if new_key.is_empty() {
                serde_yaml::to_string(&selection)
            } else {
                serde_yaml::to_string(&Keyed {
                    key: new_key,
                    value: &selection,
                })
            }
            .map_err(GetError::Serialize)?
        }
    };
    Ok(text.into_bytes())
}
