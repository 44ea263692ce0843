//! Patch fields that distinguish "absent" from an explicit `null`
//!
//! Use as `#[serde(default, deserialize_with = "nullable::deserialize")]` on an
//! `Option<Option<T>>`: a missing key stays `None`, `null` becomes
//! `Some(None)` (clear the value) and anything else becomes `Some(Some(v))`.

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
