//! Content digests for raw projections.
//!
//! A projection is serialized to JSON, numbers are normalized (integer-valued
//! floats become integers) and object keys are sorted, then the compact form
//! is hashed with SHA-256. Two projections with the same records produce the
//! same digest regardless of how their metric maps were built.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::error::{ChartError, Result};
use crate::domain::RawProjection;

fn normalize_value(value: &serde_json::Value) -> Result<serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => {
            let mut normalized = serde_json::Map::new();
            for (k, v) in map.iter() {
                normalized.insert(k.clone(), normalize_value(v)?);
            }
            Ok(serde_json::Value::Object(normalized))
        }
        serde_json::Value::Array(arr) => {
            let normalized = arr
                .iter()
                .map(normalize_value)
                .collect::<Result<Vec<_>>>()?;
            Ok(serde_json::Value::Array(normalized))
        }
        serde_json::Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return Ok(serde_json::Value::Number(n.clone()));
            }
            match n.as_f64() {
                Some(f) if !f.is_finite() => Err(ChartError::OutOfRange { value: f }),
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                    Ok(serde_json::Value::Number(serde_json::Number::from(f as i64)))
                }
                _ => Ok(serde_json::Value::Number(n.clone())),
            }
        }
        other => Ok(other.clone()),
    }
}

/// Canonical compact JSON for any serializable value.
///
/// `serde_json::Map` keeps keys sorted, so only number normalization is
/// needed on top of plain serialization.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let raw = serde_json::to_value(value)?;
    let normalized = normalize_value(&raw)?;
    Ok(serde_json::to_string(&normalized)?)
}

/// SHA-256 hex digest of a projection's canonical JSON.
pub fn projection_digest(projection: &RawProjection) -> Result<String> {
    let canonical = canonical_json(projection)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
