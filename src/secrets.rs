//! Secret derivation from `--env NAME=VALUE` flags.
//!
//! Each well-formed entry becomes an environment variable for the BuildKit
//! client plus a secret mount wired to that same variable, so values reach
//! the build without ever appearing on a command line. The parse is
//! permissive: unrelated or malformed tokens are dropped, never fatal.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};
use tracing::debug;

/// Derived secret state for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretSet {
    /// Environment overlay for the BuildKit client process, keyed by name.
    /// Last write wins for duplicated names.
    pub overlay: BTreeMap<String, String>,
    /// `--secret=id=NAME,env=NAME` descriptors, one per entry.
    pub mounts: Vec<String>,
    /// Digest over the sorted secret values; absent when no entries parsed.
    pub hash: Option<String>,
}

/// Parse raw `NAME=VALUE` entries into a [`SecretSet`].
///
/// Entries without `=`, or with an empty name or value, are skipped. A value
/// may itself contain `=`; only the first one splits.
pub fn derive(entries: &[String]) -> SecretSet {
    let mut overlay = BTreeMap::new();
    for entry in entries {
        let Some((name, value)) = entry.split_once('=') else {
            debug!(entry = %entry, "skipping env entry without '='");
            continue;
        };
        if name.is_empty() || value.is_empty() {
            debug!(entry = %entry, "skipping env entry with empty name or value");
            continue;
        }
        overlay.insert(name.to_string(), value.to_string());
    }

    let mounts = overlay
        .keys()
        .map(|name| format!("--secret=id={name},env={name}"))
        .collect();
    let hash = hash_values(&overlay);

    SecretSet {
        overlay,
        mounts,
        hash,
    }
}

/// SHA-256 over the values only, sorted then concatenated, as lowercase hex.
///
/// Names never enter the digest: two assignments with the same multiset of
/// values collide. This is a deliberate coarse "secret content changed"
/// signal for cache scoping, not an identity of the name-to-value mapping.
fn hash_values(overlay: &BTreeMap<String, String>) -> Option<String> {
    if overlay.is_empty() {
        return None;
    }
    let mut values: Vec<&str> = overlay.values().map(String::as_str).collect();
    values.sort_unstable();

    let mut hasher = Sha256::new();
    for value in values {
        hasher.update(value.as_bytes());
    }
    Some(hex::encode(hasher.finalize()))
}
