//! Collision-free identifiers for generated fields and methods.
//!
//! Binding names are arbitrary user strings, so generated identifiers are derived as
//! `prefix + hex(sha256(key))`. The result is stable across rebuilds, valid as a Rust
//! identifier and independent of the order in which keys are allocated.

use crate::error::{BinderError, BinderResult};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Number of hex characters kept from the digest (160 bits).
const HASH_HEX_LEN: usize = 40;

/// What an identifier names. Each kind has its own prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Pool handle field.
    Pool,
    /// Injected customization field.
    Customization,
    /// Producer method.
    Producer,
}

impl FieldKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Pool => "pool_",
            Self::Customization => "customization_",
            Self::Producer => "produce_",
        }
    }
}

/// Deterministic content hash, hex encoded and truncated.
pub fn stable_hash(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(HASH_HEX_LEN);
    encoded
}

/// Allocated identifier and whether it was created by this call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub identifier: String,
    /// False when the same `(kind, key)` was allocated before.
    pub fresh: bool,
}

/// Hands out identifiers for one synthesis pass.
#[derive(Debug)]
pub struct IdentifierAllocator {
    hasher: fn(&str) -> String,
    /// identifier -> (kind, key) it was allocated for
    allocated: HashMap<String, (FieldKind, Option<String>)>,
}

impl IdentifierAllocator {
    /// Create an allocator using [`stable_hash`].
    pub fn new() -> Self {
        Self::with_hasher(stable_hash)
    }

    /// Create an allocator with a custom hash function.
    pub fn with_hasher(hasher: fn(&str) -> String) -> Self {
        Self {
            hasher,
            allocated: HashMap::new(),
        }
    }

    /// Allocate the identifier for a user-supplied key.
    ///
    /// Fails if the derived identifier is already taken by a different key.
    pub fn allocate(&mut self, kind: FieldKind, key: &str) -> BinderResult<Allocation> {
        let identifier = format!("{}{}", kind.prefix(), (self.hasher)(key));
        self.claim(identifier, kind, Some(key))
    }

    /// Allocate the fixed identifier used by the default binding.
    pub fn allocate_default(&mut self, kind: FieldKind) -> BinderResult<Allocation> {
        let identifier = format!("{}default", kind.prefix());
        self.claim(identifier, kind, None)
    }

    /// Number of distinct identifiers handed out.
    pub fn len(&self) -> usize {
        self.allocated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocated.is_empty()
    }

    fn claim(
        &mut self,
        identifier: String,
        kind: FieldKind,
        key: Option<&str>,
    ) -> BinderResult<Allocation> {
        match self.allocated.get(&identifier) {
            Some((existing_kind, existing_key))
                if *existing_kind == kind && existing_key.as_deref() == key =>
            {
                Ok(Allocation {
                    identifier,
                    fresh: false,
                })
            }
            Some((_, existing_key)) => Err(BinderError::identifier_collision(
                identifier,
                existing_key.as_deref().unwrap_or("<default>"),
                key.unwrap_or("<default>"),
            )),
            None => {
                self.allocated
                    .insert(identifier.clone(), (kind, key.map(String::from)));
                Ok(Allocation {
                    identifier,
                    fresh: true,
                })
            }
        }
    }
}

impl Default for IdentifierAllocator {
    fn default() -> Self {
        Self::new()
    }
}
