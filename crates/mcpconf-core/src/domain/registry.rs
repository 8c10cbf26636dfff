//! Canonical registry document
//!
//! The on-disk form is the only lossless representation:
//!
//! ```yaml
//! version: "1.0"
//! servers:
//!   weather:
//!     name: Weather
//!     deployment: local
//!     config: { transport: stdio, command: uv }
//! categories:
//!   utilities: [weather]
//! ```
//!
//! Supports both formats for `servers` on load:
//! - **Keyed object**: `{ "servers": { "weather": { ... } } }`
//! - **Array**: `{ "servers": [{ "id": "weather", ... }] }`
//!
//! Saving always writes the keyed form.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::ServerEntry;

/// Registry format version written by this crate
pub const REGISTRY_SCHEMA_VERSION: &str = "1.0";

/// Top-level registry container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// Format version
    pub version: String,

    /// Server id to entry, in insertion order
    #[serde(deserialize_with = "deserialize_servers")]
    pub servers: IndexMap<String, ServerEntry>,

    /// Category name to member ids
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub categories: IndexMap<String, Vec<String>>,
}

/// Deserialize servers from either array or keyed object format.
///
/// Duplicate ids are rejected instead of letting the later entry shadow the
/// earlier one, and each entry's id is taken from its key.
fn deserialize_servers<'de, D>(deserializer: D) -> Result<IndexMap<String, ServerEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use std::fmt;

    struct ServersVisitor;

    impl<'de> Visitor<'de> for ServersVisitor {
        type Value = IndexMap<String, ServerEntry>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of server IDs to servers, or an array of servers")
        }

        // Handle keyed object: { "id1": {...}, "id2": {...} }
        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut servers = IndexMap::new();
            while let Some((key, mut server)) = map.next_entry::<String, ServerEntry>()? {
                if key.trim().is_empty() {
                    return Err(de::Error::custom("server id must not be empty"));
                }
                if !server.id.is_empty() && server.id != key {
                    return Err(de::Error::custom(format!(
                        "server '{}' declares a different id '{}'",
                        key, server.id
                    )));
                }
                if servers.contains_key(&key) {
                    return Err(de::Error::custom(format!("duplicate server id '{}'", key)));
                }
                server.id = key.clone();
                servers.insert(key, server);
            }
            Ok(servers)
        }

        // Handle array: [{ "id": "...", ... }, { "id": "...", ... }]
        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut servers = IndexMap::new();
            while let Some(server) = seq.next_element::<ServerEntry>()? {
                if server.id.trim().is_empty() {
                    return Err(de::Error::custom("server in array must have an 'id' field"));
                }
                if servers.contains_key(&server.id) {
                    return Err(de::Error::custom(format!(
                        "duplicate server id '{}'",
                        server.id
                    )));
                }
                servers.insert(server.id.clone(), server);
            }
            Ok(servers)
        }
    }

    deserializer.deserialize_any(ServersVisitor)
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            version: REGISTRY_SCHEMA_VERSION.to_string(),
            servers: IndexMap::new(),
            categories: IndexMap::new(),
        }
    }

    /// Get a server by ID
    pub fn get(&self, id: &str) -> Option<&ServerEntry> {
        self.servers.get(id)
    }

    /// List all server IDs in insertion order
    pub fn server_ids(&self) -> Vec<&str> {
        self.servers.keys().map(|s| s.as_str()).collect()
    }

    /// Member ids of a category, empty if the category does not exist
    pub fn category(&self, name: &str) -> &[String] {
        self.categories.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
