//! GraphQL configuration.
//!
//! Configuration lives in `medrecords.toml` under the `[graphql]` section.
//!
//! # Example Configuration
//!
//! ```toml
//! [graphql]
//! introspection = true
//! playground = true
//! id_strategy = "client"
//! batch_loads = false
//! ```

use serde::{Deserialize, Serialize};

/// How `addFile` and `addComment` obtain the new document's key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Generate a UUID v4 up front and write one document whose body already
    /// carries it.
    #[default]
    Client,
    /// Let the store generate the key, then patch `id` into the body.
    /// Two writes; a crash in between leaves a document without `id`.
    Store,
}

impl IdStrategy {
    /// Returns the configuration name of the strategy.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Store => "store",
        }
    }
}

/// GraphQL API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLConfig {
    /// Enable GraphQL introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,

    /// Serve GraphiQL on `GET /` when no query is given.
    /// Default: true
    #[serde(default = "default_playground")]
    pub playground: bool,

    /// Key generation for created documents.
    /// Default: client
    #[serde(default)]
    pub id_strategy: IdStrategy,

    /// Share collection reads between sibling resolvers of one request.
    /// Default: false
    #[serde(default)]
    pub batch_loads: bool,
}

fn default_introspection() -> bool {
    true
}

fn default_playground() -> bool {
    true
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            introspection: default_introspection(),
            playground: default_playground(),
            id_strategy: IdStrategy::default(),
            batch_loads: false,
        }
    }
}

impl GraphQLConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are inconsistent.
    pub fn validate(&self) -> Result<(), String> {
        if self.playground && !self.introspection {
            return Err("graphql.playground requires graphql.introspection".into());
        }
        Ok(())
    }
}
