//! In-process schema registry
//!
//! Follows the registry's observable semantics: identical schema text maps
//! to one ID across subjects, re-registering under a subject is
//! idempotent, new versions must be able to read the latest version, and
//! deleting a subject drops every ID no other subject still references.

use crate::client::SchemaRegistry;
use crate::context::RequestContext;
use crate::error::{RegistryError, Result};
use crate::schema::{RegisteredSchema, SchemaType};
use async_trait::async_trait;
use regcodec_schema::{TypeDescriptor, check_compatible};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Debug)]
struct State {
    next_id: u32,
    /// ID -> schema text
    schemas: HashMap<u32, String>,
    /// schema text -> ID
    ids: HashMap<String, u32>,
    /// subject -> schema ID per version (version = index + 1)
    subjects: BTreeMap<String, Vec<u32>>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            next_id: 1,
            schemas: HashMap::new(),
            ids: HashMap::new(),
            subjects: BTreeMap::new(),
        }
    }
}

/// In-memory registry
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    state: RwLock<State>,
}

impl MemoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live schema IDs
    pub async fn schema_count(&self) -> usize {
        self.state.read().await.schemas.len()
    }
}

#[async_trait]
impl SchemaRegistry for MemoryRegistry {
    async fn register(
        &self,
        subject: &str,
        descriptor: &TypeDescriptor,
        ctx: &RequestContext,
    ) -> Result<u32> {
        ctx.run(async {
            let text = descriptor.to_proto();
            let mut state = self.state.write().await;
            let existing = state.ids.get(&text).copied();

            if let Some(versions) = state.subjects.get(subject) {
                if let Some(id) = existing.filter(|id| versions.contains(id)) {
                    tracing::debug!(subject, schema_id = id, "schema already registered under subject");
                    return Ok(id);
                }
                if let Some(latest) = versions.last().and_then(|id| state.schemas.get(id)) {
                    let latest = TypeDescriptor::from_proto(latest)
                        .map_err(|e| RegistryError::InvalidSchema(e.to_string()))?;
                    check_compatible(&latest, descriptor).map_err(|e| {
                        RegistryError::Incompatible {
                            subject: subject.to_string(),
                            message: e.to_string(),
                        }
                    })?;
                }
            }

            let id = match existing {
                Some(id) => id,
                None => {
                    let id = state.next_id;
                    state.next_id += 1;
                    state.schemas.insert(id, text.clone());
                    state.ids.insert(text, id);
                    id
                }
            };
            state.subjects.entry(subject.to_string()).or_default().push(id);

            tracing::debug!(subject, schema_id = id, "registered schema in memory registry");
            Ok(id)
        })
        .await
    }

    async fn fetch_schema(&self, id: u32, ctx: &RequestContext) -> Result<RegisteredSchema> {
        ctx.run(async {
            let state = self.state.read().await;
            let schema = state
                .schemas
                .get(&id)
                .ok_or(RegistryError::SchemaNotFound(id))?;
            Ok(RegisteredSchema {
                id,
                subject: None,
                version: None,
                schema_type: SchemaType::Protobuf,
                schema: schema.clone(),
            })
        })
        .await
    }

    async fn delete_subject(&self, subject: &str, ctx: &RequestContext) -> Result<Vec<u32>> {
        ctx.run(async {
            let mut state = self.state.write().await;
            let removed = state
                .subjects
                .remove(subject)
                .ok_or_else(|| RegistryError::SubjectNotFound(subject.to_string()))?;

            for id in &removed {
                let still_used = state.subjects.values().any(|ids| ids.contains(id));
                if !still_used {
                    if let Some(text) = state.schemas.remove(id) {
                        state.ids.remove(&text);
                    }
                }
            }

            tracing::debug!(subject, versions = removed.len(), "deleted subject from memory registry");
            Ok((1..=removed.len() as u32).collect())
        })
        .await
    }

    async fn latest_schema(&self, subject: &str, ctx: &RequestContext) -> Result<RegisteredSchema> {
        ctx.run(async {
            let state = self.state.read().await;
            let versions = state
                .subjects
                .get(subject)
                .filter(|versions| !versions.is_empty())
                .ok_or_else(|| RegistryError::SubjectNotFound(subject.to_string()))?;
            let id = versions[versions.len() - 1];
            let schema = state
                .schemas
                .get(&id)
                .ok_or(RegistryError::SchemaNotFound(id))?;
            Ok(RegisteredSchema {
                id,
                subject: Some(subject.to_string()),
                version: Some(versions.len() as u32),
                schema_type: SchemaType::Protobuf,
                schema: schema.clone(),
            })
        })
        .await
    }

    async fn subjects(&self, ctx: &RequestContext) -> Result<Vec<String>> {
        ctx.run(async { Ok(self.state.read().await.subjects.keys().cloned().collect()) })
            .await
    }
}
