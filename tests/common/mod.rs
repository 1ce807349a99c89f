//! 集成测试共用的事件类型与 Registry 包装

#![allow(dead_code)]

use async_trait::async_trait;
use regcodec::prelude::*;
use regcodec::regcodec_registry::{self, RegisteredSchema, RegistryError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, PartialEq, prost::Message)]
pub struct Order {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(string, tag = "2")]
    pub name: String,
}

impl EventType for Order {
    fn describe() -> DescriptorBuilder {
        DescriptorBuilder::new("Order")
            .field(1, "id", FieldKind::Int64)
            .field(2, "name", FieldKind::String)
    }
}

pub fn order(id: i64, name: &str) -> Order {
    Order {
        id,
        name: name.to_string(),
    }
}

/// 可注入故障和延迟的 Registry
pub struct FlakyRegistry {
    pub inner: MemoryRegistry,
    pub fail_register: AtomicBool,
    pub fail_delete: AtomicBool,
    pub register_delay: Duration,
    pub deletes: AtomicUsize,
}

impl FlakyRegistry {
    pub fn new() -> Self {
        Self {
            inner: MemoryRegistry::new(),
            fail_register: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            register_delay: Duration::ZERO,
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn with_register_delay(mut self, delay: Duration) -> Self {
        self.register_delay = delay;
        self
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchemaRegistry for FlakyRegistry {
    async fn register(
        &self,
        subject: &str,
        descriptor: &TypeDescriptor,
        ctx: &RequestContext,
    ) -> regcodec_registry::Result<u32> {
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(RegistryError::Unauthorized("bad credentials".to_string()));
        }
        let delay = self.register_delay;
        ctx.run(async move {
            tokio::time::sleep(delay).await;
            Ok(())
        })
        .await?;
        self.inner.register(subject, descriptor, ctx).await
    }

    async fn fetch_schema(
        &self,
        id: u32,
        ctx: &RequestContext,
    ) -> regcodec_registry::Result<RegisteredSchema> {
        self.inner.fetch_schema(id, ctx).await
    }

    async fn delete_subject(
        &self,
        subject: &str,
        ctx: &RequestContext,
    ) -> regcodec_registry::Result<Vec<u32>> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(RegistryError::Server {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        self.inner.delete_subject(subject, ctx).await
    }

    async fn latest_schema(
        &self,
        subject: &str,
        ctx: &RequestContext,
    ) -> regcodec_registry::Result<RegisteredSchema> {
        self.inner.latest_schema(subject, ctx).await
    }

    async fn subjects(&self, ctx: &RequestContext) -> regcodec_registry::Result<Vec<String>> {
        self.inner.subjects(ctx).await
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("regcodec=debug")
        .try_init();
}

pub fn shared(registry: FlakyRegistry) -> (Arc<FlakyRegistry>, Arc<dyn SchemaRegistry>) {
    let registry = Arc::new(registry);
    let dyn_registry: Arc<dyn SchemaRegistry> = registry.clone();
    (registry, dyn_registry)
}
