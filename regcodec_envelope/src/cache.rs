//! 写入方 schema 缓存
//!
//! 解码遇到非绑定 schema ID 时，按 ID 懒加载写入方的结构描述。

use parking_lot::RwLock;
use regcodec_core::CodecError;
use regcodec_registry::{RequestContext, SchemaRegistry};
use regcodec_schema::TypeDescriptor;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

type Slot = Arc<OnceCell<Arc<TypeDescriptor>>>;

/// schema 缓存
///
/// 索引只在查找和插入空槽位时短暂加锁；每个槽位是一个 `OnceCell`，
/// 同一 ID 的并发未命中只会触发一次 Registry 请求。失败不会写入槽位，
/// 空槽位会从索引中移除，下一次解码会重新获取。
#[derive(Debug, Default)]
pub struct SchemaCache {
    slots: RwLock<HashMap<u32, Slot>>,
}

impl SchemaCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取已缓存的结构描述
    pub fn get(&self, schema_id: u32) -> Option<Arc<TypeDescriptor>> {
        self.slots
            .read()
            .get(&schema_id)
            .and_then(|slot| slot.get().cloned())
    }

    /// 已缓存的条目数
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// 缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 读取或从 Registry 获取结构描述
    pub async fn get_or_fetch(
        &self,
        schema_id: u32,
        registry: &dyn SchemaRegistry,
        ctx: &RequestContext,
    ) -> Result<Arc<TypeDescriptor>, CodecError> {
        if let Some(descriptor) = self.get(schema_id) {
            return Ok(descriptor);
        }

        let slot = self.slot(schema_id);
        let fetched = slot
            .get_or_try_init(|| async {
                let schema = registry
                    .fetch_schema(schema_id, ctx)
                    .await
                    .map_err(|e| e.into_fetch(schema_id))?;
                let descriptor = schema.descriptor().map_err(|e| e.into_decode())?;
                tracing::debug!(
                    schema_id,
                    type_name = descriptor.name(),
                    correlation_id = ctx.correlation_id(),
                    "cached writer schema"
                );
                Ok::<_, CodecError>(Arc::new(descriptor))
            })
            .await;

        match fetched {
            Ok(descriptor) => Ok(descriptor.clone()),
            Err(err) => {
                self.evict_empty(schema_id, &slot);
                Err(err)
            }
        }
    }

    // 只移除仍未初始化的同一个槽位，其它任务可能已经重新获取成功
    fn evict_empty(&self, schema_id: u32, slot: &Slot) {
        let mut slots = self.slots.write();
        let stale = slots
            .get(&schema_id)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && !current.initialized());
        if stale {
            slots.remove(&schema_id);
        }
    }

    fn slot(&self, schema_id: u32) -> Slot {
        if let Some(slot) = self.slots.read().get(&schema_id) {
            return slot.clone();
        }
        self.slots.write().entry(schema_id).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regcodec_registry::MemoryRegistry;
    use regcodec_schema::{DescriptorBuilder, FieldKind};

    fn order() -> TypeDescriptor {
        DescriptorBuilder::new("Order")
            .field(1, "id", FieldKind::Int64)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_populates_cache() {
        let registry = MemoryRegistry::new();
        let ctx = RequestContext::new();
        let id = registry.register("orders", &order(), &ctx).await.unwrap();

        let cache = SchemaCache::new();
        assert!(cache.get(id).is_none());

        let descriptor = cache.get_or_fetch(id, &registry, &ctx).await.unwrap();
        assert_eq!(*descriptor, order());
        assert_eq!(cache.len(), 1);
        assert!(cache.get(id).is_some());
    }

    #[tokio::test]
    async fn test_unknown_schema_not_cached() {
        let registry = MemoryRegistry::new();
        let ctx = RequestContext::new();
        let cache = SchemaCache::new();

        let err = cache.get_or_fetch(42, &registry, &ctx).await.unwrap_err();
        assert!(matches!(err, CodecError::UnknownSchema(42)));
        assert!(cache.is_empty());

        // 注册后重试可以成功
        let id = registry.register("orders", &order(), &ctx).await.unwrap();
        assert!(cache.get_or_fetch(id, &registry, &ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_lookups_leave_no_slots() {
        let registry = MemoryRegistry::new();
        let ctx = RequestContext::new();
        let cache = SchemaCache::new();
        let id = registry.register("orders", &order(), &ctx).await.unwrap();
        cache.get_or_fetch(id, &registry, &ctx).await.unwrap();

        for unknown in 10_000..20_000u32 {
            assert!(cache.get_or_fetch(unknown, &registry, &ctx).await.is_err());
        }
        assert_eq!(cache.slots.read().len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_fetch_leaves_no_slot() {
        let registry = MemoryRegistry::new();
        let ctx = RequestContext::new();
        let id = registry.register("orders", &order(), &ctx).await.unwrap();

        let token = regcodec_registry::CancellationToken::new();
        token.cancel();
        let cancelled = RequestContext::new().with_cancellation(token);

        let cache = SchemaCache::new();
        assert!(cache.get_or_fetch(id, &registry, &cancelled).await.is_err());
        assert!(cache.slots.read().is_empty());
        assert!(cache.get_or_fetch(id, &registry, &ctx).await.is_ok());
    }
}
