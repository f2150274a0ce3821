// ==========================================
// 楼层配置中心 - 配置变更事件
// ==========================================
// 职责: 定义变更事件与订阅者 trait
// 说明: Store 在每次变更后同步通知订阅者 (渲染/预览端)
// ==========================================

use crate::domain::floor::PageConfig;
use crate::domain::types::Channel;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

// ==========================================
// 事件类型
// ==========================================

/// 配置变更事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreEventType {
    FloorAdded,
    FloorUpdated,
    FloorDeleted,
    FloorDuplicated,
    FloorsReordered,
    ImageAdded,
    ImageUpdated,
    ImageDeleted,
    ImagesReordered,
    /// 旧版广告楼层导入
    LegacyFloorsImported,
    /// 快照持久化失败（内存状态不回滚）
    PersistFailed,
}

impl StoreEventType {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            StoreEventType::FloorAdded => "FloorAdded",
            StoreEventType::FloorUpdated => "FloorUpdated",
            StoreEventType::FloorDeleted => "FloorDeleted",
            StoreEventType::FloorDuplicated => "FloorDuplicated",
            StoreEventType::FloorsReordered => "FloorsReordered",
            StoreEventType::ImageAdded => "ImageAdded",
            StoreEventType::ImageUpdated => "ImageUpdated",
            StoreEventType::ImageDeleted => "ImageDeleted",
            StoreEventType::ImagesReordered => "ImagesReordered",
            StoreEventType::LegacyFloorsImported => "LegacyFloorsImported",
            StoreEventType::PersistFailed => "PersistFailed",
        }
    }
}

/// 配置变更事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEvent {
    /// 快照代数（每次成功变更 +1）
    pub generation: u64,
    pub event_type: StoreEventType,
    pub channel: Option<Channel>,
    /// 受影响的楼层/图片 ID
    pub target_id: Option<String>,
    /// 附加说明（如持久化错误信息）
    pub detail: Option<String>,
}

impl StoreEvent {
    pub fn new(
        generation: u64,
        event_type: StoreEventType,
        channel: Option<Channel>,
        target_id: Option<String>,
    ) -> Self {
        Self {
            generation,
            event_type,
            channel,
            target_id,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ==========================================
// 订阅者 Trait
// ==========================================

/// 配置变更订阅者
///
/// # 实现说明
/// - 新快照发布后、同一写入序列内被同步调用（写入互斥锁仍被持有）
/// - 收到的 page_configs 即本次变更后的完整快照
/// - 不得在回调中再次调用 Store 的变更方法
pub trait StoreSubscriber: Send + Sync {
    fn notify(&self, event: &StoreEvent, page_configs: &[PageConfig]);
}

/// 空操作订阅者（单元测试用）
#[derive(Debug, Clone, Default)]
pub struct NoOpSubscriber;

impl StoreSubscriber for NoOpSubscriber {
    fn notify(&self, event: &StoreEvent, _page_configs: &[PageConfig]) {
        tracing::trace!(
            generation = event.generation,
            event_type = event.event_type.as_str(),
            "NoOpSubscriber: 忽略事件"
        );
    }
}

/// 闭包订阅者
pub struct FnSubscriber<F>(pub F);

impl<F> StoreSubscriber for FnSubscriber<F>
where
    F: Fn(&StoreEvent, &[PageConfig]) + Send + Sync,
{
    fn notify(&self, event: &StoreEvent, page_configs: &[PageConfig]) {
        (self.0)(event, page_configs)
    }
}

/// 订阅句柄（用于取消订阅）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// ==========================================
// SubscriberList - 订阅者列表
// ==========================================
#[derive(Default)]
pub struct SubscriberList {
    next_id: AtomicU64,
    inner: RwLock<Vec<(SubscriptionId, Arc<dyn StoreSubscriber>)>>,
}

impl SubscriberList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, subscriber: Arc<dyn StoreSubscriber>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.push((id, subscriber));
        id
    }

    /// 取消订阅，返回是否存在该订阅
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let before = guard.len();
        guard.retain(|(sid, _)| *sid != id);
        guard.len() != before
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 依订阅顺序同步广播
    pub fn broadcast(&self, event: &StoreEvent, page_configs: &[PageConfig]) {
        // 先复制列表, 避免回调期间持有锁
        let subscribers: Vec<Arc<dyn StoreSubscriber>> = self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();

        tracing::debug!(
            generation = event.generation,
            event_type = event.event_type.as_str(),
            subscribers = subscribers.len(),
            "广播配置变更事件"
        );

        for subscriber in subscribers {
            subscriber.notify(event, page_configs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_event_builder() {
        let event = StoreEvent::new(3, StoreEventType::FloorAdded, Some(Channel::Mobile), Some("f1".to_string()))
            .with_detail("ok");
        assert_eq!(event.generation, 3);
        assert_eq!(event.event_type.as_str(), "FloorAdded");
        assert_eq!(event.detail.as_deref(), Some("ok"));
    }

    #[test]
    fn test_broadcast_and_unsubscribe() {
        let list = SubscriberList::new();
        let seen: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = list.subscribe(Arc::new(FnSubscriber(move |event: &StoreEvent, _: &[PageConfig]| {
            sink.lock().unwrap().push(event.generation);
        })));
        list.subscribe(Arc::new(NoOpSubscriber));
        assert_eq!(list.len(), 2);

        list.broadcast(&StoreEvent::new(1, StoreEventType::FloorAdded, None, None), &[]);
        assert!(list.unsubscribe(id));
        assert!(!list.unsubscribe(id));
        list.broadcast(&StoreEvent::new(2, StoreEventType::FloorAdded, None, None), &[]);

        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert_eq!(list.len(), 1);
    }
}
