use super::types::{MutationOutcome, SkipReason, StoreSnapshot};
use crate::config::store_settings::{ReorderPolicy, StoreSettings};
use crate::domain::floor::{Floor, Identified, PageConfig};
use crate::domain::types::{Channel, CustomerSegment};
use crate::engine::events::{
    StoreEvent, StoreEventType, StoreSubscriber, SubscriberList, SubscriptionId,
};
use crate::engine::identity::{generate_id, now_string};
use crate::engine::ordering::{is_dense, renumber, sort_by_position, Positioned};
use crate::engine::seed::create_initial_page_config;
use crate::engine::segment_filter::filter_by_segment;
use crate::repository::background_writer::FailureHook;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::snapshot_repo::SnapshotPersistence;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

// ==========================================
// FloorStore - 配置状态存储
// ==========================================
// 并发模型:
// - state: 当前快照的根引用, 读者 clone Arc 后无锁读取
// - write_lock: 串行化 变更 → 持久化 → 通知, 保证订阅者按代数顺序收到事件
pub struct FloorStore {
    state: RwLock<Arc<StoreSnapshot>>,
    write_lock: Mutex<()>,
    persistence: Arc<dyn SnapshotPersistence>,
    subscribers: SubscriberList,
    pub(super) settings: StoreSettings,
}

impl FloorStore {
    /// 加载快照并打开 Store
    ///
    /// # 说明
    /// 1. 从持久化层加载 (加载失败直接返回错误, 避免种子数据覆盖已有配置)
    /// 2. 修复顺序号不连续的历史数据
    /// 3. 为缺失的渠道生成初始配置
    /// 4. 有修复或新生成时写回一次
    pub fn open(
        persistence: Arc<dyn SnapshotPersistence>,
        settings: StoreSettings,
    ) -> RepositoryResult<Self> {
        let mut page_configs = persistence.load()?.unwrap_or_default();

        let repaired = normalize_page_configs(&mut page_configs);
        if repaired > 0 {
            tracing::warn!(repaired, "加载的快照存在重复 ID 或顺序号缺口, 已修复");
        }

        let mut seeded = Vec::new();
        for channel in Channel::ALL {
            if !page_configs.iter().any(|config| config.channel == channel) {
                page_configs.push(create_initial_page_config(
                    channel,
                    settings.seed_validity_days,
                ));
                seeded.push(channel);
            }
        }
        for channel in &seeded {
            tracing::info!(channel = %channel, "渠道无页面配置, 已生成初始配置");
        }

        let snapshot = Arc::new(StoreSnapshot {
            generation: 0,
            page_configs,
        });

        let store = Self {
            state: RwLock::new(Arc::clone(&snapshot)),
            write_lock: Mutex::new(()),
            persistence,
            subscribers: SubscriberList::new(),
            settings,
        };

        if repaired > 0 || !seeded.is_empty() {
            store.persist(&snapshot);
        }

        Ok(store)
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 当前快照（不可变）
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// 当前快照代数
    pub fn generation(&self) -> u64 {
        self.snapshot().generation
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// 全部渠道配置（副本）
    pub fn page_configs(&self) -> Vec<PageConfig> {
        self.snapshot().page_configs.clone()
    }

    pub fn get_page_config(&self, channel: Channel) -> Option<PageConfig> {
        self.snapshot().page_config(channel).cloned()
    }

    /// 渠道楼层列表, 按 priority 升序
    pub fn get_floors(&self, channel: Channel) -> Vec<Floor> {
        self.snapshot()
            .page_config(channel)
            .map(|config| sort_by_position(&config.floors))
            .unwrap_or_default()
    }

    /// 按客群筛选楼层, 保持 priority 升序
    pub fn get_floors_by_segment(&self, channel: Channel, segment: CustomerSegment) -> Vec<Floor> {
        filter_by_segment(self.get_floors(channel), segment)
    }

    pub fn get_floor_by_id(&self, channel: Channel, floor_id: &str) -> Option<Floor> {
        self.snapshot()
            .page_config(channel)
            .and_then(|config| config.find_floor(floor_id))
            .cloned()
    }

    // ==========================================
    // 订阅
    // ==========================================

    pub fn subscribe(&self, subscriber: Arc<dyn StoreSubscriber>) -> SubscriptionId {
        self.subscribers.subscribe(subscriber)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // ==========================================
    // 变更骨架
    // ==========================================

    /// 在渠道配置的完整副本上执行变更并发布
    ///
    /// apply 返回 Ok(target_id) 表示生效, Err(reason) 表示放弃（不做任何改动）。
    /// 页面 updatedAt 由此处统一刷新。
    pub(super) fn mutate<F>(
        &self,
        channel: Channel,
        event_type: StoreEventType,
        apply: F,
    ) -> MutationOutcome
    where
        F: FnOnce(&mut PageConfig, &str) -> Result<String, SkipReason>,
    {
        let _writer = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.snapshot();
        let mut page_configs = current.page_configs.clone();

        let Some(page) = page_configs.iter_mut().find(|config| config.channel == channel) else {
            return self.skipped(channel, event_type, SkipReason::PageConfigMissing { channel });
        };

        let now = now_string();
        let target_id = match apply(page, &now) {
            Ok(target_id) => target_id,
            Err(reason) => return self.skipped(channel, event_type, reason),
        };
        page.updated_at = now;

        debug_assert!(
            page_is_dense(page),
            "priority/order 编号不连续: channel={}",
            channel
        );

        let next = Arc::new(StoreSnapshot {
            generation: current.generation + 1,
            page_configs,
        });
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            *state = Arc::clone(&next);
        }

        tracing::info!(
            channel = %channel,
            event_type = event_type.as_str(),
            target_id = %target_id,
            generation = next.generation,
            "配置变更已生效"
        );

        self.persist(&next);

        let event = StoreEvent::new(
            next.generation,
            event_type,
            Some(channel),
            Some(target_id.clone()),
        );
        self.subscribers.broadcast(&event, &next.page_configs);

        MutationOutcome::Applied { target_id }
    }

    fn skipped(
        &self,
        channel: Channel,
        event_type: StoreEventType,
        reason: SkipReason,
    ) -> MutationOutcome {
        tracing::debug!(
            channel = %channel,
            event_type = event_type.as_str(),
            reason = %reason,
            "配置变更未执行"
        );
        MutationOutcome::Skipped(reason)
    }

    /// 尽力持久化: 失败只记录并通知, 不回滚内存状态
    fn persist(&self, snapshot: &StoreSnapshot) {
        if let Err(e) = self.persistence.save(&snapshot.page_configs) {
            tracing::error!(
                generation = snapshot.generation,
                error = %e,
                "配置快照持久化失败, 内存状态保持不变"
            );
            self.broadcast_persist_failure(snapshot, &e);
        }
    }

    fn broadcast_persist_failure(&self, snapshot: &StoreSnapshot, error: &RepositoryError) {
        let event = StoreEvent::new(snapshot.generation, StoreEventType::PersistFailed, None, None)
            .with_detail(error.to_string());
        self.subscribers.broadcast(&event, &snapshot.page_configs);
    }

    /// 报告异步写入失败, 以当前快照广播 PersistFailed
    pub fn report_persist_failure(&self, error: &RepositoryError) {
        let _writer = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot();
        self.broadcast_persist_failure(&snapshot, error);
    }

    /// 供 BackgroundSnapshotWriter 使用的失败回调（弱引用, Store 释放后失效）
    pub fn persist_failure_hook(self: &Arc<Self>) -> FailureHook {
        let store = Arc::downgrade(self);
        Arc::new(move |error: &RepositoryError| {
            if let Some(store) = store.upgrade() {
                store.report_persist_failure(error);
            }
        })
    }

    pub(super) fn reorder_policy(&self) -> ReorderPolicy {
        self.settings.reorder_policy
    }
}

// ==========================================
// 内部工具
// ==========================================

/// 按 ID 列表重排并重新编号
///
/// - 未知 ID 与重复 ID 被忽略
/// - DropMissing: 列表未覆盖的条目被移除
/// - RejectPartial: 列表未覆盖全部条目时放弃
///
/// # 返回
/// - (重排后的条目, 被移除的条目数)
pub(super) fn reorder_by_ids<T, S>(
    items: &[T],
    ids: &[S],
    policy: ReorderPolicy,
) -> Result<(Vec<T>, usize), SkipReason>
where
    T: Identified + Positioned + Clone,
    S: AsRef<str>,
{
    let by_id: HashMap<&str, &T> = items.iter().map(|item| (item.id(), item)).collect();
    let mut taken: HashSet<&str> = HashSet::with_capacity(ids.len());
    let mut ordered: Vec<T> = Vec::with_capacity(ids.len());

    for id in ids {
        let id = id.as_ref();
        if let Some(item) = by_id.get(id) {
            if taken.insert(item.id()) {
                ordered.push((*item).clone());
            }
        }
    }

    if policy == ReorderPolicy::RejectPartial && ordered.len() != items.len() {
        return Err(SkipReason::PartialReorderRejected {
            expected: items.len(),
            matched: ordered.len(),
        });
    }

    let dropped = items.len() - ordered.len();
    Ok((renumber(ordered), dropped))
}

/// 楼层与图片编号是否均连续
pub(super) fn page_is_dense(page: &PageConfig) -> bool {
    is_dense(&page.floors) && page.floors.iter().all(|floor| is_dense(&floor.images))
}

/// 加载后规范化: 渠道去重, 重复的楼层/图片 ID 重新生成, 楼层/图片按现有编号排序后重新编号
///
/// # 返回
/// - 被修复的集合数量
fn normalize_page_configs(page_configs: &mut Vec<PageConfig>) -> usize {
    let mut repaired = 0;

    let mut seen = HashSet::new();
    page_configs.retain(|config| {
        let first = seen.insert(config.channel);
        if !first {
            tracing::warn!(channel = %config.channel, page_id = %config.id, "重复的渠道配置已忽略");
            repaired += 1;
        }
        first
    });

    for config in page_configs.iter_mut() {
        // 重排按 ID 定位条目, ID 必须唯一
        let mut floor_ids = HashSet::new();
        let mut image_ids = HashSet::new();
        for floor in config.floors.iter_mut() {
            if !floor_ids.insert(floor.id.clone()) {
                let fresh = generate_id();
                tracing::warn!(channel = %config.channel, old_id = %floor.id, new_id = %fresh, "重复的楼层 ID 已重新生成");
                floor.id = fresh.clone();
                floor_ids.insert(fresh);
                repaired += 1;
            }
            for image in floor.images.iter_mut() {
                if !image_ids.insert(image.id.clone()) {
                    let fresh = generate_id();
                    tracing::warn!(channel = %config.channel, floor_id = %floor.id, old_id = %image.id, new_id = %fresh, "重复的图片 ID 已重新生成");
                    image.id = fresh.clone();
                    image_ids.insert(fresh);
                    repaired += 1;
                }
            }
        }

        let floors = renumber(sort_by_position(&config.floors));
        if floors != config.floors {
            config.floors = floors;
            repaired += 1;
        }
        for floor in config.floors.iter_mut() {
            let images = renumber(sort_by_position(&floor.images));
            if images != floor.images {
                floor.images = images;
                repaired += 1;
            }
        }
    }

    repaired
}
