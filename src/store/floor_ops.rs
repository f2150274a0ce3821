use super::core::{reorder_by_ids, FloorStore};
use super::types::{MutationOutcome, SkipReason};
use crate::domain::floor::Floor;
use crate::domain::form::FloorFormData;
use crate::domain::legacy::AdFloor;
use crate::domain::types::Channel;
use crate::engine::events::StoreEventType;
use crate::engine::identity::generate_id;
use crate::engine::migration::ad_floor_into_floor;
use crate::engine::ordering::renumber;

// ==========================================
// 楼层级变更
// ==========================================
impl FloorStore {
    /// 新增楼层（追加到末尾, priority = 楼层数 + 1）
    pub fn add_floor(&self, channel: Channel, form: FloorFormData) -> MutationOutcome {
        self.mutate(channel, StoreEventType::FloorAdded, move |page, now| {
            let floor = Floor {
                id: generate_id(),
                name: form.name,
                floor_type: form.floor_type,
                images: Vec::new(),
                customer_segments: form.customer_segments,
                priority: page.floors.len() as u32 + 1,
                start_time: form.start_time,
                end_time: form.end_time,
                status: form.status,
                created_at: now.to_string(),
                updated_at: now.to_string(),
            };
            let floor_id = floor.id.clone();
            page.floors.push(floor);
            Ok(floor_id)
        })
    }

    /// 更新楼层基础信息（图片与 priority 不变）
    pub fn update_floor(&self, channel: Channel, floor_id: &str, form: FloorFormData) -> MutationOutcome {
        self.mutate(channel, StoreEventType::FloorUpdated, move |page, now| {
            let floor = page.find_floor_mut(floor_id).ok_or_else(|| SkipReason::FloorNotFound {
                floor_id: floor_id.to_string(),
            })?;
            floor.name = form.name;
            floor.floor_type = form.floor_type;
            floor.customer_segments = form.customer_segments;
            floor.start_time = form.start_time;
            floor.end_time = form.end_time;
            floor.status = form.status;
            floor.updated_at = now.to_string();
            Ok(floor.id.clone())
        })
    }

    /// 删除楼层, 剩余楼层重新编号
    pub fn delete_floor(&self, channel: Channel, floor_id: &str) -> MutationOutcome {
        self.mutate(channel, StoreEventType::FloorDeleted, |page, _now| {
            let index = page
                .floors
                .iter()
                .position(|floor| floor.id == floor_id)
                .ok_or_else(|| SkipReason::FloorNotFound {
                    floor_id: floor_id.to_string(),
                })?;
            let removed = page.floors.remove(index);
            page.floors = renumber(std::mem::take(&mut page.floors));
            Ok(removed.id)
        })
    }

    /// 复制楼层（楼层与图片均生成新 ID, 追加到末尾）
    pub fn duplicate_floor(&self, channel: Channel, floor_id: &str) -> MutationOutcome {
        let suffix = self.settings.duplicate_name_suffix.clone();
        self.mutate(channel, StoreEventType::FloorDuplicated, move |page, now| {
            let source = page.find_floor(floor_id).ok_or_else(|| SkipReason::FloorNotFound {
                floor_id: floor_id.to_string(),
            })?;

            let mut copy = source.clone();
            copy.id = generate_id();
            copy.name = format!("{}{}", source.name, suffix);
            for image in copy.images.iter_mut() {
                image.id = generate_id();
            }
            copy.priority = page.floors.len() as u32 + 1;
            copy.created_at = now.to_string();
            copy.updated_at = now.to_string();

            let copy_id = copy.id.clone();
            page.floors.push(copy);
            Ok(copy_id)
        })
    }

    /// 按 ID 列表重排楼层
    ///
    /// 调用方应传入渠道内全部楼层 ID; 遗漏的楼层按重排策略处理
    /// (DROP_MISSING 移除 / REJECT_PARTIAL 拒绝)
    pub fn reorder_floors<S: AsRef<str>>(&self, channel: Channel, floor_ids: &[S]) -> MutationOutcome {
        let policy = self.reorder_policy();
        self.mutate(channel, StoreEventType::FloorsReordered, move |page, now| {
            let (mut floors, dropped) = reorder_by_ids(&page.floors, floor_ids, policy)?;
            if dropped > 0 {
                tracing::warn!(
                    channel = %channel,
                    dropped,
                    "重排列表未包含全部楼层, 遗漏的楼层已移除"
                );
            }
            for floor in floors.iter_mut() {
                floor.updated_at = now.to_string();
            }
            page.floors = floors;
            Ok(page.id.clone())
        })
    }

    /// 导入旧版单图广告楼层
    ///
    /// 仅导入属于该渠道的记录; 按旧 priority 排序后追加到现有楼层之后
    pub fn import_legacy_ad_floors(&self, channel: Channel, ads: &[AdFloor]) -> MutationOutcome {
        self.mutate(channel, StoreEventType::LegacyFloorsImported, |page, _now| {
            let mut candidates: Vec<&AdFloor> = ads.iter().filter(|ad| ad.channel == channel).collect();
            if candidates.is_empty() {
                return Err(SkipReason::NothingToImport { channel });
            }
            candidates.sort_by_key(|ad| ad.priority);

            let imported = candidates.len();
            let mut floors = std::mem::take(&mut page.floors);
            floors.extend(candidates.into_iter().map(ad_floor_into_floor));
            page.floors = renumber(floors);

            tracing::info!(channel = %channel, imported, "旧版广告楼层已导入");
            Ok(page.id.clone())
        })
    }
}
