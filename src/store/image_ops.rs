use super::core::{reorder_by_ids, FloorStore};
use super::types::{MutationOutcome, SkipReason};
use crate::domain::floor::{Floor, FloorImage, PageConfig};
use crate::domain::form::FloorImageFormData;
use crate::domain::types::Channel;
use crate::engine::events::StoreEventType;
use crate::engine::identity::generate_id;
use crate::engine::ordering::renumber;

fn floor_mut<'a>(page: &'a mut PageConfig, floor_id: &str) -> Result<&'a mut Floor, SkipReason> {
    page.find_floor_mut(floor_id).ok_or_else(|| SkipReason::FloorNotFound {
        floor_id: floor_id.to_string(),
    })
}

fn image_not_found(floor_id: &str, image_id: &str) -> SkipReason {
    SkipReason::ImageNotFound {
        floor_id: floor_id.to_string(),
        image_id: image_id.to_string(),
    }
}

// ==========================================
// 图片级变更
// ==========================================
// 所有图片变更同时刷新所属楼层与页面的 updatedAt
impl FloorStore {
    /// 追加图片（order = 图片数 + 1）
    pub fn add_image_to_floor(
        &self,
        channel: Channel,
        floor_id: &str,
        form: FloorImageFormData,
    ) -> MutationOutcome {
        self.mutate(channel, StoreEventType::ImageAdded, move |page, now| {
            let floor = floor_mut(page, floor_id)?;
            let image = FloorImage {
                id: generate_id(),
                url: form.url,
                action: form.action,
                alt: form.alt,
                order: floor.images.len() as u32 + 1,
                strategy: form.strategy,
                tracking: form.tracking,
            };
            let image_id = image.id.clone();
            floor.images.push(image);
            floor.updated_at = now.to_string();
            Ok(image_id)
        })
    }

    /// 更新图片内容（order 不变）
    pub fn update_floor_image(
        &self,
        channel: Channel,
        floor_id: &str,
        image_id: &str,
        form: FloorImageFormData,
    ) -> MutationOutcome {
        self.mutate(channel, StoreEventType::ImageUpdated, move |page, now| {
            let floor = floor_mut(page, floor_id)?;
            let image = floor
                .images
                .iter_mut()
                .find(|img| img.id == image_id)
                .ok_or_else(|| image_not_found(floor_id, image_id))?;
            image.url = form.url;
            image.action = form.action;
            image.alt = form.alt;
            image.strategy = form.strategy;
            image.tracking = form.tracking;
            floor.updated_at = now.to_string();
            Ok(image_id.to_string())
        })
    }

    /// 删除图片, 剩余图片重新编号
    pub fn delete_floor_image(&self, channel: Channel, floor_id: &str, image_id: &str) -> MutationOutcome {
        self.mutate(channel, StoreEventType::ImageDeleted, |page, now| {
            let floor = floor_mut(page, floor_id)?;
            let index = floor
                .images
                .iter()
                .position(|img| img.id == image_id)
                .ok_or_else(|| image_not_found(floor_id, image_id))?;
            floor.images.remove(index);
            floor.images = renumber(std::mem::take(&mut floor.images));
            floor.updated_at = now.to_string();
            Ok(image_id.to_string())
        })
    }

    /// 按 ID 列表重排楼层内图片（遗漏处理同 reorder_floors）
    pub fn reorder_floor_images<S: AsRef<str>>(
        &self,
        channel: Channel,
        floor_id: &str,
        image_ids: &[S],
    ) -> MutationOutcome {
        let policy = self.reorder_policy();
        self.mutate(channel, StoreEventType::ImagesReordered, move |page, now| {
            let floor = floor_mut(page, floor_id)?;
            let (images, dropped) = reorder_by_ids(&floor.images, image_ids, policy)?;
            if dropped > 0 {
                tracing::warn!(
                    channel = %channel,
                    floor_id,
                    dropped,
                    "重排列表未包含全部图片, 遗漏的图片已移除"
                );
            }
            floor.images = images;
            floor.updated_at = now.to_string();
            Ok(floor.id.clone())
        })
    }
}
