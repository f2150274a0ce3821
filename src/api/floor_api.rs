// ==========================================
// 楼层配置中心 - 楼层配置 API
// ==========================================
// 职责: 表单校验 + Store 变更调用 + 结果转换
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::preview::{build_preview, PreviewContext, PreviewFloor};
use crate::api::validator::{validate_floor_form, validate_image_form};
use crate::domain::floor::{Floor, FloorImage, PageConfig};
use crate::domain::form::{FloorFormData, FloorImageFormData};
use crate::domain::legacy::AdFloor;
use crate::domain::options::{
    customer_segment_options, floor_type_options, CustomerSegmentOption, FloorTypeOption,
};
use crate::domain::types::{Channel, CustomerSegment};
use crate::i18n::t_with_args;
use crate::store::{FloorStore, MutationOutcome, SkipReason};

// ==========================================
// FloorApi - 楼层配置 API
// ==========================================

/// 楼层配置API
///
/// 职责：
/// 1. 页面配置/楼层查询（按渠道、按客群）
/// 2. 楼层与图片的增删改、复制、重排
/// 3. 预览与选项目录
pub struct FloorApi {
    store: Arc<FloorStore>,
}

impl FloorApi {
    pub fn new(store: Arc<FloorStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<FloorStore> {
        &self.store
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn get_page_config(&self, channel: Channel) -> ApiResult<PageConfig> {
        self.store
            .get_page_config(channel)
            .ok_or_else(|| not_found("页面配置", channel.as_str()))
    }

    /// 查询楼层列表（priority 升序）
    ///
    /// # 参数
    /// - segment: 为 None 时返回全部楼层
    pub fn list_floors(
        &self,
        channel: Channel,
        segment: Option<CustomerSegment>,
    ) -> ApiResult<Vec<Floor>> {
        Ok(match segment {
            Some(segment) => self.store.get_floors_by_segment(channel, segment),
            None => self.store.get_floors(channel),
        })
    }

    pub fn get_floor(&self, channel: Channel, floor_id: &str) -> ApiResult<Floor> {
        require_id(floor_id, "楼层ID")?;
        self.store
            .get_floor_by_id(channel, floor_id)
            .ok_or_else(|| not_found("楼层", floor_id))
    }

    // ==========================================
    // 楼层变更
    // ==========================================

    /// 新增楼层
    ///
    /// # 返回
    /// - Ok(Floor): 新楼层
    /// - Err(ApiError::ValidationError): 表单校验失败
    pub fn add_floor(&self, channel: Channel, form: FloorFormData) -> ApiResult<Floor> {
        validate_floor_form(&form)?;
        let floor_id = applied(self.store.add_floor(channel, form))?;
        self.get_floor(channel, &floor_id)
    }

    pub fn update_floor(
        &self,
        channel: Channel,
        floor_id: &str,
        form: FloorFormData,
    ) -> ApiResult<Floor> {
        require_id(floor_id, "楼层ID")?;
        validate_floor_form(&form)?;
        applied(self.store.update_floor(channel, floor_id, form))?;
        self.get_floor(channel, floor_id)
    }

    pub fn delete_floor(&self, channel: Channel, floor_id: &str) -> ApiResult<()> {
        require_id(floor_id, "楼层ID")?;
        applied(self.store.delete_floor(channel, floor_id)).map(|_| ())
    }

    /// 复制楼层, 返回副本
    pub fn duplicate_floor(&self, channel: Channel, floor_id: &str) -> ApiResult<Floor> {
        require_id(floor_id, "楼层ID")?;
        let copy_id = applied(self.store.duplicate_floor(channel, floor_id))?;
        self.get_floor(channel, &copy_id)
    }

    /// 重排楼层, 返回重排后的楼层列表
    pub fn reorder_floors(&self, channel: Channel, floor_ids: &[String]) -> ApiResult<Vec<Floor>> {
        applied(self.store.reorder_floors(channel, floor_ids))?;
        Ok(self.store.get_floors(channel))
    }

    /// 导入旧版广告楼层, 返回导入后的楼层列表
    pub fn import_legacy_ad_floors(
        &self,
        channel: Channel,
        ads: &[AdFloor],
    ) -> ApiResult<Vec<Floor>> {
        applied(self.store.import_legacy_ad_floors(channel, ads))?;
        Ok(self.store.get_floors(channel))
    }

    // ==========================================
    // 图片变更
    // ==========================================

    pub fn add_image(
        &self,
        channel: Channel,
        floor_id: &str,
        form: FloorImageFormData,
    ) -> ApiResult<FloorImage> {
        require_id(floor_id, "楼层ID")?;
        validate_image_form(&form)?;
        let image_id = applied(self.store.add_image_to_floor(channel, floor_id, form))?;
        self.get_image(channel, floor_id, &image_id)
    }

    pub fn update_image(
        &self,
        channel: Channel,
        floor_id: &str,
        image_id: &str,
        form: FloorImageFormData,
    ) -> ApiResult<FloorImage> {
        require_id(floor_id, "楼层ID")?;
        require_id(image_id, "图片ID")?;
        validate_image_form(&form)?;
        applied(self.store.update_floor_image(channel, floor_id, image_id, form))?;
        self.get_image(channel, floor_id, image_id)
    }

    pub fn delete_image(&self, channel: Channel, floor_id: &str, image_id: &str) -> ApiResult<()> {
        require_id(floor_id, "楼层ID")?;
        require_id(image_id, "图片ID")?;
        applied(self.store.delete_floor_image(channel, floor_id, image_id)).map(|_| ())
    }

    /// 重排图片, 返回楼层最新状态
    pub fn reorder_images(
        &self,
        channel: Channel,
        floor_id: &str,
        image_ids: &[String],
    ) -> ApiResult<Floor> {
        require_id(floor_id, "楼层ID")?;
        applied(self.store.reorder_floor_images(channel, floor_id, image_ids))?;
        self.get_floor(channel, floor_id)
    }

    fn get_image(&self, channel: Channel, floor_id: &str, image_id: &str) -> ApiResult<FloorImage> {
        self.get_floor(channel, floor_id)?
            .find_image(image_id)
            .cloned()
            .ok_or_else(|| not_found("图片", image_id))
    }

    // ==========================================
    // 预览与选项
    // ==========================================

    /// 生成渠道预览
    pub fn preview(&self, channel: Channel, ctx: &PreviewContext) -> ApiResult<Vec<PreviewFloor>> {
        let floors = self.store.get_floors_by_segment(channel, ctx.segment);
        Ok(build_preview(floors, ctx))
    }

    pub fn customer_segment_options(&self) -> Vec<CustomerSegmentOption> {
        customer_segment_options()
    }

    pub fn floor_type_options(&self) -> Vec<FloorTypeOption> {
        floor_type_options()
    }
}

// ==========================================
// 转换辅助
// ==========================================

fn require_id(id: &str, field: &str) -> ApiResult<()> {
    if id.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{}不能为空", field)));
    }
    Ok(())
}

fn not_found(entity: &str, id: &str) -> ApiError {
    ApiError::NotFound(t_with_args("common.not_found", &[("entity", entity), ("id", id)]))
}

/// 变更结果转换: 生效返回目标ID, 未执行转为 API 错误
fn applied(outcome: MutationOutcome) -> ApiResult<String> {
    match outcome {
        MutationOutcome::Applied { target_id } => Ok(target_id),
        MutationOutcome::Skipped(reason) => Err(skip_to_error(reason)),
    }
}

fn skip_to_error(reason: SkipReason) -> ApiError {
    match reason {
        SkipReason::PageConfigMissing { channel } => not_found("页面配置", channel.as_str()),
        SkipReason::FloorNotFound { floor_id } => not_found("楼层", &floor_id),
        SkipReason::ImageNotFound { image_id, .. } => not_found("图片", &image_id),
        reason @ (SkipReason::PartialReorderRejected { .. } | SkipReason::NothingToImport { .. }) => {
            ApiError::InvalidInput(reason.to_string())
        }
    }
}
