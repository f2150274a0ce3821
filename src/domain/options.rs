// ==========================================
// 楼层配置中心 - 选项目录
// ==========================================
// 客群选项 (标签 + 颜色) / 楼层类型选项 (标签 + 图标)
// 标签随当前语言翻译
// ==========================================

use crate::domain::types::{Channel, CustomerSegment, FloorStatus, FloorType};
use crate::i18n::t;
use serde::Serialize;

/// 客群选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerSegmentOption {
    pub value: CustomerSegment,
    pub label: String,
    pub color: &'static str,
}

/// 楼层类型选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FloorTypeOption {
    pub value: FloorType,
    pub label: String,
    pub icon: &'static str,
}

pub fn segment_color(segment: CustomerSegment) -> &'static str {
    match segment {
        CustomerSegment::All => "blue",
        CustomerSegment::Vip => "gold",
        CustomerSegment::Regular => "green",
        CustomerSegment::New => "cyan",
        CustomerSegment::Custom => "purple",
    }
}

pub fn floor_type_icon(floor_type: FloorType) -> &'static str {
    match floor_type {
        FloorType::Banner => "🎠",
        FloorType::Product => "📦",
        FloorType::Ad => "📢",
        FloorType::Promotion => "🎉",
    }
}

pub fn segment_label(segment: CustomerSegment) -> String {
    t(&format!("segment.{}", segment.as_str()))
}

pub fn floor_type_label(floor_type: FloorType) -> String {
    t(&format!("floor_type.{}", floor_type.as_str()))
}

pub fn channel_label(channel: Channel) -> String {
    t(&format!("channel.{}", channel.as_str()))
}

pub fn status_label(status: FloorStatus) -> String {
    t(&format!("status.{}", status.as_str()))
}

/// 客群选项列表（固定顺序）
pub fn customer_segment_options() -> Vec<CustomerSegmentOption> {
    CustomerSegment::ALL_VARIANTS
        .iter()
        .map(|&value| CustomerSegmentOption {
            value,
            label: segment_label(value),
            color: segment_color(value),
        })
        .collect()
}

/// 楼层类型选项列表（固定顺序）
pub fn floor_type_options() -> Vec<FloorTypeOption> {
    FloorType::ALL_VARIANTS
        .iter()
        .map(|&value| FloorTypeOption {
            value,
            label: floor_type_label(value),
            icon: floor_type_icon(value),
        })
        .collect()
}
