// ==========================================
// 楼层配置中心 - 客群筛选
// ==========================================
// 规则: floor.segments ∩ {segment, all} ≠ ∅
// 请求客群为 all 时不筛选
// 说明: 客群之间无权重, 命中即返回
// ==========================================

use crate::domain::floor::Floor;
use crate::domain::types::CustomerSegment;

/// 楼层是否对指定客群可见
pub fn matches_segment(floor: &Floor, segment: CustomerSegment) -> bool {
    if segment == CustomerSegment::All {
        return true;
    }
    floor
        .customer_segments
        .iter()
        .any(|&s| s == segment || s == CustomerSegment::All)
}

/// 按客群筛选（保持输入顺序）
pub fn filter_by_segment(floors: Vec<Floor>, segment: CustomerSegment) -> Vec<Floor> {
    if segment == CustomerSegment::All {
        return floors;
    }
    floors
        .into_iter()
        .filter(|floor| matches_segment(floor, segment))
        .collect()
}
