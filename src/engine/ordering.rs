// ==========================================
// 楼层配置中心 - 顺序工具
// ==========================================
// 职责: 生成 1 起始的连续顺序号 / 按顺序号排序
// 红线: 所有删除、重排、复制之后都必须经过 renumber
// ==========================================

use crate::domain::floor::{Floor, FloorImage};

/// 携带可改写顺序字段的条目
pub trait Positioned {
    fn position(&self) -> u32;
    fn set_position(&mut self, position: u32);
}

impl Positioned for Floor {
    fn position(&self) -> u32 {
        self.priority
    }

    fn set_position(&mut self, position: u32) {
        self.priority = position;
    }
}

impl Positioned for FloorImage {
    fn position(&self) -> u32 {
        self.order
    }

    fn set_position(&mut self, position: u32) {
        self.order = position;
    }
}

/// 按输入顺序重新编号为 1..=len
pub fn renumber<T: Positioned>(mut items: Vec<T>) -> Vec<T> {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_position(index as u32 + 1);
    }
    items
}

/// 按顺序字段升序（稳定排序）
pub fn sort_by_position<T: Positioned + Clone>(items: &[T]) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| item.position());
    sorted
}

/// 顺序字段集合是否恰为 {1..=len}
pub fn is_dense<T: Positioned>(items: &[T]) -> bool {
    let mut positions: Vec<u32> = items.iter().map(|item| item.position()).collect();
    positions.sort_unstable();
    positions
        .iter()
        .enumerate()
        .all(|(index, &position)| position == index as u32 + 1)
}
