// ==========================================
// 楼层配置中心 - 领域类型定义
// ==========================================
// 渠道 / 客群 / 楼层类型 / 状态 / 跳转类型
// 序列化格式: 小写 (与持久化快照一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 渠道 (Channel)
// ==========================================
// 每个渠道拥有一份独立的页面配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Mobile, // 手机银行
    Web,    // 网上银行
}

impl Channel {
    /// 全部渠道（按初始化顺序）
    pub const ALL: [Channel; 2] = [Channel::Mobile, Channel::Web];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Mobile => "mobile",
            Channel::Web => "web",
        }
    }

    /// 从字符串解析（大小写不敏感）
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "mobile" => Some(Channel::Mobile),
            "web" => Some(Channel::Web),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 客群 (Customer Segment)
// ==========================================
// 规则: All 匹配所有客群
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerSegment {
    All,     // 全部客户
    Vip,     // VIP客户
    Regular, // 普通客户
    New,     // 新客户
    Custom,  // 自定义
}

impl CustomerSegment {
    pub const ALL_VARIANTS: [CustomerSegment; 5] = [
        CustomerSegment::All,
        CustomerSegment::Vip,
        CustomerSegment::Regular,
        CustomerSegment::New,
        CustomerSegment::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerSegment::All => "all",
            CustomerSegment::Vip => "vip",
            CustomerSegment::Regular => "regular",
            CustomerSegment::New => "new",
            CustomerSegment::Custom => "custom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "all" => Some(CustomerSegment::All),
            "vip" => Some(CustomerSegment::Vip),
            "regular" => Some(CustomerSegment::Regular),
            "new" => Some(CustomerSegment::New),
            "custom" => Some(CustomerSegment::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 楼层类型 (Floor Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorType {
    Banner,    // 轮播广告
    Product,   // 产品推荐
    Ad,        // 营销广告
    Promotion, // 促销活动
}

impl FloorType {
    pub const ALL_VARIANTS: [FloorType; 4] = [
        FloorType::Banner,
        FloorType::Product,
        FloorType::Ad,
        FloorType::Promotion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FloorType::Banner => "banner",
            FloorType::Product => "product",
            FloorType::Ad => "ad",
            FloorType::Promotion => "promotion",
        }
    }
}

impl fmt::Display for FloorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 状态 (Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorStatus {
    Active,   // 启用
    Inactive, // 停用
}

impl FloorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FloorStatus::Active => "active",
            FloorStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for FloorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 跳转类型 (Action Type)
// ==========================================
// none: 不跳转 / h5: 网页 / native_schema: 原生路由 / program: 小程序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[default]
    None,
    H5,
    NativeSchema,
    Program,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::None => "none",
            ActionType::H5 => "h5",
            ActionType::NativeSchema => "native_schema",
            ActionType::Program => "program",
        }
    }

    /// 该跳转类型是否必须携带目标地址
    pub fn requires_url(&self) -> bool {
        matches!(self, ActionType::H5 | ActionType::NativeSchema)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_parse() {
        assert_eq!(Channel::parse("MOBILE"), Some(Channel::Mobile));
        assert_eq!(Channel::parse(" web "), Some(Channel::Web));
        assert_eq!(Channel::parse("tv"), None);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&CustomerSegment::Vip).unwrap(), "\"vip\"");
        assert_eq!(
            serde_json::to_string(&ActionType::NativeSchema).unwrap(),
            "\"native_schema\""
        );
        let t: FloorType = serde_json::from_str("\"promotion\"").unwrap();
        assert_eq!(t, FloorType::Promotion);
    }
}
