// ==========================================
// 楼层配置中心 - 标识与时间工具
// ==========================================
// ID: UUID v4 (会话内不复用)
// 时间: 本地时间 "YYYY-MM-DD HH:MM:SS"
// ==========================================

use chrono::{Datelike, Local, NaiveDateTime, TimeDelta};
use uuid::Uuid;

/// 标准时间格式
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 生成新的实体 ID
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// 当前时间字符串
pub fn now_string() -> String {
    Local::now().format(TIME_FORMAT).to_string()
}

/// 可表示的最晚时间
pub const MAX_TIME: &str = "9999-12-31 23:59:59";

/// 当前时间之后 days 天的时间字符串
///
/// 溢出或超过 9999 年时取 MAX_TIME
pub fn days_from_now_string(days: i64) -> String {
    TimeDelta::try_days(days)
        .and_then(|delta| Local::now().naive_local().checked_add_signed(delta))
        .filter(|time| time.year() <= 9999)
        .map(|time| time.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| MAX_TIME.to_string())
}

/// 解析标准格式时间（失败返回 None）
pub fn parse_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIME_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_now_string_round_trips_through_parser() {
        assert!(parse_time(&now_string()).is_some());
        assert!(parse_time("2026-13-01 00:00:00").is_none());
    }

    #[test]
    fn test_days_from_now_is_later() {
        let now = parse_time(&now_string()).unwrap();
        let later = parse_time(&days_from_now_string(30)).unwrap();
        assert!(later > now);
        // 跨夏令时允许 1 小时偏差
        assert!((later - now).num_hours() >= 30 * 24 - 1);
    }

    #[test]
    fn test_days_from_now_saturates_instead_of_overflowing() {
        assert_eq!(days_from_now_string(100_000_000), MAX_TIME);
        assert_eq!(days_from_now_string(i64::MAX), MAX_TIME);
        assert!(parse_time(MAX_TIME).is_some());
    }
}
