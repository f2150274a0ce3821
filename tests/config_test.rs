// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 配置读取及其对 Store 行为的影响
// ==========================================


use chrono::Local;
use floor_config::config::{config_keys, ConfigManager, ReorderPolicy, StoreSettings};
use floor_config::engine::identity::parse_time;
use floor_config::{Channel, FloorStore, InMemorySnapshotRepository, SkipReason};
use std::sync::Arc;
use test_helpers::{create_test_db, floor_form, insert_config, open_test_connection};

#[test]
fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[test]
fn test_missing_keys_fall_back_to_defaults() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    let settings = manager.load_store_settings().unwrap();
    assert_eq!(settings, StoreSettings::default());
    assert_eq!(settings.seed_validity_days, 30);
    assert_eq!(settings.duplicate_name_suffix, " (副本)");
    assert_eq!(settings.reorder_policy, ReorderPolicy::DropMissing);
    assert_eq!(settings.storage_key, "floor-storage");
    assert_eq!(settings.locale, "zh-CN");
}

#[test]
fn test_settings_read_from_database() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_config(&conn, config_keys::SEED_VALIDITY_DAYS, "7").unwrap();
    insert_config(&conn, config_keys::REORDER_POLICY, "REJECT_PARTIAL").unwrap();
    insert_config(&conn, config_keys::DUPLICATE_NAME_SUFFIX, "-copy").unwrap();
    insert_config(&conn, config_keys::STORAGE_KEY, "   ").unwrap();

    let manager = ConfigManager::new(&db_path).unwrap();
    let settings = manager.load_store_settings().unwrap();

    assert_eq!(settings.seed_validity_days, 7);
    assert_eq!(settings.reorder_policy, ReorderPolicy::RejectPartial);
    assert_eq!(settings.duplicate_name_suffix, "-copy");
    // 空白存储键回退默认值
    assert_eq!(settings.storage_key, "floor-storage");
}

#[test]
fn test_malformed_values_fall_back() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_config(&conn, config_keys::SEED_VALIDITY_DAYS, "thirty").unwrap();
    insert_config(&conn, config_keys::REORDER_POLICY, "SHUFFLE").unwrap();

    let manager = ConfigManager::new(&db_path).unwrap();
    let settings = manager.load_store_settings().unwrap();

    assert_eq!(settings.seed_validity_days, 30);
    assert_eq!(settings.reorder_policy, ReorderPolicy::DropMissing);
}

#[test]
fn test_out_of_range_validity_days_fall_back() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    manager.set_config_value(config_keys::SEED_VALIDITY_DAYS, "100000000").unwrap();
    let settings = manager.load_store_settings().unwrap();
    assert_eq!(settings.seed_validity_days, 30);

    // 上限值本身有效, 且可用于生成种子
    manager.set_config_value(config_keys::SEED_VALIDITY_DAYS, "36500").unwrap();
    let settings = manager.load_store_settings().unwrap();
    assert_eq!(settings.seed_validity_days, 36_500);
    let store = FloorStore::open(Arc::new(InMemorySnapshotRepository::new()), settings).unwrap();
    assert_eq!(store.get_floors(Channel::Web).len(), 1);
}

#[test]
fn test_store_opens_with_unchecked_huge_validity() {
    let mut settings = StoreSettings::default();
    settings.seed_validity_days = i64::MAX;

    let store = FloorStore::open(Arc::new(InMemorySnapshotRepository::new()), settings).unwrap();
    let seed = store.get_floors(Channel::Mobile).remove(0);
    assert_eq!(seed.end_time, "9999-12-31 23:59:59");
}

#[test]
fn test_settings_drive_store_behaviour() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();
    manager.set_config_value(config_keys::SEED_VALIDITY_DAYS, "7").unwrap();
    manager.set_config_value(config_keys::REORDER_POLICY, "REJECT_PARTIAL").unwrap();
    manager.set_config_value(config_keys::DUPLICATE_NAME_SUFFIX, "-copy").unwrap();
    let settings = manager.load_store_settings().unwrap();

    let store = FloorStore::open(Arc::new(InMemorySnapshotRepository::new()), settings).unwrap();

    // 种子楼层有效期 7 天
    let seed = store.get_floors(Channel::Mobile).remove(0);
    let end = parse_time(&seed.end_time).unwrap();
    let hours = (end - Local::now().naive_local()).num_hours();
    assert!((6 * 24..=7 * 24 + 1).contains(&hours), "有效期应约为 7 天, 实际 {} 小时", hours);

    // 复制后缀
    let copy_id = store
        .duplicate_floor(Channel::Mobile, &seed.id)
        .target_id()
        .unwrap()
        .to_string();
    assert_eq!(
        store.get_floor_by_id(Channel::Mobile, &copy_id).unwrap().name,
        format!("{}-copy", seed.name)
    );

    // 不完整重排被拒绝
    let outcome = store.reorder_floors(Channel::Mobile, &[copy_id.as_str()]);
    assert_eq!(
        outcome.skip_reason(),
        Some(&SkipReason::PartialReorderRejected { expected: 2, matched: 1 })
    );

    store.add_floor(Channel::Mobile, floor_form("x", vec![]));
    assert_eq!(store.get_floors(Channel::Mobile).len(), 3);
}
