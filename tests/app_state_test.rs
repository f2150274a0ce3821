// ==========================================
// AppState 集成测试
// ==========================================
// 测试目标: 组装流程（配置 → 语言 → Store → API）
// ==========================================


use floor_config::api::PreviewContext;
use floor_config::app::AppState;
use floor_config::config::{config_keys, ReorderPolicy};
use floor_config::{Channel, CustomerSegment};
use std::sync::Mutex;
use test_helpers::{create_test_db, floor_form, insert_config, open_test_connection};

// AppState::new 会设置全局语言, 测试间串行化
static LOCALE_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn test_app_state_bootstraps_empty_database() {
    let _guard = LOCALE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let (_temp_file, db_path) = create_test_db().unwrap();

    let state = AppState::new(db_path.clone()).expect("AppState 应初始化成功");
    assert_eq!(state.db_path, db_path);
    assert_eq!(state.store.page_configs().len(), 2);

    let preview = state
        .floor_api
        .preview(Channel::Web, &PreviewContext::for_segment(CustomerSegment::Regular))
        .unwrap();
    assert_eq!(preview.len(), 1);
    assert_eq!(preview[0].name, "理财产品推荐");
}

#[test]
fn test_app_state_applies_configuration_and_reloads() {
    let _guard = LOCALE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_config(&conn, config_keys::REORDER_POLICY, "REJECT_PARTIAL").unwrap();
    insert_config(&conn, config_keys::STORAGE_KEY, "floor-storage-test").unwrap();
    insert_config(&conn, config_keys::LOCALE, "en").unwrap();
    drop(conn);

    let floor_id = {
        let state = AppState::new(db_path.clone()).unwrap();
        assert_eq!(state.settings.reorder_policy, ReorderPolicy::RejectPartial);
        assert_eq!(state.settings.storage_key, "floor-storage-test");
        assert_eq!(floor_config::i18n::current_locale(), "en");

        state
            .floor_api
            .add_floor(Channel::Mobile, floor_form("Wealth", vec![CustomerSegment::Vip]))
            .unwrap()
            .id
    };

    let reopened = AppState::new(db_path).unwrap();
    let floor = reopened.floor_api.get_floor(Channel::Mobile, &floor_id).unwrap();
    assert_eq!(floor.name, "Wealth");
    assert_eq!(floor.priority, 2);

    let preview = reopened
        .floor_api
        .preview(Channel::Mobile, &PreviewContext::for_segment(CustomerSegment::Vip))
        .unwrap();
    assert_eq!(preview[1].type_label, "Product Picks");
}

#[tokio::test]
async fn test_app_state_with_background_writer_persists_after_flush() {
    let _guard = LOCALE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let (_temp_file, db_path) = create_test_db().unwrap();

    let floor_id = {
        let state =
            AppState::with_background_writer(db_path.clone(), &tokio::runtime::Handle::current())
                .unwrap();
        let floor = state
            .floor_api
            .add_floor(Channel::Web, floor_form("后台写入", vec![CustomerSegment::New]))
            .unwrap();
        state.flush_pending_writes().await.unwrap();
        floor.id
    };

    let reopened = AppState::new(db_path).unwrap();
    let floor = reopened.floor_api.get_floor(Channel::Web, &floor_id).unwrap();
    assert_eq!(floor.name, "后台写入");
    assert_eq!(floor.priority, 2);
    assert!(reopened.flush_pending_writes().await.is_ok());
}
