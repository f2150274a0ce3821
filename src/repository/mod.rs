// ==========================================
// 楼层配置中心 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 配置快照的加载与保存, 屏蔽存储细节
// ==========================================

pub mod background_writer;
pub mod error;
pub mod snapshot_repo;

pub use background_writer::{BackgroundSnapshotWriter, FailureHook};
pub use error::{RepositoryError, RepositoryResult};
pub use snapshot_repo::{
    decode_snapshot, encode_snapshot, InMemorySnapshotRepository, SnapshotPersistence,
    SqliteSnapshotRepository, DEFAULT_STORAGE_KEY,
};
