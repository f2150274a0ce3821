// ==========================================
// 楼层配置中心 - 后台快照写入
// ==========================================
// 职责: 让 save 不阻塞变更路径 (fire-and-forget)
// 机制: tokio 无界队列 + 单个写入任务
// 合并: 队列中积压的多个快照只写最新一个
// 失败: 记录日志并调用失败回调 (由 Store 转为 PersistFailed 事件)
// ==========================================

use crate::domain::floor::PageConfig;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::snapshot_repo::SnapshotPersistence;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// 写入失败回调
pub type FailureHook = Arc<dyn Fn(&RepositoryError) + Send + Sync>;

type SharedHook = Arc<RwLock<Option<FailureHook>>>;

enum WriterCommand {
    Save(Vec<PageConfig>),
    Flush(oneshot::Sender<()>),
}

/// 后台快照写入器
///
/// # 说明
/// - load 直接委托给内部实现（仅启动时调用）
/// - save 只入队, 写入失败记录日志并交给失败回调
pub struct BackgroundSnapshotWriter {
    inner: Arc<dyn SnapshotPersistence>,
    tx: mpsc::UnboundedSender<WriterCommand>,
    on_failure: SharedHook,
}

impl BackgroundSnapshotWriter {
    /// 在给定运行时上启动写入任务
    pub fn spawn(inner: Arc<dyn SnapshotPersistence>, handle: &Handle) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let on_failure: SharedHook = Arc::new(RwLock::new(None));
        let task = handle.spawn(run_writer(Arc::clone(&inner), rx, Arc::clone(&on_failure)));
        (Self { inner, tx, on_failure }, task)
    }

    /// 设置写入失败回调（替换已有回调）
    pub fn set_failure_hook(&self, hook: FailureHook) {
        *self.on_failure.write().unwrap_or_else(PoisonError::into_inner) = Some(hook);
    }

    /// 等待此前入队的快照全部写入
    pub async fn flush(&self) -> RepositoryResult<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(WriterCommand::Flush(ack_tx))
            .map_err(|_| RepositoryError::WriterClosed)?;
        ack_rx.await.map_err(|_| RepositoryError::WriterClosed)
    }
}

impl SnapshotPersistence for BackgroundSnapshotWriter {
    fn load(&self) -> RepositoryResult<Option<Vec<PageConfig>>> {
        self.inner.load()
    }

    fn save(&self, page_configs: &[PageConfig]) -> RepositoryResult<()> {
        self.tx
            .send(WriterCommand::Save(page_configs.to_vec()))
            .map_err(|_| RepositoryError::WriterClosed)
    }
}

async fn run_writer(
    inner: Arc<dyn SnapshotPersistence>,
    mut rx: mpsc::UnboundedReceiver<WriterCommand>,
    on_failure: SharedHook,
) {
    tracing::debug!("后台快照写入任务已启动");

    while let Some(first) = rx.recv().await {
        let mut latest: Option<Vec<PageConfig>> = None;
        let mut waiters: Vec<oneshot::Sender<()>> = Vec::new();

        let mut absorb = |cmd: WriterCommand| match cmd {
            WriterCommand::Save(snapshot) => latest = Some(snapshot),
            WriterCommand::Flush(ack) => waiters.push(ack),
        };
        absorb(first);
        while let Ok(cmd) = rx.try_recv() {
            absorb(cmd);
        }

        if let Some(snapshot) = latest {
            let target = Arc::clone(&inner);
            let hook = Arc::clone(&on_failure);
            let written = tokio::task::spawn_blocking(move || {
                let result = target.save(&snapshot);
                if let Err(e) = &result {
                    tracing::error!(error = %e, "后台快照写入失败");
                    let hook = hook.read().unwrap_or_else(PoisonError::into_inner).clone();
                    if let Some(hook) = hook {
                        hook(e);
                    }
                }
                result
            })
            .await;
            if let Err(e) = written {
                tracing::error!(error = %e, "后台快照写入任务异常");
            }
        }

        for ack in waiters {
            let _ = ack.send(());
        }
    }

    tracing::debug!("后台快照写入任务已退出");
}
