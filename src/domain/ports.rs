use crate::domain::model::{CheckResult, PhoneNumber, ResultPolicy, RunProgress};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 遠端檢查服務：送出一批號碼，取回每個號碼的狀態
#[async_trait]
pub trait CheckService: Send + Sync {
    async fn check(&self, numbers: &[PhoneNumber], timeout_seconds: u64)
        -> Result<Vec<CheckResult>>;
}

/// 每個批次完成後回報進度
pub trait ProgressReporter: Send + Sync {
    fn on_progress(&self, progress: RunProgress);
}

impl<F> ProgressReporter for F
where
    F: Fn(RunProgress) + Send + Sync,
{
    fn on_progress(&self, progress: RunProgress) {
        self(progress)
    }
}

/// 輸入量過大時詢問是否繼續。無法詢問時回傳錯誤，而不是當作拒絕。
pub trait VolumeGuard: Send + Sync {
    fn confirm_large_run(&self, count: usize) -> Result<bool>;
}

impl<F> VolumeGuard for F
where
    F: Fn(usize) -> bool + Send + Sync,
{
    fn confirm_large_run(&self, count: usize) -> Result<bool> {
        Ok(self(count))
    }
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn output_path(&self) -> &str;
    fn chunk_size(&self) -> usize;
    fn timeout_seconds(&self) -> u64;
    fn concurrency(&self) -> usize;
    fn result_policy(&self) -> ResultPolicy;
    fn active_label(&self) -> &str;
    fn large_run_threshold(&self) -> usize;
    fn write_html(&self) -> bool;
}
