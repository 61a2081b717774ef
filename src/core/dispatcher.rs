use crate::domain::model::{CheckResult, NumberList, PhoneNumber, ResultPolicy, RunProgress};
use crate::domain::ports::{CheckService, ProgressReporter};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;

pub const DEFAULT_CHUNK_SIZE: usize = 8;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 8;

fn apply_policy(
    policy: ResultPolicy,
    chunk: &[PhoneNumber],
    returned: Vec<CheckResult>,
) -> Vec<CheckResult> {
    match policy {
        ResultPolicy::PassThrough => returned,
        ResultPolicy::Reconcile => reconcile(chunk, returned),
    }
}

fn reconcile(chunk: &[PhoneNumber], returned: Vec<CheckResult>) -> Vec<CheckResult> {
    let returned_count = returned.len();
    let mut statuses: HashMap<PhoneNumber, String> = HashMap::with_capacity(returned_count);
    let mut unexpected = 0usize;

    for result in returned {
        if !chunk.contains(&result.number) {
            unexpected += 1;
            continue;
        }
        statuses.entry(result.number).or_insert(result.status);
    }

    let mut missing = 0usize;
    let results: Vec<CheckResult> = chunk
        .iter()
        .map(|number| match statuses.remove(number) {
            Some(status) => CheckResult::new(number.clone(), status),
            None => {
                missing += 1;
                CheckResult::failed(number.clone())
            }
        })
        .collect();

    if unexpected > 0 || missing > 0 || returned_count != chunk.len() {
        tracing::warn!(
            "⚠️ Service returned {} results for {} numbers ({} missing, {} unexpected)",
            returned_count,
            chunk.len(),
            missing,
            unexpected
        );
    }

    results
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    pub chunk_size: usize,
    pub timeout_seconds: u64,
    pub concurrency: usize,
    pub policy: ResultPolicy,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            concurrency: 1,
            policy: ResultPolicy::default(),
        }
    }
}

impl DispatchSettings {
    pub fn new(chunk_size: usize, timeout_seconds: u64) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            timeout_seconds,
            ..Self::default()
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_policy(mut self, policy: ResultPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn from_config<C: crate::domain::ports::ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(config.chunk_size(), config.timeout_seconds())
            .with_concurrency(config.concurrency())
            .with_policy(config.result_policy())
    }

    pub fn batch_count(&self, total: usize) -> usize {
        total.div_ceil(self.chunk_size.max(1))
    }
}

/// 將號碼切成固定大小的批次送往檢查服務。
///
/// 預設一次只送一個批次；`concurrency` 大於 1 時最多同時送出那麼多批次，
/// 但結果與進度回報仍依批次順序處理。單一批次失敗只會把該批次標記為 Error。
pub struct BatchDispatcher<S: CheckService> {
    service: S,
    settings: DispatchSettings,
}

impl<S: CheckService> BatchDispatcher<S> {
    pub fn new(service: S, settings: DispatchSettings) -> Self {
        Self { service, settings }
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub async fn run_check<R>(&self, numbers: &NumberList, progress: &R) -> Vec<CheckResult>
    where
        R: ProgressReporter + ?Sized,
    {
        let total = numbers.len();
        let chunk_size = self.settings.chunk_size.max(1);
        let batch_count = self.settings.batch_count(total);
        let mut results = Vec::with_capacity(total);

        tracing::info!(
            "🚀 Dispatching {} numbers in {} batches (chunk size {}, concurrency {})",
            total,
            batch_count,
            chunk_size,
            self.settings.concurrency
        );

        let mut outcomes = stream::iter(numbers.as_slice().chunks(chunk_size).enumerate())
            .map(|(index, chunk)| self.dispatch_chunk(index, batch_count, chunk))
            .buffered(self.settings.concurrency.max(1));

        while let Some(chunk_results) = outcomes.next().await {
            results.extend(chunk_results);
            progress.on_progress(RunProgress::new(results.len(), total));
        }

        results
    }

    async fn dispatch_chunk(
        &self,
        index: usize,
        batch_count: usize,
        chunk: &[PhoneNumber],
    ) -> Vec<CheckResult> {
        tracing::debug!(
            "Sending batch {}/{} with {} numbers",
            index + 1,
            batch_count,
            chunk.len()
        );

        match self.service.check(chunk, self.settings.timeout_seconds).await {
            Ok(returned) => apply_policy(self.settings.policy, chunk, returned),
            Err(e) => {
                tracing::error!(
                    "❌ Batch {}/{} failed, marking {} numbers as Error: {}",
                    index + 1,
                    batch_count,
                    chunk.len(),
                    e
                );
                chunk.iter().cloned().map(CheckResult::failed).collect()
            }
        }
    }
}
