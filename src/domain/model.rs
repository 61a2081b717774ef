use crate::utils::error::{CheckError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 服務回報「有效」時使用的狀態標籤
pub const ACTIVE_STATUS: &str = "Aktif";

/// 傳輸或協定失敗時填入的狀態
pub const ERROR_STATUS: &str = "Error";

/// 經過正規化後的電話號碼，只包含數字
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub(crate) fn from_canonical(digits: String) -> Self {
        Self(digits)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 去重後的號碼序列，順序為原始輸入中第一次出現的順序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberList {
    numbers: Vec<PhoneNumber>,
}

impl NumberList {
    pub(crate) fn new(numbers: Vec<PhoneNumber>) -> Self {
        Self { numbers }
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn as_slice(&self) -> &[PhoneNumber] {
        &self.numbers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhoneNumber> {
        self.numbers.iter()
    }
}

impl<'a> IntoIterator for &'a NumberList {
    type Item = &'a PhoneNumber;
    type IntoIter = std::slice::Iter<'a, PhoneNumber>;

    fn into_iter(self) -> Self::IntoIter {
        self.numbers.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub number: PhoneNumber,
    pub status: String,
}

impl CheckResult {
    pub fn new(number: PhoneNumber, status: impl Into<String>) -> Self {
        Self {
            number,
            status: status.into(),
        }
    }

    pub fn failed(number: PhoneNumber) -> Self {
        Self::new(number, ERROR_STATUS)
    }

    pub fn is_error(&self) -> bool {
        self.status == ERROR_STATUS
    }
}

/// 服務回傳的結果與請求的號碼不一致時的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultPolicy {
    /// 以號碼對應結果，依批次順序輸出；缺少的號碼標記為 Error，多出的號碼丟棄
    #[default]
    Reconcile,
    /// 照服務回傳的內容與順序直接附加
    PassThrough,
}

impl std::str::FromStr for ResultPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "reconcile" => Ok(ResultPolicy::Reconcile),
            "pass_through" | "pass-through" => Ok(ResultPolicy::PassThrough),
            other => Err(format!(
                "unknown result policy '{}', expected 'reconcile' or 'pass_through'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunProgress {
    pub done: usize,
    pub total: usize,
}

impl RunProgress {
    pub fn new(done: usize, total: usize) -> Self {
        Self { done, total }
    }

    /// 四捨五入的百分比，total 為 0 時回傳 0
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.done as f64 / self.total as f64) * 100.0).round() as u32
    }
}

impl fmt::Display for RunProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.done, self.total)
    }
}

/// 一次執行的介面狀態。每次狀態轉換都回傳新值，不使用全域變數。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunState {
    running: bool,
    progress: Option<RunProgress>,
    has_results: bool,
}

impl RunState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn start(self, total: usize) -> Result<Self> {
        if self.running {
            return Err(CheckError::RunInProgress);
        }
        Ok(Self {
            running: true,
            progress: Some(RunProgress::new(0, total)),
            has_results: false,
        })
    }

    pub fn advance(self, progress: RunProgress) -> Self {
        Self {
            progress: Some(progress),
            ..self
        }
    }

    pub fn finish(self, has_results: bool) -> Self {
        Self {
            running: false,
            progress: self.progress,
            has_results,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn progress(&self) -> Option<RunProgress> {
        self.progress
    }

    pub fn can_start(&self) -> bool {
        !self.running
    }

    pub fn can_export(&self) -> bool {
        !self.running && self.has_results
    }

    pub fn progress_visible(&self) -> bool {
        self.running
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub errors: usize,
    pub batches: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn from_results(
        results: &[CheckResult],
        active_label: &str,
        batches: usize,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let active = results.iter().filter(|r| r.status == active_label).count();
        let errors = results.iter().filter(|r| r.is_error()).count();

        Self {
            total: results.len(),
            active,
            inactive: results.len().saturating_sub(active + errors),
            errors,
            batches,
            started_at,
            finished_at,
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub results: Vec<CheckResult>,
    pub state: RunState,
    pub summary: RunSummary,
}
