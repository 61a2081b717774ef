pub mod check;
pub mod dispatcher;
pub mod export;
pub mod normalizer;
pub mod presenter;

pub use crate::domain::model::{CheckResult, NumberList, PhoneNumber, RunProgress, RunState};
pub use crate::domain::ports::{CheckService, ConfigProvider, ProgressReporter, Storage, VolumeGuard};
pub use crate::utils::error::Result;
