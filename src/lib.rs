pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::{http::HttpCheckService, storage::LocalStorage};
pub use crate::core::{
    check::{CheckEngine, EngineOptions},
    dispatcher::{BatchDispatcher, DispatchSettings},
    export::encode,
    normalizer::normalize,
    presenter::present,
};
pub use crate::domain::model::{CheckResult, ResultPolicy, RunOutcome, RunProgress, RunState};
pub use crate::utils::error::{CheckError, Result};
