// Adapters layer: concrete implementations for external systems (http service, storage).

pub mod http;
pub mod storage;
