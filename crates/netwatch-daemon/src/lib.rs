//! Netwatch daemon library
//!
//! This module provides the components wired together by `netwatchd`:
//! - Configuration loading (file + environment)
//! - The system snapshot provider
//! - The logging presenter

pub mod config;
pub mod error;
pub mod presenter;
pub mod provider;

pub use config::{DaemonConfig, LoggingConfig, ProviderConfig};
pub use error::{DaemonError, DaemonResult};
pub use presenter::LogPresenter;
pub use provider::SystemProvider;
