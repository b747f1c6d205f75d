// LAPACK routine surface with runtime backend dispatch

#![doc = include_str!("../README.md")]

#[macro_use]
pub mod routines;

pub mod config;
pub mod dispatch;
pub mod error;
pub mod linalg_backends;
#[cfg(feature = "native")]
pub mod native;
pub mod reference;

pub use config::DispatchConfig;
pub use dispatch::{binding_report, lapack, BackendCandidate, BindingReport, DispatchState, Dispatcher};
pub use error::{DispatchError, LapackError, ProbeError, ThreadSafeStdError};
#[cfg(feature = "native")]
pub use native::NativeLapack;
pub use reference::ReferenceLapack;
pub use routines::{Lapack, LapackVersion, Precision, Routine};
