// src/native.rs

//! Native backend: the system LAPACK reached through the `lapack` crate.
//!
//! The library itself is linked by `ndarray-linalg`'s OpenBLAS or MKL
//! features, so build with one of the `backend_*` features.

use crate::config::DispatchConfig;
use crate::dispatch::{check_version, BackendCandidate};
use crate::error::ProbeError;
use crate::routines::Lapack;
use log::debug;
use std::sync::Arc;

// Pulls in the link directives of the selected LAPACK provider.
use ndarray_linalg as _;

/// Backend adapter over the `lapack` crate.
#[derive(Debug, Default, Copy, Clone)]
pub struct NativeLapack;

impl NativeLapack {
    pub const NAME: &'static str = "native";

    pub fn new() -> Self {
        Self
    }
}

for_each_routine!(forward_routines [NativeLapack, NativeLapack::NAME => unsafe lapack]);

/// Candidate for [`NativeLapack`]. Gated by [`DispatchConfig::allow_native`].
#[derive(Debug, Default, Copy, Clone)]
pub struct NativeCandidate;

impl BackendCandidate for NativeCandidate {
    fn name(&self) -> &'static str {
        NativeLapack::NAME
    }

    fn probe(&self, config: &DispatchConfig) -> Result<Arc<dyn Lapack>, ProbeError> {
        if !config.allow_native {
            return Err(ProbeError::Disabled { backend: self.name() });
        }
        let backend = NativeLapack::new();
        let version = check_version(self.name(), &backend, config)?;
        debug!("System LAPACK reports version {}", version);
        Ok(Arc::new(backend))
    }
}
