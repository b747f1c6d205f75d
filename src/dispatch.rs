// src/dispatch.rs

//! Backend selection.
//!
//! A [`Dispatcher`] walks an ordered list of [`BackendCandidate`]s, binds the
//! first one whose probe succeeds and keeps that binding for its lifetime.
//! The process-wide dispatcher behind [`lapack()`] prefers the native backend
//! (when compiled in and allowed) and falls back to [`ReferenceLapack`].

use crate::config::DispatchConfig;
use crate::error::{DispatchError, ProbeError};
use crate::reference::ReferenceLapack;
use crate::routines::{Lapack, LapackVersion, Precision};
use log::{debug, info, warn};
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// A backend the dispatcher may bind.
///
/// `probe` must be cheap: a configuration gate, a link or version query
/// through `ilaver`, nothing numeric. It must not call back into the
/// dispatcher that is probing it.
pub trait BackendCandidate: Send + Sync {
    /// Name matched against [`DispatchConfig::backend`].
    fn name(&self) -> &'static str;

    /// Precisions the backend provides.
    fn precisions(&self) -> &[Precision] {
        &[Precision::Single, Precision::Double]
    }

    fn probe(&self, config: &DispatchConfig) -> Result<Arc<dyn Lapack>, ProbeError>;
}

/// Queries `ilaver` on `backend` and checks it against `config.min_version`.
pub fn check_version(
    candidate: &'static str,
    backend: &dyn Lapack,
    config: &DispatchConfig,
) -> Result<LapackVersion, ProbeError> {
    let found = backend.version();
    if found.major <= 0 {
        return Err(ProbeError::Unavailable {
            backend: candidate,
            reason: format!("ilaver reported version {}", found),
        });
    }
    if found < config.min_version {
        return Err(ProbeError::IncompatibleVersion {
            backend: candidate,
            found,
            required: config.min_version,
        });
    }
    Ok(found)
}

/// Candidate for the pure-Rust reference backend. Always available.
#[derive(Debug, Default, Copy, Clone)]
pub struct ReferenceCandidate;

impl BackendCandidate for ReferenceCandidate {
    fn name(&self) -> &'static str {
        ReferenceLapack::NAME
    }

    fn probe(&self, config: &DispatchConfig) -> Result<Arc<dyn Lapack>, ProbeError> {
        let backend = ReferenceLapack::new();
        check_version(self.name(), &backend, config)?;
        Ok(Arc::new(backend))
    }
}

/// Candidates of the process-wide dispatcher, in priority order.
pub fn default_candidates() -> Vec<Box<dyn BackendCandidate>> {
    let mut candidates: Vec<Box<dyn BackendCandidate>> = Vec::new();
    #[cfg(feature = "native")]
    candidates.push(Box::new(crate::native::NativeCandidate));
    candidates.push(Box::new(ReferenceCandidate));
    candidates
}

/// Lifecycle of a dispatcher. `Bound` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Unbound,
    Probing,
    Bound(&'static str),
    Failed,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchState::Unbound => f.write_str("unbound"),
            DispatchState::Probing => f.write_str("probing"),
            DispatchState::Bound(name) => write!(f, "bound to `{}`", name),
            DispatchState::Failed => f.write_str("failed"),
        }
    }
}

/// A candidate passed over during binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCandidate {
    pub backend: String,
    pub reason: String,
}

/// What a dispatcher bound, and why the candidates before it were skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingReport {
    /// [`Lapack::name`] of the bound backend.
    pub backend: String,
    pub version: LapackVersion,
    /// `true` when no candidate succeeded and the reference fallback was bound.
    pub fallback: bool,
    /// Number of candidates whose probe ran or was gated.
    pub candidates_probed: usize,
    pub skipped: Vec<SkippedCandidate>,
}

struct Binding {
    backend: Arc<dyn Lapack>,
    report: BindingReport,
}

/// Binds one backend out of an ordered candidate list, once.
pub struct Dispatcher {
    config: DispatchConfig,
    candidates: Vec<Box<dyn BackendCandidate>>,
    fallback: Option<Arc<dyn Lapack>>,
    binding: OnceCell<Result<Binding, DispatchError>>,
    probing: AtomicBool,
    probe_count: AtomicUsize,
}

impl Dispatcher {
    /// A dispatcher that binds [`ReferenceLapack`] when every candidate fails.
    /// Binding never fails.
    pub fn with_fallback(config: DispatchConfig, candidates: Vec<Box<dyn BackendCandidate>>) -> Self {
        Self::build(config, candidates, Some(Arc::new(ReferenceLapack::new())))
    }

    /// A dispatcher without an implicit fallback. Exhausting `candidates`
    /// leaves it in [`DispatchState::Failed`].
    pub fn from_candidates(config: DispatchConfig, candidates: Vec<Box<dyn BackendCandidate>>) -> Self {
        Self::build(config, candidates, None)
    }

    fn build(
        config: DispatchConfig,
        candidates: Vec<Box<dyn BackendCandidate>>,
        fallback: Option<Arc<dyn Lapack>>,
    ) -> Self {
        Dispatcher {
            config,
            candidates,
            fallback,
            binding: OnceCell::new(),
            probing: AtomicBool::new(false),
            probe_count: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Names of the candidates in priority order.
    pub fn candidate_names(&self) -> Vec<&'static str> {
        self.candidates.iter().map(|c| c.name()).collect()
    }

    /// Returns the bound backend, probing on first use.
    ///
    /// Concurrent first callers block until the single probe sequence has
    /// finished and then all observe the same result.
    pub fn bind(&self) -> Result<&dyn Lapack, DispatchError> {
        match self.binding.get_or_init(|| self.probe_candidates()) {
            Ok(binding) => Ok(binding.backend.as_ref()),
            Err(err) => Err(err.clone()),
        }
    }

    /// Forces binding and returns the resulting state.
    pub fn init(&self) -> DispatchState {
        let _ = self.bind();
        self.state()
    }

    pub fn state(&self) -> DispatchState {
        match self.binding.get() {
            Some(Ok(binding)) => DispatchState::Bound(binding.backend.name()),
            Some(Err(_)) => DispatchState::Failed,
            None if self.probing.load(Ordering::Acquire) => DispatchState::Probing,
            None => DispatchState::Unbound,
        }
    }

    /// How many probe sequences have run. Never more than one.
    pub fn probe_count(&self) -> usize {
        self.probe_count.load(Ordering::Acquire)
    }

    /// `None` until bound, and for a dispatcher that failed to bind.
    pub fn report(&self) -> Option<BindingReport> {
        match self.binding.get() {
            Some(Ok(binding)) => Some(binding.report.clone()),
            _ => None,
        }
    }

    fn gate(&self, candidate: &dyn BackendCandidate) -> Result<(), ProbeError> {
        let name = candidate.name();
        if let Some(requested) = &self.config.backend {
            if !self.config.selects(name) {
                return Err(ProbeError::NotSelected {
                    backend: name,
                    requested: requested.clone(),
                });
            }
        }
        let provided = candidate.precisions();
        for &precision in &self.config.required_precisions {
            if precision != Precision::Neutral && !provided.contains(&precision) {
                return Err(ProbeError::UnsupportedPrecision { backend: name, precision });
            }
        }
        Ok(())
    }

    fn probe_candidates(&self) -> Result<Binding, DispatchError> {
        self.probing.store(true, Ordering::Release);
        self.probe_count.fetch_add(1, Ordering::AcqRel);
        debug!("Probing LAPACK backends: {:?}", self.candidate_names());

        let mut attempted = Vec::new();
        for candidate in &self.candidates {
            let outcome = self
                .gate(candidate.as_ref())
                .and_then(|()| candidate.probe(&self.config));
            match outcome {
                Ok(backend) => {
                    let report = self.make_report(backend.as_ref(), false, &attempted);
                    info!(
                        "Bound LAPACK backend `{}` (LAPACK {})",
                        report.backend, report.version
                    );
                    return Ok(Binding { backend, report });
                }
                Err(err) => {
                    log_probe_failure(&err);
                    attempted.push(err);
                }
            }
        }

        match &self.fallback {
            Some(fallback) => {
                let report = self.make_report(fallback.as_ref(), true, &attempted);
                if attempted.is_empty() {
                    info!("No LAPACK candidates configured; using `{}`", report.backend);
                } else {
                    warn!(
                        "No preferred LAPACK backend could be bound; falling back to `{}`",
                        report.backend
                    );
                }
                Ok(Binding {
                    backend: Arc::clone(fallback),
                    report,
                })
            }
            None => {
                let err = DispatchError::NoBackendAvailable { attempted };
                warn!("{}", err);
                Err(err)
            }
        }
    }

    fn make_report(&self, backend: &dyn Lapack, fallback: bool, attempted: &[ProbeError]) -> BindingReport {
        let skipped: Vec<SkippedCandidate> = attempted
            .iter()
            .map(|err| SkippedCandidate {
                backend: err.backend().to_string(),
                reason: err.to_string(),
            })
            .collect();
        BindingReport {
            backend: backend.name().to_string(),
            version: backend.version(),
            fallback,
            candidates_probed: skipped.len() + usize::from(!fallback),
            skipped,
        }
    }
}

fn log_probe_failure(err: &ProbeError) {
    match err {
        ProbeError::Disabled { .. } => info!("Skipping LAPACK candidate: {}", err),
        ProbeError::NotSelected { .. } => debug!("Skipping LAPACK candidate: {}", err),
        ProbeError::Unavailable { .. }
        | ProbeError::IncompatibleVersion { .. }
        | ProbeError::UnsupportedPrecision { .. } => warn!("Failed to bind LAPACK candidate: {}", err),
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("candidates", &self.candidate_names())
            .field("fallback", &self.fallback.as_ref().map(|b| b.name()))
            .field("state", &self.state())
            .finish()
    }
}

static GLOBAL: Lazy<Dispatcher> =
    Lazy::new(|| Dispatcher::with_fallback(DispatchConfig::from_env(), default_candidates()));

/// The process-wide dispatcher, configured from the environment on first use.
pub fn global() -> &'static Dispatcher {
    &GLOBAL
}

/// The backend bound for this process.
pub fn lapack() -> &'static dyn Lapack {
    match GLOBAL.bind() {
        Ok(backend) => backend,
        // Unreachable: the global dispatcher always has a fallback.
        Err(_) => &ReferenceLapack,
    }
}

/// Report of the process-wide binding, binding first if needed.
pub fn binding_report() -> Option<BindingReport> {
    let _ = GLOBAL.bind();
    GLOBAL.report()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::kernels;
    use rayon::prelude::*;

    /// Reference kernels under another name, to tell bindings apart.
    struct TaggedLapack;

    for_each_routine!(forward_routines [TaggedLapack, "tagged" => kernels]);

    struct ScriptedCandidate {
        name: &'static str,
        fails_with: Option<ProbeError>,
        probes: Arc<AtomicUsize>,
    }

    impl ScriptedCandidate {
        fn ok(name: &'static str, probes: &Arc<AtomicUsize>) -> Box<dyn BackendCandidate> {
            Box::new(Self { name, fails_with: None, probes: Arc::clone(probes) })
        }

        fn failing(name: &'static str, err: ProbeError, probes: &Arc<AtomicUsize>) -> Box<dyn BackendCandidate> {
            Box::new(Self { name, fails_with: Some(err), probes: Arc::clone(probes) })
        }
    }

    impl BackendCandidate for ScriptedCandidate {
        fn name(&self) -> &'static str {
            self.name
        }

        fn probe(&self, _config: &DispatchConfig) -> Result<Arc<dyn Lapack>, ProbeError> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            match &self.fails_with {
                Some(err) => Err(err.clone()),
                None => Ok(Arc::new(TaggedLapack)),
            }
        }
    }

    struct SinglePrecisionOnly;

    impl BackendCandidate for SinglePrecisionOnly {
        fn name(&self) -> &'static str {
            "single"
        }

        fn precisions(&self) -> &[Precision] {
            &[Precision::Single]
        }

        fn probe(&self, _config: &DispatchConfig) -> Result<Arc<dyn Lapack>, ProbeError> {
            Ok(Arc::new(TaggedLapack))
        }
    }

    #[test]
    fn binds_first_successful_candidate_once() {
        let probes = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::with_fallback(
            DispatchConfig::default(),
            vec![ScriptedCandidate::ok("tagged", &probes), Box::new(ReferenceCandidate)],
        );
        assert_eq!(dispatcher.state(), DispatchState::Unbound);
        assert_eq!(dispatcher.probe_count(), 0);
        assert!(dispatcher.report().is_none());

        assert_eq!(dispatcher.bind().unwrap().name(), "tagged");
        assert_eq!(dispatcher.bind().unwrap().name(), "tagged");
        assert_eq!(dispatcher.init(), DispatchState::Bound("tagged"));
        assert_eq!(dispatcher.probe_count(), 1);
        assert_eq!(probes.load(Ordering::SeqCst), 1);

        let report = dispatcher.report().unwrap();
        assert_eq!(report.backend, "tagged");
        assert!(!report.fallback);
        assert_eq!(report.candidates_probed, 1);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn failing_candidates_fall_back_to_reference() {
        let probes = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::with_fallback(
            DispatchConfig::default(),
            vec![
                ScriptedCandidate::failing(
                    "broken",
                    ProbeError::Unavailable { backend: "broken", reason: "no library".into() },
                    &probes,
                ),
                ScriptedCandidate::failing(
                    "old",
                    ProbeError::IncompatibleVersion {
                        backend: "old",
                        found: LapackVersion::new(3, 0, 0),
                        required: LapackVersion::new(3, 2, 0),
                    },
                    &probes,
                ),
            ],
        );
        let backend = dispatcher.bind().unwrap();
        assert_eq!(backend.name(), ReferenceLapack::NAME);
        assert_eq!(probes.load(Ordering::SeqCst), 2);

        let mut info = -1;
        let mut a = [2.0_f64, 0.0, 0.0, 3.0];
        let mut ipiv = [0_i32; 2];
        backend.dgetrf(2, 2, &mut a, 2, &mut ipiv, &mut info);
        assert_eq!(info, 0);

        let report = dispatcher.report().unwrap();
        assert!(report.fallback);
        assert_eq!(report.version, LapackVersion::new(3, 12, 0));
        let skipped: Vec<_> = report.skipped.iter().map(|s| s.backend.as_str()).collect();
        assert_eq!(skipped, vec!["broken", "old"]);
        assert!(report.skipped[0].reason.contains("no library"));
    }

    #[test]
    fn without_fallback_exhaustion_is_terminal() {
        let probes = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::from_candidates(
            DispatchConfig::default(),
            vec![ScriptedCandidate::failing(
                "native",
                ProbeError::Disabled { backend: "native" },
                &probes,
            )],
        );
        match dispatcher.bind() {
            Err(DispatchError::NoBackendAvailable { attempted }) => {
                assert_eq!(attempted, vec![ProbeError::Disabled { backend: "native" }]);
            }
            Ok(backend) => panic!("unexpectedly bound {}", backend.name()),
        }
        assert_eq!(dispatcher.state(), DispatchState::Failed);
        assert!(dispatcher.bind().is_err());
        assert_eq!(dispatcher.probe_count(), 1);
        assert_eq!(probes.load(Ordering::SeqCst), 1);
        assert!(dispatcher.report().is_none());
    }

    #[test]
    fn empty_dispatcher_without_fallback_fails() {
        let dispatcher = Dispatcher::from_candidates(DispatchConfig::default(), Vec::new());
        assert_eq!(dispatcher.init(), DispatchState::Failed);
        assert_eq!(
            dispatcher.bind().err(),
            Some(DispatchError::NoBackendAvailable { attempted: Vec::new() })
        );
    }

    #[test]
    fn requested_backend_skips_the_others() {
        let probes = Arc::new(AtomicUsize::new(0));
        let config = DispatchConfig {
            backend: Some("reference".to_string()),
            ..DispatchConfig::default()
        };
        let dispatcher = Dispatcher::from_candidates(
            config,
            vec![ScriptedCandidate::ok("tagged", &probes), Box::new(ReferenceCandidate)],
        );
        assert_eq!(dispatcher.init(), DispatchState::Bound(ReferenceLapack::NAME));
        assert_eq!(probes.load(Ordering::SeqCst), 0);
        let report = dispatcher.report().unwrap();
        assert!(!report.fallback);
        assert_eq!(report.candidates_probed, 2);
        assert_eq!(report.skipped[0].backend, "tagged");
        assert!(report.skipped[0].reason.contains("not selected"));
    }

    #[test]
    fn precision_requirements_are_checked_before_probing() {
        let dispatcher = Dispatcher::with_fallback(DispatchConfig::default(), vec![Box::new(SinglePrecisionOnly)]);
        assert_eq!(dispatcher.init(), DispatchState::Bound(ReferenceLapack::NAME));
        let report = dispatcher.report().unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].reason.contains("Double"));

        let relaxed = DispatchConfig {
            required_precisions: vec![Precision::Single],
            ..DispatchConfig::default()
        };
        let dispatcher = Dispatcher::with_fallback(relaxed, vec![Box::new(SinglePrecisionOnly)]);
        assert_eq!(dispatcher.init(), DispatchState::Bound("tagged"));
    }

    #[test]
    fn reference_candidate_respects_min_version() {
        let strict = DispatchConfig {
            min_version: LapackVersion::new(4, 0, 0),
            ..DispatchConfig::default()
        };
        match ReferenceCandidate.probe(&strict) {
            Err(ProbeError::IncompatibleVersion { found, required, .. }) => {
                assert_eq!(found, LapackVersion::new(3, 12, 0));
                assert_eq!(required, LapackVersion::new(4, 0, 0));
            }
            other => panic!("unexpected probe result: {:?}", other.map(|b| b.name())),
        }
        assert!(ReferenceCandidate.probe(&DispatchConfig::default()).is_ok());
    }

    #[test]
    fn concurrent_first_use_probes_once() {
        let probes = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::with_fallback(
            DispatchConfig::default(),
            vec![ScriptedCandidate::ok("tagged", &probes)],
        );
        let names: Vec<&'static str> = (0..64)
            .into_par_iter()
            .map(|_| dispatcher.bind().unwrap().name())
            .collect();
        assert!(names.iter().all(|&n| n == "tagged"));
        assert_eq!(dispatcher.probe_count(), 1);
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn global_dispatcher_always_binds() {
        let backend = lapack();
        let report = binding_report().unwrap();
        assert_eq!(report.backend, backend.name());
        assert!(std::ptr::eq(
            backend as *const dyn Lapack as *const u8,
            lapack() as *const dyn Lapack as *const u8
        ));
        assert_eq!(global().probe_count(), 1);
        let (mut major, mut minor, mut patch) = (0, 0, 0);
        backend.ilaver(&mut major, &mut minor, &mut patch);
        assert_eq!(LapackVersion::new(major, minor, patch), report.version);
    }

    #[test]
    fn report_serializes() {
        let dispatcher = Dispatcher::with_fallback(DispatchConfig::default(), Vec::new());
        dispatcher.init();
        let report = dispatcher.report().unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"backend\":\"reference\""));
        let back: BindingReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
