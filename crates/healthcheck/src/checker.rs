//! StatefulSet check definitions and their executable instances.
//!
//! A [`StatefulSetCheck`] is registered once and never runs. Every scheduled run binds it to
//! the fetcher of its plane, producing a [`TargetedChecker`] owned by that run alone, so the
//! same definition can be checked against many namespaces at once.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::context::CheckContext;
use crate::error::{CheckError, Result};
use crate::fetch::{PlaneClients, StatefulSetFetcher};
use crate::health;
use crate::plane::{NamespacedName, ObjectKey, Plane};
use crate::result::CheckResult;

const DEFAULT_LOG_LABEL: &str = "healthcheck-statefulset";

/// Diagnostic label for checks run on behalf of a provider/extension pair
#[must_use]
pub fn log_label_for(provider: &str, extension: &str) -> String {
    format!("{provider}-{extension}-{DEFAULT_LOG_LABEL}")
}

/// Interface the health-check framework schedules
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Run the check for the workload identified by `request`.
    ///
    /// `Ok` carries the verdict of a check that ran; `Err` means it could not run.
    async fn check(&self, ctx: &CheckContext, request: &NamespacedName) -> Result<CheckResult>;

    /// Attribute diagnostics to a provider/extension pair
    fn set_log_label(&mut self, provider: &str, extension: &str);

    /// Independent copy for a concurrent run
    fn boxed_clone(&self) -> Box<dyn HealthCheck>;
}

/// What to check: a StatefulSet name and the plane it lives on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatefulSetCheck {
    name: String,
    plane: Plane,
}

impl StatefulSetCheck {
    /// Check a StatefulSet in the management plane
    pub fn management(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plane: Plane::Management,
        }
    }

    /// Check a StatefulSet in the managed plane
    pub fn managed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plane: Plane::Managed,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn plane(&self) -> Plane {
        self.plane
    }

    /// Bind to the fetcher that serves this check's plane
    #[must_use]
    pub fn bind(&self, fetcher: Arc<dyn StatefulSetFetcher>) -> TargetedChecker {
        TargetedChecker {
            definition: self.clone(),
            fetcher,
            log_label: DEFAULT_LOG_LABEL.to_string(),
        }
    }

    /// Bind to whichever of the framework's fetchers matches this check's plane.
    /// The other fetcher is not retained.
    #[must_use]
    pub fn bind_clients(&self, clients: &PlaneClients) -> TargetedChecker {
        self.bind(clients.for_plane(self.plane))
    }
}

/// A check bound to the one fetcher it reads from
#[derive(Debug, Clone)]
pub struct TargetedChecker {
    definition: StatefulSetCheck,
    fetcher: Arc<dyn StatefulSetFetcher>,
    log_label: String,
}

impl TargetedChecker {
    #[must_use]
    pub fn definition(&self) -> &StatefulSetCheck {
        &self.definition
    }

    #[must_use]
    pub fn log_label(&self) -> &str {
        &self.log_label
    }

    /// Replace the bound fetcher
    pub fn inject_client(&mut self, fetcher: Arc<dyn StatefulSetFetcher>) {
        self.fetcher = fetcher;
    }

    #[must_use]
    pub fn with_log_label(mut self, provider: &str, extension: &str) -> Self {
        self.set_log_label(provider, extension);
        self
    }

    #[must_use]
    pub fn fetcher(&self) -> &Arc<dyn StatefulSetFetcher> {
        &self.fetcher
    }

    /// Fetch the StatefulSet named by the definition in `request.namespace` and evaluate it.
    #[instrument(
        skip(self, ctx),
        fields(
            check = %self.log_label,
            statefulset = %self.definition.name,
            namespace = %request.namespace,
            plane = %self.definition.plane,
        )
    )]
    pub async fn check(&self, ctx: &CheckContext, request: &NamespacedName) -> Result<CheckResult> {
        let key = ObjectKey {
            namespace: request.namespace.clone(),
            name: self.definition.name.clone(),
        };

        let statefulset = match ctx.run(self.fetcher.get(&key)).await {
            Ok(statefulset) => statefulset,
            Err(source) => {
                let err = CheckError::Fetch {
                    name: key.name,
                    namespace: key.namespace,
                    source,
                };
                error!(error = %err, "Health check failed");
                return Err(err);
            }
        };

        let result = health::evaluate(&statefulset);
        match &result {
            CheckResult::Healthy => debug!("StatefulSet is healthy"),
            CheckResult::Unhealthy { reason, detail } => {
                error!(reason = %reason, error = %detail, "Health check failed");
            }
        }
        Ok(result)
    }
}

#[async_trait]
impl HealthCheck for TargetedChecker {
    async fn check(&self, ctx: &CheckContext, request: &NamespacedName) -> Result<CheckResult> {
        TargetedChecker::check(self, ctx, request).await
    }

    fn set_log_label(&mut self, provider: &str, extension: &str) {
        self.log_label = log_label_for(provider, extension);
    }

    fn boxed_clone(&self) -> Box<dyn HealthCheck> {
        Box::new(self.clone())
    }
}
