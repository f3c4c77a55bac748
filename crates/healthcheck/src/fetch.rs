//! StatefulSet retrieval from a cluster plane.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::StatefulSet;
use kube::{Api, Client};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

use crate::error::FetchError;
use crate::plane::{ObjectKey, Plane};

/// Read access to StatefulSets on one cluster plane.
///
/// Implementations are request issuers without per-call state, so one handle may serve any
/// number of concurrent checks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatefulSetFetcher: Send + Sync + Debug {
    async fn get(&self, key: &ObjectKey) -> Result<StatefulSet, FetchError>;
}

/// Fetcher backed by a `kube` client
#[derive(Clone)]
pub struct KubeFetcher {
    client: Client,
}

impl KubeFetcher {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Debug for KubeFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeFetcher").finish_non_exhaustive()
    }
}

#[async_trait]
impl StatefulSetFetcher for KubeFetcher {
    async fn get(&self, key: &ObjectKey) -> Result<StatefulSet, FetchError> {
        debug!(statefulset = %key.name, namespace = %key.namespace, "Fetching StatefulSet");
        let api: Api<StatefulSet> = Api::namespaced(self.client.clone(), &key.namespace);
        api.get(&key.name).await.map_err(FetchError::from)
    }
}

impl From<kube::Error> for FetchError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) if response.code == 404 => Self::NotFound,
            kube::Error::Api(response) => Self::Api {
                code: response.code,
                message: response.message,
            },
            other => Self::Transport(other.to_string()),
        }
    }
}

/// The fetchers a framework holds for both planes.
///
/// Checks take only the fetcher for their own plane out of this pair.
#[derive(Debug, Clone)]
pub struct PlaneClients {
    pub management: Arc<dyn StatefulSetFetcher>,
    pub managed: Arc<dyn StatefulSetFetcher>,
}

impl PlaneClients {
    pub fn new(
        management: Arc<dyn StatefulSetFetcher>,
        managed: Arc<dyn StatefulSetFetcher>,
    ) -> Self {
        Self {
            management,
            managed,
        }
    }

    /// Both planes served by `kube` clients
    #[must_use]
    pub fn from_kube(management: Client, managed: Client) -> Self {
        Self::new(
            Arc::new(KubeFetcher::new(management)),
            Arc::new(KubeFetcher::new(managed)),
        )
    }

    #[must_use]
    pub fn for_plane(&self, plane: Plane) -> Arc<dyn StatefulSetFetcher> {
        match plane {
            Plane::Management => Arc::clone(&self.management),
            Plane::Managed => Arc::clone(&self.managed),
        }
    }
}
