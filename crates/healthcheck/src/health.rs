//! StatefulSet health rules.
//!
//! [`check_stateful_set`] inspects only the object's spec and status sub-resource;
//! [`evaluate`] turns its outcome into a [`CheckResult`].

use k8s_openapi::api::apps::v1::StatefulSet;
use kube::ResourceExt;
use thiserror::Error;

use crate::result::CheckResult;

/// Reason reported for every unhealthy StatefulSet
pub const STATEFULSET_UNHEALTHY: &str = "StatefulSetUnhealthy";

/// A discrepancy found in a StatefulSet's status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralHealthError {
    #[error("status not yet reported")]
    StatusMissing,

    #[error("observed generation outdated ({observed}/{expected})")]
    ObservedGenerationOutdated { observed: i64, expected: i64 },

    #[error("not enough ready replicas ({ready}/{desired})")]
    NotEnoughReadyReplicas { ready: i32, desired: i32 },

    #[error("rollout to revision {revision} in progress ({updated}/{desired} replicas updated)")]
    RolloutInProgress {
        updated: i32,
        desired: i32,
        revision: String,
    },
}

/// Check the structural health of a StatefulSet.
///
/// Rules are applied in order and the first failure is returned. `spec.replicas` defaults to 1
/// as the API server does. Revision consistency is only enforced for the `RollingUpdate`
/// strategy; `OnDelete` sets legitimately stay on an old revision until pods are deleted.
pub fn check_stateful_set(statefulset: &StatefulSet) -> Result<(), StructuralHealthError> {
    let status = statefulset
        .status
        .as_ref()
        .ok_or(StructuralHealthError::StatusMissing)?;

    let generation = statefulset.metadata.generation.unwrap_or(0);
    let observed = status.observed_generation.unwrap_or(0);
    if observed < generation {
        return Err(StructuralHealthError::ObservedGenerationOutdated {
            observed,
            expected: generation,
        });
    }

    let spec = statefulset.spec.as_ref();
    let desired = spec.and_then(|s| s.replicas).unwrap_or(1);
    let ready = status.ready_replicas.unwrap_or(0);
    if ready < desired {
        return Err(StructuralHealthError::NotEnoughReadyReplicas { ready, desired });
    }

    let on_delete = spec
        .and_then(|s| s.update_strategy.as_ref())
        .and_then(|strategy| strategy.type_.as_deref())
        == Some("OnDelete");
    if !on_delete {
        if let (Some(current), Some(update)) = (
            status.current_revision.as_deref(),
            status.update_revision.as_deref(),
        ) {
            let updated = status.updated_replicas.unwrap_or(0);
            if current != update && updated < desired {
                return Err(StructuralHealthError::RolloutInProgress {
                    updated,
                    desired,
                    revision: update.to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Classify a StatefulSet as healthy or unhealthy.
pub fn evaluate(statefulset: &StatefulSet) -> CheckResult {
    match check_stateful_set(statefulset) {
        Ok(()) => CheckResult::Healthy,
        // reason is a non-empty constant and detail always embeds the cause
        Err(cause) => CheckResult::Unhealthy {
            reason: STATEFULSET_UNHEALTHY.to_string(),
            detail: format!(
                "statefulSet {} in namespace {} is unhealthy: {cause}",
                statefulset.name_any(),
                statefulset.namespace().unwrap_or_default()
            ),
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::{StatefulSetSpec, StatefulSetStatus, StatefulSetUpdateStrategy};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    /// StatefulSet with `ready` of `desired` replicas on a single revision
    pub(crate) fn statefulset(name: &str, namespace: &str, desired: i32, ready: i32) -> StatefulSet {
        StatefulSet {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                generation: Some(2),
                ..Default::default()
            },
            spec: Some(StatefulSetSpec {
                replicas: Some(desired),
                ..Default::default()
            }),
            status: Some(StatefulSetStatus {
                observed_generation: Some(2),
                replicas: desired,
                ready_replicas: Some(ready),
                current_replicas: Some(desired),
                updated_replicas: Some(desired),
                current_revision: Some(format!("{name}-7d9f")),
                update_revision: Some(format!("{name}-7d9f")),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn all_replicas_ready_is_healthy() {
        let sts = statefulset("etcd-main", "shoot--dev--abc", 3, 3);
        assert_eq!(check_stateful_set(&sts), Ok(()));
        assert_eq!(evaluate(&sts), CheckResult::Healthy);
    }

    #[test]
    fn missing_ready_replicas_is_unhealthy() {
        let sts = statefulset("etcd-main", "shoot--dev--abc", 3, 1);
        assert_eq!(
            check_stateful_set(&sts),
            Err(StructuralHealthError::NotEnoughReadyReplicas {
                ready: 1,
                desired: 3
            })
        );

        let result = evaluate(&sts);
        assert_eq!(result.reason(), Some(STATEFULSET_UNHEALTHY));
        assert_eq!(
            result.detail(),
            Some(
                "statefulSet etcd-main in namespace shoot--dev--abc is unhealthy: \
                 not enough ready replicas (1/3)"
            )
        );
    }

    #[test]
    fn replicas_default_to_one() {
        let mut sts = statefulset("prometheus", "garden", 1, 0);
        sts.spec.as_mut().unwrap().replicas = None;
        assert_eq!(
            check_stateful_set(&sts),
            Err(StructuralHealthError::NotEnoughReadyReplicas {
                ready: 0,
                desired: 1
            })
        );
    }

    #[test]
    fn scaled_to_zero_is_healthy() {
        let mut sts = statefulset("loki", "garden", 0, 0);
        sts.status.as_mut().unwrap().ready_replicas = None;
        assert_eq!(check_stateful_set(&sts), Ok(()));
    }

    #[test]
    fn outdated_observed_generation_is_unhealthy() {
        let mut sts = statefulset("etcd-events", "shoot--dev--abc", 1, 1);
        sts.metadata.generation = Some(5);
        sts.status.as_mut().unwrap().observed_generation = Some(4);

        let err = check_stateful_set(&sts).unwrap_err();
        assert_eq!(err.to_string(), "observed generation outdated (4/5)");
    }

    #[test]
    fn missing_status_is_unhealthy() {
        let mut sts = statefulset("etcd-events", "shoot--dev--abc", 1, 1);
        sts.status = None;
        assert_eq!(
            check_stateful_set(&sts),
            Err(StructuralHealthError::StatusMissing)
        );
    }

    #[test]
    fn rolling_update_in_progress_is_unhealthy() {
        let mut sts = statefulset("vali", "shoot--dev--abc", 3, 3);
        let status = sts.status.as_mut().unwrap();
        status.update_revision = Some("vali-88aa".to_string());
        status.updated_replicas = Some(1);

        assert_eq!(
            check_stateful_set(&sts),
            Err(StructuralHealthError::RolloutInProgress {
                updated: 1,
                desired: 3,
                revision: "vali-88aa".to_string()
            })
        );
    }

    #[test]
    fn on_delete_strategy_tolerates_revision_skew() {
        let mut sts = statefulset("vali", "shoot--dev--abc", 3, 3);
        sts.spec.as_mut().unwrap().update_strategy = Some(StatefulSetUpdateStrategy {
            type_: Some("OnDelete".to_string()),
            ..Default::default()
        });
        let status = sts.status.as_mut().unwrap();
        status.update_revision = Some("vali-88aa".to_string());
        status.updated_replicas = Some(0);

        assert_eq!(check_stateful_set(&sts), Ok(()));
    }

    #[test]
    fn completed_rollout_with_lagging_current_revision_is_healthy() {
        let mut sts = statefulset("vali", "shoot--dev--abc", 2, 2);
        let status = sts.status.as_mut().unwrap();
        status.update_revision = Some("vali-88aa".to_string());
        status.updated_replicas = Some(2);

        assert_eq!(check_stateful_set(&sts), Ok(()));
    }
}
