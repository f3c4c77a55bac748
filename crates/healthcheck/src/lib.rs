/*
 * 5D Labs Agent Platform - StatefulSet Health Checks
 * Copyright (C) 2025 5D Labs
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */

//! StatefulSet health checks
//!
//! A check is registered once as a [`StatefulSetCheck`] (resource name + cluster plane) and
//! bound to the fetcher for its plane right before every run, producing a [`TargetedChecker`].
//! Running it fetches the StatefulSet, evaluates its status and reports either a
//! [`CheckResult`] or a [`CheckError`] when the check itself could not run.

pub mod checker;
pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod health;
pub mod logging;
pub mod plane;
pub mod result;

// Re-export commonly used types
pub use checker::{HealthCheck, StatefulSetCheck, TargetedChecker};
pub use config::HealthCheckConfig;
pub use context::CheckContext;
pub use error::{CheckError, FetchError, Result};
pub use fetch::{KubeFetcher, PlaneClients, StatefulSetFetcher};
pub use health::{check_stateful_set, evaluate, StructuralHealthError, STATEFULSET_UNHEALTHY};
pub use plane::{NamespacedName, ObjectKey, Plane};
pub use result::{CheckResult, InvalidCheckResult};
