//! Patch bodies sent to the Deployment API. Each one carries only the fields it changes.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// Pod-template annotation `kubectl rollout restart` uses to force new pods.
pub const RESTART_ANNOTATION: &str = "kubectl.kubernetes.io/restartedAt";

/// UTC ISO-8601 with microseconds and a trailing `Z`.
pub fn restart_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Touches the restart annotation on the pod template.
pub fn restart_patch(timestamp: &str) -> Value {
    json!({
        "spec": {
            "template": {
                "metadata": {
                    "annotations": {
                        RESTART_ANNOTATION: timestamp
                    }
                }
            }
        }
    })
}

/// Strategic merge patch setting one container's memory limit.
///
/// The container is matched by `name` (its merge key), so requests, CPU limits
/// and every other container field are left as they are.
pub fn memory_limit_patch(container_name: &str, memory_limit: &str) -> Value {
    json!({
        "spec": {
            "template": {
                "spec": {
                    "containers": [
                        {
                            "name": container_name,
                            "resources": {
                                "limits": {
                                    "memory": memory_limit
                                }
                            }
                        }
                    ]
                }
            }
        }
    })
}
