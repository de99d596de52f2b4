use anyhow::{anyhow, Result};
use k8s_openapi::api::{
    apps::v1::Deployment as DeploymentObject,
    autoscaling::v2::HorizontalPodAutoscaler as HorizontalPodAutoscalerObject,
    core::v1::{
        ConfigMap as ConfigMapObject, Pod as PodObject, PodSpec, Secret as SecretObject,
    },
};
use kube::ResourceExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    consts::DEFAULT_NAMESPACE,
    resource::{
        ConfigMap, Container, Deployment, DeploymentReplicas, HorizontalAutoscaler,
        OwnerReference, Pod, ResourceRecord, ScaleTargetRef, Secret,
    },
};

const UNKNOWN: &str = "Unknown";

impl ResourceRecord {
    /// Converts a raw Kubernetes object into a record.
    ///
    /// Objects of unsupported kinds or API versions yield `None`.
    pub fn from_object(object: Value) -> Result<Option<Self>> {
        let api_version = object
            .get("apiVersion")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let kind = object
            .get("kind")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match (api_version.as_str(), kind.as_str()) {
            ("apps/v1", "Deployment") => parse::<DeploymentObject>(&kind, object)
                .map(|object| Some(Deployment::from(&object).into())),
            ("v1", "Pod") => {
                parse::<PodObject>(&kind, object).map(|object| Some(Pod::from(&object).into()))
            }
            ("v1", "ConfigMap") => parse::<ConfigMapObject>(&kind, object)
                .map(|object| Some(ConfigMap::from(&object).into())),
            ("v1", "Secret") => parse::<SecretObject>(&kind, object)
                .map(|object| Some(Secret::from(&object).into())),
            ("autoscaling/v2", "HorizontalPodAutoscaler") => {
                parse::<HorizontalPodAutoscalerObject>(&kind, object)
                    .map(|object| Some(HorizontalAutoscaler::from(&object).into()))
            }
            _ => Ok(None),
        }
    }
}

fn parse<K>(kind: &str, object: Value) -> Result<K>
where
    K: DeserializeOwned,
{
    ::serde_json::from_value(object)
        .map_err(|error| anyhow!("failed to parse {kind} object: {error}"))
}

fn namespace_of<K>(object: &K) -> String
where
    K: ResourceExt,
{
    object
        .namespace()
        .unwrap_or_else(|| DEFAULT_NAMESPACE.into())
}

impl From<&DeploymentObject> for Deployment {
    fn from(object: &DeploymentObject) -> Self {
        let spec = object.spec.as_ref();
        let status = object.status.as_ref();

        let replicas = DeploymentReplicas {
            desired: spec.and_then(|spec| spec.replicas).unwrap_or_default(),
            ready: status
                .and_then(|status| status.ready_replicas)
                .unwrap_or_default(),
            available: status
                .and_then(|status| status.available_replicas)
                .unwrap_or_default(),
            unavailable: status
                .and_then(|status| status.unavailable_replicas)
                .unwrap_or_default(),
        };

        let status = if replicas.unavailable > 0 {
            "Degraded"
        } else if replicas.ready < replicas.desired {
            "Progressing"
        } else {
            "Available"
        };

        let References {
            config_maps,
            secrets,
        } = spec
            .and_then(|spec| spec.template.spec.as_ref())
            .map(References::from_pod_spec)
            .unwrap_or_default();

        Self {
            name: object.name_any(),
            namespace: namespace_of(object),
            status: status.into(),
            replicas,
            strategy: spec
                .and_then(|spec| spec.strategy.as_ref())
                .and_then(|strategy| strategy.type_.clone())
                .unwrap_or_else(|| "RollingUpdate".into()),
            labels: object.labels().clone(),
            selector: spec
                .and_then(|spec| spec.selector.match_labels.clone())
                .unwrap_or_default(),
            config_maps,
            secrets,
        }
    }
}

impl From<&PodObject> for Pod {
    fn from(object: &PodObject) -> Self {
        let spec = object.spec.as_ref();
        let status = object.status.as_ref();

        let container_statuses = status
            .and_then(|status| status.container_statuses.as_deref())
            .unwrap_or_default();

        // kubelet reports a crash-looping pod as `Running`; surface the waiting reason instead
        let is_crash_looping = container_statuses.iter().any(|container| {
            container
                .state
                .as_ref()
                .and_then(|state| state.waiting.as_ref())
                .and_then(|waiting| waiting.reason.as_deref())
                == Some("CrashLoopBackOff")
        });
        let phase = if is_crash_looping {
            "CrashLoopBackOff".into()
        } else {
            status
                .and_then(|status| status.phase.clone())
                .unwrap_or_else(|| UNKNOWN.into())
        };

        let References {
            config_maps,
            secrets,
        } = spec.map(References::from_pod_spec).unwrap_or_default();

        Self {
            name: object.name_any(),
            namespace: namespace_of(object),
            status: phase,
            restart_count: container_statuses
                .iter()
                .map(|container| container.restart_count)
                .sum(),
            node_name: spec
                .and_then(|spec| spec.node_name.clone())
                .unwrap_or_else(|| UNKNOWN.into()),
            ip: status
                .and_then(|status| status.pod_ip.clone())
                .unwrap_or_else(|| UNKNOWN.into()),
            containers: container_statuses
                .iter()
                .map(|container| Container {
                    name: container.name.clone(),
                    image: container.image.clone(),
                    ready: container.ready,
                    restart_count: container.restart_count,
                })
                .collect(),
            labels: object.labels().clone(),
            owner_references: object
                .owner_references()
                .iter()
                .map(|owner| OwnerReference {
                    kind: owner.kind.clone(),
                    name: owner.name.clone(),
                    uid: owner.uid.clone(),
                })
                .collect(),
            config_maps,
            secrets,
        }
    }
}

impl From<&ConfigMapObject> for ConfigMap {
    fn from(object: &ConfigMapObject) -> Self {
        let mut data = object.data.clone().unwrap_or_default();
        if let Some(binary_data) = &object.binary_data {
            data.extend(binary_data.keys().map(|key| (key.clone(), String::default())));
        }

        Self {
            name: object.name_any(),
            namespace: namespace_of(object),
            data,
            labels: object.labels().clone(),
        }
    }
}

impl From<&SecretObject> for Secret {
    fn from(object: &SecretObject) -> Self {
        let mut keys: Vec<String> = Vec::default();
        let data_keys = object.data.iter().flat_map(|data| data.keys());
        let string_data_keys = object.string_data.iter().flat_map(|data| data.keys());
        for key in data_keys.chain(string_data_keys) {
            push_unique(&mut keys, key);
        }

        Self {
            name: object.name_any(),
            namespace: namespace_of(object),
            type_: object.type_.clone().unwrap_or_else(|| "Opaque".into()),
            keys,
            labels: object.labels().clone(),
        }
    }
}

impl From<&HorizontalPodAutoscalerObject> for HorizontalAutoscaler {
    fn from(object: &HorizontalPodAutoscalerObject) -> Self {
        let spec = object.spec.as_ref();
        let status = object.status.as_ref();

        Self {
            name: object.name_any(),
            namespace: namespace_of(object),
            target_ref: spec
                .map(|spec| ScaleTargetRef {
                    kind: spec.scale_target_ref.kind.clone(),
                    name: spec.scale_target_ref.name.clone(),
                })
                .unwrap_or_default(),
            min_replicas: spec.and_then(|spec| spec.min_replicas).unwrap_or(1),
            max_replicas: spec.map(|spec| spec.max_replicas).unwrap_or(1),
            current_replicas: status
                .and_then(|status| status.current_replicas)
                .unwrap_or_default(),
            desired_replicas: status
                .map(|status| status.desired_replicas)
                .unwrap_or_default(),
            labels: object.labels().clone(),
        }
    }
}

/// Names of the config maps and secrets a pod template mounts or reads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct References {
    config_maps: Vec<String>,
    secrets: Vec<String>,
}

impl References {
    fn from_pod_spec(spec: &PodSpec) -> Self {
        let mut references = Self::default();

        for container in &spec.containers {
            for source in container.env_from.iter().flatten() {
                if let Some(source) = &source.config_map_ref {
                    references.add_config_map(&source.name);
                }
                if let Some(source) = &source.secret_ref {
                    references.add_secret(&source.name);
                }
            }

            for var in container.env.iter().flatten() {
                let Some(source) = &var.value_from else {
                    continue;
                };
                if let Some(selector) = &source.config_map_key_ref {
                    references.add_config_map(&selector.name);
                }
                if let Some(selector) = &source.secret_key_ref {
                    references.add_secret(&selector.name);
                }
            }
        }

        for volume in spec.volumes.iter().flatten() {
            if let Some(source) = &volume.config_map {
                references.add_config_map(&source.name);
            }
            if let Some(source) = &volume.secret {
                references.add_secret(&source.secret_name);
            }
        }

        for secret in spec.image_pull_secrets.iter().flatten() {
            references.add_secret(&secret.name);
        }

        references
    }

    fn add_config_map(&mut self, name: &impl ReferenceName) {
        if let Some(name) = name.reference_name() {
            push_unique(&mut self.config_maps, name)
        }
    }

    fn add_secret(&mut self, name: &impl ReferenceName) {
        if let Some(name) = name.reference_name() {
            push_unique(&mut self.secrets, name)
        }
    }
}

/// Object references are optional in some API revisions and required in others.
trait ReferenceName {
    fn reference_name(&self) -> Option<&str>;
}

impl ReferenceName for String {
    fn reference_name(&self) -> Option<&str> {
        Some(self.as_str()).filter(|name| !name.is_empty())
    }
}

impl ReferenceName for Option<String> {
    fn reference_name(&self) -> Option<&str> {
        self.as_deref().filter(|name| !name.is_empty())
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|known| known == name) {
        names.push(name.into())
    }
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;
    use serde_json::json;

    use super::*;
    use crate::resource::ResourceType;

    fn convert(object: Value) -> ResourceRecord {
        ResourceRecord::from_object(object)
            .expect("failed to convert object")
            .expect("unsupported object")
    }

    #[test]
    fn convert_deployment_references() {
        let record = convert(json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {
                "name": "web",
                "namespace": "shop",
                "labels": { "app": "web" },
            },
            "spec": {
                "replicas": 3,
                "selector": { "matchLabels": { "app": "web" } },
                "template": {
                    "spec": {
                        "containers": [{
                            "name": "web",
                            "image": "nginx:1.27",
                            "envFrom": [
                                { "configMapRef": { "name": "web-env" } },
                                { "secretRef": { "name": "web-credentials" } },
                            ],
                            "env": [
                                {
                                    "name": "FEATURE",
                                    "valueFrom": {
                                        "configMapKeyRef": { "name": "features", "key": "flag" },
                                    },
                                },
                                {
                                    "name": "TOKEN",
                                    "valueFrom": {
                                        "secretKeyRef": { "name": "web-credentials", "key": "token" },
                                    },
                                },
                            ],
                        }],
                        "volumes": [
                            { "name": "config", "configMap": { "name": "web-env" } },
                            { "name": "tls", "secret": { "secretName": "web-tls" } },
                        ],
                        "imagePullSecrets": [{ "name": "registry" }],
                    },
                },
            },
            "status": {
                "readyReplicas": 2,
                "availableReplicas": 2,
            },
        }));

        let ResourceRecord::Deployment(deployment) = record else {
            panic!("expected a deployment record");
        };
        assert_eq!(deployment.namespace, "shop");
        assert_eq!(deployment.status, "Progressing");
        assert_eq!(deployment.replicas.to_string(), "2/3");
        assert_eq!(deployment.strategy, "RollingUpdate");
        assert_eq!(
            deployment.selector,
            btreemap! { "app".to_string() => "web".to_string() },
        );
        assert_eq!(deployment.config_maps, ["web-env", "features"]);
        assert_eq!(
            deployment.secrets,
            ["web-credentials", "web-tls", "registry"],
        );
    }

    #[test]
    fn convert_deployment_status() {
        let deployment = |status: Value| {
            let record = convert(json!({
                "apiVersion": "apps/v1",
                "kind": "Deployment",
                "metadata": { "name": "web" },
                "spec": {
                    "replicas": 2,
                    "selector": {},
                    "template": {},
                },
                "status": status,
            }));
            match record {
                ResourceRecord::Deployment(deployment) => deployment,
                _ => panic!("expected a deployment record"),
            }
        };

        let available = deployment(json!({ "readyReplicas": 2 }));
        assert_eq!(available.status, "Available");
        assert_eq!(available.namespace, "default");

        let degraded = deployment(json!({ "readyReplicas": 1, "unavailableReplicas": 1 }));
        assert_eq!(degraded.status, "Degraded");
    }

    #[test]
    fn convert_crash_looping_pod() {
        let record = convert(json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {
                "name": "web-0",
                "namespace": "default",
                "labels": { "app": "web" },
                "ownerReferences": [{
                    "apiVersion": "apps/v1",
                    "kind": "ReplicaSet",
                    "name": "web-6d4b",
                    "uid": "1b2c",
                }],
            },
            "spec": {
                "nodeName": "worker-1",
                "containers": [{ "name": "web" }, { "name": "sidecar" }],
            },
            "status": {
                "phase": "Running",
                "podIP": "10.0.0.7",
                "containerStatuses": [
                    {
                        "name": "web",
                        "image": "nginx:1.27",
                        "imageID": "",
                        "ready": false,
                        "restartCount": 5,
                        "state": { "waiting": { "reason": "CrashLoopBackOff" } },
                    },
                    {
                        "name": "sidecar",
                        "image": "envoy:1.30",
                        "imageID": "",
                        "ready": true,
                        "restartCount": 1,
                    },
                ],
            },
        }));

        assert_eq!(record.kind(), ResourceType::Pod);
        let ResourceRecord::Pod(pod) = record else {
            panic!("expected a pod record");
        };
        assert_eq!(pod.status, "CrashLoopBackOff");
        assert_eq!(pod.restart_count, 6);
        assert_eq!(pod.node_name, "worker-1");
        assert_eq!(pod.ip, "10.0.0.7");
        assert_eq!(pod.containers.len(), 2);
        assert!(!pod.containers[0].ready);
        assert_eq!(pod.owner_references[0].kind, "ReplicaSet");
    }

    #[test]
    fn convert_secret_without_values() {
        let record = convert(json!({
            "apiVersion": "v1",
            "kind": "Secret",
            "metadata": { "name": "web-credentials", "namespace": "default" },
            "data": { "password": "aHVudGVyMg==", "username": "YWRtaW4=" },
        }));

        let ResourceRecord::Secret(secret) = record else {
            panic!("expected a secret record");
        };
        assert_eq!(secret.type_, "Opaque");
        assert_eq!(secret.keys, ["password", "username"]);
    }

    #[test]
    fn convert_hpa_target() {
        let record = convert(json!({
            "apiVersion": "autoscaling/v2",
            "kind": "HorizontalPodAutoscaler",
            "metadata": { "name": "web", "namespace": "default" },
            "spec": {
                "scaleTargetRef": { "apiVersion": "apps/v1", "kind": "Deployment", "name": "web" },
                "maxReplicas": 5,
            },
            "status": { "currentReplicas": 2, "desiredReplicas": 3 },
        }));

        let ResourceRecord::Hpa(hpa) = record else {
            panic!("expected an autoscaler record");
        };
        assert_eq!(hpa.target_ref.kind, "Deployment");
        assert_eq!(hpa.min_replicas, 1);
        assert_eq!(hpa.max_replicas, 5);
        assert_eq!(hpa.current_replicas, 2);
        assert_eq!(hpa.desired_replicas, 3);
    }

    #[test]
    fn skip_unsupported_kinds() {
        let service = json!({
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": { "name": "web" },
        });
        assert_eq!(
            ResourceRecord::from_object(service).expect("failed to convert object"),
            None,
        );
    }
}
