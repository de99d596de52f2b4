use std::collections::{BTreeMap, BTreeSet};

use kubetopo_api::resource::{
    ConfigMap, Deployment, HorizontalAutoscaler, Pod, ResourceRecord, Secret, TopologyResource,
};

/// Records of a single kind, keyed by `(namespace, name)`.
#[derive(Clone, Debug)]
struct Table<R> {
    map: BTreeMap<(String, String), R>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            map: BTreeMap::default(),
        }
    }
}

impl<R> Table<R>
where
    R: TopologyResource,
{
    fn insert(&mut self, record: R) {
        let key = (record.namespace().into(), record.name().into());
        self.map.insert(key, record);
    }

    fn get(&self, namespace: &str, name: &str) -> Option<&R> {
        self.map.get(&(namespace.into(), name.into()))
    }

    fn scan<'a>(&'a self, namespace: Option<&'a str>) -> impl Iterator<Item = &'a R> {
        self.map
            .iter()
            .filter(move |((key, _), _)| {
                namespace
                    .map(|namespace| key == namespace)
                    .unwrap_or(true)
            })
            .map(|(_, record)| record)
    }

    fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(|(namespace, _)| namespace.as_str())
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

/// Collects records before freezing them into a [`ResourceStore`].
///
/// A record replaces any earlier record of the same kind, namespace and name.
#[derive(Clone, Debug, Default)]
pub struct ResourceStoreBuilder {
    deployments: Table<Deployment>,
    pods: Table<Pod>,
    config_maps: Table<ConfigMap>,
    secrets: Table<Secret>,
    hpas: Table<HorizontalAutoscaler>,
}

impl ResourceStoreBuilder {
    pub fn insert(&mut self, record: impl Into<ResourceRecord>) {
        match record.into() {
            ResourceRecord::Deployment(record) => self.deployments.insert(record),
            ResourceRecord::Pod(record) => self.pods.insert(record),
            ResourceRecord::ConfigMap(record) => self.config_maps.insert(record),
            ResourceRecord::Secret(record) => self.secrets.insert(record),
            ResourceRecord::Hpa(record) => self.hpas.insert(record),
        }
    }

    pub fn with(mut self, record: impl Into<ResourceRecord>) -> Self {
        self.insert(record);
        self
    }

    pub fn build(self) -> ResourceStore {
        let Self {
            deployments,
            pods,
            config_maps,
            secrets,
            hpas,
        } = self;

        ResourceStore {
            deployments,
            pods,
            config_maps,
            secrets,
            hpas,
        }
    }
}

impl<T> Extend<T> for ResourceStoreBuilder
where
    T: Into<ResourceRecord>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        iter.into_iter().for_each(|record| self.insert(record))
    }
}

/// An immutable, queryable set of resource records.
#[derive(Clone, Debug, Default)]
pub struct ResourceStore {
    deployments: Table<Deployment>,
    pods: Table<Pod>,
    config_maps: Table<ConfigMap>,
    secrets: Table<Secret>,
    hpas: Table<HorizontalAutoscaler>,
}

impl<T> FromIterator<T> for ResourceStore
where
    T: Into<ResourceRecord>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut builder = ResourceStoreBuilder::default();
        builder.extend(iter);
        builder.build()
    }
}

impl ResourceStore {
    pub fn builder() -> ResourceStoreBuilder {
        ResourceStoreBuilder::default()
    }

    pub fn deployment(&self, namespace: &str, name: &str) -> Option<&Deployment> {
        self.deployments.get(namespace, name)
    }

    pub fn pod(&self, namespace: &str, name: &str) -> Option<&Pod> {
        self.pods.get(namespace, name)
    }

    pub fn config_map(&self, namespace: &str, name: &str) -> Option<&ConfigMap> {
        self.config_maps.get(namespace, name)
    }

    pub fn secret(&self, namespace: &str, name: &str) -> Option<&Secret> {
        self.secrets.get(namespace, name)
    }

    pub fn hpa(&self, namespace: &str, name: &str) -> Option<&HorizontalAutoscaler> {
        self.hpas.get(namespace, name)
    }

    pub fn deployments<'a>(
        &'a self,
        namespace: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Deployment> {
        self.deployments.scan(namespace)
    }

    pub fn pods<'a>(&'a self, namespace: Option<&'a str>) -> impl Iterator<Item = &'a Pod> {
        self.pods.scan(namespace)
    }

    pub fn config_maps<'a>(
        &'a self,
        namespace: Option<&'a str>,
    ) -> impl Iterator<Item = &'a ConfigMap> {
        self.config_maps.scan(namespace)
    }

    pub fn secrets<'a>(&'a self, namespace: Option<&'a str>) -> impl Iterator<Item = &'a Secret> {
        self.secrets.scan(namespace)
    }

    pub fn hpas<'a>(
        &'a self,
        namespace: Option<&'a str>,
    ) -> impl Iterator<Item = &'a HorizontalAutoscaler> {
        self.hpas.scan(namespace)
    }

    /// Returns every namespace holding at least one record.
    pub fn namespaces(&self) -> BTreeSet<&str> {
        let Self {
            deployments,
            pods,
            config_maps,
            secrets,
            hpas,
        } = self;

        deployments
            .namespaces()
            .chain(pods.namespaces())
            .chain(config_maps.namespaces())
            .chain(secrets.namespaces())
            .chain(hpas.namespaces())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.deployments.len()
            + self.pods.len()
            + self.config_maps.len()
            + self.secrets.len()
            + self.hpas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deployment(namespace: &str, name: &str, status: &str) -> Deployment {
        Deployment {
            name: name.into(),
            namespace: namespace.into(),
            status: status.into(),
            ..Default::default()
        }
    }

    #[test]
    fn later_records_replace_earlier_ones() {
        let store = ResourceStore::builder()
            .with(deployment("default", "web", "Progressing"))
            .with(deployment("default", "web", "Available"))
            .with(deployment("staging", "web", "Degraded"))
            .build();

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.deployment("default", "web").map(|record| record.status.as_str()),
            Some("Available"),
        );
        assert_eq!(
            store.deployment("staging", "web").map(|record| record.status.as_str()),
            Some("Degraded"),
        );
        assert!(store.deployment("prod", "web").is_none());
    }

    #[test]
    fn scan_filters_by_namespace() {
        let store: ResourceStore = [
            deployment("default", "web", "Available"),
            deployment("default", "api", "Available"),
            deployment("staging", "web", "Available"),
        ]
        .into_iter()
        .collect();

        let names: Vec<_> = store
            .deployments(Some("default"))
            .map(|record| record.name.as_str())
            .collect();
        assert_eq!(names, ["api", "web"]);
        assert_eq!(store.deployments(None).count(), 3);
        assert_eq!(store.deployments(Some("prod")).count(), 0);
    }

    #[test]
    fn namespaces_span_every_kind() {
        let store = ResourceStore::builder()
            .with(deployment("default", "web", "Available"))
            .with(ConfigMap {
                name: "settings".into(),
                namespace: "kube-system".into(),
                ..Default::default()
            })
            .build();

        assert_eq!(
            store.namespaces().into_iter().collect::<Vec<_>>(),
            ["default", "kube-system"],
        );
        assert!(ResourceStore::default().is_empty());
    }
}
