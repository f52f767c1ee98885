use crate::cloud_path;
use crate::cloud_path::CloudPath;
use crate::errors::ResolveError;
use crate::k8s::ClusterApi;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Cluster,
    Node,
    Service,
    PersistentVolume,
    PersistentVolumeClaim,
}

/// Every type token accepted on the command line, including plural and
/// short forms.
pub const ALIASES: &[(&str, ResourceKind)] = &[
    ("cluster", ResourceKind::Cluster),
    ("node", ResourceKind::Node),
    ("nodes", ResourceKind::Node),
    ("no", ResourceKind::Node),
    ("service", ResourceKind::Service),
    ("services", ResourceKind::Service),
    ("svc", ResourceKind::Service),
    ("persistentvolume", ResourceKind::PersistentVolume),
    ("persistentvolumes", ResourceKind::PersistentVolume),
    ("pv", ResourceKind::PersistentVolume),
    ("persistentvolumeclaim", ResourceKind::PersistentVolumeClaim),
    ("persistentvolumeclaims", ResourceKind::PersistentVolumeClaim),
    ("pvc", ResourceKind::PersistentVolumeClaim),
];

impl ResourceKind {
    pub fn from_alias(alias: &str) -> Option<ResourceKind> {
        ALIASES
            .iter()
            .find(|(name, _)| *name == alias)
            .map(|(_, kind)| *kind)
    }

    pub fn requires_name(self) -> bool {
        !matches!(self, ResourceKind::Cluster)
    }

    pub fn is_namespaced(self) -> bool {
        matches!(
            self,
            ResourceKind::Service | ResourceKind::PersistentVolumeClaim
        )
    }
}

impl FromStr for ResourceKind {
    type Err = ResolveError;

    fn from_str(alias: &str) -> Result<Self, Self::Err> {
        ResourceKind::from_alias(alias)
            .ok_or_else(|| ResolveError::UnknownResourceType(alias.to_string()))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Cluster => "Cluster",
            ResourceKind::Node => "Node",
            ResourceKind::Service => "Service",
            ResourceKind::PersistentVolume => "PersistentVolume",
            ResourceKind::PersistentVolumeClaim => "PersistentVolumeClaim",
        })
    }
}

/// A validated request for a single console path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceQuery {
    pub kind: ResourceKind,
    pub namespace: Option<String>,
    pub name: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl ResourceQuery {
    /// Normalizes the type alias and checks that every argument the kind
    /// needs is present. Arguments the kind doesn't use are dropped.
    pub fn parse(kind_alias: &str, namespace: &str, name: &str) -> Result<Self, ResolveError> {
        let kind: ResourceKind = kind_alias.parse()?;

        let name = if kind.requires_name() {
            Some(non_empty(name).ok_or(ResolveError::MissingArgument("name"))?)
        } else {
            None
        };

        let namespace = if kind.is_namespaced() {
            Some(non_empty(namespace).ok_or(ResolveError::MissingArgument("namespace"))?)
        } else {
            None
        };

        Ok(ResourceQuery {
            kind,
            namespace,
            name,
        })
    }

    fn name(&self) -> Result<&str, ResolveError> {
        self.name
            .as_deref()
            .ok_or(ResolveError::MissingArgument("name"))
    }

    fn namespace(&self) -> Result<&str, ResolveError> {
        self.namespace
            .as_deref()
            .ok_or(ResolveError::MissingArgument("namespace"))
    }
}

pub async fn resolve_query<SomeApi, SomeWriter>(
    api: &SomeApi,
    output: &mut SomeWriter,
    query: &ResourceQuery,
) -> Result<CloudPath, ResolveError>
where
    SomeApi: ClusterApi + ?Sized,
    SomeWriter: Write,
{
    debug!(kind = %query.kind, namespace = ?query.namespace, name = ?query.name, "resolving");

    match query.kind {
        ResourceKind::Cluster => cloud_path::cluster(&api.endpoint()),
        ResourceKind::Node => cloud_path::node(api, query.name()?).await,
        ResourceKind::Service => cloud_path::service(api, query.namespace()?, query.name()?).await,
        ResourceKind::PersistentVolume => {
            cloud_path::persistent_volume(api, output, query.name()?).await
        }
        ResourceKind::PersistentVolumeClaim => {
            cloud_path::persistent_volume_claim(api, output, query.namespace()?, query.name()?)
                .await
        }
    }
}

/// Resolves a user supplied type alias and name into a console path.
pub async fn resolve<SomeApi, SomeWriter>(
    api: &SomeApi,
    output: &mut SomeWriter,
    kind_alias: &str,
    namespace: &str,
    name: &str,
) -> Result<CloudPath, ResolveError>
where
    SomeApi: ClusterApi + ?Sized,
    SomeWriter: Write,
{
    let query = ResourceQuery::parse(kind_alias, namespace, name)?;
    resolve_query(api, output, &query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k8s::MockClusterApi;
    use assert_matches::assert_matches;
    use k8s_openapi::api::core::v1::Node;
    use mockall::predicate::eq;

    #[test]
    fn every_alias_form_selects_the_same_kind() {
        let groups: &[(&[&str], ResourceKind)] = &[
            (&["cluster"], ResourceKind::Cluster),
            (&["node", "nodes", "no"], ResourceKind::Node),
            (&["service", "services", "svc"], ResourceKind::Service),
            (
                &["persistentvolume", "persistentvolumes", "pv"],
                ResourceKind::PersistentVolume,
            ),
            (
                &["persistentvolumeclaim", "persistentvolumeclaims", "pvc"],
                ResourceKind::PersistentVolumeClaim,
            ),
        ];

        for (aliases, kind) in groups {
            for alias in *aliases {
                assert_eq!(ResourceKind::from_alias(alias), Some(*kind), "{}", alias);
            }
        }

        assert_eq!(
            ALIASES.len(),
            groups.iter().map(|(aliases, _)| aliases.len()).sum::<usize>()
        );
    }

    #[test]
    fn unknown_alias_is_rejected() {
        for alias in ["whomst", "", "Node", "pods"] {
            assert_matches!(
                ResourceQuery::parse(alias, "ns", "name"),
                Err(ResolveError::UnknownResourceType(a)) if a == alias
            );
        }
    }

    #[test]
    fn cluster_ignores_name_and_namespace() {
        let query = ResourceQuery::parse("cluster", "ns", "name").unwrap();
        assert_eq!(
            query,
            ResourceQuery {
                kind: ResourceKind::Cluster,
                namespace: None,
                name: None,
            }
        );
    }

    #[test]
    fn namespace_is_only_kept_for_namespaced_kinds() {
        let node = ResourceQuery::parse("no", "ns", "node-1").unwrap();
        assert_eq!(node.namespace, None);
        assert_eq!(node.name.as_deref(), Some("node-1"));

        let pvc = ResourceQuery::parse("pvc", "ns", "claim").unwrap();
        assert_eq!(pvc.namespace.as_deref(), Some("ns"));
    }

    #[tokio::test]
    async fn empty_name_never_reaches_the_api() {
        // No expectations: any call on the mock panics.
        let api = MockClusterApi::new();

        for alias in ALIASES
            .iter()
            .filter(|(_, kind)| kind.requires_name())
            .map(|(alias, _)| *alias)
        {
            let mut output = Vec::new();
            let result = resolve(&api, &mut output, alias, "ns", "").await;
            assert_matches!(result, Err(ResolveError::MissingArgument("name")));
            assert!(output.is_empty());
        }
    }

    #[tokio::test]
    async fn empty_namespace_never_reaches_the_api() {
        let api = MockClusterApi::new();

        for alias in ["svc", "pvc"] {
            let mut output = Vec::new();
            let result = resolve(&api, &mut output, alias, "", "name").await;
            assert_matches!(result, Err(ResolveError::MissingArgument("namespace")));
        }
    }

    #[tokio::test]
    async fn cluster_resolves_without_a_name() {
        let mut api = MockClusterApi::new();
        api.expect_endpoint()
            .times(2)
            .returning(|| "https://abc123.k8s.ondigitalocean.com".to_string());

        let mut output = Vec::new();
        for name in ["", "ignored"] {
            let path = resolve(&api, &mut output, "cluster", "", name).await.unwrap();
            assert_eq!(path.to_string(), "kubernetes/clusters/abc123");
        }
    }

    #[tokio::test]
    async fn node_aliases_forward_the_name() {
        let node: Node = serde_json::from_value(serde_json::json!({
            "metadata": { "name": "node-1" },
            "spec": { "providerID": "digitalocean://droplet-9" }
        }))
        .unwrap();

        let mut api = MockClusterApi::new();
        api.expect_node()
            .with(eq("node-1"))
            .times(3)
            .returning(move |_| Ok(Some(node.clone())));

        for alias in ["node", "nodes", "no"] {
            let mut output = Vec::new();
            let path = resolve(&api, &mut output, alias, "ns", "node-1")
                .await
                .unwrap();
            assert_eq!(path.to_string(), "droplets/droplet-9");
        }
    }

    #[tokio::test]
    async fn api_failures_reach_the_caller_unchanged() {
        let mut api = MockClusterApi::new();
        api.expect_service()
            .with(eq("ns"), eq("svc-1"))
            .returning(|_, _| Err(kube::Error::LinesCodecMaxLineLengthExceeded));

        let mut output = Vec::new();
        let result = resolve(&api, &mut output, "svc", "ns", "svc-1").await;

        assert_matches!(
            result,
            Err(ResolveError::Api(kube::Error::LinesCodecMaxLineLengthExceeded))
        );
        assert!(output.is_empty());
    }
}
