use crate::errors::ResolveError;
use crate::k8s::annotations::AnnotationLookup;
use crate::k8s::ClusterApi;
use crate::resources::ResourceKind;
use kube::ResourceExt;
use std::fmt;
use std::io::Write;
use tracing::debug;
use url::Url;

pub const CONSOLE_BASE: &str = "https://cloud.digitalocean.com/";

pub const HOSTNAME_SUFFIX: &str = ".k8s.ondigitalocean.com";
pub const NODE_ID_PREFIX: &str = "digitalocean://";
pub const LOAD_BALANCER_ANNOTATION: &str = "kubernetes.digitalocean.com/load-balancer-id";
pub const BLOCK_STORAGE_CLASS: &str = "do-block-storage";

const LOAD_BALANCER_TYPE: &str = "LoadBalancer";
const DEFAULT_SERVICE_TYPE: &str = "ClusterIP";
const BOUND_PHASE: &str = "Bound";

/// Path relative to the DigitalOcean console root, kept as raw segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloudPath(Vec<String>);

impl CloudPath {
    fn new<const N: usize>(segments: [&str; N]) -> Self {
        CloudPath(segments.iter().map(|segment| segment.to_string()).collect())
    }

    fn volumes() -> Self {
        CloudPath::new(["volumes"])
    }

    /// Appends the path to the console base. Each segment is percent-encoded,
    /// so identifiers containing `/`, `..`, `?` or `#` stay a single segment.
    pub fn console_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(CONSOLE_BASE)?;
        // An https base always has path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(&self.0);
        }
        Ok(url)
    }
}

impl fmt::Display for CloudPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

pub fn cluster(endpoint: &str) -> Result<CloudPath, ResolveError> {
    let parsed = Url::parse(endpoint).map_err(|source| ResolveError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })?;
    let host = parsed.host_str().unwrap_or_default();

    match host.strip_suffix(HOSTNAME_SUFFIX) {
        Some(id) if !id.is_empty() => Ok(CloudPath::new(["kubernetes", "clusters", id])),
        _ => Err(ResolveError::NotProvisionedByProvider {
            kind: ResourceKind::Cluster,
            name: host.to_string(),
        }),
    }
}

pub async fn node<SomeApi>(api: &SomeApi, name: &str) -> Result<CloudPath, ResolveError>
where
    SomeApi: ClusterApi + ?Sized,
{
    let node = api.node(name).await?.ok_or_else(|| ResolveError::NotFound {
        kind: ResourceKind::Node,
        name: name.to_string(),
    })?;

    let provider_id = node
        .spec
        .as_ref()
        .and_then(|spec| spec.provider_id.as_deref())
        .unwrap_or_default();
    debug!(node = name, provider_id, "fetched node");

    match provider_id.strip_prefix(NODE_ID_PREFIX) {
        Some(id) if !id.is_empty() => Ok(CloudPath::new(["droplets", id])),
        _ => Err(ResolveError::NotProvisionedByProvider {
            kind: ResourceKind::Node,
            name: name.to_string(),
        }),
    }
}

pub async fn service<SomeApi>(
    api: &SomeApi,
    namespace: &str,
    name: &str,
) -> Result<CloudPath, ResolveError>
where
    SomeApi: ClusterApi + ?Sized,
{
    let service = api
        .service(namespace, name)
        .await?
        .ok_or_else(|| ResolveError::NotFound {
            kind: ResourceKind::Service,
            name: name.to_string(),
        })?;

    let service_type = service
        .spec
        .as_ref()
        .and_then(|spec| spec.type_.as_deref())
        .unwrap_or(DEFAULT_SERVICE_TYPE);
    debug!(service = name, namespace, service_type, "fetched service");

    if service_type != LOAD_BALANCER_TYPE {
        return Err(ResolveError::WrongResourceType {
            name: name.to_string(),
            actual: service_type.to_string(),
        });
    }

    // An empty id names no load balancer.
    let id = service
        .annotation(LOAD_BALANCER_ANNOTATION)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ResolveError::MissingAnnotation {
            name: name.to_string(),
            annotation: LOAD_BALANCER_ANNOTATION,
        })?;

    Ok(CloudPath::new(["networking", "load_balancers", id]))
}

pub async fn persistent_volume<SomeApi, SomeWriter>(
    api: &SomeApi,
    output: &mut SomeWriter,
    name: &str,
) -> Result<CloudPath, ResolveError>
where
    SomeApi: ClusterApi + ?Sized,
    SomeWriter: Write,
{
    let volume = api
        .persistent_volume(name)
        .await?
        .ok_or_else(|| ResolveError::NotFound {
            kind: ResourceKind::PersistentVolume,
            name: name.to_string(),
        })?;

    let class = volume
        .spec
        .as_ref()
        .and_then(|spec| spec.storage_class_name.as_deref());
    debug!(volume = name, storage_class = ?class, "fetched persistent volume");

    check_block_storage(ResourceKind::PersistentVolume, name, class)?;

    writeln!(output, "PersistentVolume name: {}", volume.name_any())?;
    Ok(CloudPath::volumes())
}

pub async fn persistent_volume_claim<SomeApi, SomeWriter>(
    api: &SomeApi,
    output: &mut SomeWriter,
    namespace: &str,
    name: &str,
) -> Result<CloudPath, ResolveError>
where
    SomeApi: ClusterApi + ?Sized,
    SomeWriter: Write,
{
    let claim = api
        .persistent_volume_claim(namespace, name)
        .await?
        .ok_or_else(|| ResolveError::NotFound {
            kind: ResourceKind::PersistentVolumeClaim,
            name: name.to_string(),
        })?;

    let phase = claim
        .status
        .as_ref()
        .and_then(|status| status.phase.as_deref());
    debug!(claim = name, namespace, phase = ?phase, "fetched persistent volume claim");

    if phase != Some(BOUND_PHASE) {
        return Err(ResolveError::NotBound {
            name: name.to_string(),
            phase: phase.map(str::to_string),
        });
    }

    let spec = claim.spec.as_ref();
    check_block_storage(
        ResourceKind::PersistentVolumeClaim,
        name,
        spec.and_then(|spec| spec.storage_class_name.as_deref()),
    )?;

    let volume_name = spec
        .and_then(|spec| spec.volume_name.as_deref())
        .unwrap_or_default();
    writeln!(output, "PersistentVolume name: {}", volume_name)?;
    Ok(CloudPath::volumes())
}

/// A missing storage class counts as a mismatch.
fn check_block_storage(
    kind: ResourceKind,
    name: &str,
    class: Option<&str>,
) -> Result<(), ResolveError> {
    if class == Some(BLOCK_STORAGE_CLASS) {
        return Ok(());
    }

    Err(ResolveError::WrongStorageClass {
        kind,
        name: name.to_string(),
        expected: BLOCK_STORAGE_CLASS,
        actual: class.map(str::to_string),
    })
}
