use crate::browser::Opener;
use crate::errors::ResolveError;
use crate::k8s::ClusterApi;
use crate::resources::resolve;
use std::io::Write;
use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("failed to build console URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to open {url} in a browser: {source}")]
    Browser {
        url: Url,
        #[source]
        source: std::io::Error,
    },
}

impl RunError {
    pub fn is_usage_error(&self) -> bool {
        matches!(self, RunError::Resolve(error) if error.is_usage_error())
    }
}

/// A single `kubectl doweb <type> [name]` invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Request {
    pub kind: String,
    pub name: String,
    pub namespace: Option<String>,
}

/// Resolves the request into a full console URL. Progress and diagnostic
/// lines go to `output`.
pub async fn console_url<SomeApi, SomeWriter>(
    api: &SomeApi,
    output: &mut SomeWriter,
    request: &Request,
) -> Result<Url, RunError>
where
    SomeApi: ClusterApi + ?Sized,
    SomeWriter: Write,
{
    let namespace = match &request.namespace {
        Some(namespace) if !namespace.is_empty() => namespace.clone(),
        _ => api.default_namespace(),
    };

    writeln!(
        output,
        "opening {} {} (namespace {})",
        request.kind, request.name, namespace
    )
    .map_err(ResolveError::from)?;

    let path = resolve(api, output, &request.kind, &namespace, &request.name).await?;
    Ok(path.console_url()?)
}

pub async fn run<SomeApi, SomeWriter, SomeOpener>(
    api: &SomeApi,
    output: &mut SomeWriter,
    opener: &SomeOpener,
    request: &Request,
) -> Result<Url, RunError>
where
    SomeApi: ClusterApi + ?Sized,
    SomeWriter: Write,
    SomeOpener: Opener + ?Sized,
{
    let url = console_url(api, output, request).await?;

    info!(url = %url, "opening browser");
    opener
        .open(&url)
        .map_err(|source| RunError::Browser {
            url: url.clone(),
            source,
        })?;

    Ok(url)
}
