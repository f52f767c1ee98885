use kube::config::InferConfigError;
use kube::config::KubeConfigOptions;
use kube::config::Kubeconfig;
use kube::config::KubeconfigError;
use kube::Config;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] KubeconfigError),

    #[error("failed to infer cluster configuration: {0}")]
    Infer(#[from] InferConfigError),
}

/// Where the cluster connection comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
}

impl Settings {
    fn options(&self) -> KubeConfigOptions {
        KubeConfigOptions {
            context: self.context.clone(),
            ..KubeConfigOptions::default()
        }
    }

    pub async fn kube_config(&self) -> Result<Config, ConfigError> {
        match (&self.kubeconfig, &self.context) {
            (Some(path), _) => {
                debug!(path = %path.display(), context = ?self.context, "reading kubeconfig");
                let kubeconfig = Kubeconfig::read_from(path)?;
                Ok(Config::from_custom_kubeconfig(kubeconfig, &self.options()).await?)
            }
            (None, Some(context)) => {
                debug!(context = %context, "using kubeconfig context");
                Ok(Config::from_kubeconfig(&self.options()).await?)
            }
            (None, None) => Ok(Config::infer().await?),
        }
    }
}
