use crate::resources::ResourceKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unknown type {0}")]
    UnknownResourceType(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("{kind} {name} not found")]
    NotFound { kind: ResourceKind, name: String },

    #[error(transparent)]
    Api(#[from] kube::Error),

    #[error("{kind} {name} does not seem to be provisioned by DigitalOcean")]
    NotProvisionedByProvider { kind: ResourceKind, name: String },

    #[error("Service {name} is of the type {actual}, not a LoadBalancer")]
    WrongResourceType { name: String, actual: String },

    #[error("annotation {annotation} not found on Service {name}")]
    MissingAnnotation {
        name: String,
        annotation: &'static str,
    },

    #[error(
        "{kind} {name} is not a DigitalOcean Block Storage Volume. Storage class must be {expected} but got {}",
        .actual.as_deref().unwrap_or("<none>")
    )]
    WrongStorageClass {
        kind: ResourceKind,
        name: String,
        expected: &'static str,
        actual: Option<String>,
    },

    #[error(
        "PersistentVolumeClaim {name} is not bound to a PersistentVolume. Got phase {}",
        .phase.as_deref().unwrap_or("<none>")
    )]
    NotBound { name: String, phase: Option<String> },

    #[error("invalid cluster endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl ResolveError {
    /// Whether the error stems from incomplete command line input.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, ResolveError::MissingArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_class_mismatch_names_expected_and_actual() {
        let error = ResolveError::WrongStorageClass {
            kind: ResourceKind::PersistentVolume,
            name: "pv-1".to_string(),
            expected: "do-block-storage",
            actual: Some("standard".to_string()),
        };

        assert_eq!(
            error.to_string(),
            "PersistentVolume pv-1 is not a DigitalOcean Block Storage Volume. \
             Storage class must be do-block-storage but got standard"
        );
    }

    #[test]
    fn absent_values_are_rendered_explicitly() {
        let error = ResolveError::NotBound {
            name: "pvc-1".to_string(),
            phase: None,
        };

        assert_eq!(
            error.to_string(),
            "PersistentVolumeClaim pvc-1 is not bound to a PersistentVolume. Got phase <none>"
        );
    }

    #[test]
    fn only_missing_arguments_are_usage_errors() {
        assert!(ResolveError::MissingArgument("name").is_usage_error());
        assert!(!ResolveError::UnknownResourceType("pods".to_string()).is_usage_error());
    }
}
