//! The closed set of object kinds konfd works with

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Kind of a referenced or destination object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    ConfigMap,
    Secret,
}

impl ResourceKind {
    /// Annotation spelling (`configmap` / `secret`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigMap => "configmap",
            Self::Secret => "secret",
        }
    }

    /// Kubernetes `kind` field value
    pub fn api_kind(&self) -> &'static str {
        match self {
            Self::ConfigMap => "ConfigMap",
            Self::Secret => "Secret",
        }
    }

    /// Whether stored values are base64 encoded
    pub fn is_encoded(&self) -> bool {
        matches!(self, Self::Secret)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "configmap" => Ok(Self::ConfigMap),
            "secret" => Ok(Self::Secret),
            other => Err(CoreError::UnknownKind {
                kind: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!("configmap".parse::<ResourceKind>().unwrap(), ResourceKind::ConfigMap);
        assert_eq!("secret".parse::<ResourceKind>().unwrap(), ResourceKind::Secret);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        // Annotation values are matched exactly
        assert!("ConfigMap".parse::<ResourceKind>().is_err());
        assert!("Secret".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_unknown_kind_error() {
        let err = "deployment".parse::<ResourceKind>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownKind { ref kind } if kind == "deployment"));
    }

    #[test]
    fn test_display_round_trips() {
        for kind in [ResourceKind::ConfigMap, ResourceKind::Secret] {
            assert_eq!(kind.to_string().parse::<ResourceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_api_kind() {
        assert_eq!(ResourceKind::ConfigMap.api_kind(), "ConfigMap");
        assert_eq!(ResourceKind::Secret.api_kind(), "Secret");
        assert!(ResourceKind::Secret.is_encoded());
        assert!(!ResourceKind::ConfigMap.is_encoded());
    }
}
