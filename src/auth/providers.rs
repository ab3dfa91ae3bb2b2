/// Cloud-provider credential scopes for GCP and AWS.
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::scope::EnvScope;
use crate::errors::{DeployerError, Result};

/// Takes precedence over `gcloud auth activate-service-account`, so a stale
/// value would silently win over a freshly supplied key file.
pub const GCP_CREDENTIAL_OVERRIDE: &str = "CLOUDSDK_AUTH_CREDENTIAL_FILE_OVERRIDE";
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// AWS API credentials, as printed by `aws iam create-access-key`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AwsCredentials {
    #[serde(rename = "AccessKeyId")]
    pub access_key_id: String,
    #[serde(rename = "SecretAccessKey")]
    pub secret_access_key: String,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct AccessKeyEnvelope {
    #[serde(rename = "AccessKey")]
    access_key: AwsCredentials,
}

impl AwsCredentials {
    /// Parse the `{"AccessKey": {...}}` JSON document.
    ///
    /// # Errors
    ///
    /// Returns a serde error message if the document has the wrong shape.
    pub fn from_json(json: &str) -> std::result::Result<Self, String> {
        serde_json::from_str::<AccessKeyEnvelope>(json)
            .map(|e| e.access_key)
            .map_err(|e| e.to_string())
    }

    /// Read and parse an (already decrypted) AWS credentials file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `ParseKeyFile` if it is not
    /// a valid access-key document.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| DeployerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|reason| DeployerError::ParseKeyFile {
            path: path.to_path_buf(),
            reason,
        })
    }
}

impl EnvScope {
    /// Authenticate GCP tooling with a service-account key file.
    ///
    /// Any existing override is removed before the new one is set. The
    /// pre-scope value (or absence) is restored on drop.
    pub fn gcp(key_file: &Path) -> Self {
        debug!(key_file = %key_file.display(), "entering GCP credential scope");
        let mut scope = Self::new();
        scope
            .remove(GCP_CREDENTIAL_OVERRIDE)
            .set(GCP_CREDENTIAL_OVERRIDE, key_file);
        scope
    }

    /// Authenticate AWS tooling with an access key pair.
    pub fn aws(credentials: &AwsCredentials) -> Self {
        debug!(access_key_id = %credentials.access_key_id, "entering AWS credential scope");
        let mut scope = Self::new();
        scope
            .set(AWS_ACCESS_KEY_ID, &credentials.access_key_id)
            .set(AWS_SECRET_ACCESS_KEY, &credentials.secret_access_key);
        scope
    }
}

/// Run `f` with GCP credentials active.
pub fn with_gcp_auth<R>(key_file: &Path, f: impl FnOnce() -> R) -> R {
    let _scope = EnvScope::gcp(key_file);
    f()
}

/// Run `f` with AWS credentials active.
pub fn with_aws_auth<R>(credentials: &AwsCredentials, f: impl FnOnce() -> R) -> R {
    let _scope = EnvScope::aws(credentials);
    f()
}
