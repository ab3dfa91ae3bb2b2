/// Deployment matrix records, as emitted by CI job generation.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{DeployerError, Result};

/// A cluster whose support chart and/or staging hub will be upgraded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportStagingJob {
    pub provider: String,
    pub cluster_name: String,
    pub upgrade_support: bool,
    #[serde(default)]
    pub reason_for_support_redeploy: String,
    pub upgrade_staging: bool,
    #[serde(default)]
    pub reason_for_staging_redeploy: String,
}

/// A production hub that will be upgraded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProdHubJob {
    pub provider: String,
    pub cluster_name: String,
    pub hub_name: String,
    #[serde(default)]
    pub reason_for_redeploy: String,
}

/// A record that renders as one table row.
pub trait MatrixRow {
    /// Human-readable column headers, in display order.
    const HEADERS: &'static [&'static str];

    /// Cell values, aligned with `HEADERS`.
    fn cells(&self) -> Vec<String>;
}

fn yes_no(value: bool) -> String {
    let text = if value { "Yes" } else { "No" };
    text.to_owned()
}

impl MatrixRow for SupportStagingJob {
    const HEADERS: &'static [&'static str] = &[
        "Cloud Provider",
        "Cluster Name",
        "Upgrade Support?",
        "Reason for Support Redeploy",
        "Upgrade Staging?",
        "Reason for Staging Redeploy",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.provider.clone(),
            self.cluster_name.clone(),
            yes_no(self.upgrade_support),
            self.reason_for_support_redeploy.clone(),
            yes_no(self.upgrade_staging),
            self.reason_for_staging_redeploy.clone(),
        ]
    }
}

impl MatrixRow for ProdHubJob {
    const HEADERS: &'static [&'static str] = &[
        "Cloud Provider",
        "Cluster Name",
        "Hub Name",
        "Reason for Redeploy",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.provider.clone(),
            self.cluster_name.clone(),
            self.hub_name.clone(),
            self.reason_for_redeploy.clone(),
        ]
    }
}

/// Parse a JSON array of matrix records.
///
/// # Errors
///
/// Returns `InvalidMatrix` if `json` is not an array of `T`.
pub fn parse_matrix<T: DeserializeOwned>(which: &'static str, json: &str) -> Result<Vec<T>> {
    serde_json::from_str(json).map_err(|e| DeployerError::InvalidMatrix {
        which,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_extra_fields() {
        let json = r#"[{
            "provider": "gcp",
            "cluster_name": "2i2c",
            "hub_name": "staging",
            "reason_for_redeploy": "Following helm chart values files were modified: staging.values.yaml",
            "cluster_dir": "config/clusters/2i2c"
        }]"#;
        let jobs: Vec<ProdHubJob> = parse_matrix("prod", json).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].hub_name, "staging");
    }

    #[test]
    fn test_parse_missing_reason_defaults_empty() {
        let json = r#"[{"provider": "aws", "cluster_name": "openscapes",
                        "upgrade_support": false, "upgrade_staging": true}]"#;
        let jobs: Vec<SupportStagingJob> = parse_matrix("support-staging", json).unwrap();
        assert_eq!(jobs[0].reason_for_support_redeploy, "");
        assert!(jobs[0].upgrade_staging);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse_matrix::<ProdHubJob>("prod", r#"{"provider": "gcp"}"#).unwrap_err();
        assert!(matches!(err, DeployerError::InvalidMatrix { which: "prod", .. }));
    }

    #[test]
    fn test_booleans_render_yes_no() {
        let job = SupportStagingJob {
            provider: "gcp".to_owned(),
            cluster_name: "2i2c".to_owned(),
            upgrade_support: true,
            reason_for_support_redeploy: "Support helm chart has been modified".to_owned(),
            upgrade_staging: false,
            reason_for_staging_redeploy: String::new(),
        };
        let cells = job.cells();
        assert_eq!(cells.len(), SupportStagingJob::HEADERS.len());
        assert_eq!(cells[2], "Yes");
        assert_eq!(cells[4], "No");
    }
}
