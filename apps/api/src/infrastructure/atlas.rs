use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::AtlasConfig;
use crate::domain::cluster::ClusterStatus;

const ATLAS_MEDIA_TYPE: &str = "application/vnd.atlas.2023-02-01+json";

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Provisioning request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Cluster state as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterState {
    pub status: ClusterStatus,
    pub connection_string: Option<String>,
}

/// Cloud database provisioning backend
#[async_trait]
pub trait ClusterProvisioner: Send + Sync {
    async fn create(&self, name: &str) -> Result<ClusterState, ProvisionError>;

    async fn status(&self, name: &str) -> Result<ClusterState, ProvisionError>;

    async fn delete(&self, name: &str) -> Result<(), ProvisionError>;

    fn region(&self) -> &str;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClusterDescription {
    state_name: String,
    #[serde(default)]
    connection_strings: Option<ConnectionStrings>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionStrings {
    standard_srv: Option<String>,
}

impl From<ClusterDescription> for ClusterState {
    fn from(description: ClusterDescription) -> Self {
        Self {
            status: ClusterStatus::from_provider_state(&description.state_name),
            connection_string: description.connection_strings.and_then(|c| c.standard_srv),
        }
    }
}

/// MongoDB Atlas Admin API client creating shared free-tier clusters
pub struct AtlasClient {
    client: reqwest::Client,
    config: AtlasConfig,
}

impl AtlasClient {
    pub fn new(config: AtlasConfig) -> reqwest::Result<Self> {
        Ok(Self {
            client: super::http_client()?,
            config,
        })
    }

    fn clusters_url(&self) -> String {
        format!(
            "{}/groups/{}/clusters",
            self.config.api_url.trim_end_matches('/'),
            self.config.project_id
        )
    }
}

#[async_trait]
impl ClusterProvisioner for AtlasClient {
    async fn create(&self, name: &str) -> Result<ClusterState, ProvisionError> {
        let body = json!({
            "name": name,
            "clusterType": "REPLICASET",
            "replicationSpecs": [{
                "regionConfigs": [{
                    "providerName": "TENANT",
                    "backingProviderName": "AWS",
                    "regionName": self.config.region,
                    "priority": 7,
                    "electableSpecs": { "instanceSize": "M0" }
                }]
            }]
        });

        let description: ClusterDescription = self
            .client
            .post(self.clusters_url())
            .bearer_auth(&self.config.api_token)
            .header("Accept", ATLAS_MEDIA_TYPE)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(description.into())
    }

    async fn status(&self, name: &str) -> Result<ClusterState, ProvisionError> {
        let description: ClusterDescription = self
            .client
            .get(format!("{}/{}", self.clusters_url(), name))
            .bearer_auth(&self.config.api_token)
            .header("Accept", ATLAS_MEDIA_TYPE)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(description.into())
    }

    async fn delete(&self, name: &str) -> Result<(), ProvisionError> {
        let response = self
            .client
            .delete(format!("{}/{}", self.clusters_url(), name))
            .bearer_auth(&self.config.api_token)
            .header("Accept", ATLAS_MEDIA_TYPE)
            .send()
            .await?;

        // Already gone at the provider
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        response.error_for_status()?;
        Ok(())
    }

    fn region(&self) -> &str {
        &self.config.region
    }
}
