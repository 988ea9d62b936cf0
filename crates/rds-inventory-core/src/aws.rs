//! AWS SDK implementation of the provider traits
//!
//! Credentials come from the SDK's standard chain for a named profile
//! (shared config/credentials files, SSO, assume-role, ...). Nothing is
//! cached between accounts.

use crate::config::AccountDescriptor;
use crate::provider::{
    ApiError, DbClusterSummary, DbInstanceSummary, IdentityApi, InstanceEndpoint, Page, Provider,
    RdsApi, Session,
};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_rds::error::DisplayErrorContext;
use aws_sdk_rds::types::{DbCluster, DbInstance};
use tracing::debug;

/// Region for STS and IAM when a profile names none; enabled in every account
pub const DEFAULT_HOME_REGION: &str = "us-east-1";

/// Provider backed by the AWS SDK
#[derive(Debug, Clone)]
pub struct AwsProvider {
    home_region: String,
}

impl Default for AwsProvider {
    fn default() -> Self {
        Self::new(DEFAULT_HOME_REGION)
    }
}

impl AwsProvider {
    /// `home_region` is used for STS and IAM when a profile names no region
    pub fn new(home_region: impl Into<String>) -> Self {
        Self {
            home_region: home_region.into(),
        }
    }
}

#[async_trait]
impl Provider for AwsProvider {
    type Session = AwsSession;

    async fn connect(&self, account: &AccountDescriptor) -> AwsSession {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(&account.profile)
            .load()
            .await;

        debug!(
            profile = %account.profile,
            region = ?config.region(),
            "Loaded AWS configuration"
        );

        AwsSession::new(config, &self.home_region)
    }
}

/// One account's loaded SDK configuration plus its identity clients
pub struct AwsSession {
    config: SdkConfig,
    sts: aws_sdk_sts::Client,
    iam: aws_sdk_iam::Client,
}

impl AwsSession {
    fn new(config: SdkConfig, home_region: &str) -> Self {
        // STS and IAM need a region even though IAM is global
        let region = config
            .region()
            .cloned()
            .unwrap_or_else(|| Region::new(home_region.to_string()));

        let sts = aws_sdk_sts::Client::from_conf(
            aws_sdk_sts::config::Builder::from(&config)
                .region(region.clone())
                .build(),
        );
        let iam = aws_sdk_iam::Client::from_conf(
            aws_sdk_iam::config::Builder::from(&config)
                .region(region)
                .build(),
        );

        Self { config, sts, iam }
    }
}

impl std::fmt::Debug for AwsSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSession")
            .field("region", &self.config.region())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl IdentityApi for AwsSession {
    async fn caller_account_id(&self) -> Result<Option<String>, ApiError> {
        let identity = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(api_error)?;
        Ok(identity.account().map(str::to_string))
    }

    async fn account_aliases(&self) -> Result<Vec<String>, ApiError> {
        let output = self
            .iam
            .list_account_aliases()
            .send()
            .await
            .map_err(api_error)?;
        Ok(output.account_aliases().to_vec())
    }
}

impl Session for AwsSession {
    type Rds = AwsRds;

    fn rds(&self, region: &str) -> AwsRds {
        let conf = aws_sdk_rds::config::Builder::from(&self.config)
            .region(Region::new(region.to_string()))
            .build();
        AwsRds {
            client: aws_sdk_rds::Client::from_conf(conf),
        }
    }
}

/// RDS client bound to one account and region
#[derive(Debug, Clone)]
pub struct AwsRds {
    client: aws_sdk_rds::Client,
}

#[async_trait]
impl RdsApi for AwsRds {
    async fn describe_db_instances(
        &self,
        marker: Option<String>,
    ) -> Result<Page<DbInstanceSummary>, ApiError> {
        let resp = self
            .client
            .describe_db_instances()
            .set_marker(marker)
            .send()
            .await
            .map_err(api_error)?;

        Ok(Page {
            items: resp.db_instances().iter().map(instance_summary).collect(),
            marker: resp.marker().map(str::to_string),
        })
    }

    async fn describe_db_clusters(
        &self,
        marker: Option<String>,
    ) -> Result<Page<DbClusterSummary>, ApiError> {
        let resp = self
            .client
            .describe_db_clusters()
            .set_marker(marker)
            .send()
            .await
            .map_err(api_error)?;

        Ok(Page {
            items: resp.db_clusters().iter().map(cluster_summary).collect(),
            marker: resp.marker().map(str::to_string),
        })
    }
}

fn instance_summary(db: &DbInstance) -> DbInstanceSummary {
    DbInstanceSummary {
        identifier: db.db_instance_identifier().unwrap_or_default().to_string(),
        engine: db.engine().unwrap_or_default().to_string(),
        engine_version: db.engine_version().map(str::to_string),
        endpoint: db.endpoint().map(|e| InstanceEndpoint {
            address: e.address().map(str::to_string),
            port: e.port(),
        }),
    }
}

fn cluster_summary(cluster: &DbCluster) -> DbClusterSummary {
    DbClusterSummary {
        identifier: cluster
            .db_cluster_identifier()
            .unwrap_or_default()
            .to_string(),
        engine: cluster.engine().unwrap_or_default().to_string(),
        engine_version: cluster.engine_version().map(str::to_string),
        endpoint: cluster.endpoint().map(str::to_string),
        reader_endpoint: cluster.reader_endpoint().map(str::to_string),
        port: cluster.port(),
    }
}

/// Render an SDK error with its full cause chain, as the provider reported it
fn api_error<E: std::error::Error>(err: E) -> ApiError {
    DisplayErrorContext(err).to_string().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_rds::types::Endpoint;

    #[test]
    fn test_instance_summary_with_endpoint() {
        let db = DbInstance::builder()
            .db_instance_identifier("orders-db")
            .engine("postgres")
            .engine_version("15.3")
            .endpoint(
                Endpoint::builder()
                    .address("orders-db.abc.us-east-1.rds.amazonaws.com")
                    .port(5432)
                    .build(),
            )
            .build();

        let summary = instance_summary(&db);
        assert_eq!(summary.identifier, "orders-db");
        assert_eq!(summary.engine, "postgres");
        assert_eq!(summary.engine_version.as_deref(), Some("15.3"));
        let endpoint = summary.endpoint.unwrap();
        assert_eq!(
            endpoint.address.as_deref(),
            Some("orders-db.abc.us-east-1.rds.amazonaws.com")
        );
        assert_eq!(endpoint.port, Some(5432));
    }

    #[test]
    fn test_instance_summary_still_creating() {
        let db = DbInstance::builder()
            .db_instance_identifier("new-db")
            .engine("mysql")
            .build();

        let summary = instance_summary(&db);
        assert_eq!(summary.engine_version, None);
        assert_eq!(summary.endpoint, None);
    }

    #[test]
    fn test_cluster_summary() {
        let cluster = DbCluster::builder()
            .db_cluster_identifier("orders-cluster")
            .engine("aurora-mysql")
            .engine_version("8.0.mysql_aurora.3.05.2")
            .endpoint("orders-cluster.xyz")
            .reader_endpoint("orders-cluster-ro.xyz")
            .port(3306)
            .build();

        let summary = cluster_summary(&cluster);
        assert_eq!(summary.identifier, "orders-cluster");
        assert_eq!(summary.engine, "aurora-mysql");
        assert_eq!(summary.endpoint.as_deref(), Some("orders-cluster.xyz"));
        assert_eq!(
            summary.reader_endpoint.as_deref(),
            Some("orders-cluster-ro.xyz")
        );
        assert_eq!(summary.port, Some(3306));
    }

    #[test]
    fn test_api_error_message() {
        let err = api_error(std::io::Error::other("connection reset"));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_identity_clients_default_to_home_region() {
        let provider = AwsProvider::default();
        assert_eq!(provider.home_region, DEFAULT_HOME_REGION);

        let config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .build();
        let session = AwsSession::new(config, &provider.home_region);
        assert_eq!(
            session.sts.config().region().map(|r| r.to_string()),
            Some("us-east-1".to_string())
        );
        assert_eq!(
            session.iam.config().region().map(|r| r.to_string()),
            Some("us-east-1".to_string())
        );
    }

    #[test]
    fn test_profile_region_beats_home_region() {
        let config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("ap-southeast-3"))
            .build();
        let session = AwsSession::new(config, DEFAULT_HOME_REGION);
        assert_eq!(
            session.sts.config().region().map(|r| r.to_string()),
            Some("ap-southeast-3".to_string())
        );
    }

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_connect_default_profile() {
        let provider = AwsProvider::default();
        let session = provider
            .connect(&AccountDescriptor::new("default", "default"))
            .await;
        let account_id = session.caller_account_id().await.unwrap();
        assert!(account_id.is_some());
    }
}
