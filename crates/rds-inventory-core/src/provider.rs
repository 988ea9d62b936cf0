//! The cloud API surface an inventory run consumes
//!
//! Orchestration code only talks to these traits, so it can be exercised
//! against in-memory fakes. [`crate::aws`] implements them on top of the AWS
//! SDK.
//!
//! Listing calls are page-at-a-time: the caller passes the marker from the
//! previous page (or `None` for the first page) and gets back the items plus
//! the next marker, if any.

use crate::config::AccountDescriptor;
use async_trait::async_trait;

/// Provider error, carried through verbatim into [`crate::CoreError`]
pub type ApiError = Box<dyn std::error::Error + Send + Sync>;

/// One page of a paginated listing call
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Marker for the next page; `None` once the listing is exhausted
    pub marker: Option<String>,
}

impl<T> Page<T> {
    /// A page with no further pages after it
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            marker: None,
        }
    }

    /// A page followed by the page at `marker`
    pub fn with_marker(items: Vec<T>, marker: impl Into<String>) -> Self {
        Self {
            items,
            marker: Some(marker.into()),
        }
    }
}

/// Network endpoint of a standalone instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceEndpoint {
    pub address: Option<String>,
    pub port: Option<i32>,
}

/// The subset of an RDS DB instance the inventory reports on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DbInstanceSummary {
    pub identifier: String,
    pub engine: String,
    pub engine_version: Option<String>,
    /// Absent until the instance is available
    pub endpoint: Option<InstanceEndpoint>,
}

/// The subset of an RDS/Aurora DB cluster the inventory reports on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DbClusterSummary {
    pub identifier: String,
    pub engine: String,
    pub engine_version: Option<String>,
    /// Writer (primary) endpoint
    pub endpoint: Option<String>,
    pub reader_endpoint: Option<String>,
    pub port: Option<i32>,
}

/// Identity and access-management calls, bound to one account
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// STS GetCallerIdentity; `Ok(None)` if the response carries no account
    async fn caller_account_id(&self) -> Result<Option<String>, ApiError>;

    /// IAM ListAccountAliases
    async fn account_aliases(&self) -> Result<Vec<String>, ApiError>;
}

/// RDS control-plane listing calls, bound to one account and region
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RdsApi: Send + Sync {
    /// One page of DescribeDBInstances
    async fn describe_db_instances(
        &self,
        marker: Option<String>,
    ) -> Result<Page<DbInstanceSummary>, ApiError>;

    /// One page of DescribeDBClusters
    async fn describe_db_clusters(
        &self,
        marker: Option<String>,
    ) -> Result<Page<DbClusterSummary>, ApiError>;
}

/// An authenticated session for one account
pub trait Session: IdentityApi {
    type Rds: RdsApi;

    /// RDS client for `region`, sharing this session's credentials
    fn rds(&self, region: &str) -> Self::Rds;
}

/// Turns account descriptors into sessions
#[async_trait]
pub trait Provider: Send + Sync {
    type Session: Session;

    /// Establish a session from the account's credential profile.
    ///
    /// No network call is made here; credential problems surface on the
    /// first identity call.
    async fn connect(&self, account: &AccountDescriptor) -> Self::Session;
}
