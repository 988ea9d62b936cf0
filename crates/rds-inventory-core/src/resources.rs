//! RDS resource enumeration and normalization
//!
//! Standalone instances and clusters come back from the control plane in
//! different shapes; both are flattened into [`ResourceRecord`]s. A cluster
//! yields a writer record and, when it has a reader endpoint, a reader
//! record.

use crate::error::{CoreError, Result};
use crate::provider::{ApiError, DbClusterSummary, DbInstanceSummary, RdsApi};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

const DESCRIBE_DB_INSTANCES: &str = "DescribeDBInstances";
const DESCRIBE_DB_CLUSTERS: &str = "DescribeDBClusters";

/// What a resource record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// Standalone DB instance
    Instance,
    /// Cluster primary (writer) endpoint
    ClusterWriter,
    /// Cluster reader endpoint
    ClusterReader,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Instance => "instance",
            ResourceKind::ClusterWriter => "cluster-writer",
            ResourceKind::ClusterReader => "cluster-reader",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One database endpoint found in a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRecord {
    pub kind: ResourceKind,
    pub identifier: String,
    pub engine: String,
    /// Empty when the provider did not report one
    pub engine_version: String,
    /// Empty when no endpoint is assigned yet
    pub endpoint: String,
    pub port: Option<i32>,
    pub region: String,
}

impl ResourceRecord {
    /// Record for a standalone instance
    pub fn from_instance(db: &DbInstanceSummary, region: &str) -> Self {
        let endpoint = db.endpoint.as_ref();
        Self {
            kind: ResourceKind::Instance,
            identifier: db.identifier.clone(),
            engine: db.engine.clone(),
            engine_version: db.engine_version.clone().unwrap_or_default(),
            endpoint: endpoint
                .and_then(|e| e.address.clone())
                .unwrap_or_default(),
            port: endpoint.and_then(|e| e.port),
            region: region.to_string(),
        }
    }

    /// Writer record, plus a reader record if the cluster has a reader endpoint
    pub fn from_cluster(cluster: &DbClusterSummary, region: &str) -> Vec<Self> {
        let writer = Self {
            kind: ResourceKind::ClusterWriter,
            identifier: cluster.identifier.clone(),
            engine: cluster.engine.clone(),
            engine_version: cluster.engine_version.clone().unwrap_or_default(),
            endpoint: cluster.endpoint.clone().unwrap_or_default(),
            port: cluster.port,
            region: region.to_string(),
        };

        match cluster.reader_endpoint.as_deref() {
            Some(reader) if !reader.is_empty() => {
                let reader = Self {
                    kind: ResourceKind::ClusterReader,
                    endpoint: reader.to_string(),
                    ..writer.clone()
                };
                vec![writer, reader]
            }
            _ => vec![writer],
        }
    }
}

/// Marker bookkeeping for one paginated listing call.
///
/// Yields `Some(marker)` for every page still to fetch: `Some(None)` for the
/// first page, then the marker of the previous response. A response marker
/// equal to the one just sent is a provider loop and is rejected.
#[derive(Debug)]
struct PageCursor<'a> {
    operation: &'static str,
    region: &'a str,
    marker: Option<String>,
    pages: usize,
    done: bool,
}

impl<'a> PageCursor<'a> {
    fn new(operation: &'static str, region: &'a str) -> Self {
        Self {
            operation,
            region,
            marker: None,
            pages: 0,
            done: false,
        }
    }

    fn next_request(&self) -> Option<Option<String>> {
        (!self.done).then(|| self.marker.clone())
    }

    fn advance(&mut self, next: Option<String>) -> Result<()> {
        self.pages += 1;
        match next.filter(|m| !m.is_empty()) {
            Some(next) if self.marker.as_deref() == Some(next.as_str()) => {
                Err(CoreError::PaginationLoop {
                    operation: self.operation,
                    region: self.region.to_string(),
                    marker: next,
                })
            }
            Some(next) => {
                self.marker = Some(next);
                Ok(())
            }
            None => {
                self.done = true;
                Ok(())
            }
        }
    }

    fn error(&self, source: ApiError) -> CoreError {
        CoreError::Listing {
            operation: self.operation,
            region: self.region.to_string(),
            source,
        }
    }
}

/// List every instance and cluster visible in `region`.
///
/// Instance records come first, then cluster records, each in the provider's
/// listing order. Any provider error aborts the listing.
pub async fn list_resources<R>(rds: &R, region: &str) -> Result<Vec<ResourceRecord>>
where
    R: RdsApi + ?Sized,
{
    let mut records = list_instances(rds, region).await?;
    let instances = records.len();
    records.extend(list_clusters(rds, region).await?);

    info!(
        region,
        instances,
        cluster_records = records.len() - instances,
        "Listed RDS resources"
    );

    Ok(records)
}

/// Drain DescribeDBInstances for `region`
pub async fn list_instances<R>(rds: &R, region: &str) -> Result<Vec<ResourceRecord>>
where
    R: RdsApi + ?Sized,
{
    let mut records = Vec::new();
    let mut cursor = PageCursor::new(DESCRIBE_DB_INSTANCES, region);

    while let Some(marker) = cursor.next_request() {
        let page = rds
            .describe_db_instances(marker)
            .await
            .map_err(|e| cursor.error(e))?;
        debug!(region, page = cursor.pages, count = page.items.len(), "DB instances page");

        records.extend(
            page.items
                .iter()
                .map(|db| ResourceRecord::from_instance(db, region)),
        );
        cursor.advance(page.marker)?;
    }

    Ok(records)
}

/// Drain DescribeDBClusters for `region`
pub async fn list_clusters<R>(rds: &R, region: &str) -> Result<Vec<ResourceRecord>>
where
    R: RdsApi + ?Sized,
{
    let mut records = Vec::new();
    let mut cursor = PageCursor::new(DESCRIBE_DB_CLUSTERS, region);

    while let Some(marker) = cursor.next_request() {
        let page = rds
            .describe_db_clusters(marker)
            .await
            .map_err(|e| cursor.error(e))?;
        debug!(region, page = cursor.pages, count = page.items.len(), "DB clusters page");

        for cluster in &page.items {
            records.extend(ResourceRecord::from_cluster(cluster, region));
        }
        cursor.advance(page.marker)?;
    }

    Ok(records)
}
