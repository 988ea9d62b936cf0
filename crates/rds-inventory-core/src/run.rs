//! Run orchestration
//!
//! Walks accounts in configured order, resolves each account once, then
//! lists every configured region. Rows accumulate in an [`Inventory`] that
//! is returned to the caller; nothing is written until the walk completes,
//! and the first fatal error abandons the whole run.

use crate::account::resolve_account;
use crate::config::Config;
use crate::error::Result;
use crate::progress::{emit, ProgressCallback, ProgressEvent};
use crate::provider::{Provider, Session};
use crate::report::ReportRow;
use crate::resources::{list_resources, ResourceKind};
use serde::Serialize;
use tracing::{info, info_span, Instrument};

/// All rows gathered by one run, in report order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Inventory {
    pub rows: Vec<ReportRow>,
}

/// Row counts for one account/region pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionTally {
    pub account_profile: String,
    pub account_alias: String,
    pub account_id: String,
    pub region: String,
    pub instances: usize,
    pub cluster_writers: usize,
    pub cluster_readers: usize,
}

impl RegionTally {
    pub fn total(&self) -> usize {
        self.instances + self.cluster_writers + self.cluster_readers
    }
}

impl Inventory {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Per account/region counts, in report order.
    ///
    /// Pairs that produced no rows do not appear.
    pub fn tallies(&self) -> Vec<RegionTally> {
        let mut tallies: Vec<RegionTally> = Vec::new();
        for row in &self.rows {
            let same_pair = tallies.last().is_some_and(|t| {
                t.account_profile == row.account_profile && t.region == row.record.region
            });
            if !same_pair {
                tallies.push(RegionTally {
                    account_profile: row.account_profile.clone(),
                    account_alias: row.account_alias.clone(),
                    account_id: row.account_id.clone(),
                    region: row.record.region.clone(),
                    instances: 0,
                    cluster_writers: 0,
                    cluster_readers: 0,
                });
            }
            if let Some(tally) = tallies.last_mut() {
                match row.record.kind {
                    ResourceKind::Instance => tally.instances += 1,
                    ResourceKind::ClusterWriter => tally.cluster_writers += 1,
                    ResourceKind::ClusterReader => tally.cluster_readers += 1,
                }
            }
        }
        tallies
    }
}

/// Collect the inventory for every configured account and region.
///
/// The config is validated first so that nothing touches the network when it
/// cannot describe a complete run.
pub async fn run_inventory<P>(
    provider: &P,
    config: &Config,
    on_progress: Option<ProgressCallback>,
) -> Result<Inventory>
where
    P: Provider,
{
    config.validate()?;

    let mut inventory = Inventory::default();

    for account in &config.accounts {
        let span = info_span!("account", profile = %account.profile);

        async {
            emit(
                &on_progress,
                ProgressEvent::AccountStarted {
                    profile: account.profile.clone(),
                },
            );

            let session = provider.connect(account).await;
            let identity = resolve_account(&session, account).await?;
            let alias = identity.effective_alias(&account.alias).to_string();

            emit(
                &on_progress,
                ProgressEvent::AccountResolved {
                    profile: account.profile.clone(),
                    account_id: identity.account_id.clone(),
                    alias: alias.clone(),
                },
            );

            for region in &config.regions {
                emit(
                    &on_progress,
                    ProgressEvent::RegionStarted {
                        profile: account.profile.clone(),
                        region: region.clone(),
                    },
                );

                let rds = session.rds(region);
                let records = list_resources(&rds, region).await?;
                let count = records.len();

                inventory
                    .rows
                    .extend(records.into_iter().map(|record| ReportRow {
                        account_profile: account.profile.clone(),
                        account_alias: alias.clone(),
                        account_id: identity.account_id.clone(),
                        record,
                    }));

                emit(
                    &on_progress,
                    ProgressEvent::RegionCompleted {
                        profile: account.profile.clone(),
                        region: region.clone(),
                        records: count,
                    },
                );
            }

            Ok::<_, crate::CoreError>(())
        }
        .instrument(span)
        .await?;
    }

    info!(
        accounts = config.accounts.len(),
        regions = config.regions.len(),
        rows = inventory.len(),
        "Inventory collected"
    );

    Ok(inventory)
}
