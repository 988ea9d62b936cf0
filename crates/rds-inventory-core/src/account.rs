//! Account identity resolution
//!
//! The account ID lookup is mandatory and its failure aborts the run. The
//! alias lookup is best-effort: IAM permissions for it are often missing, and
//! the configured alias is a fine substitute.

use crate::config::AccountDescriptor;
use crate::error::{CoreError, Result};
use crate::provider::IdentityApi;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Canonical identity of an account, as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountIdentity {
    pub account_id: String,
    /// Alias registered in IAM, if any
    pub registered_alias: Option<String>,
}

impl AccountIdentity {
    /// The registered alias when there is one, else `fallback`
    pub fn effective_alias<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.registered_alias.as_deref() {
            Some(alias) if !alias.is_empty() => alias,
            _ => fallback,
        }
    }
}

/// Resolve the identity of the account behind `api`.
///
/// Fails if STS cannot be reached or returns no account ID.
pub async fn resolve_account<I>(api: &I, account: &AccountDescriptor) -> Result<AccountIdentity>
where
    I: IdentityApi + ?Sized,
{
    let account_id = api
        .caller_account_id()
        .await
        .map_err(|source| CoreError::Identity {
            profile: account.profile.clone(),
            source,
        })?
        .filter(|id| !id.is_empty())
        .ok_or_else(|| CoreError::MissingAccountId {
            profile: account.profile.clone(),
        })?;

    let registered_alias = lookup_alias_best_effort(api, &account.profile).await;

    info!(
        profile = %account.profile,
        account_id = %account_id,
        alias = ?registered_alias,
        "AWS account resolved"
    );

    Ok(AccountIdentity {
        account_id,
        registered_alias,
    })
}

/// Look up the account's registered alias, swallowing every failure.
///
/// Returns the first alias IAM reports, or `None` when there is none or the
/// call fails for any reason. An empty first alias is returned as is;
/// [`AccountIdentity::effective_alias`] falls back on it.
pub async fn lookup_alias_best_effort<I>(api: &I, profile: &str) -> Option<String>
where
    I: IdentityApi + ?Sized,
{
    match api.account_aliases().await {
        Ok(aliases) => {
            let alias = aliases.into_iter().next();
            if alias.is_none() {
                debug!(profile, "No account alias registered");
            }
            alias
        }
        Err(e) => {
            warn!(profile, error = %e, "Account alias lookup failed, using configured alias");
            None
        }
    }
}
