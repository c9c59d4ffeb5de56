// Usage gate: free trial and paid token authorization
// Author: kelexine (https://github.com/kelexine)

use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::TrialStatus;
use crate::store::{TrialConsumption, UsageStore};
use tracing::{info, warn};

pub const TOKEN_REJECTED: &str = "Token is invalid, expired, or has no remaining generations";
pub const TRIAL_EXHAUSTED: &str = "Free trial exhausted. Please purchase credits to continue.";
pub const CREDENTIALS_REQUIRED: &str =
    "Either device_id (for free trial) or token (for paid use) is required";

/// Why a request was allowed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// Paid generation; `remaining` generations left on the token.
    Token { remaining: u32 },
    /// Free trial use; `uses_count` uses consumed so far, including this one.
    Trial { uses_count: u32 },
}

/// Decides whether a request may proceed and records the consumption.
///
/// A use is committed before `authorize` returns and is never refunded,
/// even if generation fails afterwards.
#[derive(Clone)]
pub struct UsageGate {
    store: UsageStore,
    free_trial_limit: u32,
}

impl UsageGate {
    pub fn new(store: UsageStore, free_trial_limit: u32) -> Self {
        Self {
            store,
            free_trial_limit,
        }
    }

    pub fn store(&self) -> &UsageStore {
        &self.store
    }

    /// Token takes precedence over device id when both are present.
    pub async fn authorize(&self, device_id: Option<&str>, token: Option<&str>) -> Result<Grant> {
        if let Some(token) = token {
            let now = chrono::Utc::now().timestamp();
            return match self.store.consume_token(token, now).await? {
                Some(remaining) => {
                    metrics::record_gate_decision("token", "granted");
                    info!(remaining, "Generation authorized by token");
                    Ok(Grant::Token { remaining })
                }
                None => {
                    metrics::record_gate_decision("token", "denied");
                    warn!("Rejected token: invalid, expired or exhausted");
                    Err(AppError::PaymentRequired(TOKEN_REJECTED.to_string()))
                }
            };
        }

        if let Some(device_id) = device_id {
            let outcome = self
                .store
                .consume_trial(device_id, self.free_trial_limit)
                .await?;
            return match outcome {
                TrialConsumption::Created => {
                    metrics::record_gate_decision("trial", "granted");
                    info!(device_id, "First free trial use");
                    Ok(Grant::Trial { uses_count: 1 })
                }
                TrialConsumption::Incremented { uses_count } => {
                    metrics::record_gate_decision("trial", "granted");
                    info!(device_id, uses_count, "Free trial use");
                    Ok(Grant::Trial { uses_count })
                }
                TrialConsumption::Exhausted { uses_count } => {
                    metrics::record_gate_decision("trial", "denied");
                    warn!(device_id, uses_count, "Free trial exhausted");
                    Err(AppError::PaymentRequired(TRIAL_EXHAUSTED.to_string()))
                }
            };
        }

        metrics::record_gate_decision("none", "denied");
        Err(AppError::InvalidRequest(CREDENTIALS_REQUIRED.to_string()))
    }

    /// Remaining free uses for a device. Unknown devices have the full quota.
    pub async fn trial_status(&self, device_id: &str) -> Result<TrialStatus> {
        let uses_remaining = match self.store.trial_record(device_id).await? {
            None => self.free_trial_limit,
            Some(record) => self.free_trial_limit.saturating_sub(record.uses_count),
        };

        Ok(TrialStatus {
            has_free_trial: uses_remaining > 0,
            uses_remaining,
        })
    }
}
