//! Refresh-token rotation chains
//!
//! Every login opens a rotation chain. Each successful rotation supersedes
//! the redeemed refresh token and appends a replacement to the same chain.
//! A superseded token presented a second time is treated as stolen, and the
//! whole chain is revoked.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Lifecycle state of one refresh-token record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Active,
    /// Redeemed once; terminal for this token value
    Superseded,
    /// Killed by logout or theft containment; terminal
    Revoked,
}

/// Durable record of a single refresh token
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshRecord {
    pub jti: Uuid,
    /// Lineage shared by every token descended from one issuance
    pub chain_id: Uuid,
    pub principal_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub state: RefreshState,
    /// Set when superseded, pointing at the replacement token
    pub replaced_by: Option<Uuid>,
}

impl RefreshRecord {
    /// Open a fresh rotation chain
    pub fn open_chain(jti: Uuid, chain_id: Uuid, principal_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            jti,
            chain_id,
            principal_id,
            issued_at: now,
            expires_at: now + ttl,
            state: RefreshState::Active,
            replaced_by: None,
        }
    }

    /// Build the record replacing this one after a rotation
    pub fn replacement(&self, jti: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            jti,
            chain_id: self.chain_id,
            principal_id: self.principal_id,
            issued_at: now,
            expires_at: now + ttl,
            state: RefreshState::Active,
            replaced_by: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// What the conditional supersede found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupersedeOutcome {
    /// The record was active and is now superseded
    Superseded,
    /// The record had already been redeemed: a theft signal
    AlreadySuperseded,
    /// The record was already revoked
    Revoked,
    /// No record under this id
    NotFound,
}
