//! SyncCoordinator - runs one delta cycle end-to-end with the cursor sequenced
//! around delivery.
//!
//! The cycle is read old cursor, fetch, publish, persist new cursor, in that
//! order. The new cursor is written only after the batch has been handed to
//! the channel, so a crash between the two replays the batch instead of losing
//! it: at-least-once delivery, with idempotent `apply` absorbing the replay.
//! `sync` takes `&mut self`, so two cycles can never race on the same cursor.

use std::fmt;

use tracing::{debug, info};

use crate::channel::{ChangeChannel, ChangeSubscriber};
use crate::delta::{DeltaFetcher, FetchError};
use crate::remote::{RemoteStore, RemoteStoreError};
use crate::token::{ChangeTokenStore, TokenStoreError};
use crate::view::LocalView;

/// Error type for a sync cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The remote store failed; the cycle had no effect and may be retried at
    /// the next wake-up.
    Remote(RemoteStoreError),
    /// The cursor store failed.
    TokenStore(TokenStoreError),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Remote(err) => write!(f, "sync cycle failed: {}", err),
            SyncError::TokenStore(err) => write!(f, "sync cursor store failed: {}", err),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<RemoteStoreError> for SyncError {
    fn from(err: RemoteStoreError) -> Self {
        SyncError::Remote(err)
    }
}

impl From<TokenStoreError> for SyncError {
    fn from(err: TokenStoreError) -> Self {
        SyncError::TokenStore(err)
    }
}

/// What a successful sync cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The drain was empty; the persisted cursor was left untouched.
    NoChanges,
    /// A batch was published and the cursor advanced.
    Applied { events: usize },
    /// The cursor was stale and has been cleared. Every view must be
    /// repopulated from a full query before syncing again.
    ResyncRequired,
}

/// Drives delta cycles against one remote store and one cursor store,
/// publishing into one change channel.
pub struct SyncCoordinator<S: RemoteStore, T: ChangeTokenStore> {
    store: S,
    tokens: T,
    channel: ChangeChannel,
}

impl<S: RemoteStore, T: ChangeTokenStore> SyncCoordinator<S, T> {
    pub fn new(store: S, tokens: T, channel: ChangeChannel) -> Self {
        Self {
            store,
            tokens,
            channel,
        }
    }

    /// Run one delta cycle. Call on every remote-change wake-up.
    pub fn sync(&mut self) -> Result<SyncOutcome, SyncError> {
        let last = self.tokens.load()?;

        let batch = match DeltaFetcher::new(&self.store).fetch(last.as_ref()) {
            Ok(batch) => batch,
            Err(FetchError::TokenExpired) => {
                info!("change cursor expired; clearing for full resync");
                self.tokens.clear()?;
                return Ok(SyncOutcome::ResyncRequired);
            }
            Err(FetchError::Transport(msg)) => {
                return Err(SyncError::Remote(RemoteStoreError::Transport(msg)));
            }
        };

        match batch.token {
            None => {
                debug!("sync cycle found no changes");
                Ok(SyncOutcome::NoChanges)
            }
            Some(token) => {
                let events = batch.events.len();
                // Deliver before persisting: a crash here replays the batch,
                // never drops it.
                self.channel.publish(batch.events);
                self.tokens.store(&token)?;
                debug!(events, "sync cycle applied");
                Ok(SyncOutcome::Applied { events })
            }
        }
    }

    /// Populate a view from a full query, using the view's own membership
    /// test and sort order. Used for initial load and after `ResyncRequired`.
    pub fn populate(
        &self,
        view: &mut LocalView,
        record_type: &str,
    ) -> Result<(), SyncError> {
        let records = self.store.query(
            record_type,
            &|record| view.matches(record),
            &|a, b| view.compare(a, b),
        )?;
        view.populate(records);
        Ok(())
    }

    /// A new subscriber on the coordinator's channel.
    pub fn subscribe(&self) -> ChangeSubscriber {
        self.channel.subscribe()
    }

    /// A handle to the channel, e.g. for wiring up a `MutationBroadcaster`.
    pub fn channel(&self) -> ChangeChannel {
        self.channel.clone()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
