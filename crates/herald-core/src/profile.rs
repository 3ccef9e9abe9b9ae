//! Actor profiles and the store that owns them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{StoreError, StoreResult};

/// What the dispatcher knows about one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Opaque identity of the actor, as delivered by the transport.
    pub actor_id: String,

    /// Blocked actors receive a single rejection notice and nothing else.
    #[serde(default)]
    pub blocked: bool,

    /// Free-form labels attached by administrators.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Number of messages received from this actor.
    #[serde(default)]
    pub interactions: u64,

    /// Time of the most recent message.
    #[serde(default)]
    pub last_interaction: Option<SystemTime>,
}

impl Profile {
    /// Creates a fresh, unblocked profile.
    pub fn new(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            blocked: false,
            tags: Vec::new(),
            interactions: 0,
            last_interaction: None,
        }
    }

    /// Returns `true` if the actor is blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }
}

/// Identity and session lookup used by the dispatcher.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns the actor's profile, creating it if the store allows that.
    async fn find_or_create(&self, actor_id: &str) -> StoreResult<Profile>;

    /// Records that the actor just interacted with the bot.
    async fn record_interaction(&self, actor_id: &str) -> StoreResult<()>;

    /// Blocks or unblocks an actor.
    async fn set_blocked(&self, actor_id: &str, blocked: bool) -> StoreResult<()>;
}

/// A shared, type-erased profile store.
pub type BoxedProfileStore = Arc<dyn ProfileStore>;

/// A [`ProfileStore`] kept entirely in memory.
///
/// By default unknown actors get a fresh profile on first contact. With
/// [`known_only`](Self::known_only) lookups of unknown actors fail with
/// [`StoreError::NotFound`] instead.
#[derive(Debug)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
    auto_create: bool,
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProfileStore {
    /// Creates an empty store that creates profiles on demand.
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            auto_create: true,
        }
    }

    /// Creates an empty store that only knows about inserted profiles.
    pub fn known_only() -> Self {
        Self {
            auto_create: false,
            ..Self::new()
        }
    }

    /// Inserts a profile (builder pattern).
    pub fn with_profile(self, profile: Profile) -> Self {
        self.insert(profile);
        self
    }

    /// Inserts or replaces a profile.
    pub fn insert(&self, profile: Profile) {
        self.profiles
            .write()
            .insert(profile.actor_id.clone(), profile);
    }

    /// Returns a snapshot of one profile.
    pub fn get(&self, actor_id: &str) -> Option<Profile> {
        self.profiles.read().get(actor_id).cloned()
    }

    /// Applies `f` to the actor's profile, creating it first if needed.
    ///
    /// Returns whatever `f` returns.
    pub fn update<R>(&self, actor_id: &str, f: impl FnOnce(&mut Profile) -> R) -> R {
        let mut profiles = self.profiles.write();
        let profile = profiles
            .entry(actor_id.to_string())
            .or_insert_with(|| Profile::new(actor_id));
        f(profile)
    }

    /// Returns the number of stored profiles.
    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    /// Returns `true` if no profiles are stored.
    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn find_or_create(&self, actor_id: &str) -> StoreResult<Profile> {
        if let Some(profile) = self.get(actor_id) {
            return Ok(profile);
        }

        if !self.auto_create {
            return Err(StoreError::NotFound(actor_id.to_string()));
        }

        trace!(actor = %actor_id, "Creating profile");
        Ok(self.update(actor_id, |profile| profile.clone()))
    }

    async fn record_interaction(&self, actor_id: &str) -> StoreResult<()> {
        let mut profiles = self.profiles.write();
        let profile = profiles
            .get_mut(actor_id)
            .ok_or_else(|| StoreError::NotFound(actor_id.to_string()))?;
        profile.interactions += 1;
        profile.last_interaction = Some(SystemTime::now());
        Ok(())
    }

    async fn set_blocked(&self, actor_id: &str, blocked: bool) -> StoreResult<()> {
        self.update(actor_id, |profile| profile.blocked = blocked);
        Ok(())
    }
}
