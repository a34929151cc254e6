use futures::task::LocalSpawn;

use crate::{AuthToken, Fetcher, ResourceMap, fetch_user_data};


/// Owns the resources of the signed-in user.
///
/// Pass a `Session` to whatever builds the render tree instead of keeping a global resource map.
/// Re-authenticating replaces the whole map. Resources of a replaced map are never mutated: their fetches keep
/// running to completion, and their results only reach readers that still hold those old resources.
pub struct Session<F, Sp> {
    fetcher: F,
    spawner: Sp,
    generation: u64,
    current: Option<ResourceMap>,
}

impl<F: Fetcher, Sp: LocalSpawn> Session<F, Sp> {
    pub fn new(fetcher: F, spawner: Sp) -> Self {
        Self {
            fetcher,
            spawner,
            generation: 0,
            current: None,
        }
    }

    pub fn sign_in(&mut self, credential: AuthToken) -> &ResourceMap {
        self.reset(Some(credential))
    }

    /// Starts a fresh set of fetches and makes their map current.
    pub fn reset(&mut self, credential: Option<AuthToken>) -> &ResourceMap {
        self.generation += 1;
        let span = tracing::debug_span!("session", generation = self.generation);
        let _enter = span.enter();
        if self.current.is_some() {
            tracing::debug!("superseding previous resources");
        }
        let map = fetch_user_data(&self.fetcher, credential, &self.spawner);
        self.current.insert(map)
    }

    /// Drops the current map and returns it.
    pub fn sign_out(&mut self) -> Option<ResourceMap> {
        self.current.take()
    }

    pub fn resources(&self) -> Option<&ResourceMap> {
        self.current.as_ref()
    }

    /// Number of maps created so far. The current map, if any, belongs to this generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}
