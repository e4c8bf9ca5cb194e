//! Flushing of assembled channels

use super::container::ServiceMap;
use crate::core::{Channel, Result};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

#[derive(Default)]
struct FlusherState {
    /// Channel names not created yet; filled on first use
    pending: Option<Vec<String>>,
    channels: Vec<Arc<Channel>>,
}

/// Closes or resets every channel that has been created so far.
///
/// Channels the container has not instantiated are skipped and never created
/// by the flusher; they are picked up by a later call once they exist.
pub struct LogFlusher {
    services: ServiceMap,
    state: Mutex<FlusherState>,
}

impl LogFlusher {
    pub fn new(services: ServiceMap) -> Self {
        Self {
            services,
            state: Mutex::new(FlusherState::default()),
        }
    }

    pub fn close(&self) -> Result<()> {
        for channel in self.created_channels()? {
            channel.close()?;
        }
        Ok(())
    }

    pub fn reset(&self) -> Result<()> {
        for channel in self.created_channels()? {
            channel.reset()?;
        }
        Ok(())
    }

    /// Channels created so far, in the order they were first noticed
    pub fn created_channels(&self) -> Result<Vec<Arc<Channel>>> {
        let mut state = self.state.lock();
        let FlusherState { pending, channels } = &mut *state;
        let pending = pending.get_or_insert_with(|| self.services.keys());

        let mut i = 0;
        while i < pending.len() {
            let name = &pending[i];
            if !self.services.is_created(name) {
                i += 1;
                continue;
            }

            let key = self.services.service_key(name).unwrap_or(name.as_str());
            let channel = self.services.resolve(name)?.require::<Channel>(key)?;
            channels.push(channel);
            pending.remove(i);
        }

        Ok(channels.clone())
    }
}

impl fmt::Debug for LogFlusher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFlusher")
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}
