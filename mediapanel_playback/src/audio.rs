use serde::Serialize;
use std::collections::HashMap;

/// Id the spatial audio mixer knows the video's session by.
pub const REGISTERED_AUDIO_SESSION_ID: u32 = 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioType {
    Mono,
    Stereo,
    /// Multichannel tracks are mixed through the sound field.
    Soundfield,
}

impl AudioType {
    /// Unknown channel counts are treated as stereo.
    pub fn from_channel_count(channels: Option<u32>) -> Self {
        match channels {
            Some(1) => AudioType::Mono,
            Some(2) | None => AudioType::Stereo,
            Some(_) => AudioType::Soundfield,
        }
    }
}

/// Audio session attached to a panel entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AudioSessionBinding {
    pub registered_id: u32,
    pub audio_type: AudioType,
}

/// Maps registered session ids to the player's audio session and records
/// which panel plays through each. One panel per registered id.
#[derive(Debug, Default)]
pub struct AudioSessionRegistry {
    sessions: HashMap<u32, u32>,
    owners: HashMap<u32, u64>,
}

impl AudioSessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, registered_id: u32, player_session_id: u32) -> Option<u32> {
        let previous = self.sessions.insert(registered_id, player_session_id);
        tracing::info!(
            "Registered audio session {} as {}",
            player_session_id,
            registered_id
        );
        previous
    }

    pub fn player_session(&self, registered_id: u32) -> Option<u32> {
        self.sessions.get(&registered_id).copied()
    }

    /// Attaches `panel` to the registered session, taking it over from any
    /// other panel. `None` if nothing is registered under that id.
    pub fn bind(
        &mut self,
        panel: u64,
        registered_id: u32,
        channels: Option<u32>,
    ) -> Option<AudioSessionBinding> {
        if !self.sessions.contains_key(&registered_id) {
            tracing::warn!("Audio session {} is not registered", registered_id);
            return None;
        }
        if let Some(owner) = self.owners.insert(registered_id, panel) {
            if owner != panel {
                tracing::debug!("Panel {} took audio session {} from {}", panel, registered_id, owner);
            }
        }
        Some(AudioSessionBinding {
            registered_id,
            audio_type: AudioType::from_channel_count(channels),
        })
    }

    pub fn owner(&self, registered_id: u32) -> Option<u64> {
        self.owners.get(&registered_id).copied()
    }

    pub fn unbind(&mut self, panel: u64) {
        self.owners.retain(|_, owner| *owner != panel);
    }
}
