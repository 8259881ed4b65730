//! Explicit mount/unmount lifecycle for speaker panels hosted in named containers.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{Result, SpeakersError};
use crate::panel::{ErrorReporter, SpeakerApi, SpeakerPanel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MountProps {
    pub event_id: u64,
}

impl MountProps {
    /// Parse the JSON value of an `event-id` attribute, e.g. `42` or `"42"`.
    pub fn from_event_id_attribute(value: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum EventId {
            Number(u64),
            Text(String),
        }

        let invalid = || SpeakersError::InvalidEventId(value.to_string());
        let event_id = match serde_json::from_str::<EventId>(value.trim()).map_err(|_| invalid())? {
            EventId::Number(id) => id,
            EventId::Text(text) => text.trim().parse().map_err(|_| invalid())?,
        };

        Ok(Self { event_id })
    }
}

pub struct PanelHost {
    api: Arc<dyn SpeakerApi>,
    reporter: Arc<dyn ErrorReporter>,
    mounted: HashMap<String, SpeakerPanel>,
}

impl PanelHost {
    pub fn new(api: Arc<dyn SpeakerApi>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            api,
            reporter,
            mounted: HashMap::new(),
        }
    }

    /// Create a panel in `container` and load its speakers. A panel already
    /// mounted there is replaced.
    pub async fn mount(&mut self, container: &str, props: MountProps) -> Result<&mut SpeakerPanel> {
        let mut panel = SpeakerPanel::new(props.event_id, self.api.clone(), self.reporter.clone());
        panel.refresh().await?;

        match self.mounted.entry(container.to_string()) {
            Entry::Occupied(mut entry) => {
                tracing::debug!(container, "replacing mounted speaker panel");
                entry.insert(panel);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => Ok(entry.insert(panel)),
        }
    }

    pub fn unmount(&mut self, container: &str) -> bool {
        self.mounted.remove(container).is_some()
    }

    #[allow(dead_code)]
    pub fn get(&self, container: &str) -> Option<&SpeakerPanel> {
        self.mounted.get(container)
    }

    pub fn get_mut(&mut self, container: &str) -> Option<&mut SpeakerPanel> {
        self.mounted.get_mut(container)
    }

    #[allow(dead_code)]
    pub fn is_mounted(&self, container: &str) -> bool {
        self.mounted.contains_key(container)
    }
}
