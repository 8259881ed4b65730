//! Speaker list view: the locally cached speaker list of one event, search
//! filtering, and the edit flow.

#[cfg(test)]
use std::cell::Cell;
use std::cell::{Ref, RefCell};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{Result, SpeakersError};
use crate::form::{EditSpeakerForm, EditSpeakerFormData};
use crate::payload::MultipartPayload;
use crate::types::Speaker;

pub const NO_MATCHES_MESSAGE: &str = "There are no entries that match your search criteria.";
pub const NO_SPEAKERS_MESSAGE: &str = "There are no speakers yet.";

/// Backend operations the panel depends on.
#[async_trait]
pub trait SpeakerApi: Send + Sync {
    async fn list_speakers(&self, event_id: u64) -> Result<Vec<Speaker>>;

    async fn update_speaker(
        &self,
        event_id: u64,
        person_id: u64,
        payload: MultipartPayload,
    ) -> Result<Speaker>;
}

/// Shared path for showing failures to the user.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &SpeakersError);
}

/// Speakers whose name contains `term`, ignoring case, in list order.
pub fn filter_speakers<'a>(speakers: &'a [Speaker], term: &str) -> Vec<&'a Speaker> {
    let term = term.to_lowercase();
    speakers
        .iter()
        .filter(|speaker| speaker.name.to_lowercase().contains(&term))
        .collect()
}

/// Merge a completed fetch into the current list. The server snapshot is
/// authoritative and replaces the list wholesale, in server order.
pub fn reconcile(current: &[Speaker], fetched: Vec<Speaker>) -> Vec<Speaker> {
    if current != fetched.as_slice() {
        tracing::debug!(
            before = current.len(),
            after = fetched.len(),
            "speaker list replaced by fetch"
        );
    }
    fetched
}

/// Swap in `updated` for the entry with the same id, keeping the order.
pub fn replace_speaker(speakers: &[Speaker], updated: Speaker) -> Vec<Speaker> {
    let mut replaced = false;
    let mut result: Vec<Speaker> = speakers
        .iter()
        .map(|speaker| {
            if speaker.id == updated.id {
                replaced = true;
                updated.clone()
            } else {
                speaker.clone()
            }
        })
        .collect();
    if !replaced {
        result.push(updated);
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowAction {
    Edit,
    Delete,
}

impl RowAction {
    pub fn tooltip(self) -> &'static str {
        match self {
            RowAction::Edit => "Edit speaker profile",
            RowAction::Delete => "Delete speaker profile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerRow {
    pub id: u64,
    pub thumbnail_url: String,
    pub name: String,
    pub email: String,
    pub description: String,
    pub actions: [RowAction; 2],
}

impl From<&Speaker> for SpeakerRow {
    fn from(speaker: &Speaker) -> Self {
        Self {
            id: speaker.id,
            thumbnail_url: speaker.thumbnail_url().to_string(),
            name: speaker.name.clone(),
            email: speaker.email.clone(),
            description: speaker.description().to_string(),
            actions: [RowAction::Edit, RowAction::Delete],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoMatches,
    NoSpeakers,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            EmptyState::NoMatches => NO_MATCHES_MESSAGE,
            EmptyState::NoSpeakers => NO_SPEAKERS_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved(Speaker),
    Failed,
}

/// Identifies one fetch so that completions can be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

struct FilterMemo {
    term: String,
    generation: u64,
    speakers: Vec<Speaker>,
}

pub struct SpeakerPanel {
    event_id: u64,
    api: Arc<dyn SpeakerApi>,
    reporter: Arc<dyn ErrorReporter>,
    speakers: Vec<Speaker>,
    generation: u64,
    search_term: String,
    modal_opened: bool,
    selected_speaker: Option<Speaker>,
    form: Option<EditSpeakerForm>,
    next_ticket: u64,
    applied_ticket: Option<FetchTicket>,
    memo: RefCell<Option<FilterMemo>>,
    #[cfg(test)]
    recomputes: Cell<u32>,
}

impl SpeakerPanel {
    pub fn new(event_id: u64, api: Arc<dyn SpeakerApi>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            event_id,
            api,
            reporter,
            speakers: Vec::new(),
            generation: 0,
            search_term: String::new(),
            modal_opened: false,
            selected_speaker: None,
            form: None,
            next_ticket: 0,
            applied_ticket: None,
            memo: RefCell::new(None),
            #[cfg(test)]
            recomputes: Cell::new(0),
        }
    }

    #[cfg(test)]
    pub fn event_id(&self) -> u64 {
        self.event_id
    }

    #[cfg(test)]
    pub fn speakers(&self) -> &[Speaker] {
        &self.speakers
    }

    #[cfg(test)]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn modal_opened(&self) -> bool {
        self.modal_opened
    }

    pub fn selected_speaker(&self) -> Option<&Speaker> {
        self.selected_speaker.as_ref()
    }

    pub fn form(&self) -> Option<&EditSpeakerForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut EditSpeakerForm> {
        self.form.as_mut()
    }

    fn set_speakers(&mut self, speakers: Vec<Speaker>) {
        self.speakers = speakers;
        self.generation += 1;
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.next_ticket += 1;
        FetchTicket(self.next_ticket)
    }

    /// Apply a fetch result. Completions older than the last applied one are
    /// dropped. Returns whether the list was replaced.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, fetched: Vec<Speaker>) -> bool {
        if self.applied_ticket.is_some_and(|applied| ticket < applied) {
            tracing::warn!(?ticket, applied = ?self.applied_ticket, "dropping stale speaker fetch");
            return false;
        }
        self.applied_ticket = Some(ticket);
        let merged = reconcile(&self.speakers, fetched);
        self.set_speakers(merged);
        true
    }

    /// Fetch the speaker list from the backend and apply it.
    pub async fn refresh(&mut self) -> Result<()> {
        let ticket = self.begin_fetch();
        let fetched = self.api.list_speakers(self.event_id).await?;
        self.complete_fetch(ticket, fetched);
        Ok(())
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Speakers matching the search term. Recomputed only when the term or
    /// the list has changed since the last call.
    pub fn filtered(&self) -> Ref<'_, [Speaker]> {
        let term = self.search_term.to_lowercase();

        let fresh = self
            .memo
            .borrow()
            .as_ref()
            .is_some_and(|m| m.term == term && m.generation == self.generation);

        if !fresh {
            #[cfg(test)]
            self.recomputes.set(self.recomputes.get() + 1);
            let speakers = filter_speakers(&self.speakers, &term)
                .into_iter()
                .cloned()
                .collect();
            *self.memo.borrow_mut() = Some(FilterMemo {
                term,
                generation: self.generation,
                speakers,
            });
        }

        Ref::map(self.memo.borrow(), |memo| {
            memo.as_ref().map(|m| m.speakers.as_slice()).unwrap_or(&[])
        })
    }

    pub fn rows(&self) -> Vec<SpeakerRow> {
        self.filtered().iter().map(SpeakerRow::from).collect()
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.filtered().is_empty() {
            None
        } else if self.search_term.is_empty() {
            Some(EmptyState::NoSpeakers)
        } else {
            Some(EmptyState::NoMatches)
        }
    }

    /// Select a speaker and open the edit modal pre-filled with its data.
    pub fn open_edit(&mut self, speaker_id: u64) -> Result<&mut EditSpeakerForm> {
        let speaker = self
            .speakers
            .iter()
            .find(|s| s.id == speaker_id)
            .cloned()
            .ok_or(SpeakersError::SpeakerNotFound(speaker_id))?;

        tracing::debug!(speaker_id, "opening edit modal");
        self.selected_speaker = Some(speaker.clone());
        self.modal_opened = true;
        Ok(self
            .form
            .insert(EditSpeakerForm::new(Some(speaker), self.event_id)))
    }

    pub fn close_modal(&mut self) {
        self.modal_opened = false;
        self.selected_speaker = None;
        self.form = None;
    }

    pub fn activate(&mut self, speaker_id: u64, action: RowAction) -> Result<()> {
        match action {
            RowAction::Edit => self.open_edit(speaker_id).map(|_| ()),
            RowAction::Delete => {
                tracing::debug!(speaker_id, "delete is not available for speakers");
                Ok(())
            }
        }
    }

    /// Submit the open form's current values.
    pub async fn submit_form(&mut self) -> SubmitOutcome {
        let form_data = self
            .form
            .as_ref()
            .filter(|form| form.can_submit())
            .map(EditSpeakerForm::submit);

        match form_data {
            Some(form_data) => self.handle_edit_speaker(form_data).await,
            None => {
                self.reporter.report(&SpeakersError::NoSpeakerSelected);
                SubmitOutcome::Failed
            }
        }
    }

    /// Send the edited values for the selected speaker. On success the modal
    /// closes, the returned speaker replaces the local entry and the list is
    /// fetched again. On failure the error is reported and nothing changes.
    pub async fn handle_edit_speaker(&mut self, form_data: EditSpeakerFormData) -> SubmitOutcome {
        let Some(selected_id) = self.selected_speaker.as_ref().map(|s| s.id) else {
            self.reporter.report(&SpeakersError::NoSpeakerSelected);
            return SubmitOutcome::Failed;
        };

        let payload = MultipartPayload::from_form_data(&form_data);

        let updated = match self
            .api
            .update_speaker(self.event_id, selected_id, payload)
            .await
        {
            Ok(speaker) => speaker,
            Err(e) => {
                self.reporter.report(&e);
                return SubmitOutcome::Failed;
            }
        };

        tracing::debug!(speaker_id = selected_id, "speaker updated");
        self.modal_opened = false;
        self.form = None;
        let merged = replace_speaker(&self.speakers, updated.clone());
        self.set_speakers(merged);

        if let Err(e) = self.refresh().await {
            self.reporter.report(&e);
        }

        SubmitOutcome::Saved(updated)
    }
}

/// In-memory backend and reporter for exercising panels without a server.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    pub fn speaker(id: u64, name: &str) -> Speaker {
        Speaker {
            id,
            email: format!("{}@example.com", name.to_lowercase()),
            name: name.to_string(),
            first_name: name.to_string(),
            last_name: String::new(),
            speaker_description: None,
            speaker_photo_url: None,
            avatar_url: format!("/user/{id}/picture"),
        }
    }

    #[derive(Default)]
    pub struct FakeApi {
        pub listed: Mutex<Vec<Vec<Speaker>>>,
        pub list_calls: Mutex<u32>,
        pub update_result: Mutex<Option<Speaker>>,
        pub updates: Mutex<Vec<(u64, u64, MultipartPayload)>>,
    }

    impl FakeApi {
        pub fn with_lists(lists: Vec<Vec<Speaker>>) -> Self {
            Self {
                listed: Mutex::new(lists),
                ..Default::default()
            }
        }

        pub fn list_calls(&self) -> u32 {
            *self.list_calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl SpeakerApi for FakeApi {
        async fn list_speakers(&self, _event_id: u64) -> Result<Vec<Speaker>> {
            *self.list_calls.lock().unwrap() += 1;
            let mut listed = self.listed.lock().unwrap();
            if listed.is_empty() {
                return Err(SpeakersError::ApiError {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            Ok(listed.remove(0))
        }

        async fn update_speaker(
            &self,
            event_id: u64,
            person_id: u64,
            payload: MultipartPayload,
        ) -> Result<Speaker> {
            self.updates
                .lock()
                .unwrap()
                .push((event_id, person_id, payload));
            self.update_result
                .lock()
                .unwrap()
                .clone()
                .ok_or(SpeakersError::ApiError {
                    status: 400,
                    message: "invalid".to_string(),
                })
        }
    }

    #[derive(Default)]
    pub struct RecordingReporter {
        pub messages: Mutex<Vec<String>>,
    }

    impl ErrorReporter for RecordingReporter {
        fn report(&self, error: &SpeakersError) {
            self.messages.lock().unwrap().push(error.to_string());
        }
    }
}
