//! State machine for the "connect a source" dialog.
//!
//! The dialog opens either from a click on a source or from a connection
//! error resumed out of the [`ErrorChannel`]. Leaving the dialog, whether by
//! closing or completing it, always clears the channel so a stored failure
//! is never replayed, and refreshes the collections cache.

use super::collections::CollectionsStore;
use crate::api::models::{Collection, Source};
use crate::storage::error_channel::{ErrorChannel, ResumedErrorDetails};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Source the dialog is currently targeting
#[derive(Debug, Clone, PartialEq)]
pub struct DialogSelection {
    pub id: String,
    pub name: String,
    pub short_name: String,
}

impl From<&Source> for DialogSelection {
    fn from(source: &Source) -> Self {
        Self {
            id: source.id.clone(),
            name: source.name.clone(),
            short_name: source.short_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOrigin {
    UserClick,
    ResumedError,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open {
        selection: Option<DialogSelection>,
        origin: DialogOrigin,
        /// Failure carried over from the external flow, `None` for a click
        error: Option<ResumedErrorDetails>,
    },
}

impl DialogState {
    pub fn is_open(&self) -> bool {
        matches!(self, DialogState::Open { .. })
    }

    pub fn selection(&self) -> Option<&DialogSelection> {
        match self {
            DialogState::Open { selection, .. } => selection.as_ref(),
            DialogState::Closed => None,
        }
    }

    pub fn origin(&self) -> Option<DialogOrigin> {
        match self {
            DialogState::Open { origin, .. } => Some(*origin),
            DialogState::Closed => None,
        }
    }

    pub fn error(&self) -> Option<&ResumedErrorDetails> {
        match self {
            DialogState::Open { error, .. } => error.as_ref(),
            DialogState::Closed => None,
        }
    }
}

/// Result of feeding one input to the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Opened,
    /// An open resumed-error dialog gained its source selection
    Refined,
    Closed,
    Ignored,
}

/// How the dialog was left, plus the collections refresh it triggered
#[derive(Debug)]
pub struct DialogExit {
    pub transition: Transition,
    pub refresh: Option<JoinHandle<Arc<Vec<Collection>>>>,
}

impl DialogExit {
    /// Wait for the triggered refresh, if any
    pub async fn settled(self) -> Transition {
        if let Some(refresh) = self.refresh {
            if let Err(e) = refresh.await {
                log::warn!("Collections refresh task failed: {}", e);
            }
        }
        self.transition
    }
}

/// First source whose name or short name matches `service_name`, ignoring case
pub fn resolve_source<'a>(service_name: Option<&str>, sources: &'a [Source]) -> Option<&'a Source> {
    let service_name = service_name?;
    sources
        .iter()
        .find(|source| source.matches_service_name(service_name))
}

pub struct DialogFlow {
    state: DialogState,
    channel: ErrorChannel,
    collections: Arc<CollectionsStore>,
}

impl DialogFlow {
    pub fn new(channel: ErrorChannel, collections: Arc<CollectionsStore>) -> Self {
        Self {
            state: DialogState::Closed,
            channel,
            collections,
        }
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn channel(&self) -> &ErrorChannel {
        &self.channel
    }

    pub fn open_with_source(&mut self, source: &Source) -> Transition {
        if self.state.is_open() {
            log::debug!("Dialog already open, ignoring click on {}", source.name);
            return Transition::Ignored;
        }

        self.state = DialogState::Open {
            selection: Some(DialogSelection::from(source)),
            origin: DialogOrigin::UserClick,
            error: None,
        };
        log::debug!("Dialog opened for {}", source.short_name);
        Transition::Opened
    }

    /// Reopen the dialog for a failure resumed from the error channel.
    ///
    /// An already open resumed-error dialog without a selection is refined
    /// when `sources` now contains a match; any other open state is left
    /// alone.
    pub fn resume_from_error(
        &mut self,
        details: ResumedErrorDetails,
        sources: &[Source],
    ) -> Transition {
        let matched =
            resolve_source(details.service_name.as_deref(), sources).map(DialogSelection::from);

        if !self.state.is_open() {
            match &matched {
                Some(selection) => {
                    log::info!("Resuming connection error for {}", selection.short_name)
                }
                None => log::info!(
                    "Resuming connection error without a matching source: {}",
                    details.summary()
                ),
            }
            self.state = DialogState::Open {
                selection: matched,
                origin: DialogOrigin::ResumedError,
                error: Some(details),
            };
            return Transition::Opened;
        }

        match &mut self.state {
            DialogState::Open {
                selection: selection @ None,
                origin: DialogOrigin::ResumedError,
                ..
            } if matched.is_some() => {
                *selection = matched;
                Transition::Refined
            }
            _ => Transition::Ignored,
        }
    }

    /// Leave the dialog after cancellation; refreshes collections from cache rules
    pub fn close(&mut self) -> DialogExit {
        self.leave(false)
    }

    /// Leave the dialog after a successful connection; forces a refresh
    pub fn complete(&mut self) -> DialogExit {
        self.leave(true)
    }

    fn leave(&mut self, force_refresh: bool) -> DialogExit {
        // The channel is cleared even when nothing is open
        if let Err(e) = self.channel.clear() {
            log::warn!("Failed to clear connection error channel: {}", e);
        }

        if !self.state.is_open() {
            return DialogExit {
                transition: Transition::Ignored,
                refresh: None,
            };
        }

        self.state = DialogState::Closed;
        let collections = Arc::clone(&self.collections);
        let refresh = tokio::spawn(async move { collections.fetch(force_refresh).await });

        DialogExit {
            transition: Transition::Closed,
            refresh: Some(refresh),
        }
    }
}
