//! Location selection flow.
//!
//! `LocationPicker` is the headless counterpart of the map picker widget: the
//! host's map component renders tiles and markers, reports clicks and view
//! changes here, and reads picker state back for display. All address
//! resolution runs through [`ReverseGeocoder`], which degrades to a
//! coordinate-string address instead of failing.
//!
//! Resolution is a single task keyed by the current coordinate pair through a
//! generation counter: every new selection (and every explicit confirm)
//! bumps the generation, and a task that finishes under a stale generation
//! discards its result. A late background resolution therefore can never
//! overwrite a newer selection or update an already-emitted record.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use crate::errors::AppError;
use crate::geocode::{fallback_address, ReverseGeocoder};
use crate::models::{ResolvedLocation, SelectedLocation, ViewState};

type SelectCallback = Box<dyn FnOnce(ResolvedLocation) + Send>;
type CloseCallback = Box<dyn FnOnce() + Send>;

/// Observable picker lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
    /// No location selected; the host shows the instructional overlay.
    Idle,
    /// A coordinate pair is captured; no address known yet.
    Selected,
    /// An address-resolution request is in flight.
    Resolving,
    /// An address is available for display.
    Resolved,
    /// Confirmed or closed; the picker's involvement has ended.
    Finished,
}

#[derive(Default)]
struct PickerShared {
    selection: Option<SelectedLocation>,
    resolved: Option<ResolvedLocation>,
    resolving: bool,
    generation: u64,
}

/// Stateful location-selection flow.
///
/// One picker is owned by one hosting context at a time; mutations happen on
/// the host's event dispatch plus a single background resolution task, with
/// shared state held behind a mutex taken only for short critical sections.
pub struct LocationPicker {
    geocoder: ReverseGeocoder,
    shared: Arc<Mutex<PickerShared>>,
    view: ViewState,
    finished: bool,
    on_select: Option<SelectCallback>,
    on_close: Option<CloseCallback>,
}

impl LocationPicker {
    /// Creates an idle picker with the configured initial map view.
    pub fn new(geocoder: ReverseGeocoder, config: &Config) -> Self {
        Self {
            geocoder,
            shared: Arc::new(Mutex::new(PickerShared::default())),
            view: ViewState {
                longitude: config.initial_longitude,
                latitude: config.initial_latitude,
                zoom: config.initial_zoom,
            },
            finished: false,
            on_select: None,
            on_close: None,
        }
    }

    /// Registers the host callback invoked with the finalized location.
    pub fn on_location_select(&mut self, f: impl FnOnce(ResolvedLocation) + Send + 'static) {
        self.on_select = Some(Box::new(f));
    }

    /// Registers the host callback invoked when the flow is abandoned.
    pub fn on_close(&mut self, f: impl FnOnce() + Send + 'static) {
        self.on_close = Some(Box::new(f));
    }

    /// Handles a map click.
    ///
    /// Unconditionally overwrites the current selection, clears any resolved
    /// address (a stale address must never be shown against a new pair), and
    /// starts background resolution for the new pair. Must run inside a tokio
    /// runtime.
    pub fn select(&mut self, latitude: f64, longitude: f64) -> Result<(), AppError> {
        if self.finished {
            return Err(AppError::BadRequest(
                "picker already finished".to_string(),
            ));
        }
        let selection = SelectedLocation::new(latitude, longitude)?;

        let generation = {
            let mut state = self.lock();
            state.selection = Some(selection);
            state.resolved = None;
            state.generation += 1;
            state.resolving = true;
            state.generation
        };

        tracing::debug!(
            "Selected ({}, {}), resolving in background (generation {})",
            latitude,
            longitude,
            generation
        );

        let geocoder = self.geocoder.clone();
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let resolved = geocoder
                .resolve(selection.latitude, selection.longitude)
                .await;
            let mut state = shared.lock().expect("picker state poisoned");
            if state.generation == generation {
                state.resolved = Some(resolved);
                state.resolving = false;
            }
            // Superseded: a newer selection or confirm owns the state now.
        });

        Ok(())
    }

    /// Confirms the current selection and emits the finalized location.
    ///
    /// Disallowed with no selection or while a resolution is in flight; the
    /// host keeps the confirm control disabled based on
    /// [`is_resolving`](Self::is_resolving). Uses the resolution already
    /// cached for the current pair when present, otherwise resolves now
    /// (coordinate fallback included), then invokes the select callback
    /// exactly once and finishes the picker.
    pub async fn confirm(&mut self) -> Result<(), AppError> {
        if self.finished {
            return Err(AppError::BadRequest(
                "picker already finished".to_string(),
            ));
        }

        let (selection, cached, busy) = {
            let state = self.lock();
            (state.selection, state.resolved.clone(), state.resolving)
        };

        let selection = selection
            .ok_or_else(|| AppError::BadRequest("no location selected".to_string()))?;
        if busy {
            return Err(AppError::BadRequest(
                "address resolution in progress".to_string(),
            ));
        }

        let resolved = match cached {
            Some(resolved) => resolved,
            None => {
                let generation = {
                    let mut state = self.lock();
                    state.generation += 1;
                    state.resolving = true;
                    state.generation
                };
                let resolved = self
                    .geocoder
                    .resolve(selection.latitude, selection.longitude)
                    .await;
                let mut state = self.lock();
                if state.generation == generation {
                    state.resolving = false;
                }
                resolved
            }
        };

        self.finish();
        tracing::info!(
            "Location confirmed: ({}, {}) -> {}",
            resolved.latitude,
            resolved.longitude,
            resolved.address
        );
        if let Some(callback) = self.on_select.take() {
            callback(resolved);
        }
        Ok(())
    }

    /// Abandons the flow. Emits nothing; further operations are rejected.
    pub fn close(&mut self) {
        if self.finished {
            return;
        }
        self.finish();
        tracing::debug!("Picker closed without confirmation");
        if let Some(callback) = self.on_close.take() {
            callback();
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PickerState {
        if self.finished {
            return PickerState::Finished;
        }
        let state = self.lock();
        if state.selection.is_none() {
            PickerState::Idle
        } else if state.resolving {
            PickerState::Resolving
        } else if state.resolved.is_some() {
            PickerState::Resolved
        } else {
            PickerState::Selected
        }
    }

    /// The current marker position, if any.
    pub fn selection(&self) -> Option<SelectedLocation> {
        self.lock().selection
    }

    /// Text for the host's "Selected Location" line: the resolved address, or
    /// the coordinates to 4 decimal places while resolution is pending.
    pub fn display_address(&self) -> Option<String> {
        let state = self.lock();
        match (&state.resolved, &state.selection) {
            (Some(resolved), _) => Some(resolved.address.clone()),
            (None, Some(selection)) => {
                Some(fallback_address(selection.latitude, selection.longitude))
            }
            (None, None) => None,
        }
    }

    /// Whether an address resolution is in flight (confirm control disabled).
    pub fn is_resolving(&self) -> bool {
        self.lock().resolving
    }

    /// Whether the picker has been confirmed or closed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Controlled map view state.
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Updates the controlled map view (host reports pan/zoom here).
    pub fn set_view(&mut self, view: ViewState) {
        self.view = view;
    }

    fn finish(&mut self) {
        self.finished = true;
        let mut state = self.lock();
        // Invalidate any in-flight task and drop picker-held location data;
        // ownership of the record has moved to the host (or been abandoned).
        state.generation += 1;
        state.resolving = false;
        state.selection = None;
        state.resolved = None;
    }

    fn lock(&self) -> MutexGuard<'_, PickerShared> {
        self.shared.lock().expect("picker state poisoned")
    }
}
