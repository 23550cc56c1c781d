//! The capture flow state machine.
//!
//! ```text
//! Selecting --start_capture--> Capturing --capture (Some)--> Previewing
//!                                  ^                           |  |  |
//!                                  +---------- retake ---------+  |  +-- accept --> Confirmed
//!                                                                 |
//!                               begin_analysis / finish_analysis  v
//!                                   Previewing <-- failure -- Analyzing -- success --> Result
//! ```
//!
//! `back_to_selection` is available from every state. The camera is held only
//! while `Capturing`.

use std::sync::Arc;

use ds_analysis::{AnalysisError, AnalysisPipeline, ComparisonPair, VisionModel};
use ds_capture::{CaptureDevice, CaptureSession, SessionState};
use ds_config::DsConfig;
use ds_core::{AnalysisResult, CoreError, FlowState, Period, Sector, StillImage, StorageLayout};
use ds_storage::{Baseline, BaselineResolver, ImageStore, commit_message};

use crate::error::{FlowError, FlowNotice};

/// Settings fixed for the lifetime of a flow.
#[derive(Debug, Clone)]
pub struct FlowOptions {
    pub layout: StorageLayout,
    /// Refuse `start_capture` when the selected baseline is missing.
    pub require_baseline: bool,
    /// The period new photos are stored under.
    pub current: Period,
}

impl FlowOptions {
    pub fn from_config(config: &DsConfig, current: Period) -> Self {
        Self {
            layout: config.layout(),
            require_baseline: config.general.require_baseline,
            current,
        }
    }
}

/// The chosen sector and what was found to compare it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub sector: Sector,
    pub baseline: Baseline,
}

/// Whether a finished analysis was applied to the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    /// The flow moved on while the analysis was in flight; the result was dropped.
    Stale,
}

/// An analysis started by [`CaptureFlow::begin_analysis`].
///
/// Running the ticket does not borrow the flow, so the user can navigate away
/// while it is in flight. `run` consumes the ticket, so each one reaches the
/// model at most once. Hand the generation and outcome back through
/// [`CaptureFlow::finish_analysis`]; the generation check drops it if the flow
/// has moved on.
#[derive(Debug)]
pub struct AnalysisTicket<M> {
    generation: u64,
    pair: ComparisonPair,
    pipeline: Arc<AnalysisPipeline<M>>,
    // Held until the run completes or the ticket is dropped.
    _slot: Arc<()>,
}

impl<M: VisionModel> AnalysisTicket<M> {
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the comparison under the pipeline's deadline.
    ///
    /// Returns the ticket's generation alongside the outcome.
    pub async fn run(self) -> (u64, Result<AnalysisResult, AnalysisError>) {
        let outcome = self.pipeline.analyze(&self.pair).await;
        (self.generation, outcome)
    }
}

pub struct CaptureFlow<D: CaptureDevice, S, M> {
    session: CaptureSession<D>,
    store: S,
    pipeline: Arc<AnalysisPipeline<M>>,
    options: FlowOptions,
    state: FlowState,
    selection: Option<Selection>,
    still: Option<StillImage>,
    result: Option<AnalysisResult>,
    generation: u64,
    // One clone per outstanding ticket.
    slot: Arc<()>,
    notice: Option<FlowNotice>,
}

impl<D: CaptureDevice, S, M> std::fmt::Debug for CaptureFlow<D, S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureFlow")
            .field("state", &self.state)
            .field("selection", &self.selection)
            .field("still", &self.still)
            .field("generation", &self.generation)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

impl<D, S, M> CaptureFlow<D, S, M>
where
    D: CaptureDevice,
    S: ImageStore,
    M: VisionModel,
{
    pub fn new(device: D, store: S, pipeline: AnalysisPipeline<M>, options: FlowOptions) -> Self {
        Self {
            session: CaptureSession::new(device),
            store,
            pipeline: Arc::new(pipeline),
            options,
            state: FlowState::Selecting,
            selection: None,
            still: None,
            result: None,
            generation: 0,
            slot: Arc::new(()),
            notice: None,
        }
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub const fn state(&self) -> FlowState {
        self.state
    }

    pub const fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub const fn still(&self) -> Option<&StillImage> {
        self.still.as_ref()
    }

    pub const fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// The most recent failure, cleared by the next successful action.
    pub const fn notice(&self) -> Option<&FlowNotice> {
        self.notice.as_ref()
    }

    pub const fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    /// Whether a ticket from an earlier `begin_analysis` has not finished running.
    pub fn analysis_outstanding(&self) -> bool {
        Arc::strong_count(&self.slot) > 1
    }

    /// Whether "analyze" is offered: a still is pending and a baseline exists.
    pub fn can_analyze(&self) -> bool {
        self.state == FlowState::Previewing
            && self.still.is_some()
            && self
                .selection
                .as_ref()
                .is_some_and(|s| s.baseline.is_available())
    }

    // ── Actions ────────────────────────────────────────────────────

    /// Choose a sector and resolve its baseline, by default last month's photo.
    ///
    /// # Errors
    ///
    /// Storage transport failures; the flow stays in `Selecting` with no selection.
    pub async fn select(
        &mut self,
        sector: Sector,
        period: Option<Period>,
    ) -> Result<&Selection, FlowError> {
        self.require("select a sector", &[FlowState::Selecting])?;

        let resolver = BaselineResolver::new(&self.store, &self.options.layout);
        let resolved = resolver
            .resolve_or_previous(&sector, period, self.options.current)
            .await;
        let baseline = match resolved {
            Ok(baseline) => baseline,
            Err(e) => {
                self.selection = None;
                return Err(self.fail(e.into()));
            }
        };

        tracing::info!(
            %sector,
            period = %baseline.period(),
            available = baseline.is_available(),
            "sector selected"
        );
        self.notice = None;
        Ok(&*self.selection.insert(Selection { sector, baseline }))
    }

    /// Acquire the camera.
    ///
    /// # Errors
    ///
    /// Fails without a selection, when a required baseline is missing, or when
    /// the device cannot be acquired. The flow stays in `Selecting`.
    pub async fn start_capture(&mut self) -> Result<(), FlowError> {
        self.require("start capturing", &[FlowState::Selecting])?;

        let blocked = match &self.selection {
            None => Some(FlowError::NoSelection),
            Some(s) if self.options.require_baseline && !s.baseline.is_available() => {
                Some(FlowError::BaselineRequired {
                    sector: s.sector.clone(),
                    period: s.baseline.period(),
                })
            }
            Some(_) => None,
        };
        if let Some(err) = blocked {
            return Err(self.fail(err));
        }

        if let Err(e) = self.session.start().await {
            return Err(self.fail(e.into()));
        }
        self.notice = None;
        self.transition(FlowState::Capturing)
    }

    /// Take a still. Returns `false`, leaving the flow in `Capturing`, when the
    /// camera has no frame yet.
    ///
    /// # Errors
    ///
    /// Only when called outside `Capturing`.
    pub async fn capture(&mut self) -> Result<bool, FlowError> {
        self.require("capture", &[FlowState::Capturing])?;

        let Some(still) = self.session.capture().await else {
            tracing::debug!("no frame available yet");
            return Ok(false);
        };
        self.session.stop();
        self.still = Some(still);
        self.result = None;
        self.transition(FlowState::Previewing)?;
        Ok(true)
    }

    /// Discard the pending still and go back to the live camera.
    ///
    /// The camera is acquired before the still is discarded, so a failed
    /// acquisition leaves the still in place.
    ///
    /// # Errors
    ///
    /// Device acquisition failures.
    pub async fn retake(&mut self) -> Result<(), FlowError> {
        self.require("retake", &[FlowState::Previewing, FlowState::Result])?;

        if let Err(e) = self.session.start().await {
            return Err(self.fail(e.into()));
        }
        self.still = None;
        self.result = None;
        self.notice = None;
        self.transition(FlowState::Capturing)
    }

    /// Store the pending still as this period's photo of the sector.
    ///
    /// Returns the storage path written.
    ///
    /// # Errors
    ///
    /// Storage failures; the flow stays where it was and keeps the still.
    pub async fn accept(&mut self) -> Result<String, FlowError> {
        self.require("accept", &[FlowState::Previewing, FlowState::Result])?;

        let (Some(selection), Some(still)) = (&self.selection, &self.still) else {
            return Err(self.fail(FlowError::NoStill));
        };
        let sector = selection.sector.clone();
        let period = self.options.current;
        let path = self.options.layout.path_for(&sector, period);
        let message = commit_message(&sector, period);

        let written = self.store.write(&path, still.bytes(), &message).await;
        if let Err(e) = written {
            return Err(self.fail(e.into()));
        }

        tracing::info!(%sector, %period, path, "photo stored");
        self.notice = None;
        self.transition(FlowState::Confirmed)?;
        Ok(path)
    }

    /// Start analyzing the pending still against the baseline.
    ///
    /// Everything that can be checked locally is checked before the flow
    /// enters `Analyzing`, so a rejected request never reaches the network.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::MissingImage`] when there is no baseline,
    /// [`AnalysisError::MissingCredential`] when no API key is configured,
    /// [`FlowError::AnalysisInFlight`] while an abandoned ticket is still
    /// running. At most one request is in flight per flow.
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket<M>, FlowError> {
        self.require("analyze", &[FlowState::Previewing])?;
        if self.analysis_outstanding() {
            return Err(self.fail(FlowError::AnalysisInFlight));
        }

        let baseline = self
            .selection
            .as_ref()
            .and_then(|s| s.baseline.image())
            .map(|image| image.bytes.clone());
        let capture = self.still.as_ref().map(|s| s.bytes().to_vec());
        let pair = match ComparisonPair::from_parts(baseline, capture) {
            Ok(pair) => pair,
            Err(e) => return Err(self.fail(e.into())),
        };
        if let Err(e) = self.pipeline.check_ready() {
            return Err(self.fail(e.into()));
        }

        self.generation += 1;
        self.transition(FlowState::Analyzing)?;
        tracing::debug!(generation = self.generation, "analysis started");
        Ok(AnalysisTicket {
            generation: self.generation,
            pair,
            pipeline: Arc::clone(&self.pipeline),
            _slot: Arc::clone(&self.slot),
        })
    }

    /// Apply the outcome returned by [`AnalysisTicket::run`].
    ///
    /// An outcome from an abandoned analysis is [`Delivery::Stale`] and changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// The analysis failure itself; the flow returns to `Previewing` with the
    /// still intact.
    pub fn finish_analysis(
        &mut self,
        generation: u64,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Result<Delivery, FlowError> {
        if self.state != FlowState::Analyzing || generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                state = %self.state,
                "discarding stale analysis result"
            );
            return Ok(Delivery::Stale);
        }

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.notice = None;
                self.transition(FlowState::Result)?;
                Ok(Delivery::Applied)
            }
            Err(e) => {
                self.transition(FlowState::Previewing)?;
                Err(self.fail(e.into()))
            }
        }
    }

    /// Begin, run and finish an analysis in one call.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_analysis`] and [`Self::finish_analysis`].
    pub async fn analyze(&mut self) -> Result<&AnalysisResult, FlowError> {
        let (generation, outcome) = self.begin_analysis()?.run().await;
        self.finish_analysis(generation, outcome)?;
        self.result.as_ref().ok_or(FlowError::InvalidAction {
            action: "read the analysis",
            state: self.state,
        })
    }

    /// Stop waiting for an in-flight analysis. Its result will be discarded.
    ///
    /// The abandoned ticket keeps the flow from starting another analysis
    /// until it has finished running or been dropped.
    ///
    /// # Errors
    ///
    /// Only when no analysis is in flight.
    pub fn abandon_analysis(&mut self) -> Result<(), FlowError> {
        self.require("abandon analysis", &[FlowState::Analyzing])?;
        self.generation += 1;
        tracing::debug!(generation = self.generation, "analysis abandoned");
        self.transition(FlowState::Previewing)
    }

    /// Leave the current sector: release the camera and drop all pending state.
    pub fn back_to_selection(&mut self) {
        self.session.stop();
        self.generation += 1;
        self.selection = None;
        self.still = None;
        self.result = None;
        if self.state != FlowState::Selecting {
            tracing::debug!(from = %self.state, "back to selection");
            self.state = FlowState::Selecting;
        }
    }

    // ── Internals ──────────────────────────────────────────────────

    fn require(&mut self, action: &'static str, allowed: &[FlowState]) -> Result<(), FlowError> {
        if allowed.contains(&self.state) {
            return Ok(());
        }
        let err = FlowError::InvalidAction {
            action,
            state: self.state,
        };
        Err(self.fail(err))
    }

    fn transition(&mut self, next: FlowState) -> Result<(), FlowError> {
        if !self.state.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            }
            .into());
        }
        tracing::debug!(from = %self.state, to = %next, "flow transition");
        self.state = next;
        Ok(())
    }

    fn fail(&mut self, error: FlowError) -> FlowError {
        tracing::warn!(state = %self.state, kind = %error.kind(), error = %error, "flow action failed");
        self.notice = Some(FlowNotice::from(&error));
        error
    }
}
