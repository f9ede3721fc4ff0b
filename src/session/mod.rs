//! Drawing screen orchestration
//!
//! This module contains:
//! - Screen state (intents, busy flag, the single error message)
//! - The session that runs export and analysis and applies their results
//!
//! Every analysis request is tagged with a generation. Responses from an
//! older generation are discarded, so a request abandoned by `clear` can
//! never overwrite newer results.
//!
//! An analysis is started synchronously and runs as a [`PendingAnalysis`]
//! that owns its input, so gestures and `clear` keep working meanwhile.

pub mod state;

use thiserror::Error;

use crate::api::{AnalysisError, Analyzer};
use crate::capture::{ExportError, PendingExport, PickerError};
use crate::domain::AnalyzeResponse;
use crate::drawing::CanvasHandle;

pub use state::ScreenState;

/// Message shown when a picked image carries no data
pub const NO_IMAGE_DATA: &str = "No image data";

/// Failures of a screen action
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("An analysis is already in progress")]
    Busy,
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Picker(#[from] PickerError),
    #[error("{}", NO_IMAGE_DATA)]
    NoImageData,
}

/// Token identifying one analysis request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    generation: u64,
}

impl AnalysisTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// State and orchestration of the drawing screen
#[derive(Debug, Default)]
pub struct Session {
    state: ScreenState,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Generation of the most recent analysis request
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mark an analysis as in flight
    ///
    /// Clears the previous error. Fails with [`SessionError::Busy`] while
    /// another analysis is pending.
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, SessionError> {
        if self.state.is_analyzing {
            return Err(SessionError::Busy);
        }
        self.state.error_message = None;
        self.state.is_analyzing = true;
        self.generation += 1;
        Ok(AnalysisTicket {
            generation: self.generation,
        })
    }

    /// Apply the outcome of an analysis
    ///
    /// Stale tickets are ignored and return `Ok(())`. A failure replaces the
    /// error message, empties the intents and is handed back to the caller.
    pub fn finish_analysis(
        &mut self,
        ticket: AnalysisTicket,
        result: Result<AnalyzeResponse, SessionError>,
    ) -> Result<(), SessionError> {
        if ticket.generation != self.generation {
            log::debug!(
                "Discarding stale analysis result (generation {}, current {})",
                ticket.generation,
                self.generation
            );
            return Ok(());
        }

        self.state.is_analyzing = false;
        match result {
            Ok(response) => {
                self.state.intents = response.intents;
                Ok(())
            }
            Err(err) => {
                log::warn!("Analysis failed: {}", err);
                self.state.error_message = Some(err.to_string());
                self.state.intents.clear();
                Err(err)
            }
        }
    }

    /// Start analyzing the drawing as it looks right now
    ///
    /// The frame is captured immediately. The returned work borrows neither
    /// the session nor the canvas, so drawing and `clear` stay available
    /// until its result is handed to [`Session::finish_analysis`].
    pub fn start_drawing_analysis<C: CanvasHandle>(
        &mut self,
        canvas: &C,
    ) -> Result<PendingAnalysis, SessionError> {
        let ticket = self.begin_analysis()?;
        Ok(PendingAnalysis {
            ticket,
            source: AnalysisSource::Drawing(canvas.capture()),
        })
    }

    /// Start analyzing an image from the picker
    ///
    /// A cancelled pick changes nothing and yields `Ok(None)`. A permission
    /// denial raises the blocking prompt instead of the error message.
    pub fn start_image_analysis(
        &mut self,
        picked: Result<Option<String>, PickerError>,
    ) -> Result<Option<PendingAnalysis>, SessionError> {
        let image = match picked {
            Ok(Some(image)) => image,
            Ok(None) => return Ok(None),
            Err(err @ PickerError::PermissionDenied(_)) => {
                self.state.error_message = None;
                self.state.permission_prompt = Some(format!(
                    "Permission required: {err}. Allow access to your photos to load images."
                ));
                return Err(err.into());
            }
            Err(err) => {
                self.state.error_message = Some(err.to_string());
                return Err(err.into());
            }
        };

        if image.trim().is_empty() {
            self.state.error_message = Some(NO_IMAGE_DATA.to_string());
            return Err(SessionError::NoImageData);
        }

        let ticket = self.begin_analysis()?;
        Ok(Some(PendingAnalysis {
            ticket,
            source: AnalysisSource::Image(image),
        }))
    }

    /// Export the canvas, analyze it and apply the result
    ///
    /// A failed export leaves the drawing untouched so the user can retry.
    pub async fn analyze_drawing<C, A>(&mut self, canvas: &C, analyzer: &A) -> Result<(), SessionError>
    where
        C: CanvasHandle,
        A: Analyzer,
    {
        let pending = self.start_drawing_analysis(canvas)?;
        let (ticket, result) = pending.run(analyzer).await;
        self.finish_analysis(ticket, result)
    }

    /// Analyze an image from the picker and apply the result
    pub async fn analyze_picked_image<A>(
        &mut self,
        picked: Result<Option<String>, PickerError>,
        analyzer: &A,
    ) -> Result<(), SessionError>
    where
        A: Analyzer,
    {
        let Some(pending) = self.start_image_analysis(picked)? else {
            return Ok(());
        };
        let (ticket, result) = pending.run(analyzer).await;
        self.finish_analysis(ticket, result)
    }

    /// Clear the canvas and everything shown next to it
    ///
    /// A pending analysis is not aborted, but its result becomes stale.
    pub fn clear<C: CanvasHandle>(&mut self, canvas: &mut C) {
        canvas.clear();
        self.state.clear();
        self.generation += 1;
    }

    pub fn dismiss_permission_prompt(&mut self) {
        self.state.permission_prompt = None;
    }
}

enum AnalysisSource {
    Drawing(PendingExport),
    Image(String),
}

/// An analysis started by the session, detached from it
///
/// Run it with an [`Analyzer`] and pass the outcome back to
/// [`Session::finish_analysis`].
pub struct PendingAnalysis {
    ticket: AnalysisTicket,
    source: AnalysisSource,
}

impl PendingAnalysis {
    pub fn ticket(&self) -> AnalysisTicket {
        self.ticket
    }

    /// Encode the image if needed, then call the analyzer
    pub async fn run<A: Analyzer>(
        self,
        analyzer: &A,
    ) -> (AnalysisTicket, Result<AnalyzeResponse, SessionError>) {
        let result = match self.source {
            AnalysisSource::Drawing(export) => analyze_export(export, analyzer).await,
            AnalysisSource::Image(image) => analyzer.analyze(&image).await.map_err(SessionError::from),
        };
        (self.ticket, result)
    }
}

async fn analyze_export<A: Analyzer>(
    export: PendingExport,
    analyzer: &A,
) -> Result<AnalyzeResponse, SessionError> {
    let image = export.encode().await?;
    log::info!("Exported drawing ({} base64 bytes), requesting analysis", image.len());
    Ok(analyzer.analyze(&image).await?)
}
