//! Controller state for the capture-and-classify flow.
//!
//! All transitions go through [`ClassifyState::apply`]. Side effects (sending a
//! request, opening the camera) are never performed here; they are returned as
//! a [`Transition`] and carried out by the component.

use shared::{FacingMode, PredictionResult};
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    File { name: String },
    Snapshot { capture: CaptureTicket },
}

impl ImageSource {
    /// Name sent as the multipart file name.
    pub fn upload_name(&self) -> &str {
        match self {
            ImageSource::File { name } => name,
            ImageSource::Snapshot { .. } => "snapshot.jpg",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub source: ImageSource,
    pub preview_url: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraState {
    #[default]
    Off,
    Starting(FacingMode),
    Live(FacingMode),
    Unavailable,
}

impl CameraState {
    pub fn is_live(self) -> bool {
        matches!(self, CameraState::Live(_))
    }

    /// The `<video>` surface is mounted while a stream is pending or running.
    pub fn shows_video(self) -> bool {
        matches!(self, CameraState::Starting(_) | CameraState::Live(_))
    }
}

/// Sequence number attached to each classification request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sequence number attached to each frame handed to the JPEG encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureTicket(u64);

impl fmt::Display for CaptureTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "capture #{}", self.0)
    }
}

#[derive(Debug)]
pub enum Action {
    ImageSelected {
        source: ImageSource,
        preview_url: String,
    },
    Resubmit,
    PredictionSucceeded {
        ticket: RequestTicket,
        result: PredictionResult,
    },
    PredictionFailed {
        ticket: RequestTicket,
    },
    FacingModeChanged(FacingMode),
    CameraRequested,
    /// The stream that was granted, tagged with the mode it was opened with.
    CameraGranted(FacingMode),
    CameraFailed,
    CameraReleased,
    /// A frame was grabbed and the camera released; encoding starts.
    FrameCaptured,
    SnapshotFailed {
        capture: CaptureTicket,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Render,
    Submit(RequestTicket),
    OpenCamera(FacingMode),
    Encode(CaptureTicket),
}

impl Transition {
    pub fn should_render(self) -> bool {
        !matches!(self, Transition::Unchanged)
    }
}

#[derive(Debug, Default)]
pub struct ClassifyState {
    selection: Option<Selection>,
    result: Option<PredictionResult>,
    request: RequestState,
    latest: Option<RequestTicket>,
    issued: u64,
    facing_mode: FacingMode,
    camera: CameraState,
    pending_capture: Option<CaptureTicket>,
    captures: u64,
}

impl ClassifyState {
    pub fn new(facing_mode: FacingMode) -> Self {
        Self {
            facing_mode,
            ..Self::default()
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn request(&self) -> RequestState {
        self.request
    }

    pub fn facing_mode(&self) -> FacingMode {
        self.facing_mode
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }

    pub fn latest_ticket(&self) -> Option<RequestTicket> {
        self.latest
    }

    pub fn pending_capture(&self) -> Option<CaptureTicket> {
        self.pending_capture
    }

    pub fn apply(&mut self, action: Action) -> Transition {
        match action {
            Action::ImageSelected {
                source,
                preview_url,
            } => {
                if preview_url.is_empty() {
                    return Transition::Unchanged;
                }
                // A snapshot only lands if nothing was selected since its frame was grabbed.
                if let ImageSource::Snapshot { capture } = &source {
                    if self.pending_capture != Some(*capture) {
                        return Transition::Unchanged;
                    }
                }
                self.pending_capture = None;
                self.selection = Some(Selection {
                    source,
                    preview_url,
                });
                Transition::Submit(self.begin_request())
            }
            Action::Resubmit => {
                if self.selection.is_none() {
                    return Transition::Unchanged;
                }
                Transition::Submit(self.begin_request())
            }
            Action::PredictionSucceeded { ticket, result } => {
                if self.latest != Some(ticket) || self.request != RequestState::Loading {
                    return Transition::Unchanged;
                }
                self.result = Some(result);
                self.request = RequestState::Succeeded;
                Transition::Render
            }
            Action::PredictionFailed { ticket } => {
                if self.latest != Some(ticket) || self.request != RequestState::Loading {
                    return Transition::Unchanged;
                }
                self.result = None;
                self.request = RequestState::Failed;
                Transition::Render
            }
            Action::FacingModeChanged(mode) => {
                if self.facing_mode == mode {
                    return Transition::Unchanged;
                }
                self.facing_mode = mode;
                Transition::Render
            }
            Action::CameraRequested => match self.camera {
                CameraState::Starting(_) | CameraState::Live(_) => Transition::Unchanged,
                CameraState::Off | CameraState::Unavailable => {
                    self.camera = CameraState::Starting(self.facing_mode);
                    Transition::OpenCamera(self.facing_mode)
                }
            },
            Action::CameraGranted(granted) => match self.camera {
                CameraState::Starting(mode) if mode == granted => {
                    self.camera = CameraState::Live(mode);
                    Transition::Render
                }
                _ => Transition::Unchanged,
            },
            Action::CameraFailed => {
                self.camera = CameraState::Unavailable;
                Transition::Render
            }
            Action::CameraReleased => {
                if self.camera == CameraState::Off {
                    return Transition::Unchanged;
                }
                self.camera = CameraState::Off;
                Transition::Render
            }
            Action::FrameCaptured => {
                self.captures += 1;
                let capture = CaptureTicket(self.captures);
                self.pending_capture = Some(capture);
                self.camera = CameraState::Off;
                Transition::Encode(capture)
            }
            Action::SnapshotFailed { capture } => {
                if self.pending_capture != Some(capture) {
                    return Transition::Unchanged;
                }
                self.pending_capture = None;
                // Only report a camera problem if the user is not already using it again.
                if self.camera == CameraState::Off {
                    self.camera = CameraState::Unavailable;
                }
                Transition::Render
            }
        }
    }

    fn begin_request(&mut self) -> RequestTicket {
        self.issued += 1;
        let ticket = RequestTicket(self.issued);
        self.latest = Some(ticket);
        self.result = None;
        self.request = RequestState::Loading;
        ticket
    }
}
