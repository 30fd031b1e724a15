//! Camera access: a scoped stream handle plus frame capture helpers.

use crate::error::ClassifyError;
use crate::state::{Action, CaptureTicket, ClassifyState, Transition};
use shared::FacingMode;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack, MediaTrackConstraints,
};

const JPEG_QUALITY: f64 = 0.92;

/// Something holding capture tracks that can be stopped.
pub trait TrackSource {
    /// Stops every track and returns how many were stopped.
    fn stop_all_tracks(&self) -> usize;
}

impl TrackSource for MediaStream {
    fn stop_all_tracks(&self) -> usize {
        let mut stopped = 0;
        for track in self.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
                stopped += 1;
            }
        }
        stopped
    }
}

/// An acquired camera stream. Dropping the session releases the device.
pub struct CameraSession<S: TrackSource = MediaStream> {
    stream: S,
    facing_mode: FacingMode,
}

impl<S: TrackSource> CameraSession<S> {
    pub fn new(stream: S, facing_mode: FacingMode) -> Self {
        Self {
            stream,
            facing_mode,
        }
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn facing_mode(&self) -> FacingMode {
        self.facing_mode
    }
}

impl<S: TrackSource> Drop for CameraSession<S> {
    fn drop(&mut self) {
        let stopped = self.stream.stop_all_tracks();
        log::info!(
            "📷 Released {} camera ({} track(s) stopped)",
            self.facing_mode.label(),
            stopped
        );
    }
}

pub enum Snapshot<T> {
    NoCamera,
    Captured(T, CaptureTicket),
    Failed(ClassifyError),
}

/// Grabs a frame from the live session and releases the camera before
/// returning, whether or not the grab succeeded.
pub fn take_snapshot<S, T, F>(
    slot: &mut Option<CameraSession<S>>,
    state: &mut ClassifyState,
    grab: F,
) -> Snapshot<T>
where
    S: TrackSource,
    F: FnOnce() -> Result<T, ClassifyError>,
{
    let Some(session) = slot.take() else {
        return Snapshot::NoCamera;
    };

    let frame = grab();
    drop(session);

    match frame {
        Ok(frame) => match state.apply(Action::FrameCaptured) {
            Transition::Encode(capture) => Snapshot::Captured(frame, capture),
            _ => Snapshot::NoCamera,
        },
        Err(e) => {
            state.apply(Action::CameraFailed);
            Snapshot::Failed(e)
        }
    }
}

pub async fn open_camera(facing_mode: FacingMode) -> Result<CameraSession, ClassifyError> {
    let window = web_sys::window()
        .ok_or_else(|| ClassifyError::CameraUnavailable("no window".into()))?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(ClassifyError::camera)?;

    let video = MediaTrackConstraints::new();
    video.set_facing_mode(&JsValue::from_str(facing_mode.as_ref()));

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video);
    constraints.set_audio(&JsValue::FALSE);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(ClassifyError::camera)?;
    let stream = JsFuture::from(promise)
        .await
        .map_err(ClassifyError::camera)?
        .dyn_into::<MediaStream>()
        .map_err(ClassifyError::camera)?;

    Ok(CameraSession::new(stream, facing_mode))
}

pub fn attach(video: &HtmlVideoElement, session: &CameraSession) -> Result<(), ClassifyError> {
    video.set_src_object(Some(session.stream()));
    // Autoplay normally starts the stream; the promise only reports blocked playback.
    let playback = video
        .play()
        .map_err(|e| ClassifyError::browser("video playback", e))?;
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = JsFuture::from(playback).await {
            log::warn!("Video playback was interrupted: {:?}", e);
        }
    });
    Ok(())
}

pub fn detach(video: &HtmlVideoElement) {
    video.set_src_object(None);
}

/// Copies the current video frame onto a fresh canvas.
pub fn grab_frame(video: &HtmlVideoElement) -> Result<HtmlCanvasElement, ClassifyError> {
    let (width, height) = (video.video_width(), video.video_height());
    if width == 0 || height == 0 {
        return Err(ClassifyError::Browser {
            context: "frame capture",
            message: "video has no frame yet".into(),
        });
    }

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ClassifyError::Browser {
            context: "frame capture",
            message: "no document".into(),
        })?;
    let canvas = document
        .create_element("canvas")
        .map_err(|e| ClassifyError::browser("create canvas", e))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|e| ClassifyError::browser("create canvas", e.into()))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context = canvas
        .get_context("2d")
        .map_err(|e| ClassifyError::browser("canvas context", e))?
        .ok_or_else(|| ClassifyError::Browser {
            context: "canvas context",
            message: "2d context unavailable".into(),
        })?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|e| ClassifyError::browser("canvas context", e.into()))?;
    context
        .draw_image_with_html_video_element(video, 0.0, 0.0)
        .map_err(|e| ClassifyError::browser("draw frame", e))?;

    Ok(canvas)
}

pub async fn encode_jpeg(canvas: HtmlCanvasElement) -> Result<web_sys::Blob, ClassifyError> {
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let on_blob = Closure::once_into_js(move |blob: JsValue| {
            let _ = resolve.call1(&JsValue::NULL, &blob);
        });
        if let Err(e) = canvas.to_blob_with_type_and_encoder_options(
            on_blob.unchecked_ref(),
            "image/jpeg",
            &JsValue::from_f64(JPEG_QUALITY),
        ) {
            let _ = reject.call1(&JsValue::NULL, &e);
        }
    });

    let value = JsFuture::from(promise)
        .await
        .map_err(|e| ClassifyError::browser("jpeg encode", e))?;
    if value.is_null() {
        return Err(ClassifyError::Browser {
            context: "jpeg encode",
            message: "canvas produced no image".into(),
        });
    }
    value
        .dyn_into::<web_sys::Blob>()
        .map_err(|e| ClassifyError::browser("jpeg encode", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CameraState;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeStream {
        tracks: usize,
        stop_calls: Rc<Cell<usize>>,
    }

    impl TrackSource for FakeStream {
        fn stop_all_tracks(&self) -> usize {
            self.stop_calls.set(self.stop_calls.get() + 1);
            self.tracks
        }
    }

    fn session(tracks: usize) -> (CameraSession<FakeStream>, Rc<Cell<usize>>) {
        let stop_calls = Rc::new(Cell::new(0));
        let stream = FakeStream {
            tracks,
            stop_calls: Rc::clone(&stop_calls),
        };
        (CameraSession::new(stream, FacingMode::User), stop_calls)
    }

    #[test]
    fn dropping_session_stops_tracks_once() {
        let (session, stop_calls) = session(2);
        assert_eq!(session.facing_mode(), FacingMode::User);
        assert_eq!(stop_calls.get(), 0);

        drop(session);
        assert_eq!(stop_calls.get(), 1);
    }

    fn live_state() -> ClassifyState {
        let mut state = ClassifyState::default();
        state.apply(Action::CameraRequested);
        state.apply(Action::CameraGranted(FacingMode::Environment));
        assert!(state.camera().is_live());
        state
    }

    #[test]
    fn snapshot_stops_tracks_after_grabbing_the_frame() {
        let (session, stop_calls) = session(2);
        let mut slot = Some(session);
        let mut state = live_state();

        let outcome = take_snapshot(&mut slot, &mut state, || {
            assert_eq!(stop_calls.get(), 0);
            Ok("frame")
        });

        assert_eq!(stop_calls.get(), 1);
        assert!(slot.is_none());
        assert_eq!(state.camera(), CameraState::Off);
        match outcome {
            Snapshot::Captured(frame, capture) => {
                assert_eq!(frame, "frame");
                assert_eq!(state.pending_capture(), Some(capture));
            }
            _ => panic!("expected a captured frame"),
        }
    }

    #[test]
    fn snapshot_stops_tracks_when_the_grab_fails() {
        let (session, stop_calls) = session(1);
        let mut slot = Some(session);
        let mut state = live_state();

        let outcome = take_snapshot(&mut slot, &mut state, || -> Result<(), _> {
            Err(ClassifyError::Browser {
                context: "frame capture",
                message: "video has no frame yet".into(),
            })
        });

        assert_eq!(stop_calls.get(), 1);
        assert!(slot.is_none());
        assert!(!state.camera().is_live());
        assert_eq!(state.camera(), CameraState::Unavailable);
        assert_eq!(state.pending_capture(), None);
        assert!(matches!(outcome, Snapshot::Failed(ClassifyError::Browser { .. })));
    }

    #[test]
    fn snapshot_without_camera_does_not_grab() {
        let mut slot: Option<CameraSession<FakeStream>> = None;
        let mut state = ClassifyState::default();
        let grabbed = Cell::new(false);

        let outcome = take_snapshot(&mut slot, &mut state, || {
            grabbed.set(true);
            Ok(())
        });

        assert!(matches!(outcome, Snapshot::NoCamera));
        assert!(!grabbed.get());
        assert_eq!(state.pending_capture(), None);
    }

    #[test]
    fn replacing_session_releases_the_previous_one() {
        let (first, first_calls) = session(1);
        let (second, second_calls) = session(1);
        let mut slot = Some(first);
        assert!(slot.is_some());

        slot = Some(second);

        assert_eq!(first_calls.get(), 1);
        assert_eq!(second_calls.get(), 0);
        drop(slot);
        assert_eq!(second_calls.get(), 1);
    }
}
