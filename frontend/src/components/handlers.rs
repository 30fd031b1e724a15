use super::super::{Model, Msg};
use super::utils::first_image_file;
use crate::api::{self, ImageUpload};
use crate::camera::{self, CameraSession, Snapshot};
use crate::config;
use crate::error::ClassifyError;
use crate::state::{Action, CaptureTicket, ImageSource, RequestTicket, Transition};
use gloo_file::{Blob as GlooBlob, File as GlooFile, ObjectUrl};
use shared::PredictionResult;
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, HtmlVideoElement};
use yew::prelude::*;

pub fn handle_file_chosen(model: &mut Model, ctx: &Context<Model>, file: GlooFile) -> bool {
    // A chosen file replaces whatever the camera was about to produce.
    release_camera(model);

    let source = ImageSource::File { name: file.name() };
    let blob: GlooBlob = (*file).clone();
    select_image(model, ctx, source, blob)
}

pub fn handle_snapshot_encoded(
    model: &mut Model,
    ctx: &Context<Model>,
    capture: CaptureTicket,
    blob: GlooBlob,
) -> bool {
    if model.state.pending_capture() != Some(capture) {
        log::warn!("Discarding {}, another image was selected meanwhile", capture);
        return false;
    }
    log::info!("📸 Snapshot encoded ({} bytes)", blob.size());
    select_image(model, ctx, ImageSource::Snapshot { capture }, blob)
}

pub fn handle_snapshot_failed(model: &mut Model, capture: CaptureTicket, err: ClassifyError) -> bool {
    log::error!("❌ Snapshot {} failed ({}): {}", capture, err.kind(), err);
    model
        .state
        .apply(Action::SnapshotFailed { capture })
        .should_render()
}

fn select_image(
    model: &mut Model,
    ctx: &Context<Model>,
    source: ImageSource,
    blob: GlooBlob,
) -> bool {
    let preview = ObjectUrl::from(blob.clone());
    let filename = source.upload_name().to_string();

    let transition = model.state.apply(Action::ImageSelected {
        source,
        preview_url: preview.to_string(),
    });

    if let Transition::Submit(ticket) = transition {
        // Replacing the previous handle revokes its object URL.
        model.preview = Some(preview);
        model.upload = Some(ImageUpload { blob, filename });
        send_prediction_request(model, ctx, ticket);
    }

    transition.should_render()
}

pub fn handle_reclassify(model: &mut Model, ctx: &Context<Model>) -> bool {
    let transition = model.state.apply(Action::Resubmit);
    if let Transition::Submit(ticket) = transition {
        send_prediction_request(model, ctx, ticket);
    }
    transition.should_render()
}

pub fn send_prediction_request(model: &Model, ctx: &Context<Model>, ticket: RequestTicket) {
    let Some(upload) = model.upload.clone() else {
        log::warn!("No image retained for request {}", ticket);
        return;
    };
    let predict_url = model.config.predict_url();

    spawn_local({
        let link = ctx.link().clone();

        async move {
            log::info!("🚀 Sending prediction request {}", ticket);
            match api::submit_image(&predict_url, &upload).await {
                Ok(result) => link.send_message(Msg::PredictionReceived(ticket, result)),
                Err(e) => link.send_message(Msg::PredictionFailed(ticket, e)),
            }
        }
    });
}

pub fn handle_prediction_received(
    model: &mut Model,
    ticket: RequestTicket,
    result: PredictionResult,
) -> bool {
    let summary = format!("{} ({})", result.label, result.confidence_percent());
    let transition = model.state.apply(Action::PredictionSucceeded { ticket, result });

    if transition.should_render() {
        log::info!("✅ Prediction {}: {}", ticket, summary);
    } else {
        log::warn!("Discarding stale response {}: {}", ticket, summary);
    }
    transition.should_render()
}

pub fn handle_prediction_failed(
    model: &mut Model,
    ticket: RequestTicket,
    err: ClassifyError,
) -> bool {
    log::error!("❌ Prediction request {} failed ({}): {}", ticket, err.kind(), err);
    model
        .state
        .apply(Action::PredictionFailed { ticket })
        .should_render()
}

pub fn handle_start_camera(model: &mut Model, ctx: &Context<Model>) -> bool {
    match model.state.apply(Action::CameraRequested) {
        Transition::OpenCamera(facing_mode) => {
            log::info!("📷 Requesting {} camera", facing_mode.label());
            let link = ctx.link().clone();
            spawn_local(async move {
                match camera::open_camera(facing_mode).await {
                    Ok(session) => link.send_message(Msg::CameraReady(session)),
                    Err(e) => link.send_message(Msg::CameraFailed(e)),
                }
            });
            true
        }
        transition => transition.should_render(),
    }
}

pub fn handle_camera_ready(model: &mut Model, session: CameraSession) -> bool {
    let granted = Action::CameraGranted(session.facing_mode());
    if !model.state.apply(granted).should_render() {
        log::info!("Camera granted for a request that is no longer current, releasing");
        return false;
    }

    let Some(video) = model.video_ref.cast::<HtmlVideoElement>() else {
        log::error!("❌ Camera surface is not mounted");
        return model.state.apply(Action::CameraFailed).should_render();
    };

    if let Err(e) = camera::attach(&video, &session) {
        log::error!("❌ Could not show camera stream: {}", e);
        camera::detach(&video);
        return model.state.apply(Action::CameraFailed).should_render();
    }

    log::info!("📷 {} camera live", session.facing_mode().label());
    model.camera = Some(session);
    true
}

pub fn handle_camera_failed(model: &mut Model, err: ClassifyError) -> bool {
    log::error!("❌ Camera unavailable ({}): {}", err.kind(), err);
    model.state.apply(Action::CameraFailed).should_render()
}

pub fn handle_capture_snapshot(model: &mut Model, ctx: &Context<Model>) -> bool {
    let video = model.video_ref.cast::<HtmlVideoElement>();
    let snapshot = camera::take_snapshot(&mut model.camera, &mut model.state, move || {
        let video = video.ok_or_else(|| ClassifyError::Browser {
            context: "frame capture",
            message: "camera surface is not mounted".into(),
        })?;
        let frame = camera::grab_frame(&video);
        camera::detach(&video);
        frame
    });

    match snapshot {
        Snapshot::NoCamera => {
            log::warn!("Capture requested without a live camera");
            false
        }
        Snapshot::Captured(canvas, capture) => {
            let link = ctx.link().clone();
            spawn_local(async move {
                match camera::encode_jpeg(canvas).await {
                    Ok(blob) => {
                        link.send_message(Msg::SnapshotEncoded(capture, GlooBlob::from(blob)))
                    }
                    Err(e) => link.send_message(Msg::SnapshotFailed(capture, e)),
                }
            });
            true
        }
        Snapshot::Failed(e) => {
            log::error!("❌ Could not capture frame: {}", e);
            true
        }
    }
}

pub fn release_camera(model: &mut Model) -> bool {
    if let Some(video) = model.video_ref.cast::<HtmlVideoElement>() {
        camera::detach(&video);
    }
    drop(model.camera.take());
    model.state.apply(Action::CameraReleased).should_render()
}

pub fn handle_toggle_facing_mode(model: &mut Model) -> bool {
    let facing_mode = model.state.facing_mode().toggled();
    config::save_facing_mode(facing_mode);
    model
        .state
        .apply(Action::FacingModeChanged(facing_mode))
        .should_render()
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    let file = event
        .data_transfer()
        .and_then(|data_transfer| data_transfer.files())
        .and_then(|file_list| first_image_file(&file_list));

    if let Some(file) = file {
        handle_file_chosen(model, ctx, file);
    }

    true
}

pub fn handle_paste(model: &mut Model, ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    let file = event
        .clipboard_data()
        .and_then(|data_transfer| data_transfer.files())
        .and_then(|file_list| first_image_file(&file_list));

    match file {
        Some(file) => {
            event.prevent_default();
            handle_file_chosen(model, ctx, file)
        }
        None => false,
    }
}

pub fn handle_teardown(model: &mut Model) {
    release_camera(model);
    model.preview = None;
    model.upload = None;
    model.paste_listener = None;
    model.pagehide_listener = None;
    log::info!("Controller torn down");
}
