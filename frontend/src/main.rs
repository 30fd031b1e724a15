mod api;
mod camera;
mod components;
mod config;
mod error;
mod state;

use api::ImageUpload;
use camera::CameraSession;
use components::{camera_panel, handlers, header, preview_area, results, upload_section};
use config::AppConfig;
use error::ClassifyError;
use gloo_events::EventListener;
use gloo_file::{Blob as GlooBlob, File as GlooFile, ObjectUrl};
use shared::PredictionResult;
use state::{CaptureTicket, ClassifyState, RequestTicket};
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

// Yew msg components
enum Msg {
    // Image acquisition
    FileChosen(GlooFile),
    SnapshotEncoded(CaptureTicket, GlooBlob),
    SnapshotFailed(CaptureTicket, ClassifyError),

    // Camera
    StartCamera,
    CameraReady(CameraSession),
    CameraFailed(ClassifyError),
    CaptureSnapshot,
    CloseCamera,
    ToggleFacingMode,

    // Classification
    Reclassify,
    PredictionReceived(RequestTicket, PredictionResult),
    PredictionFailed(RequestTicket, ClassifyError),

    // Input events
    SetDragging(bool),
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

// Main component
struct Model {
    state: ClassifyState,
    config: AppConfig,
    preview: Option<ObjectUrl>,
    upload: Option<ImageUpload>,
    camera: Option<CameraSession>,
    video_ref: NodeRef,
    is_dragging: bool,
    paste_listener: Option<EventListener>,
    pagehide_listener: Option<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = AppConfig::load();
        let mut model = Self {
            state: ClassifyState::new(config.facing_mode),
            config,
            preview: None,
            upload: None,
            camera: None,
            video_ref: NodeRef::default(),
            is_dragging: false,
            paste_listener: None,
            pagehide_listener: None,
        };

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            model.paste_listener = Some(EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            }));

            // Navigating away must not leave the camera running.
            let link = ctx.link().clone();
            model.pagehide_listener = Some(EventListener::new(&window, "pagehide", move |_| {
                link.send_message(Msg::CloseCamera);
            }));
        }

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Image acquisition
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, ctx, file),
            Msg::SnapshotEncoded(capture, blob) => {
                handlers::handle_snapshot_encoded(self, ctx, capture, blob)
            }
            Msg::SnapshotFailed(capture, err) => handlers::handle_snapshot_failed(self, capture, err),

            // Camera
            Msg::StartCamera => handlers::handle_start_camera(self, ctx),
            Msg::CameraReady(session) => handlers::handle_camera_ready(self, session),
            Msg::CameraFailed(err) => handlers::handle_camera_failed(self, err),
            Msg::CaptureSnapshot => handlers::handle_capture_snapshot(self, ctx),
            Msg::CloseCamera => handlers::release_camera(self),
            Msg::ToggleFacingMode => handlers::handle_toggle_facing_mode(self),

            // Classification
            Msg::Reclassify => handlers::handle_reclassify(self, ctx),
            Msg::PredictionReceived(ticket, result) => {
                handlers::handle_prediction_received(self, ticket, result)
            }
            Msg::PredictionFailed(ticket, err) => {
                handlers::handle_prediction_failed(self, ticket, err)
            }

            // Input events
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { header::render_header() }

                <main class="main-content">
                { upload_section::render_upload_section(self, ctx) }
                { camera_panel::render_camera_panel(self, ctx) }
                { preview_area::render_preview_area(self, ctx) }
                { results::render_results(self) }
                </main>

                <footer class="app-footer">
                    <p>{"Capture & Classify | Rust WASM"}</p>
                </footer>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        handlers::handle_teardown(self);
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
