use super::super::Model;
use super::super::Msg;
use yew::prelude::*;

pub fn render_camera_panel(model: &Model, ctx: &Context<Model>) -> Html {
    let camera = model.state.camera();
    if !camera.shows_video() {
        return html! {};
    }

    let link = ctx.link();
    let live = camera.is_live();

    html! {
        <div id="camera-panel" class="camera-panel">
            <video
                ref={model.video_ref.clone()}
                id="camera-feed"
                autoplay=true
                playsinline=true
                muted=true
            />
            {
                if live {
                    html! {}
                } else {
                    html! {
                        <p class="camera-status">
                            <i class="fa-solid fa-spinner fa-spin"></i>{" Waiting for camera..."}
                        </p>
                    }
                }
            }
            <div class="button-container">
                <button
                    id="capture-button"
                    class="analyze-btn"
                    disabled={!live}
                    onclick={link.callback(|_| Msg::CaptureSnapshot)}
                >
                    <i class="fa-solid fa-camera"></i>{" Capture"}
                </button>
                <button
                    class="analyze-btn"
                    style="background-color: var(--danger-color);"
                    onclick={link.callback(|_| Msg::CloseCamera)}
                >
                    <i class="fa-solid fa-times"></i>{" Close"}
                </button>
            </div>
        </div>
    }
}
