use super::super::Model;
use super::super::Msg;
use super::utils::{debounce, first_image_file};
use crate::state::CameraState;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <div class="upload-section">
            { render_file_input_area(model, ctx) }
            { render_camera_controls(model, ctx) }
        </div>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let handle_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().as_ref().and_then(first_image_file);

        input.set_value("");

        file.map(Msg::FileChosen)
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_: ()| {
        if let Some(input) = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id("file-input"))
        {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
            />

            <button
                id="upload-button"
                class="analyze-btn"
                aria-label="upload picture"
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <i class="fa-solid fa-upload"></i> {" Choose Image"}
            </button>

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop an image here, paste, or click"}</p>
                </div>
            </div>
        </>
    }
}

fn render_camera_controls(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let camera = model.state.camera();
    let facing_mode = model.state.facing_mode();

    html! {
        <div class="camera-controls">
            <button
                id="camera-button"
                class="analyze-btn"
                disabled={camera.shows_video()}
                onclick={link.callback(|_| Msg::StartCamera)}
            >
                <i class="fa-solid fa-video"></i>{ format!(" Open {} camera", facing_mode.label()) }
            </button>
            <button
                class="analyze-btn facing-toggle"
                title="Used the next time the camera opens"
                onclick={link.callback(|_| Msg::ToggleFacingMode)}
            >
                <i class="fa-solid fa-rotate"></i>{ format!(" Switch to {}", facing_mode.toggled().label()) }
            </button>
            {
                if camera == CameraState::Unavailable {
                    html! {
                        <div class="error-message">
                            <i class="fa-solid fa-circle-exclamation"></i>
                            <p>{"Could not use the camera."}</p>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
