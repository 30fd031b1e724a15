use super::super::{Model, Msg};
use super::utils::debounce;
use crate::state::{ImageSource, RequestState};
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(selection) = model.state.selection() else {
        return html! {};
    };

    let link = ctx.link().clone();
    let loading = model.state.request() == RequestState::Loading;
    let alt = match &selection.source {
        ImageSource::File { name } => name.clone(),
        ImageSource::Snapshot { .. } => "Camera snapshot".to_string(),
    };

    html! {
        <div id="preview-container">
            <img id="actual-image-preview" src={selection.preview_url.clone()} alt={alt} />
            {
                if loading {
                    html! {
                        <div class="loading-preview">
                            <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            <div class="button-container">
                <button
                    class="analyze-btn"
                    disabled={loading}
                    onclick={debounce(300, move || link.send_message(Msg::Reclassify))}
                >
                    { render_classify_button_content(loading) }
                </button>
            </div>
        </div>
    }
}

fn render_classify_button_content(loading: bool) -> Html {
    if loading {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Classifying..."}</> }
    } else {
        html! { <><i class="fa-solid fa-magnifying-glass"></i>{" Classify again"}</> }
    }
}
