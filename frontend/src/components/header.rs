use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-camera"></i> {" Image Classification"}</h1>
            <p class="subtitle">{"Choose a photo, drop or paste one, or take a snapshot"}</p>
        </header>
    }
}
