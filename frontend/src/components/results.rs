use super::super::Model;
use crate::state::RequestState;
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    match (model.state.request(), model.state.result()) {
        (RequestState::Succeeded, Some(result)) => {
            let percent = result.confidence_percent().0.clamp(0, 100);

            html! {
                <div class="results-container">
                    <h2>{"Prediction:"}</h2>
                    <p class="result-class">{ result.class_line() }</p>
                    <div class="confidence-meter">
                        <div class="meter">
                            <div class="meter-fill" style={format!("width: {}%", percent)}></div>
                        </div>
                    </div>
                    <p class="result-confidence">{ result.confidence_line() }</p>
                </div>
            }
        }
        (RequestState::Failed, _) => html! {
            <p class="no-results-message">{"Classification failed. Try another image."}</p>
        },
        _ => html! {},
    }
}
