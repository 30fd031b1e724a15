use gloo_storage::{LocalStorage, Storage};
use shared::FacingMode;
use web_sys::UrlSearchParams;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

const API_BASE_KEY: &str = "classify_api_base";
const FACING_MODE_KEY: &str = "camera_facing_mode";
const API_QUERY_PARAM: &str = "api";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base: String,
    pub facing_mode: FacingMode,
}

impl AppConfig {
    /// Reads the endpoint from `?api=`, then local storage, then the
    /// `CLASSIFY_API_BASE` build variable.
    pub fn load() -> Self {
        let from_query = query_param(API_QUERY_PARAM);
        let stored = LocalStorage::get::<String>(API_BASE_KEY).ok();
        let api_base = resolve_api_base(
            from_query.as_deref(),
            stored.as_deref(),
            option_env!("CLASSIFY_API_BASE"),
        );

        if from_query.is_some() {
            if let Err(e) = LocalStorage::set(API_BASE_KEY, &api_base) {
                log::warn!("Could not persist endpoint override: {}", e);
            }
        }

        let facing_mode = LocalStorage::get::<FacingMode>(FACING_MODE_KEY).unwrap_or_default();

        log::info!("Classification endpoint: {}", predict_url(&api_base));
        Self {
            api_base,
            facing_mode,
        }
    }

    pub fn predict_url(&self) -> String {
        predict_url(&self.api_base)
    }
}

pub fn save_facing_mode(mode: FacingMode) {
    if let Err(e) = LocalStorage::set(FACING_MODE_KEY, mode) {
        log::warn!("Could not persist facing mode: {}", e);
    }
}

pub fn resolve_api_base(
    from_query: Option<&str>,
    stored: Option<&str>,
    built_in: Option<&str>,
) -> String {
    [from_query, stored, built_in]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(DEFAULT_API_BASE)
        .trim_end_matches('/')
        .to_string()
}

pub fn predict_url(api_base: &str) -> String {
    format!("{}/predict", api_base.trim_end_matches('/'))
}

fn query_param(name: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    UrlSearchParams::new_with_str(&search).ok()?.get(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("https://query.example"), Some("https://stored.example"), Some("https://build.example"), "https://query.example")]
    #[case(None, Some("https://stored.example"), Some("https://build.example"), "https://stored.example")]
    #[case(Some("   "), Some("https://stored.example"), None, "https://stored.example")]
    #[case(None, None, Some("https://build.example/"), "https://build.example")]
    #[case(None, None, None, DEFAULT_API_BASE)]
    fn endpoint_precedence(
        #[case] from_query: Option<&str>,
        #[case] stored: Option<&str>,
        #[case] built_in: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(resolve_api_base(from_query, stored, built_in), expected);
    }

    #[rstest]
    #[case("http://localhost:8000", "http://localhost:8000/predict")]
    #[case("https://abc.ngrok-free.app/", "https://abc.ngrok-free.app/predict")]
    #[case("https://host/api//", "https://host/api/predict")]
    fn predict_url_has_single_slash(#[case] base: &str, #[case] expected: &str) {
        assert_eq!(predict_url(base), expected);
    }
}
