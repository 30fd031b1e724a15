use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("network error: {0}")]
    Network(#[from] gloo_net::Error),

    #[error("server error: {status} - {body}")]
    Server { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{context}: {message}")]
    Browser { context: &'static str, message: String },
}

impl ClassifyError {
    /// Wraps a rejected browser call, keeping the JS error text readable.
    pub fn browser(context: &'static str, value: JsValue) -> Self {
        ClassifyError::Browser {
            context,
            message: describe_js(&value),
        }
    }

    pub fn camera(value: JsValue) -> Self {
        ClassifyError::CameraUnavailable(describe_js(&value))
    }

    /// Short category name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifyError::CameraUnavailable(_) => "camera",
            ClassifyError::Network(_) => "network",
            ClassifyError::Server { .. } => "server",
            ClassifyError::Decode(_) => "decode",
            ClassifyError::Browser { .. } => "browser",
        }
    }
}

fn describe_js(value: &JsValue) -> String {
    if let Some(exception) = value.dyn_ref::<web_sys::DomException>() {
        return format!("{}: {}", exception.name(), exception.message());
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
