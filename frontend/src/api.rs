use crate::error::ClassifyError;
use gloo_file::Blob;
use gloo_net::http::Request;
use shared::PredictionResult;

/// Multipart field the classification service reads the image from.
pub const UPLOAD_FIELD: &str = "file";

/// Image bytes retained for (re)submission.
#[derive(Clone)]
pub struct ImageUpload {
    pub blob: Blob,
    pub filename: String,
}

pub async fn submit_image(
    predict_url: &str,
    upload: &ImageUpload,
) -> Result<PredictionResult, ClassifyError> {
    let form_data =
        web_sys::FormData::new().map_err(|e| ClassifyError::browser("form data", e))?;
    let blob = web_sys::Blob::from(upload.blob.clone());
    form_data
        .append_with_blob_and_filename(UPLOAD_FIELD, &blob, &upload.filename)
        .map_err(|e| ClassifyError::browser("form data", e))?;

    log::info!(
        "Uploading {} ({} bytes) to {}",
        upload.filename,
        upload.blob.size(),
        predict_url
    );
    let response = Request::post(predict_url).body(form_data)?.send().await?;

    let status = response.status();
    read_prediction(status, response.text().await)
}

/// Turns a finished response into a prediction. A body that could not be read
/// on a 2xx response is a transport failure, not a decode one.
pub fn read_prediction(
    status: u16,
    body: Result<String, gloo_net::Error>,
) -> Result<PredictionResult, ClassifyError> {
    if !(200..300).contains(&status) {
        return Err(ClassifyError::Server {
            status,
            body: body.unwrap_or_default(),
        });
    }
    parse_prediction(&body?)
}

pub fn parse_prediction(body: &str) -> Result<PredictionResult, ClassifyError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prediction_body() {
        let result = parse_prediction(r#"{"class": "cat", "confidence": 0.87}"#).unwrap();
        assert_eq!(result.label, "cat");
        assert_eq!(result.confidence_line(), "Confidence: 87%");
    }

    #[test]
    fn ignores_extra_fields() {
        let body = r#"{"class": "tabby", "confidence": 0.5, "model": "resnet50"}"#;
        assert_eq!(parse_prediction(body).unwrap().label, "tabby");
    }

    #[test]
    fn unreadable_body_is_a_network_error() {
        let body = Err(gloo_net::Error::GlooError("stream closed".into()));
        let err = read_prediction(200, body).unwrap_err();
        assert_eq!(err.kind(), "network");
    }

    #[test]
    fn non_success_status_is_a_server_error() {
        let err = read_prediction(503, Ok("model warming up".into())).unwrap_err();
        assert_eq!(err.to_string(), "server error: 503 - model warming up");

        let err = read_prediction(500, Err(gloo_net::Error::GlooError("reset".into()))).unwrap_err();
        assert_eq!(err.kind(), "server");
    }

    #[test]
    fn success_status_decodes_body() {
        let body = Ok(r#"{"class": "cat", "confidence": 0.87}"#.to_string());
        assert_eq!(read_prediction(200, body).unwrap().class_line(), "Class: cat");
    }

    #[test]
    fn rejects_error_payload() {
        let err = parse_prediction(r#"{"detail": "bad image"}"#).unwrap_err();
        assert_eq!(err.kind(), "decode");
    }
}
