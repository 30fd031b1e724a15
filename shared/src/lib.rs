use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

/// Body returned by the classification endpoint on success.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictionResult {
    #[serde(rename = "class")]
    pub label: String,
    pub confidence: f64,
}

impl PredictionResult {
    pub fn confidence_percent(&self) -> Percent {
        Percent((self.confidence * 100.0).round() as i32)
    }

    pub fn class_line(&self) -> String {
        format!("Class: {}", self.label)
    }

    pub fn confidence_line(&self) -> String {
        format!("Confidence: {}", self.confidence_percent())
    }
}

/// Whole-number percentage, rendered as `87%`.
#[derive(Display, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[display(fmt = "{}%", _0)]
pub struct Percent(pub i32);

/// Camera selection hint passed to `getUserMedia` as `facingMode`.
#[derive(
    Serialize, Deserialize, AsRefStr, EnumString, strum_macros::Display,
    Clone, Copy, Debug, Default, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FacingMode {
    /// Front camera.
    User,
    /// Rear camera.
    #[default]
    Environment,
}

impl FacingMode {
    pub fn toggled(self) -> Self {
        match self {
            FacingMode::User => FacingMode::Environment,
            FacingMode::Environment => FacingMode::User,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FacingMode::User => "front",
            FacingMode::Environment => "rear",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn decodes_class_field_into_label() {
        let body = r#"{"class":"cat","confidence":0.87}"#;
        let result: PredictionResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.label, "cat");
        assert_eq!(result.class_line(), "Class: cat");
        assert_eq!(result.confidence_line(), "Confidence: 87%");
    }

    #[test]
    fn confidence_rounds_half_up_like_the_display() {
        let result = PredictionResult { label: "dog".into(), confidence: 0.125 };
        assert_eq!(result.confidence_percent(), Percent(13));

        let certain = PredictionResult { label: "dog".into(), confidence: 1.0 };
        assert_eq!(certain.confidence_line(), "Confidence: 100%");
    }

    #[test]
    fn out_of_range_confidence_is_shown_as_sent() {
        let negative = PredictionResult { label: "noise".into(), confidence: -0.3 };
        assert_eq!(negative.confidence_percent(), Percent(-30));
        assert_eq!(negative.confidence_line(), "Confidence: -30%");

        let over = PredictionResult { label: "noise".into(), confidence: 1.2 };
        assert_eq!(over.confidence_line(), "Confidence: 120%");
    }

    #[test]
    fn missing_confidence_is_rejected() {
        let body = r#"{"class":"cat"}"#;
        assert!(serde_json::from_str::<PredictionResult>(body).is_err());
    }

    #[test]
    fn facing_mode_uses_media_constraint_names() {
        assert_eq!(FacingMode::User.as_ref(), "user");
        assert_eq!(FacingMode::Environment.to_string(), "environment");
        assert_eq!(FacingMode::from_str("user").unwrap(), FacingMode::User);
        assert_eq!(serde_json::to_string(&FacingMode::User).unwrap(), "\"user\"");
    }

    #[test]
    fn facing_mode_toggles_between_front_and_rear() {
        assert_eq!(FacingMode::default(), FacingMode::Environment);
        assert_eq!(FacingMode::Environment.toggled(), FacingMode::User);
        assert_eq!(FacingMode::User.toggled().label(), "rear");
    }
}
