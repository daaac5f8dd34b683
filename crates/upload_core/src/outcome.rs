/// Label and score returned by the prediction endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Model confidence, nominally in [0,1].
    pub confidence: f64,
}

impl Prediction {
    /// Confidence as a whole percentage, rounded half up.
    pub fn confidence_percent(&self) -> i64 {
        (self.confidence * 100.0 + 0.5).floor() as i64
    }
}

/// Result of the most recent submission attempt.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestOutcome {
    #[default]
    NotStarted,
    Pending,
    Success(Prediction),
    Failure(String),
}

impl RequestOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failure(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            Self::Success(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.873, 87)]
    #[case(0.875, 88)]
    #[case(0.0, 0)]
    #[case(1.0, 100)]
    fn confidence_rounds_to_nearest_percent(#[case] confidence: f64, #[case] expected: i64) {
        let p = Prediction {
            label: "Ischemic".into(),
            confidence,
        };
        assert_eq!(p.confidence_percent(), expected);
    }
}
