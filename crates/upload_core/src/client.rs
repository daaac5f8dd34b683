use crate::config::ClientConfig;
use crate::error::UploadError;
use crate::file::SelectedFile;
use crate::outcome::Prediction;
use reqwest::Url;
use reqwest::blocking::{Client, multipart};
use serde_json::{Map, Value};
use std::time::Duration;

/// Sends one image to a prediction service and returns its answer.
pub trait PredictClient: Send + Sync {
    fn predict(&self, file: &SelectedFile) -> Result<Prediction, UploadError>;
}

/// Multipart `POST` against an HTTP prediction endpoint.
#[derive(Debug, Clone)]
pub struct HttpPredictClient {
    http: Client,
    endpoint: Url,
    field_name: String,
}

impl HttpPredictClient {
    pub fn new(config: &ClientConfig) -> Result<Self, UploadError> {
        let endpoint = config.endpoint()?;
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        } else {
            builder = builder.timeout(None);
        }
        let http = builder
            .build()
            .map_err(|e| UploadError::Config(e.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            field_name: config.field_name.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn image_part(&self, file: &SelectedFile) -> multipart::Part {
        let part = || {
            multipart::Part::bytes(file.bytes().to_vec()).file_name(file.name().to_string())
        };
        match part().mime_str(file.mime()) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(
                    "Unusable MIME type {:?} ({e}), sending octet-stream",
                    file.mime()
                );
                part()
                    .mime_str("application/octet-stream")
                    .unwrap_or_else(|_| part())
            }
        }
    }
}

impl PredictClient for HttpPredictClient {
    fn predict(&self, file: &SelectedFile) -> Result<Prediction, UploadError> {
        let form = multipart::Form::new().part(self.field_name.clone(), self.image_part(file));
        tracing::info!(
            "POST {} ({} bytes, {})",
            self.endpoint,
            file.len(),
            file.mime()
        );
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .map_err(UploadError::network)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(UploadError::network)?;
        interpret_response(status, &body)
    }
}

/// Turns a status code and raw body into a prediction or a typed failure.
///
/// The body is parsed before the status is looked at, so a body that is not
/// a JSON object is a malformed response whatever the status. A failed status
/// uses the body's `message` when it is a non-empty string. A success status
/// passes `prediction` through (absent or null renders as an empty label) and
/// defaults `confidence` to 0.
pub fn interpret_response(status: u16, body: &str) -> Result<Prediction, UploadError> {
    let fields: Map<String, Value> =
        serde_json::from_str(body).map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

    if !(200..300).contains(&status) {
        return Err(UploadError::Server {
            status,
            message: fields.get("message").and_then(non_empty_string),
            detail: fields.get("error").and_then(non_empty_string),
        });
    }

    let label = match fields.get("prediction") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    let confidence = fields
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())
        .unwrap_or(0.0);
    Ok(Prediction { label, confidence })
}

fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
