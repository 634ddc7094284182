use anyhow::Context;

use crate::{
    enhance::normalize::RawServiceReply,
    foundation::error::{CharmloomError, CharmloomResult},
};

/// Fixed natural-language instruction sent with every enhancement request.
pub const DEFAULT_PROMPT: &str = "Make all accessories craft on the necklace style and color \
     scheme. Enhance the overall design to be more cohesive and elegant.";

/// Client for the external image-enhancement endpoint.
///
/// Submits a flattened capture as a multipart upload and returns the raw
/// reply untouched; interpretation is left to
/// [`crate::enhance::normalize::normalize`].
#[derive(Clone, Debug)]
pub struct EnhancementClient {
    http: reqwest::Client,
    endpoint: String,
    prompt: String,
}

impl EnhancementClient {
    /// Construct a client for `endpoint` using the default prompt.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_prompt(endpoint, DEFAULT_PROMPT)
    }

    /// Construct a client with a custom instruction string.
    pub fn with_prompt(endpoint: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            prompt: prompt.into(),
        }
    }

    /// The instruction string sent with each request.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Submit `jpeg` for enhancement. Exactly one attempt is made per call;
    /// failures are surfaced to the caller, never retried automatically.
    ///
    /// On a non-success status the response body (when non-empty) is the
    /// failure detail, otherwise a generic status message.
    #[tracing::instrument(skip(self, jpeg), fields(endpoint = %self.endpoint))]
    pub async fn enhance(&self, jpeg: Vec<u8>) -> CharmloomResult<RawServiceReply> {
        let filename = format!("design-{}.jpg", chrono::Utc::now().timestamp_millis());
        let part = reqwest::multipart::Part::bytes(jpeg)
            .file_name(filename)
            .mime_str("image/jpeg")
            .context("build multipart image part")?;
        let form = reqwest::multipart::Form::new()
            .part("File", part)
            .text("Prompt", self.prompt.clone());

        let resp = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .context("send enhancement request")?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp
            .bytes()
            .await
            .context("read enhancement response body")?
            .to_vec();

        if !status.is_success() {
            return Err(transport_failure(status, &body));
        }

        Ok(RawServiceReply { content_type, body })
    }
}

/// Map a non-success response to a transport error: the trimmed body is the
/// failure detail when non-empty, otherwise a generic status message.
fn transport_failure(status: reqwest::StatusCode, body: &[u8]) -> CharmloomError {
    let detail = String::from_utf8_lossy(body);
    let detail = detail.trim();
    if detail.is_empty() {
        CharmloomError::transport(format!("server returned status {}", status.as_u16()))
    } else {
        CharmloomError::transport(detail.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/enhance/client.rs"]
mod tests;
