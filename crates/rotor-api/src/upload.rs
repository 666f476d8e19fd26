//! Multipart form submission: token file, message file and a few text fields.

use axum::extract::Multipart;
use rotor_model::{DEFAULT_INTERVAL_SECS, TaskSpec, parse_lines};

use crate::error::ApiError;

pub(crate) const FIELD_TOKEN_FILE: &str = "tokenFile";
pub(crate) const FIELD_MESSAGE_FILE: &str = "txtFile";
pub(crate) const FIELD_TARGET: &str = "postId";
pub(crate) const FIELD_PREFIX: &str = "prefix";
pub(crate) const FIELD_INTERVAL: &str = "time";

/// Raw fields collected from the multipart body.
#[derive(Debug, Default)]
pub(crate) struct UploadForm {
    token_file: Option<String>,
    message_file: Option<String>,
    target: Option<String>,
    prefix: Option<String>,
    interval: Option<String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("malformed multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::InvalidRequest(format!("field '{name}': {e}")))?;
            form.set(&name, value);
        }
        Ok(form)
    }

    /// Unknown fields are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            FIELD_TOKEN_FILE => &mut self.token_file,
            FIELD_MESSAGE_FILE => &mut self.message_file,
            FIELD_TARGET => &mut self.target,
            FIELD_PREFIX => &mut self.prefix,
            FIELD_INTERVAL => &mut self.interval,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Build a [`TaskSpec`]. Missing files or target are request errors; an unparsable
    /// interval falls back to the default.
    pub fn into_spec(self) -> Result<TaskSpec, ApiError> {
        let tokens = self
            .token_file
            .ok_or_else(|| ApiError::InvalidRequest("token file required".into()))?;
        let target = self
            .target
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::InvalidRequest("post id required".into()))?;
        let messages = self
            .message_file
            .ok_or_else(|| ApiError::InvalidRequest("message file required".into()))?;

        let interval = self
            .interval
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_INTERVAL_SECS);
        let prefix = self.prefix.unwrap_or_default().trim().to_string();

        Ok(TaskSpec::new(parse_lines(&tokens), parse_lines(&messages), target)
            .with_prefix(prefix)
            .with_interval(interval))
    }
}
