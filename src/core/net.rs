use crate::core::EnvError;

/// Checks the status and decodes the body as JSON.
///
/// A non-2xx status and an unparseable body are both reported as errors so the
/// caller can count them as a failed attempt.
pub(crate) async fn get_json(resp: reqwest::Response) -> Result<serde_json::Value, EnvError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(EnvError::Status {
            status: status.as_u16(),
            url: resp.url().to_string(),
        });
    }

    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}
