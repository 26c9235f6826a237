use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::FailureReason;

pub async fn make_request(
    client: &Client,
    base_url: &str,
    endpoint: &str,
    params: &[(&str, &str)],
) -> Result<Value, FailureReason> {
    let url = format!("{}/{}", base_url, endpoint);
    let res = client
        .get(&url)
        .query(params)
        .send()
        .await
        .map_err(|e| transport_reason(&e))?;

    log::trace!("GET {} -> {}", url, res.status());

    if !res.status().is_success() {
        return Err(FailureReason::Status(res.status().as_u16()));
    }

    let text = res.text().await.map_err(|e| transport_reason(&e))?;
    serde_json::from_str::<Value>(&text)
        .map_err(|e| FailureReason::Malformed(format!("invalid JSON: {}", e)))
}

pub fn parse_response_object<T>(data: Value, error_msg: &str) -> Result<T, FailureReason>
where
    T: DeserializeOwned,
{
    match data {
        Value::Object(obj) => serde_json::from_value(Value::Object(obj))
            .map_err(|e| FailureReason::Malformed(format!("{}: {}", error_msg, e))),
        _ => Err(FailureReason::Malformed(
            "Unexpected API response format: not an object".to_string(),
        )),
    }
}

fn transport_reason(err: &reqwest::Error) -> FailureReason {
    match err.status() {
        Some(status) => FailureReason::Status(status.as_u16()),
        None => FailureReason::Transport(err.to_string()),
    }
}
