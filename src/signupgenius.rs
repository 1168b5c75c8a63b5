use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Settings;

const BASE_URL: &str = "https://api.signupgenius.com/v2/k";
pub const API_DOCS: &str = "https://developer.signupgenius.com/developer/keybaseddocs";

/// One row of the SignUpGenius "report/all" response. Field types are loose
/// because the API is inconsistent about numbers vs. strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSignup {
    pub slotitemid: Option<Value>,
    #[serde(deserialize_with = "loose_string")]
    pub startdatestring: Option<String>,
    pub startdate: Option<Value>,
    #[serde(deserialize_with = "loose_string")]
    pub item: Option<String>,
    pub myqty: Option<Value>,
    #[serde(deserialize_with = "loose_string")]
    pub firstname: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub lastname: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub status: Option<String>,
}

/// Text field that tolerates numbers and booleans; anything else is `None`.
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

impl RawSignup {
    /// Display id for log lines.
    pub fn id(&self) -> String {
        match &self.slotitemid {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "unknown".to_string(),
            Some(v) => v.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReportResponse {
    data: Option<ReportData>,
}

#[derive(Debug, Deserialize)]
struct ReportData {
    signups: Option<Vec<RawSignup>>,
    signup: Option<OneOrMany>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<RawSignup>),
    One(Box<RawSignup>),
}

fn report_url(signup_id: &str, api_key: &str) -> String {
    format!("{BASE_URL}/signups/report/all/{signup_id}/?user_key={api_key}")
}

/// Fetch every signup row for the configured signup sheet.
pub async fn fetch_signups(settings: &Settings) -> Result<Vec<RawSignup>> {
    let client = reqwest::Client::new();
    let url = report_url(&settings.signup_id, &settings.api_key);

    info!("Fetching SignUpGenius report for signup {}", settings.signup_id);
    info!("API URL: {}", url.replace(&settings.api_key, "********"));

    let body = client
        .get(&url)
        .send()
        .await
        .context("Failed to reach SignUpGenius")?
        .error_for_status()
        .context("SignUpGenius returned an error status")?
        .text()
        .await
        .context("Failed to read SignUpGenius response body")?;

    info!("Retrieved report ({} bytes)", body.len());
    if settings.verbose {
        log_structure(&body);
    }
    parse_report(&body)
}

/// Decode a report body. Accepts `data.signups` or `data.signup`, where the
/// latter may be a single object.
pub fn parse_report(body: &str) -> Result<Vec<RawSignup>> {
    let response: ReportResponse =
        serde_json::from_str(body).context("SignUpGenius response is not valid report JSON")?;

    let signups = match response.data {
        Some(ReportData {
            signups: Some(list),
            ..
        }) => list,
        Some(ReportData {
            signup: Some(OneOrMany::Many(list)),
            ..
        }) => list,
        Some(ReportData {
            signup: Some(OneOrMany::One(one)),
            ..
        }) => vec![*one],
        _ => {
            info!("No signups found in response. See {}", API_DOCS);
            Vec::new()
        }
    };

    info!("Found {} total signups in the data", signups.len());
    Ok(signups)
}

fn keys(v: &Value) -> Vec<&str> {
    v.as_object()
        .map(|o| o.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

fn log_structure(body: &str) {
    let Ok(root) = serde_json::from_str::<Value>(body) else {
        return;
    };
    let Some(data) = root.get("data") else {
        debug!(keys = ?keys(&root), "Response has no data field");
        return;
    };
    debug!(keys = ?keys(data), "Response data");

    let list = data.get("signups").or_else(|| data.get("signup"));
    match list {
        Some(Value::Array(items)) => {
            debug!(count = items.len(), "Signup list");
            if let Some(first) = items.first() {
                debug!(keys = ?keys(first), "First signup");
                for (k, v) in first.as_object().into_iter().flatten() {
                    debug!("  - {}: {}", k, v);
                }
            }
        }
        Some(Value::Object(_)) => debug!("Single signup object found"),
        _ => {}
    }
}
