use serde_json::Value;

use crate::error::{OrgChartError, Result};
use crate::ir::{ORG_CHART_VERSION, OrgChartData};

/// Pretty-printed document, 2-space indented, fields in declaration order.
pub fn serialize_json(data: &OrgChartData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Parses an org chart document, rejecting anything whose `version` is not
/// the current one or whose `nodes`/`relationships` are not arrays.
pub fn parse_json(text: &str) -> Result<OrgChartData> {
    let mut value: Value = serde_json::from_str(text)?;
    let object = value.as_object_mut().ok_or(OrgChartError::NotAnObject)?;

    // JSON numbers compare by value, so `1.0` is the current version too.
    let version = object.get("version").unwrap_or(&Value::Null);
    if version.as_f64() != Some(f64::from(ORG_CHART_VERSION)) {
        return Err(OrgChartError::UnsupportedVersion {
            found: version.to_string(),
            expected: ORG_CHART_VERSION,
        });
    }
    object.insert("version".to_string(), Value::from(ORG_CHART_VERSION));
    for key in ["nodes", "relationships"] {
        if !object.get(key).is_some_and(Value::is_array) {
            return Err(OrgChartError::MissingArray(key));
        }
    }

    Ok(serde_json::from_value(value)?)
}
