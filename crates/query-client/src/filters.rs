//! Filter parameters for each stored query.
//!
//! Request bodies use the form field names (`minAge1`, `sex2`, ...). Values
//! may arrive as JSON numbers or strings; ages are read as floats and years
//! as integers. A parameter that is missing, `null` or blank counts as
//! missing, and any missing parameter rejects the whole request.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{QueryError, QueryResult};

/// Filters for one stored procedure.
pub trait RpcFilters: Serialize + Send + Sync + Sized {
    /// Name of the stored procedure.
    const FUNCTION: &'static str;

    /// Request body field names, in form order.
    const PARAMS: &'static [&'static str];

    /// Validate a request body.
    fn from_params(params: &Map<String, Value>) -> QueryResult<Self>;

    /// Arguments as sent to the stored procedure.
    fn rpc_args(&self) -> QueryResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Inclusive age bounds in years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgeRange {
    #[serde(rename = "min_age")]
    pub min: f64,
    #[serde(rename = "max_age")]
    pub max: f64,
}

/// Inclusive calendar year bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    #[serde(rename = "min_year")]
    pub min: i32,
    #[serde(rename = "max_year")]
    pub max: i32,
}

/// Mortality locations (`mortality_query_1`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MortalityHeatmapFilters {
    #[serde(flatten)]
    pub ages: AgeRange,
    #[serde(rename = "sex_param")]
    pub sex: String,
    #[serde(flatten)]
    pub years: YearRange,
}

impl RpcFilters for MortalityHeatmapFilters {
    const FUNCTION: &'static str = "mortality_query_1";
    const PARAMS: &'static [&'static str] = &["minAge1", "maxAge1", "sex1", "minYear1", "maxYear1"];

    fn from_params(params: &Map<String, Value>) -> QueryResult<Self> {
        require_all(params, Self::PARAMS)?;
        Ok(Self {
            ages: AgeRange {
                min: parse_float(params, "minAge1")?,
                max: parse_float(params, "maxAge1")?,
            },
            sex: parse_text(params, "sex1")?,
            years: YearRange {
                min: parse_int(params, "minYear1")?,
                max: parse_int(params, "maxYear1")?,
            },
        })
    }
}

/// Leading causes of death (`mortality_query_2`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MortalityCauseFilters {
    #[serde(flatten)]
    pub ages: AgeRange,
    #[serde(rename = "sex_param")]
    pub sex: String,
}

impl RpcFilters for MortalityCauseFilters {
    const FUNCTION: &'static str = "mortality_query_2";
    const PARAMS: &'static [&'static str] = &["minAge2", "maxAge2", "sex2"];

    fn from_params(params: &Map<String, Value>) -> QueryResult<Self> {
        require_all(params, Self::PARAMS)?;
        Ok(Self {
            ages: parse_ages(params, "minAge2", "maxAge2")?,
            sex: parse_text(params, "sex2")?,
        })
    }
}

/// Most visited telemetry locations (`telemetry_query_1`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryLocationFilters {
    #[serde(rename = "sex_param")]
    pub sex: String,
}

impl RpcFilters for TelemetryLocationFilters {
    const FUNCTION: &'static str = "telemetry_query_1";
    const PARAMS: &'static [&'static str] = &["sex1"];

    fn from_params(params: &Map<String, Value>) -> QueryResult<Self> {
        require_all(params, Self::PARAMS)?;
        Ok(Self {
            sex: parse_text(params, "sex1")?,
        })
    }
}

/// Observations per year (`telemetry_query_2`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryTimelineFilters {
    #[serde(flatten)]
    pub ages: AgeRange,
    #[serde(rename = "sex_param")]
    pub sex: String,
}

impl RpcFilters for TelemetryTimelineFilters {
    const FUNCTION: &'static str = "telemetry_query_2";
    const PARAMS: &'static [&'static str] = &["minAge2", "maxAge2", "sex2"];

    fn from_params(params: &Map<String, Value>) -> QueryResult<Self> {
        require_all(params, Self::PARAMS)?;
        Ok(Self {
            ages: parse_ages(params, "minAge2", "maxAge2")?,
            sex: parse_text(params, "sex2")?,
        })
    }
}

/// The value of `key` unless it is missing, null or a blank string.
fn present<'a>(params: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match params.get(key)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        other => Some(other),
    }
}

fn require_all(params: &Map<String, Value>, keys: &[&str]) -> QueryResult<()> {
    if keys.iter().all(|key| present(params, key).is_some()) {
        Ok(())
    } else {
        Err(QueryError::MissingParameter(keys.join(", ")))
    }
}

fn parse_ages(params: &Map<String, Value>, min: &str, max: &str) -> QueryResult<AgeRange> {
    Ok(AgeRange {
        min: parse_float(params, min)?,
        max: parse_float(params, max)?,
    })
}

fn parse_float(params: &Map<String, Value>, key: &str) -> QueryResult<f64> {
    let value = present(params, key).ok_or_else(|| QueryError::MissingParameter(key.to_string()))?;

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(QueryError::invalid(key, format!("expected a number, got {}", value))),
    }
}

/// Integers; fractional values are truncated toward zero.
fn parse_int(params: &Map<String, Value>, key: &str) -> QueryResult<i32> {
    let value = present(params, key).ok_or_else(|| QueryError::MissingParameter(key.to_string()))?;

    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    };

    parsed
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| QueryError::invalid(key, format!("expected an integer, got {}", value)))
}

fn parse_text(params: &Map<String, Value>, key: &str) -> QueryResult<String> {
    match present(params, key) {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(QueryError::invalid(key, format!("expected text, got {}", other))),
        None => Err(QueryError::MissingParameter(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_mortality_heatmap_from_strings() {
        let filters = MortalityHeatmapFilters::from_params(&params(json!({
            "minAge1": "1.5", "maxAge1": "10", "sex1": "F",
            "minYear1": "2010", "maxYear1": 2020
        })))
        .unwrap();

        assert_eq!(filters.ages, AgeRange { min: 1.5, max: 10.0 });
        assert_eq!(filters.sex, "F");
        assert_eq!(filters.years, YearRange { min: 2010, max: 2020 });
    }

    #[test]
    fn test_rpc_args_use_procedure_names() {
        let filters = MortalityHeatmapFilters {
            ages: AgeRange { min: 0.0, max: 5.0 },
            sex: "M".into(),
            years: YearRange { min: 2000, max: 2001 },
        };
        assert_eq!(
            filters.rpc_args().unwrap(),
            json!({"min_age": 0.0, "max_age": 5.0, "sex_param": "M", "min_year": 2000, "max_year": 2001})
        );
    }

    #[test]
    fn test_missing_lists_all_params() {
        let err = MortalityCauseFilters::from_params(&params(json!({"minAge2": 1, "sex2": "M"})))
            .unwrap_err();
        assert_eq!(err.to_string(), "All parameters (minAge2, maxAge2, sex2) are required");
    }

    #[test]
    fn test_blank_and_null_are_missing() {
        let blank = TelemetryLocationFilters::from_params(&params(json!({"sex1": "  "})));
        assert!(matches!(blank, Err(QueryError::MissingParameter(_))));

        let null = TelemetryLocationFilters::from_params(&params(json!({"sex1": null})));
        assert!(matches!(null, Err(QueryError::MissingParameter(_))));
    }

    #[test]
    fn test_zero_age_is_present() {
        let filters = TelemetryTimelineFilters::from_params(&params(json!({
            "minAge2": 0, "maxAge2": "3", "sex2": "M"
        })))
        .unwrap();
        assert_eq!(filters.ages.min, 0.0);
    }

    #[test]
    fn test_non_numeric_age_rejected() {
        let err = MortalityCauseFilters::from_params(&params(json!({
            "minAge2": "old", "maxAge2": 3, "sex2": "M"
        })))
        .unwrap_err();
        assert!(matches!(err, QueryError::InvalidParameter { ref param, .. } if param == "minAge2"));
    }

    #[test]
    fn test_year_truncation() {
        let filters = MortalityHeatmapFilters::from_params(&params(json!({
            "minAge1": 1, "maxAge1": 2, "sex1": "M",
            "minYear1": 2010.9, "maxYear1": "2015.2"
        })))
        .unwrap();
        assert_eq!(filters.years, YearRange { min: 2010, max: 2015 });
    }

    #[test]
    fn test_function_names() {
        assert_eq!(MortalityHeatmapFilters::FUNCTION, "mortality_query_1");
        assert_eq!(MortalityCauseFilters::FUNCTION, "mortality_query_2");
        assert_eq!(TelemetryLocationFilters::FUNCTION, "telemetry_query_1");
        assert_eq!(TelemetryTimelineFilters::FUNCTION, "telemetry_query_2");
    }
}
