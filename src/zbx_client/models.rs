use std::str::FromStr;

use serde::Deserialize;

use crate::types::Severity;

/// One raw reading returned by `history.get`. `value` is `None` when the
/// server sent something other than a string or a number.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HistorySample {
    #[serde(deserialize_with = "deserialize_num")]
    pub clock: i64,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub value: Option<String>,
}

/// One pre-aggregated bucket returned by `trend.get`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Trend {
    #[serde(deserialize_with = "deserialize_num")]
    pub clock: i64,
    #[serde(default, deserialize_with = "deserialize_num")]
    pub num: u64,
    #[serde(deserialize_with = "deserialize_num")]
    pub value_avg: f64,
    #[serde(deserialize_with = "deserialize_num")]
    pub value_min: f64,
    #[serde(deserialize_with = "deserialize_num")]
    pub value_max: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub host: Option<String>,
    pub description: String,
    pub severity: Severity,
    pub clock: i64,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CreatedUsers {
    #[serde(default)]
    pub userids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawProblem {
    #[serde(default)]
    hosts: Vec<HostRow>,
    #[serde(default)]
    opdata: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(deserialize_with = "deserialize_num")]
    severity: i64,
    #[serde(default, deserialize_with = "deserialize_num")]
    clock: i64,
}

#[derive(Debug, Deserialize)]
struct HostRow {
    #[serde(default)]
    name: Option<String>,
}

impl From<RawProblem> for Problem {
    fn from(value: RawProblem) -> Self {
        let RawProblem {
            hosts,
            opdata,
            name,
            severity,
            clock,
        } = value;
        let host = hosts
            .into_iter()
            .next()
            .and_then(|h| h.name)
            .filter(|n| !n.is_empty());
        let description = opdata.filter(|d| !d.is_empty()).unwrap_or(name);
        Self {
            host,
            description,
            severity: Severity::from_zabbix(severity),
            clock,
        }
    }
}

/// Zabbix encodes most numbers as JSON strings; accept both forms.
fn deserialize_num<'de, D, T>(de: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Numberish {
        Num(serde_json::Number),
        Str(String),
    }

    let raw = match Numberish::deserialize(de)? {
        Numberish::Num(n) => n.to_string(),
        Numberish::Str(s) => s,
    };
    raw.trim().parse::<T>().map_err(serde::de::Error::custom)
}

fn deserialize_text<'de, D>(de: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Textish {
        Str(String),
        Num(serde_json::Number),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Textish::deserialize(de)? {
        Textish::Str(s) => Some(s),
        Textish::Num(n) => Some(n.to_string()),
        Textish::Other(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::{HistorySample, Problem, RawProblem, Trend};
    use crate::types::Severity;
    use serde_json::json;

    #[test]
    fn history_sample_accepts_strings_and_numbers() {
        let sample: HistorySample = serde_json::from_value(json!({
            "itemid": "123", "clock": "1500", "value": "10.5", "ns": "0"
        }))
        .unwrap();
        assert_eq!(sample.clock, 1500);
        assert_eq!(sample.value.as_deref(), Some("10.5"));

        let sample: HistorySample =
            serde_json::from_value(json!({"clock": 1600, "value": 20})).unwrap();
        assert_eq!(sample.value.as_deref(), Some("20"));
    }

    #[test]
    fn history_sample_tolerates_missing_or_odd_values() {
        let samples: Vec<HistorySample> = serde_json::from_value(json!([
            {"clock": "1", "value": null},
            {"clock": "2", "value": {"raw": 5}},
            {"clock": "3"},
            {"clock": "4", "value": "5"}
        ]))
        .unwrap();
        let values: Vec<_> = samples.iter().map(|s| s.value.as_deref()).collect();
        assert_eq!(values, [None, None, None, Some("5")]);
    }

    #[test]
    fn trend_parses_string_aggregates() {
        let trend: Trend = serde_json::from_value(json!({
            "clock": "1700000000",
            "num": "60",
            "value_avg": "12.3456",
            "value_min": "1",
            "value_max": "99.999"
        }))
        .unwrap();
        assert_eq!(trend.num, 60);
        assert!((trend.value_avg - 12.3456).abs() < f64::EPSILON);
    }

    #[test]
    fn problem_prefers_opdata_and_first_host() {
        let raw: RawProblem = serde_json::from_value(json!({
            "hosts": [{"name": "db-01"}, {"name": "db-02"}],
            "opdata": "Disk at 97%",
            "name": "Disk full",
            "severity": "4",
            "clock": "1700000000"
        }))
        .unwrap();
        let problem = Problem::from(raw);
        assert_eq!(problem.host.as_deref(), Some("db-01"));
        assert_eq!(problem.description, "Disk at 97%");
        assert_eq!(problem.severity, Severity::High);
    }

    #[test]
    fn problem_falls_back_to_name_without_opdata() {
        let raw: RawProblem = serde_json::from_value(json!({
            "opdata": "",
            "name": "CPU load high",
            "severity": "7",
            "clock": "1"
        }))
        .unwrap();
        let problem = Problem::from(raw);
        assert_eq!(problem.host, None);
        assert_eq!(problem.description, "CPU load high");
        assert_eq!(problem.severity, Severity::Unknown(7));
    }
}
