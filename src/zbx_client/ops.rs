use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use crate::Result;
use crate::types::ValueType;

use super::ZbxClient;
use super::models::{CreatedUsers, HistorySample, Problem, RawProblem, Trend};
use super::rpc::RpcEnvelope;

const TREND_FIELDS: [&str; 5] = ["clock", "num", "value_avg", "value_min", "value_max"];

/// Time-bounded query on a single item. A bound of `0` means "unset" and is
/// left out of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub item_id: String,
    pub value_type: ValueType,
    pub time_from: i64,
    pub time_till: i64,
}

pub type TrendQuery = HistoryQuery;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub alias: String,
    pub password: SecretString,
    pub name: String,
    pub surname: String,
    pub group_id: String,
    pub lang: String,
}

impl ZbxClient {
    /// `history.get`, newest sample first.
    pub async fn history(&self, query: &HistoryQuery) -> Result<RpcEnvelope<Vec<HistorySample>>> {
        let params = item_range_params(json!("extend"), query, "DESC");
        self.call_rows("history.get", params).await
    }

    /// `trend.get`, oldest bucket first.
    pub async fn trends(&self, query: &TrendQuery) -> Result<RpcEnvelope<Vec<Trend>>> {
        let params = item_range_params(json!(TREND_FIELDS), query, "ASC");
        self.call_rows("trend.get", params).await
    }

    /// `problem.get` restricted to unresolved, unacknowledged problems.
    pub async fn active_problems(&self) -> Result<RpcEnvelope<Vec<Problem>>> {
        let params = json!({
            "output": "extend",
            "recent": true,
            "acknowledged": false,
            "selectHosts": ["name"],
            "selectTriggers": ["description", "severity"]
        });
        let raw: RpcEnvelope<Vec<RawProblem>> = self.call_rows("problem.get", params).await?;
        Ok(raw.map_result(|rows| rows.into_iter().map(Problem::from).collect()))
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<RpcEnvelope<CreatedUsers>> {
        let params = json!({
            "alias": user.alias,
            "passwd": user.password.expose_secret(),
            "name": user.name,
            "surname": user.surname,
            "usrgrps": [{ "usrgrpid": user.group_id }],
            "lang": user.lang
        });
        self.call_object("user.create", params).await
    }
}

fn item_range_params(output: Value, query: &HistoryQuery, sortorder: &str) -> Value {
    let mut params = json!({
        "output": output,
        "history": query.value_type.as_zabbix_code(),
        "itemids": [query.item_id],
        "sortfield": "clock",
        "sortorder": sortorder
    });
    if query.time_from != 0 {
        params["time_from"] = json!(query.time_from);
    }
    if query.time_till != 0 {
        params["time_till"] = json!(query.time_till);
    }
    params
}
