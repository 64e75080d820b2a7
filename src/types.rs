use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Zabbix trigger severity, `0..=5`. Codes outside the table are kept as-is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    NotClassified,
    Information,
    Warning,
    Average,
    High,
    Disaster,
    Unknown(i64),
}

impl Severity {
    pub const fn from_zabbix(code: i64) -> Self {
        match code {
            0 => Self::NotClassified,
            1 => Self::Information,
            2 => Self::Warning,
            3 => Self::Average,
            4 => Self::High,
            5 => Self::Disaster,
            other => Self::Unknown(other),
        }
    }

    pub const fn as_zabbix_code(self) -> i64 {
        match self {
            Self::NotClassified => 0,
            Self::Information => 1,
            Self::Warning => 2,
            Self::Average => 3,
            Self::High => 4,
            Self::Disaster => 5,
            Self::Unknown(code) => code,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotClassified => "No clasificado",
            Self::Information => "Información",
            Self::Warning => "Advertencia",
            Self::Average => "Promedio",
            Self::High => "Alto",
            Self::Disaster => "Desastre",
            Self::Unknown(_) => "Desconocido",
        }
    }
}

/// Value type of an item, sent as the `history` parameter of
/// `history.get` and `trend.get`.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    Float,
    Character,
    Log,
    Unsigned,
    Text,
}

impl ValueType {
    pub const fn as_zabbix_code(self) -> u8 {
        match self {
            Self::Float => 0,
            Self::Character => 1,
            Self::Log => 2,
            Self::Unsigned => 3,
            Self::Text => 4,
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Float => "float",
            Self::Character => "character",
            Self::Log => "log",
            Self::Unsigned => "unsigned",
            Self::Text => "text",
        })
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "float" => Ok(Self::Float),
            "1" | "char" | "character" => Ok(Self::Character),
            "2" | "log" => Ok(Self::Log),
            "3" | "uint" | "unsigned" => Ok(Self::Unsigned),
            "4" | "text" => Ok(Self::Text),
            other => Err(format!("unknown value type: {other}")),
        }
    }
}

/// Output flavour for rendered views.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Format {
    #[default]
    Text,
    Html,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
