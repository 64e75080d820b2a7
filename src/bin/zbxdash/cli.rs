use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use zbxdash::types::{Format, ValueType};

#[derive(Parser, Debug)]
#[command(author, version, about = "Zabbix history, trend and problem panels", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Zabbix API endpoint, e.g. https://zabbix.example.com/api_jsonrpc.php.
    #[arg(long, value_name = "URL", global = true)]
    pub url: Option<String>,

    /// Allow plain-HTTP endpoints.
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    pub insecure: bool,

    /// Output flavour: "text" or "html".
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    pub format: Format,

    /// Emit logs as JSON (needs `--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    pub json_logs: bool,

    /// Explicit log filter (e.g. "zbxdash=debug").
    #[arg(long, value_name = "FILTER", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sample count, average, min and max of an item's raw history.
    History(RangeArgs),
    /// Hourly trend buckets of an item.
    Trends(RangeArgs),
    /// Unresolved, unacknowledged problems.
    Problems,
    /// Create a Zabbix user.
    CreateUser(CreateUserArgs),
}

#[derive(Args, Debug)]
pub struct RangeArgs {
    /// Item id.
    #[arg(long)]
    pub item_id: String,

    /// Range start, local time (YYYY-MM-DDTHH:MM). Empty means unbounded.
    #[arg(long, default_value = "")]
    pub from: String,

    /// Range end, local time (YYYY-MM-DDTHH:MM). Empty means unbounded.
    #[arg(long, default_value = "")]
    pub till: String,

    /// Item value type: float, character, log, unsigned or text.
    #[arg(long)]
    pub value_type: Option<ValueType>,
}

#[derive(Args, Debug)]
pub struct CreateUserArgs {
    #[arg(long)]
    pub alias: String,

    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub surname: String,

    /// User group id the account joins.
    #[arg(long)]
    pub group_id: String,

    /// Environment variable holding the new user's password.
    #[arg(long, value_name = "VAR", default_value = "ZBXDASH_NEW_PASSWORD")]
    pub password_env: String,

    /// Interface language; defaults to `users.lang` from the configuration.
    #[arg(long)]
    pub lang: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
