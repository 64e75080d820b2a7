use std::path::PathBuf;
use std::process::ExitCode;

use secrecy::SecretString;
use tracing::info;
use zbxdash::Result;
use zbxdash::config::{Config, Overrides};
use zbxdash::dashboard::{
    Dashboard, HistoryView, ItemRangeForm, ProblemView, RegistrationView, TrendView, UserForm,
};
use zbxdash::error::InputError;
use zbxdash::telemetry::init_tracing;
use zbxdash::types::{Format, ValueType};
use zbxdash::view::{Render, Tone};
use zbxdash::zbx_client::ZbxClient;

use super::cli::{Cli, Command, CreateUserArgs, RangeArgs};

const DEFAULT_CONFIG: &str = "zbxdash.toml";

pub async fn run(cli: Cli) -> Result<ExitCode> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let overrides = Overrides {
        url: cli.url.clone(),
    };
    let config = Config::from_env_and_file(&config_path, &overrides)?;

    let client = ZbxClient::new(
        config.endpoint.clone(),
        config.token.clone(),
        config.http_request_timeout,
        config.http_connect_timeout,
        cli.insecure,
    )?;
    info!(endpoint = %client.endpoint(), "zabbix client ready");
    let dashboard = Dashboard::new(client);

    let format = cli.format;
    let view: Box<dyn Render> = match cli.command {
        Command::History(args) => {
            announce(format, &HistoryView::pending());
            let form = range_form(args, config.value_type);
            Box::new(dashboard.history_stats(&form).await?)
        }
        Command::Trends(args) => {
            announce(format, &TrendView::pending());
            let form = range_form(args, config.value_type);
            Box::new(dashboard.traffic_trends(&form).await?)
        }
        Command::Problems => {
            announce(format, &ProblemView::pending());
            Box::new(dashboard.active_problems().await?)
        }
        Command::CreateUser(args) => {
            let form = user_form(args, &config)?;
            announce(format, &RegistrationView::pending());
            Box::new(dashboard.register_user(&form).await?)
        }
    };

    println!("{}", view.render(format));
    Ok(exit_code(view.status().tone))
}

/// Shows the "loading" status on stderr while the request runs.
fn announce(format: Format, pending: &dyn Render) {
    if format == Format::Text {
        eprintln!("{}", pending.status());
    }
}

fn range_form(args: RangeArgs, default_type: ValueType) -> ItemRangeForm {
    ItemRangeForm {
        item_id: args.item_id,
        time_from: args.from,
        time_till: args.till,
        value_type: args.value_type.unwrap_or(default_type),
    }
}

fn user_form(args: CreateUserArgs, config: &Config) -> Result<UserForm> {
    let password = std::env::var(&args.password_env).map_err(|_| InputError::MissingEnv {
        var: args.password_env.clone(),
    })?;
    Ok(UserForm {
        alias: args.alias,
        password: SecretString::from(password),
        name: args.name,
        surname: args.surname,
        group_id: args.group_id,
        lang: args.lang.unwrap_or_else(|| config.user_lang.clone()),
    })
}

const fn exit_code(tone: Tone) -> ExitCode {
    match tone {
        Tone::Error => ExitCode::FAILURE,
        Tone::Neutral | Tone::Success | Tone::Warning | Tone::Alert => ExitCode::SUCCESS,
    }
}
