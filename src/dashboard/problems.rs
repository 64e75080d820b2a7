use chrono::{Local, TimeZone};
use tracing::{info, warn};

use crate::Result;
use crate::outcome::Outcome;
use crate::types::Severity;
use crate::util::html::html_escape;
use crate::util::time::unix_to_local_in;
use crate::view::{Render, StatusMessage, Tone};
use crate::zbx_client::Problem;

use super::Dashboard;

const UNKNOWN_HOST: &str = "Host Desconocido";
const HEADERS: [&str; 4] = ["Host Afectado", "Problema (Trigger)", "Severidad", "Hora de Inicio"];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProblemRow {
    pub host: String,
    pub description: String,
    pub severity: Severity,
    pub started: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProblemView {
    pub status: StatusMessage,
    pub rows: Vec<ProblemRow>,
}

impl ProblemRow {
    fn from_problem_in<Tz>(problem: Problem, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            host: problem.host.unwrap_or_else(|| UNKNOWN_HOST.to_string()),
            description: problem.description,
            severity: problem.severity,
            started: unix_to_local_in(problem.clock, tz),
        }
    }

    fn severity_html(&self) -> String {
        format!(
            r#"<span class="severity-{}">{}</span>"#,
            self.severity.as_zabbix_code(),
            self.severity.label()
        )
    }

    fn cells(&self) -> [&str; 4] {
        [
            self.host.as_str(),
            self.description.as_str(),
            self.severity.label(),
            self.started.as_str(),
        ]
    }
}

impl ProblemView {
    pub fn pending() -> Self {
        Self {
            status: StatusMessage::new(Tone::Neutral, "Buscando problemas activos..."),
            rows: Vec::new(),
        }
    }

    pub fn from_outcome(outcome: Outcome<Problem>) -> Self {
        Self::from_outcome_in(outcome, &Local)
    }

    pub fn from_outcome_in<Tz>(outcome: Outcome<Problem>, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        match outcome {
            Outcome::ApiError(err) => Self {
                status: StatusMessage::new(
                    Tone::Error,
                    format!(
                        "Error de API: {}. Verifica el token y los permisos.",
                        err.detail()
                    ),
                ),
                rows: Vec::new(),
            },
            Outcome::Empty => Self {
                status: StatusMessage::new(Tone::Success, "¡No hay problemas sin resolver!"),
                rows: Vec::new(),
            },
            Outcome::Data(problems) => Self {
                status: StatusMessage::new(
                    Tone::Alert,
                    format!("Se encontraron {} problemas sin resolver.", problems.len()),
                ),
                rows: problems
                    .into_iter()
                    .map(|p| ProblemRow::from_problem_in(p, tz))
                    .collect(),
            },
        }
    }

    pub fn connection_failed(err: &impl std::fmt::Display) -> Self {
        Self {
            status: StatusMessage::connection_error(err),
            rows: Vec::new(),
        }
    }
}

impl Render for ProblemView {
    fn status(&self) -> &StatusMessage {
        &self.status
    }

    fn to_text(&self) -> String {
        let mut out = self.status.to_string();
        if self.rows.is_empty() {
            return out;
        }

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        out.push('\n');
        out.push_str(&padded_line(HEADERS, widths));
        for row in &self.rows {
            out.push('\n');
            out.push_str(&padded_line(row.cells(), widths));
        }
        out
    }

    fn to_html(&self) -> String {
        let mut out = self.status.to_html();
        out.push_str(r#"<div id="problemList">"#);
        if !self.rows.is_empty() {
            out.push_str("<table><thead><tr>");
            for header in HEADERS {
                out.push_str(&format!("<th>{header}</th>"));
            }
            out.push_str("</tr></thead><tbody>");
            for row in &self.rows {
                out.push_str(&format!(
                    "<tr><td><strong>{}</strong></td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    html_escape(&row.host),
                    html_escape(&row.description),
                    row.severity_html(),
                    html_escape(&row.started)
                ));
            }
            out.push_str("</tbody></table>");
        }
        out.push_str("</div>");
        out
    }
}

fn padded_line(cells: [&str; 4], widths: [usize; 4]) -> String {
    let mut line = String::new();
    let last = cells.len() - 1;
    for (i, (cell, width)) in cells.into_iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        if i < last {
            let pad = width.saturating_sub(cell.chars().count());
            line.extend(std::iter::repeat_n(' ', pad));
        }
    }
    line
}

impl Dashboard {
    /// Lists unresolved, unacknowledged problems in API order.
    ///
    /// # Errors
    ///
    /// [`crate::error::Error::Busy`] when another submission is still running.
    pub async fn active_problems(&self) -> Result<ProblemView> {
        let _permit = self.begin("problems")?;
        info!("requesting active problems");

        match self.client.active_problems().await {
            Ok(envelope) => Ok(ProblemView::from_outcome(Outcome::classify(envelope))),
            Err(err) => {
                warn!(error = %err, "problem request failed");
                Ok(ProblemView::connection_failed(&err))
            }
        }
    }
}
