use chrono::{Local, TimeZone};
use tracing::{info, warn};

use crate::Result;
use crate::outcome::Outcome;
use crate::util::html::html_escape;
use crate::util::time::unix_to_local_in;
use crate::view::{Render, StatusMessage, Tone};
use crate::zbx_client::Trend;

use super::{Dashboard, ItemRangeForm};

/// One trend bucket, ready for display.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrendRow {
    pub period: String,
    pub average: String,
    pub min: String,
    pub max: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrendView {
    pub status: StatusMessage,
    pub rows: Vec<TrendRow>,
    /// Text shown in place of the list when there are no rows.
    pub note: Option<String>,
}

impl TrendRow {
    fn from_trend_in<Tz>(trend: &Trend, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            period: unix_to_local_in(trend.clock, tz),
            average: format!("{:.2}", trend.value_avg),
            min: format!("{:.2}", trend.value_min),
            max: format!("{:.2}", trend.value_max),
        }
    }
}

impl TrendView {
    pub fn pending() -> Self {
        Self {
            status: StatusMessage::new(Tone::Neutral, "Obteniendo tendencias de tráfico..."),
            rows: Vec::new(),
            note: Some("Cargando...".to_string()),
        }
    }

    pub fn from_outcome(item_id: &str, outcome: Outcome<Trend>) -> Self {
        Self::from_outcome_in(item_id, outcome, &Local)
    }

    pub fn from_outcome_in<Tz>(item_id: &str, outcome: Outcome<Trend>, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        match outcome {
            Outcome::ApiError(err) => Self {
                status: StatusMessage::new(
                    Tone::Error,
                    format!(
                        "Error de API: {}. Verifica el token y el ID del ítem.",
                        err.detail()
                    ),
                ),
                rows: Vec::new(),
                note: Some("Error en la consulta de tendencias.".to_string()),
            },
            Outcome::Empty => Self {
                status: StatusMessage::new(
                    Tone::Warning,
                    format!("Ítem {item_id} no tiene datos de tendencia disponibles."),
                ),
                rows: Vec::new(),
                note: Some(
                    "No se encontraron datos de tendencia (tráfico) en el rango de tiempo especificado."
                        .to_string(),
                ),
            },
            Outcome::Data(trends) => Self {
                status: StatusMessage::new(
                    Tone::Success,
                    format!("{} periodos de tráfico analizados con éxito.", trends.len()),
                ),
                rows: trends
                    .iter()
                    .map(|t| TrendRow::from_trend_in(t, tz))
                    .collect(),
                note: None,
            },
        }
    }

    pub fn connection_failed(err: &impl std::fmt::Display) -> Self {
        Self {
            status: StatusMessage::new(
                Tone::Error,
                format!("Error de conexión o servidor: {err}"),
            ),
            rows: Vec::new(),
            note: None,
        }
    }
}

impl Render for TrendView {
    fn status(&self) -> &StatusMessage {
        &self.status
    }

    fn to_text(&self) -> String {
        let mut out = self.status.to_string();
        if let Some(note) = &self.note {
            out.push('\n');
            out.push_str(note);
        }
        for row in &self.rows {
            out.push_str(&format!(
                "\nPeriodo: {}  Promedio de carga: {} (Min: {}, Max: {})",
                row.period, row.average, row.min, row.max
            ));
        }
        out
    }

    fn to_html(&self) -> String {
        let mut out = self.status.to_html();
        out.push_str(r#"<div id="trendData">"#);
        if let Some(note) = &self.note {
            out.push_str(&html_escape(note));
        }
        for row in &self.rows {
            out.push_str(&format!(
                r#"<div class="traffic-item"><strong>Periodo:</strong> {} <br>Promedio de Carga: <strong>{}</strong> (Min: {}, Max: {})</div>"#,
                html_escape(&row.period),
                row.average,
                row.min,
                row.max
            ));
        }
        out.push_str("</div>");
        out
    }
}

impl Dashboard {
    /// Fetches hourly trend buckets for one item, oldest first.
    ///
    /// # Errors
    ///
    /// Bad form input, or [`crate::error::Error::Busy`] when another
    /// submission is still running.
    pub async fn traffic_trends(&self, form: &ItemRangeForm) -> Result<TrendView> {
        let query = form.to_query()?;
        let _permit = self.begin("trends")?;
        info!(
            item_id = %query.item_id,
            value_type = %query.value_type,
            time_from = query.time_from,
            time_till = query.time_till,
            "requesting trends"
        );

        match self.client.trends(&query).await {
            Ok(envelope) => Ok(TrendView::from_outcome(
                &query.item_id,
                Outcome::classify(envelope),
            )),
            Err(err) => {
                warn!(error = %err, item_id = %query.item_id, "trend request failed");
                Ok(TrendView::connection_failed(&err))
            }
        }
    }
}
