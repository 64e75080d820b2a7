use tracing::{info, warn};

use crate::Result;
use crate::outcome::Outcome;
use crate::stats::{Summary, parse_values};
use crate::util::html::html_escape;
use crate::view::{FIELD_PLACEHOLDER, Render, StatusMessage, Tone};
use crate::zbx_client::HistorySample;

use super::{Dashboard, ItemRangeForm};

/// Sample count, mean and extremes of one item over a time range.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HistoryView {
    pub status: StatusMessage,
    pub sample_count: String,
    pub average: String,
    pub min: String,
    pub max: String,
}

impl HistoryView {
    pub fn pending() -> Self {
        Self::blank(StatusMessage::new(
            Tone::Neutral,
            "Obteniendo datos históricos...",
        ))
    }

    fn blank(status: StatusMessage) -> Self {
        Self {
            status,
            sample_count: FIELD_PLACEHOLDER.to_string(),
            average: FIELD_PLACEHOLDER.to_string(),
            min: FIELD_PLACEHOLDER.to_string(),
            max: FIELD_PLACEHOLDER.to_string(),
        }
    }

    pub fn from_outcome(item_id: &str, outcome: Outcome<HistorySample>) -> Self {
        match outcome {
            Outcome::ApiError(err) => Self::blank(StatusMessage::new(
                Tone::Error,
                format!(
                    "Error de API: {}. Verifica tus permisos, token o el ID del ítem.",
                    err.detail()
                ),
            )),
            Outcome::Empty => Self::blank(StatusMessage::new(
                Tone::Warning,
                format!(
                    "No se encontraron datos históricos para el Ítem {item_id} en el rango de tiempo especificado."
                ),
            )),
            Outcome::Data(samples) => {
                let parsed = parse_values(samples.iter().map(|s| s.value.as_deref()));
                let Some(summary) = Summary::from_values(&parsed.values) else {
                    return Self::blank(StatusMessage::new(
                        Tone::Warning,
                        format!(
                            "Ninguna de las {} muestras del Ítem {item_id} tiene un valor numérico.",
                            samples.len()
                        ),
                    ));
                };
                let mut text = format!("{} muestras analizadas con éxito.", summary.count);
                if parsed.skipped > 0 {
                    text.push_str(&format!(
                        " Se ignoraron {} valores no numéricos.",
                        parsed.skipped
                    ));
                }
                Self {
                    status: StatusMessage::new(Tone::Success, text),
                    sample_count: summary.count.to_string(),
                    average: summary.average_display(),
                    min: summary.min_display(),
                    max: summary.max_display(),
                }
            }
        }
    }

    pub fn connection_failed(err: &impl std::fmt::Display) -> Self {
        Self::blank(StatusMessage::connection_error(err))
    }

    fn fields(&self) -> [(&'static str, &'static str, &str); 4] {
        [
            ("sampleCount", "Muestras", self.sample_count.as_str()),
            ("averageValue", "Promedio", self.average.as_str()),
            ("minValue", "Mínimo", self.min.as_str()),
            ("maxValue", "Máximo", self.max.as_str()),
        ]
    }
}

impl Render for HistoryView {
    fn status(&self) -> &StatusMessage {
        &self.status
    }

    fn to_text(&self) -> String {
        let mut out = self.status.to_string();
        for (_, label, value) in self.fields() {
            out.push_str(&format!("\n{:<10}{value}", format!("{label}:")));
        }
        out
    }

    fn to_html(&self) -> String {
        let mut out = self.status.to_html();
        out.push_str(r#"<dl class="history-stats">"#);
        for (id, label, value) in self.fields() {
            out.push_str(&format!(
                r#"<dt>{label}</dt><dd id="{id}">{}</dd>"#,
                html_escape(value)
            ));
        }
        out.push_str("</dl>");
        out
    }
}

impl Dashboard {
    /// Fetches raw history for one item and summarises it.
    ///
    /// # Errors
    ///
    /// Bad form input, or [`crate::error::Error::Busy`] when another
    /// submission is still running.
    pub async fn history_stats(&self, form: &ItemRangeForm) -> Result<HistoryView> {
        let query = form.to_query()?;
        let _permit = self.begin("history")?;
        info!(
            item_id = %query.item_id,
            value_type = %query.value_type,
            time_from = query.time_from,
            time_till = query.time_till,
            "requesting history"
        );

        match self.client.history(&query).await {
            Ok(envelope) => Ok(HistoryView::from_outcome(
                &query.item_id,
                Outcome::classify(envelope),
            )),
            Err(err) => {
                warn!(error = %err, item_id = %query.item_id, "history request failed");
                Ok(HistoryView::connection_failed(&err))
            }
        }
    }
}
