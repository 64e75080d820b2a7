//! Summary statistics over raw history samples.

/// Count, mean and extremes of a non-empty series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Returns `None` for an empty series so callers never divide by zero.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let (first, rest) = values.split_first()?;
        let mut min = *first;
        let mut max = *first;
        let mut total = *first;
        for &value in rest {
            total += value;
            min = min.min(value);
            max = max.max(value);
        }
        #[allow(clippy::cast_precision_loss)]
        let average = total / values.len() as f64;
        Some(Self {
            count: values.len(),
            average,
            min,
            max,
        })
    }

    pub fn average_display(&self) -> String {
        format!("{:.2}", self.average)
    }

    /// Shortest round-trip form: `10`, `10.5`.
    pub fn min_display(&self) -> String {
        self.min.to_string()
    }

    pub fn max_display(&self) -> String {
        self.max.to_string()
    }
}

/// Result of parsing raw sample strings: the numeric values and how many
/// entries were missing or could not be read as numbers.
#[derive(Debug, Default, PartialEq)]
pub struct Parsed {
    pub values: Vec<f64>,
    pub skipped: usize,
}

pub fn parse_values<'a, I>(raw: I) -> Parsed
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut parsed = Parsed::default();
    for value in raw {
        match value.map(|v| v.trim().parse::<f64>()) {
            Some(Ok(v)) if v.is_finite() => parsed.values.push(v),
            _ => parsed.skipped += 1,
        }
    }
    parsed
}
