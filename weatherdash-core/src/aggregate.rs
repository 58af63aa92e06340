//! Daily archive records → twelve monthly mean temperatures.

use chrono::{Datelike, NaiveDate};

use crate::{
    error::AggregateError,
    locale::{self, Language},
    model::{DailyRecord, MonthlyPoint, round_temp},
};

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    sum: f64,
    n: u32,
}

impl DailyRecord {
    /// Temperature this day contributes: the mean, else the max/min midpoint.
    ///
    /// Non-finite readings count as missing.
    pub fn representative(&self) -> Option<f64> {
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());

        finite(self.mean).or_else(|| match (finite(self.max), finite(self.min)) {
            (Some(max), Some(min)) => Some((max + min) / 2.0),
            _ => None,
        })
    }
}

/// Average `records` per calendar month.
///
/// Always yields 12 points, January first, with month ids of `year`. Months that
/// received no usable day carry `None`. Fails with [`AggregateError::NoData`]
/// only when `records` itself is empty.
pub fn monthly_averages(
    records: &[DailyRecord],
    year: i32,
) -> Result<Vec<MonthlyPoint>, AggregateError> {
    if records.is_empty() {
        return Err(AggregateError::NoData);
    }

    let mut buckets = [Bucket::default(); 12];

    for record in records {
        if let Some(v) = record.representative() {
            let bucket = &mut buckets[record.date.month0() as usize];
            bucket.sum += v;
            bucket.n += 1;
        }
    }

    Ok(buckets
        .iter()
        .enumerate()
        .map(|(i, b)| MonthlyPoint {
            month: format!("{year}-{:02}", i + 1),
            label: None,
            avg_temp_c: (b.n > 0).then(|| round_temp(b.sum / f64::from(b.n))),
        })
        .collect())
}

/// Fill each point's label with the month name in `lang`.
pub fn label_months(points: &mut [MonthlyPoint], lang: Language) {
    for (i, point) in points.iter_mut().enumerate() {
        point.label = Some(locale::month_name(lang, i).to_string());
    }
}

/// Zip the archive's parallel daily columns into records.
///
/// Columns shorter than `time` leave the remaining readings missing. Entries
/// whose date does not parse are skipped.
pub fn records_from_columns(
    time: &[String],
    mean: &[Option<f64>],
    max: &[Option<f64>],
    min: &[Option<f64>],
) -> Vec<DailyRecord> {
    let at = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten();

    time.iter()
        .enumerate()
        .filter_map(|(i, iso)| match NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
            Ok(date) => Some(DailyRecord {
                date,
                mean: at(mean, i),
                max: at(max, i),
                min: at(min, i),
            }),
            Err(err) => {
                tracing::debug!(date = %iso, %err, "skipping archive day with unparseable date");
                None
            }
        })
        .collect()
}
