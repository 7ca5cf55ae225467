use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{GanttError, GanttResult};

use super::column::Column;
use super::layout::{Extent, Rescalable};
use super::time_unit::TimeUnit;

/// Coarser band spanning consecutive columns of the same unit period.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnHeader {
    date: NaiveDateTime,
    end_date: NaiveDateTime,
    unit: TimeUnit,
    label: String,
    left: f64,
    width: f64,
    original_size: Extent,
    factor: f64,
}

impl ColumnHeader {
    fn start(column: &Column, unit: TimeUnit, label: String) -> Self {
        Self {
            date: column.date(),
            end_date: unit.checked_add(column.date(), 1).unwrap_or(column.end_date()),
            unit,
            label,
            left: column.left(),
            width: column.width(),
            original_size: column.original_size(),
            factor: column.width_factor(),
        }
    }

    fn absorb(&mut self, column: &Column) {
        self.width += column.width();
        self.original_size.width += column.original_size().width;
    }

    #[must_use]
    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    #[must_use]
    pub fn end_date(&self) -> NaiveDateTime {
        self.end_date
    }

    #[must_use]
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.left
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn width_factor(&self) -> f64 {
        self.factor
    }
}

impl Rescalable for ColumnHeader {
    fn original_size(&self) -> Extent {
        self.original_size
    }

    fn apply_width_factor(&mut self, factor: f64) {
        let live = self.original_size.scaled(factor);
        self.left = live.left;
        self.width = live.width;
        self.factor = factor;
    }
}

/// Per-unit label format overrides, falling back to built-in defaults.
///
/// Formats are strftime patterns where `%Q` stands for the quarter number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderFormats(IndexMap<TimeUnit, String>);

impl HeaderFormats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_format(mut self, unit: TimeUnit, format: impl Into<String>) -> Self {
        self.0.insert(unit, format.into());
        self
    }

    pub fn set(&mut self, unit: TimeUnit, format: impl Into<String>) {
        self.0.insert(unit, format.into());
    }

    #[must_use]
    pub fn get(&self, unit: TimeUnit) -> Option<&str> {
        self.0.get(&unit).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Format used for `unit` headers under `scale`.
    ///
    /// Lookup order: override, scale-group default, general default.
    #[must_use]
    pub fn resolve(&self, unit: TimeUnit, scale: TimeUnit) -> &str {
        if let Some(format) = self.get(unit) {
            return format;
        }
        let scoped = if scale.is_sub_day() {
            sub_day_scale_format(unit)
        } else if scale >= TimeUnit::Month {
            long_scale_format(unit)
        } else {
            None
        };
        scoped.unwrap_or_else(|| default_format(unit))
    }

    /// Rejects overrides that are not valid strftime patterns.
    pub fn validate(&self) -> GanttResult<()> {
        for (unit, format) in &self.0 {
            if !is_valid_format(format) {
                return Err(GanttError::InvalidHeaderFormat {
                    unit: *unit,
                    format: format.clone(),
                });
            }
        }
        Ok(())
    }
}

fn default_format(unit: TimeUnit) -> &'static str {
    match unit {
        TimeUnit::Year => "%Y",
        TimeUnit::Quarter => "Q%Q %Y",
        TimeUnit::Month => "%B %Y",
        TimeUnit::Week => "%V",
        TimeUnit::Day => "%-d",
        TimeUnit::Hour => "%-H",
        TimeUnit::Minute => "%H:%M",
        TimeUnit::Second => "%H:%M:%S",
        TimeUnit::Millisecond => "%H:%M:%S%.3f",
    }
}

fn sub_day_scale_format(unit: TimeUnit) -> Option<&'static str> {
    match unit {
        TimeUnit::Day => Some("%B %-d, %Y"),
        TimeUnit::Hour => Some("%-H"),
        TimeUnit::Minute => Some("%H:%M"),
        _ => None,
    }
}

fn long_scale_format(unit: TimeUnit) -> Option<&'static str> {
    match unit {
        TimeUnit::Year => Some("%Y"),
        TimeUnit::Quarter => Some("Q%Q"),
        TimeUnit::Month => Some("%B"),
        _ => None,
    }
}

/// Header units shown by default for a view scale, coarsest first.
#[must_use]
pub fn default_header_units(scale: TimeUnit) -> Vec<TimeUnit> {
    use TimeUnit::{Day, Hour, Minute, Month, Quarter, Second, Week, Year};

    let rules: [(TimeUnit, &[TimeUnit]); 8] = [
        (Year, &[Year, Quarter, Month]),
        (Quarter, &[Quarter]),
        (Month, &[Day, Week, Month]),
        (Week, &[Day, Week]),
        (Day, &[Hour, Day]),
        (Hour, &[Hour, Minute, Second]),
        (Minute, &[Minute, Second]),
        (Second, &[Second]),
    ];

    let units: Vec<TimeUnit> = rules
        .iter()
        .filter(|(_, scales)| scales.contains(&scale))
        .map(|(unit, _)| *unit)
        .collect();
    if units.is_empty() { vec![scale] } else { units }
}

/// Substitutes `%Q` with the quarter of `date`, leaving other directives intact.
fn expand_quarter(format: &str, quarter: Option<u32>) -> String {
    let mut expanded = String::with_capacity(format.len());
    let mut chars = format.chars();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            expanded.push(ch);
            continue;
        }
        match chars.next() {
            Some('Q') => match quarter {
                Some(quarter) => {
                    let _ = write!(expanded, "{quarter}");
                }
                None => expanded.push('1'),
            },
            Some(next) => {
                expanded.push('%');
                expanded.push(next);
            }
            None => expanded.push('%'),
        }
    }
    expanded
}

#[must_use]
pub fn is_valid_format(format: &str) -> bool {
    let expanded = expand_quarter(format, None);
    !StrftimeItems::new(&expanded).any(|item| matches!(item, Item::Error))
}

/// Formats `date` with a header pattern.
pub fn format_label(date: NaiveDateTime, unit: TimeUnit, format: &str) -> GanttResult<String> {
    let invalid = || GanttError::InvalidHeaderFormat {
        unit,
        format: format.to_owned(),
    };

    let expanded = expand_quarter(format, Some(date.month0() / 3 + 1));
    let items: Vec<Item<'_>> = StrftimeItems::new(&expanded).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }

    let mut label = String::new();
    write!(label, "{}", date.format_with_items(items.iter())).map_err(|_| invalid())?;
    Ok(label)
}

/// Groups base columns into header bands, one list per unit.
#[derive(Debug, Clone, Copy)]
pub struct HeaderGenerator<'a> {
    scale: TimeUnit,
    units: &'a [TimeUnit],
    formats: &'a HeaderFormats,
}

impl<'a> HeaderGenerator<'a> {
    #[must_use]
    pub fn new(scale: TimeUnit, units: &'a [TimeUnit], formats: &'a HeaderFormats) -> Self {
        Self {
            scale,
            units,
            formats,
        }
    }

    pub fn generate(&self, columns: &[Column]) -> GanttResult<IndexMap<TimeUnit, Vec<ColumnHeader>>> {
        let mut headers = IndexMap::with_capacity(self.units.len());
        for &unit in self.units {
            headers.insert(unit, self.generate_unit(columns, unit)?);
        }
        Ok(headers)
    }

    fn generate_unit(&self, columns: &[Column], unit: TimeUnit) -> GanttResult<Vec<ColumnHeader>> {
        let format = self.formats.resolve(unit, self.scale);
        let mut bands: Vec<ColumnHeader> = Vec::new();
        let mut period = None;

        for column in columns {
            let column_period = unit.start_of(column.date());
            match bands.last_mut() {
                Some(band) if period == Some(column_period) => band.absorb(column),
                _ => {
                    let label = format_label(column.date(), unit, format)?;
                    bands.push(ColumnHeader::start(column, unit, label));
                    period = Some(column_period);
                }
            }
        }
        Ok(bands)
    }
}
