//! Tabular leader-list loading.
//!
//! The input is comma separated text with a header row. Cells are validated
//! into `LeaderRecord`s once, here; nothing downstream sees raw cells.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::error::{ViewError, ViewResult};

use super::{CountryGroup, Dataset, Gender, LeaderId, LeaderRecord};

const REQUIRED_COLUMNS: [&str; 9] = [
    "country",
    "leader",
    "gender",
    "start_year",
    "end_year",
    "start_age",
    "duration",
    "pcgdp",
    "label",
];
const ID_COLUMN: &str = "id";

/// What to do with a row whose cells fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// Fail the whole load with `ViewError::MalformedRow`.
    #[default]
    Reject,
    /// Drop the row, count it in `LoadReport::skipped_malformed`.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularLoadOptions {
    /// Cell value meaning "GDP not available". Empty cells are missing too.
    pub missing_metric_sentinel: String,
    pub malformed_rows: MalformedRowPolicy,
}

impl Default for TabularLoadOptions {
    fn default() -> Self {
        Self {
            missing_metric_sentinel: "NA".to_owned(),
            malformed_rows: MalformedRowPolicy::Reject,
        }
    }
}

/// Row accounting for one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub records_loaded: usize,
    pub excluded_non_positive_duration: usize,
    pub skipped_malformed: usize,
}

/// Parses leader-list text into a validated dataset.
///
/// Extra columns whose cells are all `0`/`1` are country-group flags; any
/// other extra column is ignored.
pub fn load_tabular(input: &str, options: &TabularLoadOptions) -> ViewResult<(Dataset, LoadReport)> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| ViewError::InvalidData("leader list is empty".to_owned()))?;
    let header: Vec<String> = split_fields(header)
        .map_err(|reason| ViewError::MalformedRow {
            line: header_line,
            reason,
        })?
        .into_iter()
        .map(|name| name.trim().to_ascii_lowercase())
        .collect();
    let columns = ColumnLayout::from_header(&header)?;

    let mut rows = Vec::new();
    for (line, text) in lines {
        let row = split_fields(text).and_then(|cells| {
            if cells.len() == header.len() {
                Ok(cells)
            } else {
                Err(format!("expected {} cells, found {}", header.len(), cells.len()))
            }
        });
        rows.push((line, row));
    }

    let groups = columns.group_columns(&rows);
    let mut report = LoadReport {
        rows_read: rows.len(),
        ..LoadReport::default()
    };
    let mut records = Vec::with_capacity(rows.len());

    for (row_index, (line, cells)) in rows.iter().enumerate() {
        let parsed = cells
            .as_ref()
            .map_err(Clone::clone)
            .and_then(|cells| columns.parse_record(row_index, cells, &groups, options));
        match parsed {
            Ok(record) if record.duration <= 0 => {
                report.excluded_non_positive_duration += 1;
            }
            Ok(record) => records.push(record),
            Err(reason) => match options.malformed_rows {
                MalformedRowPolicy::Reject => {
                    return Err(ViewError::MalformedRow {
                        line: *line,
                        reason,
                    });
                }
                MalformedRowPolicy::Skip => {
                    warn!(line = *line, reason = %reason, "skipping malformed leader row");
                    report.skipped_malformed += 1;
                }
            },
        }
    }

    report.records_loaded = records.len();
    let dataset = Dataset::with_groups(records, groups.keys().cloned())?;
    debug!(
        rows_read = report.rows_read,
        records_loaded = report.records_loaded,
        excluded_non_positive_duration = report.excluded_non_positive_duration,
        skipped_malformed = report.skipped_malformed,
        "leader list loaded"
    );
    Ok((dataset, report))
}

type RawRow = (usize, Result<Vec<String>, String>);

struct ColumnLayout {
    required: IndexMap<&'static str, usize>,
    id: Option<usize>,
    extra: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn from_header(header: &[String]) -> ViewResult<Self> {
        let position = |name: &str| header.iter().position(|column| column == name);

        let mut required = IndexMap::with_capacity(REQUIRED_COLUMNS.len());
        for name in REQUIRED_COLUMNS {
            let index = position(name).ok_or_else(|| {
                ViewError::InvalidData(format!("leader list is missing column `{name}`"))
            })?;
            required.insert(name, index);
        }

        let extra = header
            .iter()
            .enumerate()
            .filter(|(_, name)| !REQUIRED_COLUMNS.contains(&name.as_str()) && *name != ID_COLUMN)
            .map(|(index, name)| (index, name.clone()))
            .collect();

        Ok(Self {
            required,
            id: position(ID_COLUMN),
            extra,
        })
    }

    /// Extra columns whose well-formed cells are all `0`/`1`.
    fn group_columns(&self, rows: &[RawRow]) -> IndexMap<CountryGroup, usize> {
        self.extra
            .iter()
            .filter(|(index, name)| {
                let is_flag_column = rows
                    .iter()
                    .filter_map(|(_, cells)| cells.as_ref().ok())
                    .all(|cells| matches!(cells[*index].trim(), "0" | "1"));
                if !is_flag_column {
                    debug!(column = %name, "ignoring non-flag column");
                }
                is_flag_column
            })
            .map(|(index, name)| (CountryGroup::new(name.clone()), *index))
            .collect()
    }

    /// Trimmed cell of a required column.
    fn cell<'c>(&self, cells: &'c [String], name: &str) -> &'c str {
        self.required
            .get(name)
            .map_or("", |&index| cells[index].trim())
    }

    fn parse_record(
        &self,
        row_index: usize,
        cells: &[String],
        groups: &IndexMap<CountryGroup, usize>,
        options: &TabularLoadOptions,
    ) -> Result<LeaderRecord, String> {
        let id = match self.id {
            Some(index) => parse_whole(cells[index].trim(), ID_COLUMN).and_then(|value| {
                u32::try_from(value).map_err(|_| format!("`{ID_COLUMN}` must be non-negative"))
            })?,
            None => u32::try_from(row_index).map_err(|_| "too many rows".to_owned())?,
        };

        let text = |name: &str| -> Result<String, String> {
            let value = self.cell(cells, name);
            if value.is_empty() {
                Err(format!("`{name}` must not be empty"))
            } else {
                Ok(value.to_owned())
            }
        };
        let number = |name: &str| parse_whole(self.cell(cells, name), name);

        let pcgdp_cell = self.cell(cells, "pcgdp");
        let pcgdp = if pcgdp_cell.is_empty() || pcgdp_cell == options.missing_metric_sentinel {
            None
        } else {
            let value: f64 = pcgdp_cell
                .parse()
                .map_err(|_| format!("`pcgdp` is not a number: `{pcgdp_cell}`"))?;
            if !value.is_finite() {
                return Err("`pcgdp` must be finite".to_owned());
            }
            Some(value)
        };

        let mut memberships = SmallVec::new();
        for (group, &index) in groups {
            if parse_flag(cells[index].trim(), group.as_str())? {
                memberships.push(group.clone());
            }
        }

        let start_year = number("start_year")?;
        let end_year = number("end_year")?;
        let duration = number("duration")?;
        if end_year.checked_sub(start_year) != Some(duration) {
            return Err(format!(
                "`duration` {duration} does not match {start_year}..{end_year}"
            ));
        }

        Ok(LeaderRecord {
            id: LeaderId(id),
            country: text("country")?,
            leader: text("leader")?,
            gender: Gender::new(text("gender")?),
            start_year,
            end_year,
            start_age: number("start_age")?,
            duration,
            pcgdp,
            highlighted: parse_flag(self.cell(cells, "label"), "label")?,
            groups: memberships,
        })
    }
}

/// Accepts integers and integral decimals such as `1990.0`.
fn parse_whole(cell: &str, column: &str) -> Result<i32, String> {
    if let Ok(value) = cell.parse::<i32>() {
        return Ok(value);
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => {
            if value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
                Ok(value as i32)
            } else {
                Err(format!("`{column}` is out of range: `{cell}`"))
            }
        }
        _ => Err(format!("`{column}` is not a whole number: `{cell}`")),
    }
}

fn parse_flag(cell: &str, column: &str) -> Result<bool, String> {
    match cell {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(format!("`{column}` must be 0 or 1, found `{other}`")),
    }
}

/// Splits one line into fields, honouring double-quoted fields with `""`
/// escapes.
fn split_fields(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match (ch, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            (',', false) => fields.push(std::mem::take(&mut current)),
            (ch, _) => current.push(ch),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_owned());
    }
    fields.push(current);
    Ok(fields)
}
