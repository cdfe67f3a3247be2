//! Snapshot record shared by the file readers.

use loanwatch_portfolio::{LoadError, ReportPeriod, SnapshotRow};
use serde::{de, Deserialize, Deserializer};
use serde_json::{Map, Value};

pub(crate) const REPORT_DT: &str = "report_dt";
pub(crate) const CREDIT_TYPE: &str = "credit_type";
pub(crate) const CUR_DEFAULT: &str = "cur_default";
pub(crate) const DEFAULT_12M: &str = "default_12m";
pub(crate) const DEFAULT_REASON: &str = "default_reason";
pub(crate) const RATING: &str = "rating";

/// Columns every snapshot file must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    REPORT_DT,
    CREDIT_TYPE,
    CUR_DEFAULT,
    DEFAULT_12M,
    DEFAULT_REASON,
    RATING,
];

/// Accepted names of the optional contract identifier column, by priority.
pub const CONTRACT_ID_COLUMNS: [&str; 3] = ["contract_id", "agr_cred_id", "id"];

/// Cell values that spreadsheet and dataframe exports write for a missing
/// default reason.
const ABSENT_SENTINELS: [&str; 5] = ["nan", "NaN", "None", "null", "NA"];

/// Required columns not present in `columns`, in canonical order.
pub(crate) fn missing_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let present: Vec<&str> = columns.into_iter().collect();
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !present.contains(required))
        .map(|c| (*c).to_string())
        .collect()
}

// =============================================================================
// RECORD
// =============================================================================

/// One input record, keyed by column name.
///
/// Every cell is read as text; blank cells count as absent. Each identifier
/// column is kept separately so a blank `contract_id` does not hide a
/// filled `agr_cred_id`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawSnapshotRecord {
    #[serde(deserialize_with = "report_dt")]
    report_dt: ReportPeriod,
    #[serde(deserialize_with = "credit_type")]
    credit_type: String,
    #[serde(deserialize_with = "cur_default")]
    cur_default: bool,
    #[serde(deserialize_with = "default_12m")]
    default_12m: bool,
    #[serde(default, deserialize_with = "default_reason")]
    default_reason: Option<String>,
    #[serde(deserialize_with = "rating")]
    rating: i32,
    #[serde(default, deserialize_with = "cell")]
    contract_id: Option<String>,
    #[serde(default, deserialize_with = "cell")]
    agr_cred_id: Option<String>,
    #[serde(default, deserialize_with = "cell")]
    id: Option<String>,
}

impl From<RawSnapshotRecord> for SnapshotRow {
    fn from(record: RawSnapshotRecord) -> Self {
        Self {
            report_period: record.report_dt,
            product_type: record.credit_type,
            current_default: record.cur_default,
            forward_default: record.default_12m,
            default_reason: record.default_reason,
            rating: record.rating,
            contract_id: record.contract_id.or(record.agr_cred_id).or(record.id),
        }
    }
}

/// Builds a row from one JSON object. Scalars are read as cell text, so
/// `1`, `1.0`, `true` and `"1"` are the same flag.
pub(crate) fn row_from_json(
    line: u64,
    object: Map<String, Value>,
) -> Result<SnapshotRow, LoadError> {
    let cells: Map<String, Value> = object
        .into_iter()
        .map(|(column, value)| (column, cell_text(value)))
        .collect();

    serde_json::from_value::<RawSnapshotRecord>(Value::Object(cells))
        .map(SnapshotRow::from)
        .map_err(|e| malformed(line, &e.to_string()))
}

fn cell_text(value: Value) -> Value {
    match value {
        Value::Null | Value::String(_) => value,
        Value::Number(n) => Value::String(n.to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        other => Value::String(other.to_string()),
    }
}

/// Turns a record deserialisation message into a [`LoadError::Malformed`].
///
/// Cell errors are written as `"<column>: <reason>"`; serde reports a
/// missing key as ``missing field `<column>` ``.
pub(crate) fn malformed(line: u64, message: &str) -> LoadError {
    if let Some(rest) = message.strip_prefix("missing field `") {
        let column = rest.split('`').next().unwrap_or(rest);
        return LoadError::malformed(line, column, "missing value");
    }

    match message.split_once(": ") {
        Some((column, reason)) => LoadError::malformed(line, column, reason),
        None => LoadError::malformed(line, "record", message),
    }
}

// =============================================================================
// CELL DESERIALIZERS
// =============================================================================

fn cell_error<E: de::Error>(column: &str, reason: impl std::fmt::Display) -> E {
    E::custom(format!("{column}: {reason}"))
}

fn cell<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty()))
}

fn required_cell<'de, D: Deserializer<'de>>(
    deserializer: D,
    column: &str,
) -> Result<String, D::Error> {
    cell(deserializer)?.ok_or_else(|| cell_error(column, "missing value"))
}

fn report_dt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ReportPeriod, D::Error> {
    let raw = required_cell(deserializer, REPORT_DT)?;
    ReportPeriod::parse(&raw).map_err(|e| cell_error(REPORT_DT, e))
}

fn credit_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    required_cell(deserializer, CREDIT_TYPE)
}

fn cur_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = required_cell(deserializer, CUR_DEFAULT)?;
    parse_flag(&raw).map_err(|reason| cell_error(CUR_DEFAULT, reason))
}

fn default_12m<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = required_cell(deserializer, DEFAULT_12M)?;
    parse_flag(&raw).map_err(|reason| cell_error(DEFAULT_12M, reason))
}

fn default_reason<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(cell(deserializer)?.and_then(|raw| parse_reason(&raw)))
}

fn rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let raw = required_cell(deserializer, RATING)?;
    parse_rating(&raw).map_err(|reason| cell_error(RATING, reason))
}

/// Accepts `0`/`1`, `0.0`/`1.0`, `true`/`false` and `yes`/`no`.
fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => return Ok(true),
        "0" | "false" | "no" => return Ok(false),
        _ => {}
    }

    match raw.parse::<f64>() {
        Ok(v) if v == 1.0 => Ok(true),
        Ok(v) if v == 0.0 => Ok(false),
        _ => Err(format!("expected a 0/1 flag, got '{raw}'")),
    }
}

/// Accepts integers and integral floats such as `5.0`.
fn parse_rating(raw: &str) -> Result<i32, String> {
    if let Ok(rating) = raw.parse::<i32>() {
        return Ok(rating);
    }

    match raw.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) => {
            Ok(v as i32)
        }
        _ => Err(format!("expected an integer rating, got '{raw}'")),
    }
}

fn parse_reason(raw: &str) -> Option<String> {
    let reason = raw.trim();
    if reason.is_empty() || ABSENT_SENTINELS.contains(&reason) {
        None
    } else {
        Some(reason.to_string())
    }
}
