use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

/// Raw value of a single worksheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Error(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Empty cells and whitespace-only text both count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Plain string form used for every field that gets no special normalization.
    pub fn to_plain_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Bool(true) => "True".to_string(),
            CellValue::Bool(false) => "False".to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Error(code) => code.clone(),
        }
    }
}

// Integral floats print without a fractional part so that a numeric
// `Baris` of 1.0 joins with a textual "1".
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

/// One data row keyed by the header names of its table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub data: HashMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<CellValue>) -> Self {
        self.data.insert(column.to_string(), value.into());
        self
    }

    /// Missing columns read as `Empty`.
    pub fn value(&self, column: &str) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.data.get(column).unwrap_or(&EMPTY)
    }
}

/// One output leaf: element name and its text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub tag: &'static str,
    pub text: String,
}

impl Field {
    pub fn new(tag: &'static str, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GoodService {
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaxInvoice {
    pub fields: Vec<Field>,
    pub goods: Vec<GoodService>,
}

impl TaxInvoice {
    pub fn field(&self, tag: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.tag == tag)
            .map(|f| f.text.as_str())
    }
}

impl GoodService {
    pub fn field(&self, tag: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.tag == tag)
            .map(|f| f.text.as_str())
    }
}

/// The assembled `TaxInvoiceBulk` tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceDocument {
    pub tin: String,
    pub invoices: Vec<TaxInvoice>,
}

impl InvoiceDocument {
    pub fn line_item_count(&self) -> usize {
        self.invoices.iter().map(|inv| inv.goods.len()).sum()
    }
}

/// Both tables read from a workbook, ready for assembly.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub headers: Vec<Row>,
    pub details: Vec<Row>,
}

/// Diagnostics collected while converting one workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub header_rows: usize,
    pub detail_rows: usize,
    pub invoices: usize,
    pub line_items: usize,
    pub dropped_details: usize,
    pub unmatched_keys: Vec<String>,
    pub unparsed_fields: usize,
}

impl ConversionReport {
    pub fn summary(&self) -> String {
        format!(
            "{} invoices, {} line items ({} detail rows dropped, {} unparsed fields)",
            self.invoices, self.line_items, self.dropped_details, self.unparsed_fields
        )
    }
}

/// Serialized XML plus the report of the conversion that produced it.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: InvoiceDocument,
    pub xml: Vec<u8>,
    pub report: ConversionReport,
}
