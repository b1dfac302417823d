//! Fixed layout of the CoreTax Excel template and its XML counterpart.
//!
//! The column → element tables are literal constants. Everything that may
//! legitimately differ between copies of the template (sheet names, header row
//! positions, the end marker) lives in [`Template`], which is passed explicitly
//! into every conversion.

use serde::{Deserialize, Serialize};

pub const HEADER_SHEET: &str = "Faktur";
pub const DETAIL_SHEET: &str = "DetailFaktur";
pub const HEADER_ROW: usize = 3;
pub const DETAIL_ROW: usize = 1;
pub const JOIN_KEY_COLUMN: &str = "Baris";
pub const END_MARKER: &str = "END";
pub const SELLER_TKU_COLUMN: &str = "ID TKU Penjual";
pub const TIN_MAX_LEN: usize = 16;

pub const DATE_FIELD: &str = "TaxInvoiceDate";

pub const NUMERIC_FIELDS: &[&str] = &[
    "Price",
    "Qty",
    "TotalDiscount",
    "TaxBase",
    "OtherTaxBase",
    "VATRate",
    "VAT",
    "STLGRate",
    "STLG",
];

const FAKTUR_COLUMNS: &[(&str, &str)] = &[
    ("Tanggal Faktur", "TaxInvoiceDate"),
    ("Jenis Faktur", "TaxInvoiceOpt"),
    ("Kode Transaksi", "TrxCode"),
    ("Keterangan Tambahan", "AddInfo"),
    ("Dokumen Pendukung", "CustomDoc"),
    ("Period Dok Pendukung", "CustomDocMonthYear"),
    ("Referensi", "RefDesc"),
    ("Cap Fasilitas", "FacilityStamp"),
    ("ID TKU Penjual", "SellerIDTKU"),
    ("NPWP/NIK Pembeli", "BuyerTin"),
    ("Jenis ID Pembeli", "BuyerDocument"),
    ("Negara Pembeli", "BuyerCountry"),
    ("Nomor Dokumen Pembeli", "BuyerDocumentNumber"),
    ("Nama Pembeli", "BuyerName"),
    ("Alamat Pembeli", "BuyerAdress"),
    ("Email Pembeli", "BuyerEmail"),
    ("ID TKU Pembeli", "BuyerIDTKU"),
];

const DETAIL_COLUMNS: &[(&str, &str)] = &[
    ("Barang/Jasa", "Opt"),
    ("Kode Barang Jasa", "Code"),
    ("Nama Barang/Jasa", "Name"),
    ("Nama Satuan Ukur", "Unit"),
    ("Harga Satuan", "Price"),
    ("Jumlah Barang Jasa", "Qty"),
    ("Total Diskon", "TotalDiscount"),
    ("DPP", "TaxBase"),
    ("DPP Nilai Lain", "OtherTaxBase"),
    ("Tarif PPN", "VATRate"),
    ("PPN", "VAT"),
    ("Tarif PPnBM", "STLGRate"),
    ("PPnBM", "STLG"),
];

/// Ordered source column → output element mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    entries: &'static [(&'static str, &'static str)],
}

impl FieldMap {
    pub const fn faktur() -> Self {
        Self {
            entries: FAKTUR_COLUMNS,
        }
    }

    pub const fn detail() -> Self {
        Self {
            entries: DETAIL_COLUMNS,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(_, tag)| *tag)
    }
}

/// Position of one table inside the workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub name: String,
    /// 1-based row holding the column names.
    pub header_row: usize,
}

impl SheetSpec {
    pub fn new(name: impl Into<String>, header_row: usize) -> Self {
        Self {
            name: name.into(),
            header_row,
        }
    }
}

/// What to do with detail rows whose `Baris` matches no invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Drop them without a log line.
    #[default]
    Ignore,
    /// Drop them and log every dropped key.
    Warn,
    /// Abort the conversion.
    Fail,
}

/// Immutable description of the workbook template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub header_sheet: SheetSpec,
    pub detail_sheet: SheetSpec,
    pub end_marker: String,
    pub join_key: String,
    pub seller_column: String,
    pub header_fields: FieldMap,
    pub detail_fields: FieldMap,
    pub date_field: &'static str,
    pub numeric_fields: &'static [&'static str],
}

impl Template {
    /// The DJP CoreTax bulk-import template.
    pub fn coretax() -> Self {
        Self {
            header_sheet: SheetSpec::new(HEADER_SHEET, HEADER_ROW),
            detail_sheet: SheetSpec::new(DETAIL_SHEET, DETAIL_ROW),
            end_marker: END_MARKER.to_string(),
            join_key: JOIN_KEY_COLUMN.to_string(),
            seller_column: SELLER_TKU_COLUMN.to_string(),
            header_fields: FieldMap::faktur(),
            detail_fields: FieldMap::detail(),
            date_field: DATE_FIELD,
            numeric_fields: NUMERIC_FIELDS,
        }
    }

    pub fn is_numeric(&self, tag: &str) -> bool {
        self.numeric_fields.contains(&tag)
    }

    pub fn is_date(&self, tag: &str) -> bool {
        self.date_field == tag
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::coretax()
    }
}
