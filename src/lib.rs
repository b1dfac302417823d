//! Converts CoreTax `Faktur`/`DetailFaktur` workbooks into `TaxInvoiceBulk` XML.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{storage::LocalStorage, workbook::Workbook};
pub use core::{
    assembly::assemble,
    convert::{convert_bytes, convert_file, convert_tables, output_path_for, ConvertOptions},
    etl::{EtlEngine, RunOutcome},
    pipeline::InvoicePipeline,
    serializer::{serialize, XmlOptions},
};
pub use domain::mapping::{Template, UnmatchedPolicy};
pub use domain::model::{Conversion, ConversionReport, InvoiceDocument};
pub use utils::error::{EtlError, Result};
