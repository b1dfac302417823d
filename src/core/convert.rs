//! Workbook → XML in one call: read both tables, assemble, serialize.

use crate::adapters::workbook::Workbook;
use crate::core::assembly::assemble;
use crate::core::reader::read_table;
use crate::core::serializer::{serialize, XmlOptions};
use crate::domain::mapping::{Template, UnmatchedPolicy};
use crate::domain::model::{Conversion, SourceTables};
use crate::utils::error::Result;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

/// Everything a conversion needs besides the workbook itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub template: Template,
    pub unmatched: UnmatchedPolicy,
    pub xml: XmlOptions,
}

/// Reads the `Faktur` and `DetailFaktur` tables.
pub fn read_tables<RS: Read + Seek>(
    workbook: &mut Workbook<RS>,
    template: &Template,
) -> Result<SourceTables> {
    let marker = Some(template.end_marker.as_str());

    let header_sheet = workbook.sheet(&template.header_sheet.name)?;
    let headers = read_table(&header_sheet, template.header_sheet.header_row, marker)?;

    let detail_sheet = workbook.sheet(&template.detail_sheet.name)?;
    let details = read_table(&detail_sheet, template.detail_sheet.header_row, marker)?;

    tracing::debug!(
        "Read {} header rows from '{}' and {} detail rows from '{}'",
        headers.len(),
        template.header_sheet.name,
        details.len(),
        template.detail_sheet.name
    );

    Ok(SourceTables { headers, details })
}

/// Assembles and serializes already-read tables.
pub fn convert_tables(tables: &SourceTables, options: &ConvertOptions) -> Result<Conversion> {
    let (document, report) = assemble(
        &tables.headers,
        &tables.details,
        &options.template,
        options.unmatched,
    )?;
    let xml = serialize(&document, &options.xml)?;
    Ok(Conversion {
        document,
        xml,
        report,
    })
}

pub fn convert_workbook<RS: Read + Seek>(
    workbook: &mut Workbook<RS>,
    options: &ConvertOptions,
) -> Result<Conversion> {
    let tables = read_tables(workbook, &options.template)?;
    convert_tables(&tables, options)
}

pub fn convert_file(path: impl AsRef<Path>, options: &ConvertOptions) -> Result<Conversion> {
    let mut workbook = Workbook::open(path)?;
    convert_workbook(&mut workbook, options)
}

pub fn convert_bytes(data: Vec<u8>, options: &ConvertOptions) -> Result<Conversion> {
    let mut workbook = Workbook::from_bytes(data)?;
    convert_workbook(&mut workbook, options)
}

/// `<dir>/<stem>.xml`, where `dir` defaults to the input's own folder.
pub fn output_path_for(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let file_name = input
        .file_stem()
        .map(|stem| {
            let mut name = stem.to_os_string();
            name.push(".xml");
            PathBuf::from(name)
        })
        .unwrap_or_else(|| PathBuf::from("output.xml"));

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input
            .parent()
            .map(|parent| parent.join(&file_name))
            .unwrap_or(file_name),
    }
}
