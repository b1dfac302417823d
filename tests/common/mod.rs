#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

#[derive(Debug, Clone)]
pub enum Cell {
    Empty,
    Str(String),
    Num(f64),
    /// Serial number rendered with a date number format.
    Date(f64),
}

pub fn s(text: &str) -> Cell {
    Cell::Str(text.to_string())
}

pub fn n(value: f64) -> Cell {
    Cell::Num(value)
}

/// In-memory `.xlsx` built from plain rows; enough for calamine to read back.
#[derive(Default)]
pub struct XlsxBuilder {
    sheets: Vec<(String, Vec<Vec<Cell>>)>,
}

impl XlsxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, name: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.push((name.to_string(), rows));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut strings: Vec<String> = Vec::new();
        let sheet_xml: Vec<String> = self
            .sheets
            .iter()
            .map(|(_, rows)| worksheet_xml(rows, &mut strings))
            .collect();

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let mut add = |name: &str, content: &str| {
            zip.start_file::<_, ()>(name, FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        };

        add("[Content_Types].xml", &self.content_types());
        add("_rels/.rels", ROOT_RELS);
        add("xl/workbook.xml", &self.workbook_xml());
        add("xl/_rels/workbook.xml.rels", &self.workbook_rels());
        add("xl/styles.xml", STYLES);
        add("xl/sharedStrings.xml", &shared_strings_xml(&strings));
        for (i, xml) in sheet_xml.iter().enumerate() {
            add(&format!("xl/worksheets/sheet{}.xml", i + 1), xml);
        }

        zip.finish().unwrap().into_inner()
    }

    pub fn write_to(&self, path: &std::path::Path) {
        std::fs::write(path, self.build()).unwrap();
    }

    fn content_types(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
        );
        for i in 1..=self.sheets.len() {
            xml.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn workbook_xml(&self) -> String {
        let sheets: String = self
            .sheets
            .iter()
            .enumerate()
            .map(|(i, (name, _))| {
                format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    escape(name),
                    i + 1,
                    i + 1
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
            sheets
        )
    }

    fn workbook_rels(&self) -> String {
        let n = self.sheets.len();
        let mut rels: String = (1..=n)
            .map(|i| {
                format!(
                    r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                    i, i
                )
            })
            .collect();
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
            n + 1,
            n + 2
        ));
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rels
        )
    }
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

// Style 1 uses built-in number format 14 (m/d/yyyy), which readers treat as a date.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font/></fonts><fills count="1"><fill/></fills><borders count="1"><border/></borders><cellStyleXfs count="1"><xf numFmtId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" xfId="0"/><xf numFmtId="14" xfId="0" applyNumberFormat="1"/></cellXfs></styleSheet>"#;

fn worksheet_xml(rows: &[Vec<Cell>], strings: &mut Vec<String>) -> String {
    let mut data = String::new();
    for (r, row) in rows.iter().enumerate() {
        let cells: String = row
            .iter()
            .enumerate()
            .filter_map(|(c, cell)| {
                let reference = format!("{}{}", column_name(c), r + 1);
                match cell {
                    Cell::Empty => None,
                    Cell::Str(text) => {
                        strings.push(text.clone());
                        Some(format!(
                            r#"<c r="{}" t="s"><v>{}</v></c>"#,
                            reference,
                            strings.len() - 1
                        ))
                    }
                    Cell::Num(value) => Some(format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value)),
                    Cell::Date(serial) => Some(format!(
                        r#"<c r="{}" s="1"><v>{}</v></c>"#,
                        reference, serial
                    )),
                }
            })
            .collect();
        if !cells.is_empty() {
            data.push_str(&format!(r#"<row r="{}">{}</row>"#, r + 1, cells));
        }
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        data
    )
}

fn shared_strings_xml(strings: &[String]) -> String {
    let items: String = strings
        .iter()
        .map(|text| format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(text)))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">{1}</sst>"#,
        strings.len(),
        items
    )
}

fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub const FAKTUR_HEADER: &[&str] = &[
    "Baris",
    "Tanggal Faktur",
    "Jenis Faktur",
    "Kode Transaksi",
    "Keterangan Tambahan",
    "Dokumen Pendukung",
    "Period Dok Pendukung",
    "Referensi",
    "Cap Fasilitas",
    "ID TKU Penjual",
    "NPWP/NIK Pembeli",
    "Jenis ID Pembeli",
    "Negara Pembeli",
    "Nomor Dokumen Pembeli",
    "Nama Pembeli",
    "Alamat Pembeli",
    "Email Pembeli",
    "ID TKU Pembeli",
];

pub const DETAIL_HEADER: &[&str] = &[
    "Baris",
    "Barang/Jasa",
    "Kode Barang Jasa",
    "Nama Barang/Jasa",
    "Nama Satuan Ukur",
    "Harga Satuan",
    "Jumlah Barang Jasa",
    "Total Diskon",
    "DPP",
    "DPP Nilai Lain",
    "Tarif PPN",
    "PPN",
    "Tarif PPnBM",
    "PPnBM",
];

pub const SELLER_TKU: &str = "0123456789012345000000";

pub fn header_row(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|name| s(name)).collect()
}

/// One `Faktur` data row: key, date cell, buyer name; the rest is fixed filler.
pub fn faktur_row(baris: &str, date: Cell, buyer: &str) -> Vec<Cell> {
    vec![
        s(baris),
        date,
        s("Normal"),
        s("04"),
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
        s(&format!("INV-{}", baris)),
        Cell::Empty,
        s(SELLER_TKU),
        s("0987654321098765"),
        s("TIN"),
        s("IDN"),
        s("-"),
        s(buyer),
        s("Jl. Merdeka 1"),
        s("buyer@example.com"),
        s("0987654321098765000000"),
    ]
}

/// One `DetailFaktur` data row for `qty` units at `price`.
pub fn detail_row(baris: &str, name: &str, price: Cell, qty: f64) -> Vec<Cell> {
    vec![
        s(baris),
        s("A"),
        s("000000"),
        s(name),
        s("UM.0018"),
        price,
        n(qty),
        n(0.0),
        n(10000.0),
        n(9166.67),
        n(12.0),
        n(1100.0),
        n(0.0),
        n(0.0),
    ]
}

/// Title rows, header on row 3, the given data rows, then `END`.
pub fn faktur_sheet(rows: Vec<Vec<Cell>>) -> Vec<Vec<Cell>> {
    let mut sheet = vec![
        vec![s("NPWP Penjual"), Cell::Empty, s("0123456789012345")],
        vec![],
        header_row(FAKTUR_HEADER),
    ];
    sheet.extend(rows);
    sheet.push(vec![s("END")]);
    sheet
}

pub fn detail_sheet(rows: Vec<Vec<Cell>>) -> Vec<Vec<Cell>> {
    let mut sheet = vec![header_row(DETAIL_HEADER)];
    sheet.extend(rows);
    sheet.push(vec![s("END")]);
    sheet
}

/// Two invoices, three line items; invoice 1 dated with a real date cell.
pub fn sample_workbook() -> XlsxBuilder {
    XlsxBuilder::new()
        .sheet(
            "Faktur",
            faktur_sheet(vec![
                faktur_row("1", Cell::Date(45356.0), "PT Pembeli Satu"),
                faktur_row("2", s("06/03/2024"), "PT Pembeli Dua & Co"),
            ]),
        )
        .sheet(
            "DetailFaktur",
            detail_sheet(vec![
                detail_row("1", "Kertas A4", n(50000.0), 2.0),
                detail_row("2", "Tinta", s("12500,5"), 1.0),
                detail_row("1", "Map", n(3333.335), 3.0),
            ]),
        )
}
