//! `TaxInvoiceBulk` XML rendering.

use crate::domain::model::{Field, InvoiceDocument};
use crate::utils::error::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Write};

pub const ROOT_ELEMENT: &str = "TaxInvoiceBulk";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlOptions {
    /// Spaces per nesting level; `None` writes everything on one line.
    pub indent: Option<usize>,
}

impl XmlOptions {
    pub fn pretty(indent: usize) -> Self {
        Self {
            indent: Some(indent),
        }
    }
}

/// Renders the document as UTF-8 bytes with an XML declaration.
pub fn serialize(document: &InvoiceDocument, options: &XmlOptions) -> Result<Vec<u8>> {
    let mut writer = match options.indent {
        Some(width) if width > 0 => Writer::new_with_indent(Cursor::new(Vec::new()), b' ', width),
        _ => Writer::new(Cursor::new(Vec::new())),
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    if options.indent.unwrap_or(0) == 0 {
        writer.get_mut().write_all(b"\n")?;
    }

    start(&mut writer, ROOT_ELEMENT)?;
    leaf(&mut writer, "TIN", &document.tin)?;

    start(&mut writer, "ListOfTaxInvoice")?;
    for invoice in &document.invoices {
        start(&mut writer, "TaxInvoice")?;
        fields(&mut writer, &invoice.fields)?;

        start(&mut writer, "ListOfGoodService")?;
        for good in &invoice.goods {
            start(&mut writer, "GoodService")?;
            fields(&mut writer, &good.fields)?;
            end(&mut writer, "GoodService")?;
        }
        end(&mut writer, "ListOfGoodService")?;

        end(&mut writer, "TaxInvoice")?;
    }
    end(&mut writer, "ListOfTaxInvoice")?;

    end(&mut writer, ROOT_ELEMENT)?;

    let mut bytes = writer.into_inner().into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn start<W: Write>(writer: &mut Writer<W>, tag: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    Ok(())
}

fn end<W: Write>(writer: &mut Writer<W>, tag: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn leaf<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(tag)))?;
    } else {
        start(writer, tag)?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        end(writer, tag)?;
    }
    Ok(())
}

fn fields<W: Write>(writer: &mut Writer<W>, fields: &[Field]) -> Result<()> {
    for field in fields {
        leaf(writer, field.tag, &field.text)?;
    }
    Ok(())
}
