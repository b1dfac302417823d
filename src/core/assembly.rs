//! Joins detail rows onto their invoice and builds the output tree.

use crate::core::normalize::{format_date, format_numeric};
use crate::domain::mapping::{FieldMap, Template, UnmatchedPolicy, TIN_MAX_LEN};
use crate::domain::model::{
    ConversionReport, Field, GoodService, InvoiceDocument, Row, TaxInvoice,
};
use crate::utils::error::{EtlError, Result};
use std::collections::{HashMap, HashSet};

/// Builds the `TaxInvoiceBulk` tree from the two tables.
///
/// Detail rows are grouped by the trimmed `Baris` value and attached, in
/// sheet order, to every invoice carrying the same key. Groups that no invoice
/// claims are handled according to `policy`.
pub fn assemble(
    headers: &[Row],
    details: &[Row],
    template: &Template,
    policy: UnmatchedPolicy,
) -> Result<(InvoiceDocument, ConversionReport)> {
    let mut report = ConversionReport {
        header_rows: headers.len(),
        detail_rows: details.len(),
        ..ConversionReport::default()
    };

    let (order, groups) = group_details(details, &template.join_key);
    check_unmatched(headers, &order, &groups, template, policy, &mut report)?;

    let mut document = InvoiceDocument {
        tin: seller_tin(headers, &template.seller_column),
        invoices: Vec::with_capacity(headers.len()),
    };

    for header in headers {
        let key = join_key(header, &template.join_key);
        let fields = map_fields(header, &template.header_fields, template, &mut report);

        let goods = groups
            .get(key.as_str())
            .map(|rows| {
                rows.iter()
                    .map(|detail| GoodService {
                        fields: map_fields(detail, &template.detail_fields, template, &mut report),
                    })
                    .collect()
            })
            .unwrap_or_default();

        document.invoices.push(TaxInvoice { fields, goods });
    }

    report.invoices = document.invoices.len();
    report.line_items = document.line_item_count();

    if report.unparsed_fields > 0 {
        tracing::warn!(
            "⚠️ {} field value(s) could not be normalized and were copied as text",
            report.unparsed_fields
        );
    }

    Ok((document, report))
}

/// Seller identifier: first non-blank `ID TKU Penjual`, at most 16 characters.
pub fn seller_tin(headers: &[Row], seller_column: &str) -> String {
    headers
        .iter()
        .map(|row| row.value(seller_column).to_plain_string())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .map(|value| value.chars().take(TIN_MAX_LEN).collect::<String>())
        .unwrap_or_default()
}

fn join_key(row: &Row, column: &str) -> String {
    row.value(column).to_plain_string().trim().to_string()
}

// Groups keep first-seen key order so unmatched keys are reported in sheet order.
fn group_details<'a>(
    details: &'a [Row],
    column: &str,
) -> (Vec<String>, HashMap<String, Vec<&'a Row>>) {
    let mut order = Vec::new();
    let mut groups: HashMap<String, Vec<&Row>> = HashMap::new();

    for detail in details {
        let key = join_key(detail, column);
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(detail);
    }

    (order, groups)
}

fn check_unmatched(
    headers: &[Row],
    order: &[String],
    groups: &HashMap<String, Vec<&Row>>,
    template: &Template,
    policy: UnmatchedPolicy,
    report: &mut ConversionReport,
) -> Result<()> {
    let header_keys: HashSet<String> = headers
        .iter()
        .map(|row| join_key(row, &template.join_key))
        .collect();

    for key in order.iter().filter(|key| !header_keys.contains(*key)) {
        let count = groups.get(key).map(Vec::len).unwrap_or(0);
        report.dropped_details += count;
        report.unmatched_keys.push(key.clone());

        if policy == UnmatchedPolicy::Warn {
            tracing::warn!(
                "⚠️ {} detail row(s) with {} '{}' match no invoice and are dropped",
                count,
                template.join_key,
                key
            );
        }
    }

    if policy == UnmatchedPolicy::Fail && !report.unmatched_keys.is_empty() {
        return Err(EtlError::UnmatchedDetails {
            keys: report.unmatched_keys.clone(),
        });
    }

    Ok(())
}

fn map_fields(
    row: &Row,
    map: &FieldMap,
    template: &Template,
    report: &mut ConversionReport,
) -> Vec<Field> {
    map.iter()
        .map(|(column, tag)| {
            let value = row.value(column);
            let text = if template.is_date(tag) {
                let normalized = format_date(value);
                if normalized.fell_back {
                    tracing::debug!("Unparsed date in '{}': {:?}", column, normalized.text);
                    report.unparsed_fields += 1;
                }
                normalized.text
            } else if template.is_numeric(tag) {
                let normalized = format_numeric(value);
                if normalized.fell_back {
                    tracing::debug!("Unparsed number in '{}': {:?}", column, normalized.text);
                    report.unparsed_fields += 1;
                }
                normalized.text
            } else {
                value.to_plain_string()
            };
            Field::new(tag, text)
        })
        .collect()
}
