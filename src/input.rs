// 📥 Input Contract - Owner lines and sales rows handed over by the scraper
//
// Contract violations (wrong JSON shapes) fail fast with ContractError.
// Everything inside a well-formed input is data and never fails.

use crate::error::ContractError;
use crate::records::{CandidateBatch, SourceContext};
use crate::temporal::parse_sale_date;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

// ============================================================================
// INPUT TYPES
// ============================================================================

/// One row of a sales-history table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// M/D/YYYY or ISO
    pub date: Option<String>,

    /// Seller
    pub grantor: Option<String>,

    /// Buyer
    pub grantee: Option<String>,
}

impl SalesRecord {
    pub fn new(date: Option<&str>, grantor: Option<&str>, grantee: Option<&str>) -> Self {
        SalesRecord {
            date: date.map(String::from),
            grantor: grantor.map(String::from),
            grantee: grantee.map(String::from),
        }
    }
}

/// Everything scraped for one property
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerInput {
    /// Current-owner lines, address line already removed
    #[serde(alias = "rawOwnerLines")]
    pub raw_owner_lines: Vec<String>,

    #[serde(default, alias = "salesRecords")]
    pub sales_records: Vec<SalesRecord>,
}

impl OwnerInput {
    pub fn new(raw_owner_lines: Vec<String>, sales_records: Vec<SalesRecord>) -> Self {
        OwnerInput {
            raw_owner_lines,
            sales_records,
        }
    }

    /// Validate an untyped JSON input against the contract.
    /// Accepts both `raw_owner_lines` and `rawOwnerLines` spellings.
    pub fn from_value(value: &Value) -> std::result::Result<Self, ContractError> {
        let obj = value.as_object().ok_or(ContractError::NotAnObject)?;

        let lines_field = field(obj, &["raw_owner_lines", "rawOwnerLines"])
            .ok_or_else(|| ContractError::MissingField("raw_owner_lines".to_string()))?;
        let raw_owner_lines = string_list(lines_field, "raw_owner_lines")?;

        let sales_records = match field(obj, &["sales_records", "salesRecords"]) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(rows)) => rows
                .iter()
                .enumerate()
                .map(|(i, row)| sales_row(row, i))
                .collect::<std::result::Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(ContractError::WrongType {
                    field: "sales_records".to_string(),
                    expected: "an array of objects",
                })
            }
        };

        Ok(OwnerInput {
            raw_owner_lines,
            sales_records,
        })
    }

    /// Candidate batches in discovery order.
    ///
    /// - dated sales, oldest first (stable): the grantor as a `DatedGrantor`
    ///   batch, then the grantee for the sale date
    /// - undated sales in input order: grantor batch, then grantee batch
    /// - current owner lines last
    ///
    /// Whether a dated grantor was already seen as an earlier grantee is only
    /// known after classification, so the engine makes that call.
    pub fn candidate_batches(&self) -> Vec<CandidateBatch> {
        let mut dated = Vec::new();
        let mut undated = Vec::new();

        for sale in &self.sales_records {
            match sale.date.as_deref().and_then(parse_sale_date) {
                Some(date) => dated.push((date, sale)),
                None => undated.push(sale),
            }
        }
        dated.sort_by_key(|(date, _)| *date);

        let mut batches = Vec::new();

        for (date, sale) in dated {
            let mut grantor = CandidateBatch::dated_grantor();
            if let Some(text) = sale.grantor.as_deref() {
                push_cell(&mut grantor, text);
            }
            batches.push(grantor);
            batches.push(batch_of(SourceContext::Date(date), sale.grantee.as_deref()));
        }

        for sale in undated {
            batches.push(batch_of(SourceContext::Unknown, sale.grantor.as_deref()));
            batches.push(batch_of(SourceContext::Unknown, sale.grantee.as_deref()));
        }

        let mut current = CandidateBatch::new(SourceContext::Current);
        for line in &self.raw_owner_lines {
            push_cell(&mut current, line);
        }
        batches.push(current);

        batches.retain(|b| !b.is_empty());
        batches
    }
}

fn field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| obj.get(*name))
}

fn string_list(value: &Value, name: &str) -> std::result::Result<Vec<String>, ContractError> {
    let wrong = || ContractError::WrongType {
        field: name.to_string(),
        expected: "an array of strings",
    };

    value
        .as_array()
        .ok_or_else(wrong)?
        .iter()
        .map(|v| v.as_str().map(String::from).ok_or_else(wrong))
        .collect()
}

fn sales_row(row: &Value, index: usize) -> std::result::Result<SalesRecord, ContractError> {
    let obj = row.as_object().ok_or_else(|| ContractError::WrongType {
        field: format!("sales_records[{}]", index),
        expected: "an object",
    })?;

    let optional = |name: &str| -> std::result::Result<Option<String>, ContractError> {
        match obj.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ContractError::WrongType {
                field: format!("sales_records[{}].{}", index, name),
                expected: "a string or null",
            }),
        }
    };

    Ok(SalesRecord {
        date: optional("date")?,
        grantor: optional("grantor")?,
        grantee: optional("grantee")?,
    })
}

fn batch_of(context: SourceContext, cell: Option<&str>) -> CandidateBatch {
    let mut batch = CandidateBatch::new(context);
    if let Some(text) = cell {
        push_cell(&mut batch, text);
    }
    batch
}

/// A table cell may hold several owners on separate lines
fn push_cell(batch: &mut CandidateBatch, text: &str) {
    if text.contains('\n') {
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            batch.push(line);
        }
    } else {
        batch.push(text);
    }
}

// ============================================================================
// FILE LOADING
// ============================================================================

/// Load sales rows from a CSV with `date,grantor,grantee` headers
pub fn load_sales_csv(csv_path: &Path) -> Result<Vec<SalesRecord>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open sales CSV: {:?}", csv_path))?;

    let mut sales = Vec::new();
    for result in rdr.deserialize() {
        let sale: SalesRecord = result.context("Failed to deserialize sales row")?;
        sales.push(sale);
    }

    Ok(sales)
}

// ============================================================================
// TESTS
// ============================================================================
