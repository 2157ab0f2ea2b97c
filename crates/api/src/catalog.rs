//! Product catalog loading from CSV.
//!
//! Catalog lines are `id,name,description,price,stock`; a leading header
//! row is skipped. Mirrors the original marketplace's startup loader.

use common::ProductId;
use domain::{Money, Product};
use thiserror::Error;

/// Errors produced while parsing a catalog file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A line did not have the five expected fields.
    #[error("Malformed catalog line {line}: expected 5 fields, got {fields}")]
    MalformedLine { line: usize, fields: usize },

    /// A numeric field failed to parse.
    #[error("Invalid {field} on catalog line {line}: {value}")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
}

/// Parses catalog CSV text into products.
pub fn parse_catalog(text: &str) -> Result<Vec<Product>, CatalogError> {
    let mut products = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        // Header row.
        if idx == 0 && line.to_lowercase().starts_with("id,") {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 5 {
            return Err(CatalogError::MalformedLine {
                line: line_no,
                fields: fields.len(),
            });
        }

        let id: u64 = fields[0].parse().map_err(|_| CatalogError::InvalidField {
            line: line_no,
            field: "id",
            value: fields[0].to_string(),
        })?;
        let price: i64 = fields[3].parse().map_err(|_| CatalogError::InvalidField {
            line: line_no,
            field: "price",
            value: fields[3].to_string(),
        })?;
        let stock: u32 = fields[4].parse().map_err(|_| CatalogError::InvalidField {
            line: line_no,
            field: "stock",
            value: fields[4].to_string(),
        })?;

        products.push(Product::new(
            ProductId::new(id),
            fields[1],
            fields[2],
            Money::from_minor(price),
            stock,
        ));
    }

    Ok(products)
}

/// A small built-in catalog used when no CSV path is configured.
pub fn default_catalog() -> Vec<Product> {
    vec![
        Product::new(
            ProductId::new(101),
            "Widget",
            "A basic widget",
            Money::from_minor(100),
            50,
        ),
        Product::new(
            ProductId::new(102),
            "Gadget",
            "A premium gadget",
            Money::from_minor(250),
            20,
        ),
        Product::new(
            ProductId::new(103),
            "Gizmo",
            "A limited-run gizmo",
            Money::from_minor(999),
            5,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_header() {
        let text = "id,name,description,price,stock\n1,Widget,A basic widget,100,5\n2,Gadget,A premium gadget,250,3\n";
        let products = parse_catalog(text).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, ProductId::new(1));
        assert_eq!(products[0].price, Money::from_minor(100));
        assert_eq!(products[1].stock, 3);
    }

    #[test]
    fn test_parse_without_header_and_blank_lines() {
        let text = "1,Widget,A basic widget,100,5\n\n2,Gadget,A premium gadget,250,3\n";
        let products = parse_catalog(text).unwrap();
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn test_malformed_line_is_rejected() {
        let err = parse_catalog("1,Widget,100,5").unwrap_err();
        assert_eq!(
            err,
            CatalogError::MalformedLine {
                line: 1,
                fields: 4
            }
        );
    }

    #[test]
    fn test_invalid_price_is_rejected() {
        let err = parse_catalog("1,Widget,desc,abc,5").unwrap_err();
        assert_eq!(
            err,
            CatalogError::InvalidField {
                line: 1,
                field: "price",
                value: "abc".to_string(),
            }
        );
    }

    #[test]
    fn test_default_catalog_is_nonempty() {
        assert!(!default_catalog().is_empty());
    }
}
