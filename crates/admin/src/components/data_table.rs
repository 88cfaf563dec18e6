//! Data table component types.
//!
//! These types define the configuration for reusable data tables in the
//! admin panel. The product table is the only consumer today; the column
//! model keeps its header row and sort handles out of the template.

use serde::{Deserialize, Serialize};

/// Column definition for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Whether the column is sortable.
    pub sortable: bool,
}

impl TableColumn {
    /// Create a new sortable column.
    #[must_use]
    pub fn sortable(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable: true,
        }
    }

    /// Create a new non-sortable column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable: false,
        }
    }
}

/// Columns for the product table.
#[must_use]
pub fn product_columns() -> Vec<TableColumn> {
    vec![
        TableColumn::sortable("id", "ID"),
        TableColumn::sortable("name", "Name"),
        TableColumn::sortable("price", "Price"),
        TableColumn::new("discount", "Discount"),
        TableColumn::sortable("stock", "Stock"),
        TableColumn::new("category", "Category"),
        TableColumn::new("actions", ""),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_columns_shape() {
        let columns = product_columns();
        assert_eq!(columns.len(), 7);
        assert!(columns.iter().any(|c| c.key == "name" && c.sortable));
        assert!(columns.iter().any(|c| c.key == "actions" && !c.sortable));
    }
}
