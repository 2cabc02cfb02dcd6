//! Spreadsheet column roles
//!
//! Maps the column headers operators use in their order sheets to the field
//! names the bulk-import endpoint expects. Columns absent from both tables are
//! ignored.

/// Destination field names
pub mod fields {
    pub const ROW_NUMBER: &str = "No.";
    pub const ORDER_ID: &str = "order_id";
    pub const STATUS: &str = "status";
    pub const CHANNEL: &str = "channel";
    pub const STORE: &str = "store";
    pub const BUYER: &str = "buyer";
    pub const TRACKING: &str = "tracking";
    pub const COURIER: &str = "courier";

    pub const PRODUCT_NAME: &str = "product_name";
    pub const VARIANT: &str = "variant";
    pub const SKU: &str = "sku";
    pub const QUANTITY: &str = "quantity";

    /// Source header of the quantity column, which flat mode converts under
    pub const QUANTITY_COLUMN: &str = "Jumlah";
}

/// Status every imported order starts in
pub const READY_TO_PICK: &str = "ready to pick";

/// Order-level columns: (source header, destination field)
pub const ORDER_COLUMNS: &[(&str, &str)] = &[
    ("No.", fields::ROW_NUMBER),
    ("ID Pesanan", fields::ORDER_ID),
    ("Status", fields::STATUS),
    ("Channel", fields::CHANNEL),
    ("Nama Toko", fields::STORE),
    ("Nama Pembeli", fields::BUYER),
    ("AWB/No. Tracking", fields::TRACKING),
    ("Kurir", fields::COURIER),
];

/// Line-item columns: (source header, destination field)
pub const DETAIL_COLUMNS: &[(&str, &str)] = &[
    ("Nama Produk", fields::PRODUCT_NAME),
    ("Variant Produk", fields::VARIANT),
    ("SKU", fields::SKU),
    (fields::QUANTITY_COLUMN, fields::QUANTITY),
];

fn lookup(table: &[(&str, &'static str)], column: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(header, _)| *header == column)
        .map(|(_, field)| *field)
}

/// Destination field for an order-level column
pub fn order_field(column: &str) -> Option<&'static str> {
    lookup(ORDER_COLUMNS, column)
}

/// Destination field for a line-item column
pub fn detail_field(column: &str) -> Option<&'static str> {
    lookup(DETAIL_COLUMNS, column)
}

/// Every recognized header, order columns first
pub fn known_headers() -> impl Iterator<Item = &'static str> {
    ORDER_COLUMNS
        .iter()
        .chain(DETAIL_COLUMNS.iter())
        .map(|(header, _)| *header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_lookup() {
        assert_eq!(order_field("ID Pesanan"), Some(fields::ORDER_ID));
        assert_eq!(order_field("AWB/No. Tracking"), Some(fields::TRACKING));
        assert_eq!(order_field("Nama Produk"), None);
        assert_eq!(detail_field("Jumlah"), Some(fields::QUANTITY));
        assert_eq!(detail_field("jumlah"), None); // Headers are case-sensitive
        assert_eq!(detail_field("Catatan"), None);
    }

    #[test]
    fn test_known_headers_order() {
        let headers: Vec<_> = known_headers().collect();
        assert_eq!(headers.len(), 12);
        assert_eq!(headers[0], "No.");
        assert_eq!(headers[8], "Nama Produk");
        assert_eq!(headers[11], "Jumlah");
    }
}
