//! Order records produced by the normalizer and sent to the bulk-import endpoint

use serde::{Deserialize, Serialize};

use super::columns::{READY_TO_PICK, fields};
use super::value::FieldValue;

/// One row of flat-mode output, keyed by the sheet's header names
pub type FlatRow = serde_json::Map<String, serde_json::Value>;

/// Request body for the bulk-import endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportPayload {
    pub orders: Vec<OrderRecord>,
}

impl ImportPayload {
    /// Total number of line items across all orders
    pub fn detail_count(&self) -> usize {
        self.orders.iter().map(|o| o.order_details.len()).sum()
    }
}

/// An order reconstructed from one or more spreadsheet rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Row number column carried over from the sheet ("No.")
    #[serde(rename = "No.", default, skip_serializing_if = "Option::is_none")]
    pub row_number: Option<FieldValue>,
    pub order_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier: Option<FieldValue>,
    pub order_details: Vec<OrderDetail>,
}

impl OrderRecord {
    /// New order in the "ready to pick" status with no details yet
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            row_number: None,
            order_id: order_id.into(),
            status: READY_TO_PICK.to_string(),
            channel: None,
            store: None,
            buyer: None,
            tracking: None,
            courier: None,
            order_details: Vec::new(),
        }
    }

    /// Set an optional order-level field by its destination name.
    /// `order_id` and `status` are not settable here.
    pub fn set_field(&mut self, field: &str, value: Option<FieldValue>) {
        let slot = match field {
            fields::ROW_NUMBER => &mut self.row_number,
            fields::CHANNEL => &mut self.channel,
            fields::STORE => &mut self.store,
            fields::BUYER => &mut self.buyer,
            fields::TRACKING => &mut self.tracking,
            fields::COURIER => &mut self.courier,
            _ => return,
        };
        *slot = value;
    }
}

/// A line item belonging to exactly one order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<FieldValue>,
}

impl OrderDetail {
    pub fn set_field(&mut self, field: &str, value: Option<FieldValue>) {
        let slot = match field {
            fields::PRODUCT_NAME => &mut self.product_name,
            fields::SKU => &mut self.sku,
            fields::VARIANT => &mut self.variant,
            fields::QUANTITY => &mut self.quantity,
            _ => return,
        };
        *slot = value;
    }

    /// Number of populated fields
    pub fn populated_fields(&self) -> usize {
        [&self.product_name, &self.sku, &self.variant, &self.quantity]
            .iter()
            .filter(|v| v.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.populated_fields() == 0
    }
}
