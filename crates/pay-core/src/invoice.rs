//! # Invoice Types
//!
//! The charge request/response payload.
//!
//! An invoice arrives as JSON, has its `result` decided by an
//! [`OutcomeGenerator`], and is echoed back:
//!
//! ```text
//! {"currency":{},"customer_id":1,"value":301.99}
//!     -> {"customer_id":1,"currency":{},"value":301.99,"result":true}
//! ```

use crate::error::{PaymentError, PaymentResult};
use crate::outcome::OutcomeGenerator;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Opaque currency placeholder.
///
/// Upstream billing sends this as an empty object. Whatever object arrives is
/// echoed back untouched; nothing here interprets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Currency(Map<String, Value>);

impl Currency {
    /// The empty placeholder `{}`
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if the placeholder carries no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// `null` is accepted as `{}`; any non-object value is rejected.
impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Option::<Map<String, Value>>::deserialize(deserializer)?;
        Ok(Currency(fields.unwrap_or_default()))
    }
}

/// A customer invoice to charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Customer identifier (not checked for existence)
    pub customer_id: u64,

    /// Currency placeholder
    #[serde(default)]
    pub currency: Currency,

    /// Amount to charge
    pub value: f64,

    /// Whether the charge succeeded. Never read from input.
    #[serde(default, skip_deserializing)]
    pub result: bool,
}

impl Invoice {
    /// Create an unsettled invoice with an empty currency placeholder
    pub fn new(customer_id: u64, value: f64) -> Self {
        Self {
            customer_id,
            currency: Currency::empty(),
            value,
            result: false,
        }
    }

    /// Decode an invoice from a raw request body.
    ///
    /// Empty bodies, invalid JSON, missing `customer_id`/`value`, and
    /// non-numeric values for either all fail with
    /// [`PaymentError::InvalidRequest`]. A repeated key keeps its last value.
    pub fn from_json(body: &[u8]) -> PaymentResult<Self> {
        // Going through Value collapses duplicate keys before field decoding
        let value: Value =
            serde_json::from_slice(body).map_err(|e| PaymentError::InvalidRequest(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| PaymentError::InvalidRequest(e.to_string()))
    }

    /// Charge the invoice, overwriting `result` with a fresh outcome
    pub fn settle(&mut self, outcomes: &dyn OutcomeGenerator) -> bool {
        self.result = outcomes.charge_succeeded();
        self.result
    }

    /// Encode the invoice with all four fields present
    pub fn to_json(&self) -> PaymentResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| PaymentError::Serialization(e.to_string()))
    }
}
