//! Billing arithmetic for venue bookings.
//!
//! Every booking write recomputes its summary from the raw inputs here;
//! client-submitted totals are never trusted. This module is the single
//! place the rates and the formula live.

use serde::{Deserialize, Serialize};

/// Generator surcharge per running hour, in rupees.
pub const GENERATOR_RATE_PER_HOUR: f64 = 700.0;

/// Electricity surcharge per consumed unit, in rupees.
pub const ELECTRICITY_RATE_PER_UNIT: f64 = 20.0;

/// GST applied on the discounted base when the booking opts in.
pub const GST_RATE: f64 = 0.18;

/// Raw charge inputs, after form coercion.
#[derive(Debug, Clone, Copy, Default)]
pub struct BillingInputs {
    pub cost: f64,
    pub other_charges: f64,
    pub generator_hours: f64,
    pub unit_used: f64,
    pub discount: f64,
    pub advance: f64,
    pub gst_included: bool,
}

/// Derived amounts stored with the booking and printed on the invoice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSummary {
    pub base_cost: f64,
    pub gst_amount: f64,
    pub total_cost: f64,
    pub balance: f64,
}

/// Half-up rounding to two decimals. Applied once per derived amount,
/// never to intermediates.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes the billing summary. Total over all inputs: a discount larger
/// than the subtotal clamps the base to zero rather than going negative.
pub fn compute_billing(inputs: &BillingInputs) -> BillingSummary {
    let subtotal = inputs.cost
        + inputs.other_charges
        + inputs.generator_hours * GENERATOR_RATE_PER_HOUR
        + inputs.unit_used * ELECTRICITY_RATE_PER_UNIT;

    let base = (subtotal - inputs.discount).max(0.0);

    let gst = if inputs.gst_included {
        round2(base * GST_RATE)
    } else {
        0.0
    };

    BillingSummary {
        base_cost: round2(base),
        gst_amount: gst,
        total_cost: round2(base + gst),
        balance: round2(base + gst - inputs.advance),
    }
}
