use chrono::NaiveDate;

use crate::billing::{ELECTRICITY_RATE_PER_UNIT, GENERATOR_RATE_PER_HOUR};
use crate::core::{PageLayout, VenueConfig};
use crate::models::Booking;

use super::builder::{DocumentBuilder, LabeledRow};
use super::document::InvoiceDocument;

/// Rupee amount, two decimals, no grouping separators.
pub fn format_inr(value: f64) -> String {
    format!("₹{value:.2}")
}

pub fn invoice_number(sequence: i64) -> String {
    format!("INV-{sequence:04}")
}

/// Event date cell: a single date for one-day events, a from/to range
/// otherwise. An unparseable stored date is shown as-is rather than
/// failing the invoice.
pub fn event_date_text(date: &str, days: i64) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(start) if days > 1 => {
            let end = start + chrono::Duration::days(days - 1);
            format!("{} to {}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y"))
        }
        Ok(start) => start.format("%d/%m/%Y").to_string(),
        Err(_) => date.trim().to_string(),
    }
}

/// Lays out the complete GST invoice for a booking. Pure: the caller
/// supplies the issue date and the sequence number.
pub fn layout_invoice(
    venue: &VenueConfig,
    booking: &Booking,
    sequence: i64,
    issued_on: NaiveDate,
) -> InvoiceDocument {
    let number = invoice_number(sequence);
    let mut doc = DocumentBuilder::new(PageLayout::default(), format!("GST Invoice {number}"));

    doc.centered_text(&venue.name, 16.0, true);
    doc.centered_text(&venue.address, 10.0, false);
    if booking.gst_included {
        doc.centered_text(&format!("GSTIN: {}", venue.gstin), 10.0, false);
    }
    let contact = match &venue.email {
        Some(email) => format!("Phone: {}, Email: {}", venue.phone, email),
        None => format!("Phone: {}", venue.phone),
    };
    doc.centered_text(&contact, 9.0, false);
    doc.divider();
    doc.vspace(2.0);
    doc.centered_text("GST Invoice", 13.0, true);
    doc.centered_text(
        &format!("Invoice No: {number}   Invoice Date: {}", issued_on.format("%d/%m/%Y")),
        9.0,
        false,
    );
    doc.vspace(4.0);

    doc.table("Customer & Event Details", &customer_rows(booking));
    doc.table("Cost Breakdown", &cost_rows(booking));
    doc.table(
        "Payment Details",
        &[
            LabeledRow::new("Advance Paid", format_inr(booking.advance)),
            LabeledRow::emphasised("Balance Due", format_inr(booking.balance)),
        ],
    );

    if booking.unit_used == 0.0 {
        doc.vspace(2.0);
        doc.note_block(&[
            format!(
                "Note: Generator is charged at {} per hour and electricity at {} per unit. \
                 These charges will be added as per actual usage.",
                format_inr(GENERATOR_RATE_PER_HOUR),
                format_inr(ELECTRICITY_RATE_PER_UNIT)
            ),
            "Advance once paid is not refundable.".to_string(),
        ]);
    }

    doc.finish()
}

fn customer_rows(booking: &Booking) -> Vec<LabeledRow> {
    let phone = match &booking.alternative_phone {
        Some(alt) if !alt.trim().is_empty() => format!("{} / {}", booking.phone, alt.trim()),
        _ => booking.phone.clone(),
    };
    vec![
        LabeledRow::emphasised("Name", booking.name.as_str()),
        LabeledRow::new("Address", booking.address.as_str()),
        LabeledRow::new("Phone", phone),
        LabeledRow::new("Event Date", event_date_text(&booking.date, booking.days)),
        LabeledRow::new("Event Type", booking.event_type.as_str()),
    ]
}

fn cost_rows(booking: &Booking) -> Vec<LabeledRow> {
    let subtotal = booking.cost
        + booking.other_charges
        + booking.generator_hours * GENERATOR_RATE_PER_HOUR
        + booking.unit_used * ELECTRICITY_RATE_PER_UNIT;

    let mut rows = vec![
        LabeledRow::new("Base Service Cost", format_inr(booking.cost)),
        LabeledRow::new("Other Charges", format_inr(booking.other_charges)),
        LabeledRow::new("Subtotal", format_inr(crate::billing::round2(subtotal))),
    ];
    if booking.discount > 0.0 {
        rows.push(LabeledRow::new("Discount", format_inr(booking.discount)));
    }
    rows.push(LabeledRow::new("Base Cost", format_inr(booking.base_cost)));
    if booking.gst_included {
        rows.push(LabeledRow::new("GST (18%)", format_inr(booking.gst_amount)));
    }
    rows.push(LabeledRow::emphasised("Total Amount", format_inr(booking.total_cost)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingInput;

    fn venue() -> VenueConfig {
        VenueConfig {
            name: "Sri Lakshmi Gardens".to_string(),
            address: "47 Ring Road, Bengaluru".to_string(),
            gstin: "29ABCDE1234F1Z5".to_string(),
            phone: "9876543210".to_string(),
            email: Some("desk@example.com".to_string()),
        }
    }

    fn booking(overrides: serde_json::Value) -> Booking {
        let mut form = serde_json::json!({
            "name": "Ravi Kumar",
            "address": "12 Temple Street",
            "phone": "9876543210",
            "date": "2026-09-14",
            "days": 1,
            "eventType": "Wedding",
            "cost": 50000,
            "otherCharges": 2000,
            "generatorHours": 3,
            "unitUsed": 100,
            "discount": 1000,
            "gstIncluded": true,
            "advance": 20000
        });
        for (key, value) in overrides.as_object().unwrap() {
            form[key] = value.clone();
        }
        let input: BookingInput = serde_json::from_value(form).unwrap();
        Booking::create(input).unwrap()
    }

    fn issued() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()
    }

    #[test]
    fn tables_appear_in_fixed_order() {
        let doc = layout_invoice(&venue(), &booking(serde_json::json!({})), 42, issued());
        let text = doc.plain_text();
        let customer = text.find("Customer & Event Details").unwrap();
        let cost = text.find("Cost Breakdown").unwrap();
        let payment = text.find("Payment Details").unwrap();
        assert!(customer < cost && cost < payment);
    }

    #[test]
    fn gst_booking_prints_registration_and_tax_rows() {
        let doc = layout_invoice(&venue(), &booking(serde_json::json!({})), 42, issued());
        assert!(doc.contains_text("GSTIN: 29ABCDE1234F1Z5"));
        assert!(doc.contains_text("GST (18%)"));
        assert!(doc.contains_text("₹9918.00"));
        assert!(doc.contains_text("₹65018.00"));
        assert!(doc.contains_text("₹45018.00"));
    }

    #[test]
    fn non_gst_booking_hides_registration_and_tax_rows() {
        let doc = layout_invoice(
            &venue(),
            &booking(serde_json::json!({ "gstIncluded": false })),
            42,
            issued(),
        );
        assert!(!doc.contains_text("GSTIN"));
        assert!(!doc.contains_text("GST (18%)"));
        assert!(doc.contains_text("₹55100.00"));
        assert!(doc.contains_text("₹35100.00"));
    }

    #[test]
    fn discount_row_only_when_discounted() {
        let with = layout_invoice(&venue(), &booking(serde_json::json!({})), 1, issued());
        assert!(with.contains_text("Discount"));
        let without = layout_invoice(
            &venue(),
            &booking(serde_json::json!({ "discount": 0 })),
            1,
            issued(),
        );
        assert!(!without.contains_text("Discount"));
    }

    #[test]
    fn usage_footnote_only_when_units_unknown() {
        let pending = layout_invoice(
            &venue(),
            &booking(serde_json::json!({ "unitUsed": 0 })),
            1,
            issued(),
        );
        assert!(pending.contains_text("per unit"));
        assert!(pending.contains_text("not refundable"));

        let metered = layout_invoice(&venue(), &booking(serde_json::json!({})), 1, issued());
        assert!(!metered.contains_text("per unit"));
    }

    #[test]
    fn multi_day_event_prints_a_range() {
        let doc = layout_invoice(
            &venue(),
            &booking(serde_json::json!({ "days": 3 })),
            1,
            issued(),
        );
        assert!(doc.contains_text("14/09/2026 to 16/09/2026"));

        let single = layout_invoice(&venue(), &booking(serde_json::json!({})), 1, issued());
        assert!(single.contains_text("14/09/2026"));
        assert!(!single.plain_text().contains(" to 14"));
    }

    #[test]
    fn unparseable_date_is_shown_raw() {
        let doc = layout_invoice(
            &venue(),
            &booking(serde_json::json!({ "date": "next sunday", "days": 2 })),
            1,
            issued(),
        );
        assert!(doc.contains_text("next sunday"));
    }

    #[test]
    fn emphasis_is_limited_to_name_total_and_balance() {
        let doc = layout_invoice(&venue(), &booking(serde_json::json!({})), 1, issued());
        assert!(doc.find_text("Ravi Kumar").unwrap().1);
        assert!(doc.find_text("Total Amount").unwrap().1);
        assert!(doc.find_text("Balance Due").unwrap().1);
        assert!(!doc.find_text("Other Charges").unwrap().1);
        assert!(!doc.find_text("Advance Paid").unwrap().1);
    }

    #[test]
    fn invoice_number_and_date_line() {
        let doc = layout_invoice(&venue(), &booking(serde_json::json!({})), 42, issued());
        assert!(doc.contains_text("Invoice No: INV-0042"));
        assert!(doc.contains_text("Invoice Date: 25/08/2026"));
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_inr(0.0), "₹0.00");
        assert_eq!(format_inr(1234.5), "₹1234.50");
        assert_eq!(format_inr(55100.0), "₹55100.00");
        assert_eq!(format_inr(-250.0), "₹-250.00");
    }

    #[test]
    fn subtotal_includes_metered_surcharges() {
        let doc = layout_invoice(&venue(), &booking(serde_json::json!({})), 1, issued());
        // 50000 + 2000 + 3*700 + 100*20
        assert!(doc.contains_text("₹56100.00"));
    }
}
