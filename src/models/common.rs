use serde::de::{self, Deserializer, Visitor};
use std::fmt;

/// Parses a form-style amount. Blank and non-numeric strings collapse to
/// zero instead of failing the whole payload; the intake forms have always
/// been permissive about these fields.
pub(crate) fn coerce_amount(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(if v.is_finite() { v } else { 0.0 })
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        Ok(coerce_amount(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_none<E: de::Error>(self) -> Result<f64, E> {
        Ok(0.0)
    }
}

/// Lenient amount field: number, numeric string, blank or null all decode.
pub(crate) fn de_amount<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    d.deserialize_any(AmountVisitor)
}

struct OptAmountVisitor;

impl<'de> Visitor<'de> for OptAmountVisitor {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, a numeric string, or null")
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(AmountVisitor).map(Some)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

/// Same leniency, but keeps "absent" distinguishable so required amounts
/// (cost, advance) can still be enforced by validation.
pub(crate) fn de_opt_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    d.deserialize_option(OptAmountVisitor)
}

struct DaysVisitor;

impl<'de> Visitor<'de> for DaysVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a day count")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        Ok(if v.is_finite() { (v.floor() as i64).max(1) } else { 1 })
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v.max(1))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        Ok((v as i64).max(1))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        Ok(v.trim().parse::<f64>().map(|n| (n.floor() as i64).max(1)).unwrap_or(1))
    }

    fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
        Ok(1)
    }
}

/// Event duration in days, clamped to at least one.
pub(crate) fn de_days<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    d.deserialize_any(DaysVisitor)
}

pub(crate) fn default_days() -> i64 {
    1
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "super::de_amount")]
        amount: f64,
        #[serde(default, deserialize_with = "super::de_opt_amount")]
        cost: Option<f64>,
        #[serde(default = "super::default_days", deserialize_with = "super::de_days")]
        days: i64,
    }

    #[test]
    fn numeric_strings_parse() {
        let form: Form = serde_json::from_str(r#"{"amount": "1250.50", "cost": "300"}"#).unwrap();
        assert_eq!(form.amount, 1250.50);
        assert_eq!(form.cost, Some(300.0));
    }

    #[test]
    fn blank_and_garbage_collapse_to_zero() {
        let form: Form = serde_json::from_str(r#"{"amount": "", "cost": "abc"}"#).unwrap();
        assert_eq!(form.amount, 0.0);
        assert_eq!(form.cost, Some(0.0));
    }

    #[test]
    fn absent_amount_defaults_but_absent_cost_stays_none() {
        let form: Form = serde_json::from_str("{}").unwrap();
        assert_eq!(form.amount, 0.0);
        assert_eq!(form.cost, None);
        assert_eq!(form.days, 1);
    }

    #[test]
    fn null_cost_counts_as_absent() {
        let form: Form = serde_json::from_str(r#"{"cost": null}"#).unwrap();
        assert_eq!(form.cost, None);
    }

    #[test]
    fn days_floor_and_clamp() {
        let form: Form = serde_json::from_str(r#"{"days": "2.9"}"#).unwrap();
        assert_eq!(form.days, 2);
        let form: Form = serde_json::from_str(r#"{"days": 0}"#).unwrap();
        assert_eq!(form.days, 1);
    }
}
