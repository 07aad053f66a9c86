use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use posboard_core::{
    EditableField, FieldValue, InventoryId, LineItem, NoField, NumericInput, ProductId,
};

/// Product fields embedded in a lookup candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub stock: i64,
}

impl CandidateProduct {
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }
}

/// An inventory batch offered by the stock-adjustment product search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCandidate {
    pub id: InventoryId,
    #[serde(with = "posboard_core::date::lenient")]
    pub date_joined: NaiveDate,
    pub product: CandidateProduct,
    #[serde(with = "posboard_core::date::lenient_opt", default)]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float", default)]
    pub saldo: Decimal,
    /// Autocomplete label.
    #[serde(default)]
    pub value: Option<String>,
}

impl StockCandidate {
    /// Nothing left in this batch; the staged table flags these rows.
    pub fn is_depleted(&self) -> bool {
        self.saldo <= Decimal::ZERO
    }

    /// Label shown in the autocomplete dropdown.
    pub fn label(&self) -> String {
        match &self.value {
            Some(v) if !v.is_empty() => v.clone(),
            _ => self.product.display_name().to_string(),
        }
    }
}

impl LineItem for StockCandidate {
    type Id = InventoryId;
    type Field = NoField;

    fn id(&self) -> Option<InventoryId> {
        Some(self.id)
    }

    fn set_field(&mut self, field: NoField, _value: FieldValue) {
        match field {}
    }

    fn field_value(&self, field: NoField) -> FieldValue {
        match field {}
    }
}

/// One line of the stock-adjustment detail.
///
/// `newstock` is the operator's target balance for the batch; it starts at the
/// current `saldo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustmentLine {
    pub id: InventoryId,
    #[serde(with = "posboard_core::date::lenient")]
    pub date_joined: NaiveDate,
    pub product_name: String,
    #[serde(with = "posboard_core::date::lenient_opt", default)]
    pub expiration_date: Option<NaiveDate>,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub saldo: Decimal,
    pub newstock: i64,
}

impl StockAdjustmentLine {
    /// Difference the server will book when this line is applied.
    pub fn delta(&self) -> Decimal {
        Decimal::from(self.newstock) - self.saldo
    }

    pub fn is_unchanged(&self) -> bool {
        self.delta().is_zero()
    }
}

impl From<StockCandidate> for StockAdjustmentLine {
    fn from(candidate: StockCandidate) -> Self {
        let newstock = candidate.saldo.trunc().to_i64().unwrap_or(0);
        Self {
            id: candidate.id,
            date_joined: candidate.date_joined,
            product_name: candidate.product.display_name().to_string(),
            expiration_date: candidate.expiration_date,
            quantity: candidate.quantity,
            saldo: candidate.saldo,
            newstock,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAdjustmentField {
    NewStock,
}

impl EditableField for StockAdjustmentField {
    fn name(&self) -> &'static str {
        "newstock"
    }

    fn input(&self) -> NumericInput {
        NumericInput::stock_target()
    }

    fn all() -> &'static [Self] {
        &[StockAdjustmentField::NewStock]
    }
}

impl LineItem for StockAdjustmentLine {
    type Id = InventoryId;
    type Field = StockAdjustmentField;

    fn id(&self) -> Option<InventoryId> {
        Some(self.id)
    }

    fn set_field(&mut self, field: StockAdjustmentField, value: FieldValue) {
        match field {
            StockAdjustmentField::NewStock => self.newstock = value.as_integer(),
        }
    }

    fn field_value(&self, field: StockAdjustmentField) -> FieldValue {
        match field {
            StockAdjustmentField::NewStock => FieldValue::Integer(self.newstock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate_json() -> serde_json::Value {
        serde_json::json!({
            "id": 31,
            "date_joined": "2024-05-02 09:14:55",
            "product": {"id": 4, "name": "Cola", "full_name": "Cola (COLA500) (Bebidas)"},
            "expiration_date": "2024-12-31",
            "quantity": 48,
            "saldo": 17,
            "active": true,
            "value": "Cola (COLA500) (Bebidas)"
        })
    }

    #[test]
    fn candidate_decodes_server_row() {
        let c: StockCandidate = serde_json::from_value(candidate_json()).unwrap();
        assert_eq!(c.id, InventoryId::new(31));
        assert_eq!(c.date_joined, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(c.saldo, Decimal::from(17));
        assert!(!c.is_depleted());
        assert_eq!(c.label(), "Cola (COLA500) (Bebidas)");
    }

    #[test]
    fn missing_expiration_is_none() {
        let mut json = candidate_json();
        json["expiration_date"] = serde_json::Value::Null;
        let c: StockCandidate = serde_json::from_value(json).unwrap();
        assert_eq!(c.expiration_date, None);
    }

    #[test]
    fn selected_candidate_targets_its_balance() {
        let c: StockCandidate = serde_json::from_value(candidate_json()).unwrap();
        let line = StockAdjustmentLine::from(c);
        assert_eq!(line.newstock, 17);
        assert_eq!(line.product_name, "Cola (COLA500) (Bebidas)");
        assert!(line.is_unchanged());
    }

    #[test]
    fn editing_newstock_leaves_balance_alone() {
        let c: StockCandidate = serde_json::from_value(candidate_json()).unwrap();
        let mut line = StockAdjustmentLine::from(c);
        line.set_field(StockAdjustmentField::NewStock, FieldValue::Integer(20));
        assert_eq!(line.newstock, 20);
        assert_eq!(line.saldo, Decimal::from(17));
        assert_eq!(line.delta(), Decimal::from(3));
    }

    #[test]
    fn line_serializes_with_numeric_fields() {
        let c: StockCandidate = serde_json::from_value(candidate_json()).unwrap();
        let json = serde_json::to_value(StockAdjustmentLine::from(c)).unwrap();
        assert_eq!(json["id"], 31);
        assert_eq!(json["newstock"], 17);
        assert_eq!(json["saldo"], 17.0);
        assert_eq!(json["expiration_date"], "2024-12-31");
        assert_eq!(json["date_joined"], "2024-05-02");
    }
}
