//! Consignments: batches of stock received from a supplier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tillpoint_core::{ConsignmentId, Entity, IngredientId, Money, SupplierId, ValidationErrors, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsignmentLine {
    pub ingredient_id: IngredientId,
    /// Price the supplier charged per unit (cents).
    pub supplier_price: Money,
    pub quantity: u32,
}

impl ConsignmentLine {
    pub fn subtotal(&self) -> Money {
        self.supplier_price.times(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consignment {
    pub id: ConsignmentId,
    pub supplier_id: SupplierId,
    pub received_on: NaiveDate,
    pub lines: Vec<ConsignmentLine>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Consignment {
    pub fn new(id: ConsignmentId, valid: ValidConsignment) -> Self {
        Self {
            id,
            supplier_id: valid.supplier_id,
            received_on: valid.received_on,
            lines: valid.lines,
            notes: valid.notes,
        }
    }

    pub fn total_cost(&self) -> Money {
        self.lines.iter().map(ConsignmentLine::subtotal).sum()
    }

    pub fn total_units(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

impl Entity for Consignment {
    type Id = ConsignmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsignmentLineDraft {
    pub ingredient_id: Option<IngredientId>,
    pub supplier_price: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsignmentDraft {
    pub supplier_id: Option<SupplierId>,
    pub received_on: Option<NaiveDate>,
    pub lines: Vec<ConsignmentLineDraft>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidConsignment {
    pub supplier_id: SupplierId,
    pub received_on: NaiveDate,
    pub lines: Vec<ConsignmentLine>,
    pub notes: Option<String>,
}

/// Validate a consignment form. `today` bounds the received date.
pub fn validate_consignment(
    draft: &ConsignmentDraft,
    today: NaiveDate,
) -> Result<ValidConsignment, ValidationErrors> {
    let mut v = Validator::new();

    v.check(draft.supplier_id.is_some(), "supplier_id", "is required");
    match draft.received_on {
        Some(date) => {
            v.check(date <= today, "received_on", "cannot be in the future");
        }
        None => v.push("received_on", "is required"),
    }
    v.check(!draft.lines.is_empty(), "lines", "add at least one item");
    v.max_len("notes", &draft.notes, 500);

    let mut lines = Vec::with_capacity(draft.lines.len());
    for (i, line) in draft.lines.iter().enumerate() {
        let ingredient = line.ingredient_id;
        v.check(ingredient.is_some(), &format!("lines[{i}].ingredient_id"), "is required");

        let price = match line.supplier_price.parse::<Money>() {
            Ok(price) => {
                v.positive_money(&format!("lines[{i}].supplier_price"), price);
                price
            }
            Err(_) => {
                v.push(&format!("lines[{i}].supplier_price"), "must be an amount like 12.50");
                Money::ZERO
            }
        };

        let quantity = u32::try_from(line.quantity).ok().filter(|q| *q > 0);
        v.check(quantity.is_some(), &format!("lines[{i}].quantity"), "must be a positive whole number");

        if let (Some(ingredient_id), Some(quantity)) = (ingredient, quantity) {
            lines.push(ConsignmentLine {
                ingredient_id,
                supplier_price: price,
                quantity,
            });
        }
    }

    let notes = draft.notes.trim();
    v.finish(|| ValidConsignment {
        supplier_id: draft.supplier_id.unwrap_or_else(SupplierId::new),
        received_on: draft.received_on.unwrap_or(today),
        lines,
        notes: (!notes.is_empty()).then(|| notes.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn line(price: &str, quantity: i64) -> ConsignmentLineDraft {
        ConsignmentLineDraft {
            ingredient_id: Some(IngredientId::new()),
            supplier_price: price.into(),
            quantity,
        }
    }

    #[test]
    fn totals_supplier_cost() {
        let valid = validate_consignment(
            &ConsignmentDraft {
                supplier_id: Some(SupplierId::new()),
                received_on: Some(today()),
                lines: vec![line("45.50", 4), line("12", 10)],
                notes: "  ".into(),
            },
            today(),
        )
        .unwrap();
        assert!(valid.notes.is_none());

        let consignment = Consignment::new(ConsignmentId::new(), valid);
        assert_eq!(consignment.total_cost(), Money::from_cents(30_200));
        assert_eq!(consignment.total_units(), 14);
    }

    #[test]
    fn reports_line_level_errors_by_index() {
        let errs = validate_consignment(
            &ConsignmentDraft {
                supplier_id: None,
                received_on: today().succ_opt(),
                lines: vec![line("10.00", 1), line("0", 0)],
                notes: String::new(),
            },
            today(),
        )
        .unwrap_err();

        assert!(errs.has_field("supplier_id"));
        assert_eq!(errs.for_field("received_on"), Some("cannot be in the future"));
        assert!(errs.has_field("lines[1].supplier_price"));
        assert!(errs.has_field("lines[1].quantity"));
        assert!(!errs.has_field("lines[0].quantity"));
    }

    #[test]
    fn empty_consignment_is_rejected() {
        let errs = validate_consignment(&ConsignmentDraft::default(), today()).unwrap_err();
        assert_eq!(errs.for_field("lines"), Some("add at least one item"));
    }
}
