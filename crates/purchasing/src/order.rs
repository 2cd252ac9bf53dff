use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tillpoint_core::{DomainError, Entity, IngredientId, Money, PurchaseOrderId, SupplierId};

/// Purchase order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    Draft,
    Ordered,
    Received,
    Cancelled,
}

/// Purchase order line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub line_no: u32,
    pub ingredient_id: IngredientId,
    pub quantity: u32,
    /// Agreed cost per unit in smallest currency unit (cents).
    pub unit_cost: Money,
}

impl PurchaseLine {
    pub fn subtotal(&self) -> Money {
        self.unit_cost.times(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    id: PurchaseOrderId,
    supplier_id: SupplierId,
    status: PurchaseOrderStatus,
    lines: Vec<PurchaseLine>,
    ordered_on: Option<NaiveDate>,
    received_on: Option<NaiveDate>,
}

impl PurchaseOrder {
    pub fn new(id: PurchaseOrderId, supplier_id: SupplierId) -> Self {
        Self {
            id,
            supplier_id,
            status: PurchaseOrderStatus::Draft,
            lines: Vec::new(),
            ordered_on: None,
            received_on: None,
        }
    }

    pub fn supplier_id(&self) -> SupplierId {
        self.supplier_id
    }

    pub fn status(&self) -> PurchaseOrderStatus {
        self.status
    }

    pub fn lines(&self) -> &[PurchaseLine] {
        &self.lines
    }

    pub fn ordered_on(&self) -> Option<NaiveDate> {
        self.ordered_on
    }

    pub fn received_on(&self) -> Option<NaiveDate> {
        self.received_on
    }

    pub fn is_modifiable(&self) -> bool {
        matches!(self.status, PurchaseOrderStatus::Draft)
    }

    pub fn total(&self) -> Money {
        self.lines.iter().map(PurchaseLine::subtotal).sum()
    }

    pub fn add_line(
        &mut self,
        ingredient_id: IngredientId,
        quantity: u32,
        unit_cost: Money,
    ) -> Result<&PurchaseLine, DomainError> {
        if !self.is_modifiable() {
            return Err(DomainError::invariant(
                "cannot modify a purchase order once it is ordered",
            ));
        }
        if quantity == 0 {
            return Err(DomainError::validation("quantity", "must be greater than zero"));
        }
        if !unit_cost.is_positive() {
            return Err(DomainError::validation("unit_cost", "must be greater than zero"));
        }

        let line_no = self.lines.last().map(|l| l.line_no + 1).unwrap_or(1);
        self.lines.push(PurchaseLine {
            line_no,
            ingredient_id,
            quantity,
            unit_cost,
        });
        Ok(&self.lines[self.lines.len() - 1])
    }

    pub fn remove_line(&mut self, line_no: u32) -> Result<(), DomainError> {
        if !self.is_modifiable() {
            return Err(DomainError::invariant(
                "cannot modify a purchase order once it is ordered",
            ));
        }
        let before = self.lines.len();
        self.lines.retain(|l| l.line_no != line_no);
        if self.lines.len() == before {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    pub fn mark_ordered(&mut self, on: NaiveDate) -> Result<(), DomainError> {
        if self.status != PurchaseOrderStatus::Draft {
            return Err(DomainError::invariant("only draft purchase orders can be placed"));
        }
        if self.lines.is_empty() {
            return Err(DomainError::validation("lines", "add at least one item"));
        }
        self.status = PurchaseOrderStatus::Ordered;
        self.ordered_on = Some(on);
        Ok(())
    }

    pub fn mark_received(&mut self, on: NaiveDate) -> Result<(), DomainError> {
        if self.status != PurchaseOrderStatus::Ordered {
            return Err(DomainError::invariant("only placed purchase orders can be received"));
        }
        if self.ordered_on.is_some_and(|ordered| on < ordered) {
            return Err(DomainError::validation("received_on", "cannot be before the order date"));
        }
        self.status = PurchaseOrderStatus::Received;
        self.received_on = Some(on);
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), DomainError> {
        match self.status {
            PurchaseOrderStatus::Draft | PurchaseOrderStatus::Ordered => {
                self.status = PurchaseOrderStatus::Cancelled;
                Ok(())
            }
            PurchaseOrderStatus::Received => Err(DomainError::invariant(
                "cannot cancel a purchase order that was received",
            )),
            PurchaseOrderStatus::Cancelled => {
                Err(DomainError::conflict("purchase order already cancelled"))
            }
        }
    }
}

impl Entity for PurchaseOrder {
    type Id = PurchaseOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn order() -> PurchaseOrder {
        PurchaseOrder::new(PurchaseOrderId::new(), SupplierId::new())
    }

    #[test]
    fn full_lifecycle_draft_to_ordered_to_received() {
        let mut po = order();
        po.add_line(IngredientId::new(), 5, Money::from_major(40)).unwrap();
        po.add_line(IngredientId::new(), 2, Money::from_cents(12_550)).unwrap();
        assert_eq!(po.total(), Money::from_cents(45_100));

        po.mark_ordered(date(1)).unwrap();
        assert_eq!(po.status(), PurchaseOrderStatus::Ordered);

        po.mark_received(date(3)).unwrap();
        assert_eq!(po.status(), PurchaseOrderStatus::Received);
        assert_eq!(po.received_on(), Some(date(3)));
    }

    #[test]
    fn cannot_modify_placed_order() {
        let mut po = order();
        po.add_line(IngredientId::new(), 1, Money::from_major(10)).unwrap();
        po.mark_ordered(date(1)).unwrap();

        let err = po.add_line(IngredientId::new(), 1, Money::from_major(10)).unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) if msg.contains("once it is ordered") => {}
            other => panic!("expected InvariantViolation, got {other:?}"),
        }
        assert!(po.remove_line(1).is_err());
    }

    #[test]
    fn empty_order_cannot_be_placed() {
        let mut po = order();
        assert!(matches!(po.mark_ordered(date(1)), Err(DomainError::Validation(_))));
    }

    #[test]
    fn receiving_requires_placed_order_and_sane_date() {
        let mut po = order();
        assert!(po.mark_received(date(2)).is_err());

        po.add_line(IngredientId::new(), 1, Money::from_major(10)).unwrap();
        po.mark_ordered(date(5)).unwrap();
        assert!(matches!(po.mark_received(date(4)), Err(DomainError::Validation(_))));
    }

    #[test]
    fn cancel_rules() {
        let mut po = order();
        po.cancel().unwrap();
        assert!(matches!(po.cancel(), Err(DomainError::Conflict(_))));

        let mut received = order();
        received.add_line(IngredientId::new(), 1, Money::from_major(1)).unwrap();
        received.mark_ordered(date(1)).unwrap();
        received.mark_received(date(1)).unwrap();
        assert!(matches!(received.cancel(), Err(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn line_numbers_stay_unique_after_removal() {
        let mut po = order();
        po.add_line(IngredientId::new(), 1, Money::from_major(1)).unwrap();
        po.add_line(IngredientId::new(), 1, Money::from_major(1)).unwrap();
        po.remove_line(1).unwrap();
        let line = po.add_line(IngredientId::new(), 1, Money::from_major(1)).unwrap();
        assert_eq!(line.line_no, 3);
        assert_eq!(po.remove_line(9), Err(DomainError::NotFound));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 200,
            ..ProptestConfig::default()
        })]

        #[test]
        fn total_is_sum_of_line_subtotals(
            lines in proptest::collection::vec((1u32..500, 1i64..1_000_000), 0..20)
        ) {
            let mut po = order();
            let mut expected = 0i64;
            for (qty, cents) in &lines {
                po.add_line(IngredientId::new(), *qty, Money::from_cents(*cents)).unwrap();
                expected += i64::from(*qty) * cents;
            }
            prop_assert_eq!(po.total(), Money::from_cents(expected));
        }
    }
}
