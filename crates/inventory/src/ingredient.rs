use serde::{Deserialize, Serialize};

use tillpoint_core::{Entity, IngredientId, Money, SupplierId, ValidationErrors, Validator};

/// A stocked raw ingredient (kitchen inventory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    /// Unit of measure the quantity is counted in ("kg", "pcs", ...).
    pub unit: String,
    pub quantity: i64,
    pub low_stock_threshold: i64,
    /// Cost per unit in smallest currency unit (cents).
    pub cost_per_unit: Money,
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
}

impl Ingredient {
    pub fn new(id: IngredientId, valid: ValidIngredient) -> Self {
        Self {
            id,
            name: valid.name,
            unit: valid.unit,
            quantity: valid.quantity,
            low_stock_threshold: valid.low_stock_threshold,
            cost_per_unit: valid.cost_per_unit,
            supplier_id: valid.supplier_id,
        }
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }

    /// Value of the stock on hand at the current unit cost.
    pub fn stock_value(&self) -> Money {
        Money::from_cents(self.cost_per_unit.cents() * self.quantity)
    }

    pub fn receive(&mut self, quantity: u32) {
        self.quantity += i64::from(quantity);
    }
}

impl Entity for Ingredient {
    type Id = IngredientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Raw ingredient form input. Money fields are the text the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientDraft {
    pub name: String,
    pub unit: String,
    pub quantity: i64,
    pub low_stock_threshold: i64,
    pub cost_per_unit: String,
    pub supplier_id: Option<SupplierId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidIngredient {
    pub name: String,
    pub unit: String,
    pub quantity: i64,
    pub low_stock_threshold: i64,
    pub cost_per_unit: Money,
    pub supplier_id: Option<SupplierId>,
}

pub fn validate_ingredient(draft: &IngredientDraft) -> Result<ValidIngredient, ValidationErrors> {
    let mut v = Validator::new();

    let name = v.required("name", &draft.name);
    v.max_len("name", &draft.name, 100);
    let unit = v.required("unit", &draft.unit);
    v.non_negative("quantity", draft.quantity);
    v.non_negative("low_stock_threshold", draft.low_stock_threshold);

    let cost = match draft.cost_per_unit.parse::<Money>() {
        Ok(cost) => {
            v.non_negative_money("cost_per_unit", cost);
            cost
        }
        Err(_) => {
            v.push("cost_per_unit", "must be an amount like 12.50");
            Money::ZERO
        }
    };

    v.finish(|| ValidIngredient {
        name: name.unwrap_or_default(),
        unit: unit.unwrap_or_default(),
        quantity: draft.quantity,
        low_stock_threshold: draft.low_stock_threshold,
        cost_per_unit: cost,
        supplier_id: draft.supplier_id,
    })
}
