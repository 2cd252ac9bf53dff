use serde::{Deserialize, Serialize};

use tillpoint_core::{Entity, Money, ProductId, ValidationErrors, Validator};

/// Highest price a menu item may carry (1,000,000.00).
pub const MAX_MENU_PRICE: Money = Money::from_major(1_000_000);

/// An uploaded image: `url` is shown, `path` is kept to delete it later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub url: String,
    pub path: String,
}

/// Menu category, used to group the terminal's product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    Meal,
    Drink,
    Dessert,
    Side,
    Other,
}

impl MenuCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "meal" | "meals" => Some(Self::Meal),
            "drink" | "drinks" | "beverage" => Some(Self::Drink),
            "dessert" | "desserts" => Some(Self::Dessert),
            "side" | "sides" => Some(Self::Side),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// A sellable product on the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ProductId,
    pub name: String,
    pub category: MenuCategory,
    /// Unit price in smallest currency unit (cents).
    pub price: Money,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub image: Option<StoredImage>,
}

fn default_available() -> bool {
    true
}

impl MenuItem {
    pub fn new(id: ProductId, valid: ValidMenuItem) -> Self {
        Self {
            id,
            name: valid.name,
            category: valid.category,
            price: valid.price,
            available: valid.available,
            image: None,
        }
    }

    /// Swap the image, handing back the previous one so its file can be removed.
    pub fn replace_image(&mut self, image: StoredImage) -> Option<StoredImage> {
        self.image.replace(image)
    }
}

impl Entity for MenuItem {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemDraft {
    pub name: String,
    pub category: String,
    pub price: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMenuItem {
    pub name: String,
    pub category: MenuCategory,
    pub price: Money,
    pub available: bool,
}

pub fn validate_menu_item(draft: &MenuItemDraft) -> Result<ValidMenuItem, ValidationErrors> {
    let mut v = Validator::new();

    let name = v.required("name", &draft.name);
    v.max_len("name", &draft.name, 80);

    let category = MenuCategory::parse(&draft.category);
    v.check(category.is_some(), "category", "pick a category");

    let price = match draft.price.parse::<Money>() {
        Ok(price) => {
            if v.positive_money("price", price) {
                v.check(
                    price <= MAX_MENU_PRICE,
                    "price",
                    format!("must be at most {MAX_MENU_PRICE}"),
                );
            }
            price
        }
        Err(_) => {
            v.push("price", "must be an amount like 120.00");
            Money::ZERO
        }
    };

    v.finish(|| ValidMenuItem {
        name: name.unwrap_or_default(),
        category: category.unwrap_or(MenuCategory::Other),
        price,
        available: draft.available,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_and_builds_menu_item() {
        let valid = validate_menu_item(&MenuItemDraft {
            name: "Chicken Adobo".into(),
            category: "Meals".into(),
            price: "120".into(),
            available: true,
        })
        .unwrap();
        let item = MenuItem::new(ProductId::new(), valid);
        assert_eq!(item.price, Money::from_major(120));
        assert_eq!(item.category, MenuCategory::Meal);
    }

    #[test]
    fn zero_price_and_unknown_category_fail() {
        let errs = validate_menu_item(&MenuItemDraft {
            name: "Water".into(),
            category: "liquids".into(),
            price: "0.00".into(),
            available: true,
        })
        .unwrap_err();
        assert_eq!(errs.for_field("price"), Some("must be greater than zero"));
        assert!(errs.has_field("category"));
    }

    #[test]
    fn price_above_the_cap_fails() {
        let draft = |price: &str| MenuItemDraft {
            name: "Banquet".into(),
            category: "meal".into(),
            price: price.into(),
            available: true,
        };

        let errs = validate_menu_item(&draft("90000000000000000")).unwrap_err();
        assert_eq!(errs.for_field("price"), Some("must be at most 1000000.00"));
        assert!(validate_menu_item(&draft("1000000.01")).is_err());
        assert_eq!(validate_menu_item(&draft("1000000.00")).unwrap().price, MAX_MENU_PRICE);
    }

    #[test]
    fn replace_image_returns_previous() {
        let mut item = MenuItem::new(
            ProductId::new(),
            ValidMenuItem {
                name: "Halo-halo".into(),
                category: MenuCategory::Dessert,
                price: Money::from_major(85),
                available: true,
            },
        );
        let first = StoredImage {
            url: "https://cdn/a.png".into(),
            path: "menu/a.png".into(),
        };
        assert!(item.replace_image(first.clone()).is_none());
        let old = item.replace_image(StoredImage {
            url: "https://cdn/b.png".into(),
            path: "menu/b.png".into(),
        });
        assert_eq!(old, Some(first));
    }
}
