use serde::{Deserialize, Serialize};

use tillpoint_core::{Entity, SupplierId, ValidationErrors, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Supplier {
    pub fn new(id: SupplierId, valid: ValidSupplier) -> Self {
        Self {
            id,
            name: valid.name,
            contact_person: valid.contact_person,
            email: valid.email,
            phone: valid.phone,
            address: valid.address,
            active: true,
        }
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierDraft {
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSupplier {
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Suppliers need a name and at least one way to reach them.
pub fn validate_supplier(draft: &SupplierDraft) -> Result<ValidSupplier, ValidationErrors> {
    let mut v = Validator::new();

    let name = v.required("name", &draft.name);
    v.max_len("name", &draft.name, 120);

    let email = optional(&draft.email);
    if email.is_some() {
        v.email("email", &draft.email);
    }

    let phone = optional(&draft.phone);
    if let Some(phone) = &phone {
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        let allowed = phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
        v.check(allowed && (7..=15).contains(&digits), "phone", "must be a phone number");
    }

    v.check(
        email.is_some() || phone.is_some(),
        "contact",
        "provide an email or a phone number",
    );

    v.finish(|| ValidSupplier {
        name: name.unwrap_or_default(),
        contact_person: optional(&draft.contact_person),
        email: email.map(|e| e.to_ascii_lowercase()),
        phone,
        address: optional(&draft.address),
    })
}
