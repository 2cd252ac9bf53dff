use serde::{Deserialize, Serialize};

use tillpoint_core::{ValidationErrors, Validator};

/// Raw sign-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Sign-in input ready to hand to the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub fn validate_login(form: &LoginForm) -> Result<Credentials, ValidationErrors> {
    let mut v = Validator::new();
    if v.required("email", &form.email).is_some() {
        v.email("email", &form.email);
    }
    v.check(!form.password.is_empty(), "password", "is required");

    v.finish(|| Credentials {
        email: form.email.trim().to_ascii_lowercase(),
        password: form.password.clone(),
    })
}
