use std::sync::Arc;

use tillpoint_auth::{Identity, StaffMember};

use crate::{Filter, Record, RemoteError, RemoteStore, Repository};

/// Staff accounts, looked up by sign-in email.
pub struct StaffDirectory {
    staff: Repository<StaffMember>,
}

impl StaffDirectory {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            staff: Repository::new(store),
        }
    }

    pub fn staff(&self) -> &Repository<StaffMember> {
        &self.staff
    }

    pub fn staff_mut(&mut self) -> &mut Repository<StaffMember> {
        &mut self.staff
    }

    /// Identity for the account registered under `email`, if any.
    ///
    /// Emails are stored lowercased, so the lookup is case-insensitive.
    pub async fn identity_for_email(&self, email: &str) -> Result<Option<Identity>, RemoteError> {
        let filter = Filter::all().eq("email", email.trim().to_lowercase()).limit(1);
        let rows = self.staff.store().list(StaffMember::COLLECTION, &filter).await?;
        let Some(row) = rows.into_iter().next() else {
            tracing::info!(email, "no staff account for email");
            return Ok(None);
        };
        let member: StaffMember = serde_json::from_value(row)?;
        Ok(Some(member.identity()))
    }
}
