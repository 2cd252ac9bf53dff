use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// Query for `RemoteStore::list`: equality clauses, ordering and a limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    eq: Vec<(String, String)>,
    order_by: Option<(String, Order)>,
    limit: Option<usize>,
}

impl Filter {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl ToString) -> Self {
        self.eq.push((field.to_string(), value.to_string()));
        self
    }

    pub fn order_by(mut self, field: &str, order: Order) -> Self {
        self.order_by = Some((field.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn equalities(&self) -> &[(String, String)] {
        &self.eq
    }

    pub fn ordering(&self) -> Option<(&str, Order)> {
        self.order_by.as_ref().map(|(f, o)| (f.as_str(), *o))
    }

    pub fn max_results(&self) -> Option<usize> {
        self.limit
    }

    /// Query-string form understood by the REST backend
    /// (`field=eq.value`, `order=field.asc`, `limit=n`).
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = self
            .eq
            .iter()
            .map(|(field, value)| (field.clone(), format!("eq.{value}")))
            .collect();
        if let Some((field, order)) = &self.order_by {
            let dir = match order {
                Order::Asc => "asc",
                Order::Desc => "desc",
            };
            query.push(("order".to_string(), format!("{field}.{dir}")));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        query
    }

    /// In-process evaluation of the equality clauses.
    pub fn matches(&self, record: &Value) -> bool {
        self.eq.iter().all(|(field, expected)| {
            record
                .get(field)
                .is_some_and(|actual| scalar_text(actual) == *expected)
        })
    }
}

/// Text form of a JSON scalar as it would appear in a query string.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
