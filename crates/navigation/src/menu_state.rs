/// Which sidebar sub-menu is expanded; at most one at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuExpansion {
    open: Option<String>,
}

impl MenuExpansion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes `name` if it is open, otherwise opens it (closing any other).
    pub fn toggle(&mut self, name: &str) {
        if self.open.as_deref() == Some(name) {
            self.open = None;
        } else {
            self.open = Some(name.to_string());
        }
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn open_menu(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.open.as_deref() == Some(name)
    }
}
