//! Chat contacts.

/// Name used when the first message page carries no breadcrumb header.
pub const UNKNOWN_CONTACT: &str = "Unknown Contact";

/// Display names the export uses for accounts that no longer exist.
///
/// Many conversations can share one of these, so they are never used as a
/// directory name on their own.
pub const DELETED_ACCOUNT_NAMES: [&str; 3] = ["DELETED", "Deleted user", "Удалённый пользователь"];

/// The other side of a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// Display name as extracted from the page.
    pub name: String,
    /// Name of the archive folder holding this conversation.
    pub id: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }

    /// `true` if the display name cannot tell this contact apart from others.
    pub fn is_ambiguous(&self) -> bool {
        self.name == UNKNOWN_CONTACT || DELETED_ACCOUNT_NAMES.contains(&self.name.as_str())
    }

    /// Name used for the contact's output directory (before sanitizing).
    ///
    /// Deleted and unnamed accounts are qualified with the folder id so
    /// they do not collapse into one directory.
    pub fn effective_name(&self) -> String {
        if self.is_ambiguous() {
            format!("{} ({})", self.name, self.id)
        } else {
            self.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_contact_keeps_name() {
        let contact = Contact::new("Анна Петрова", "2000001");
        assert!(!contact.is_ambiguous());
        assert_eq!(contact.effective_name(), "Анна Петрова");
    }

    #[test]
    fn test_deleted_contacts_are_qualified() {
        let a = Contact::new("DELETED", "A");
        let b = Contact::new("DELETED", "B");
        assert_eq!(a.effective_name(), "DELETED (A)");
        assert_ne!(a.effective_name(), b.effective_name());
    }

    #[test]
    fn test_unknown_contact_is_qualified() {
        let contact = Contact::new(UNKNOWN_CONTACT, "42");
        assert_eq!(contact.effective_name(), "Unknown Contact (42)");
    }
}
