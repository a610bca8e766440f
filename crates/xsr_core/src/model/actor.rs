//! Acting user for task and note mutations.

/// The signed-in user performing a mutation.
///
/// Authentication happens outside the core; this is the already-resolved
/// identity. Ownership checks compare `display_name()` against the
/// `doneBy`/`addedBy` strings stored on the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            is_admin: false,
        }
    }

    pub fn admin(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::new(first_name, last_name)
        }
    }

    /// `"<first> <last>"`, the string recorded as author.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns whether this actor may touch a record authored by `author`.
    ///
    /// Administrators may always; everyone else only their own records.
    pub fn may_modify(&self, author: &str) -> bool {
        self.is_admin || author == self.display_name()
    }
}
