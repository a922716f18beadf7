use crate::error::ModelError;
use uuid::Uuid;

/// Opaque identifier of a user.
///
/// Identifiers are assigned by the entity store and never reused. Fresh ids
/// come from a time-ordered UUID; seed data uses short literal ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UserId(String);

impl UserId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        UserId(Uuid::now_v7().to_string())
    }

    /// Wrap an existing identifier, rejecting blank input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ModelError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ModelError::EmptyId);
        }
        Ok(UserId(raw))
    }

    /// Wrap a literal identifier known at compile time, such as seed ids.
    pub fn from_static(raw: &'static str) -> Self {
        UserId(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Opaque identifier of a role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RoleId(String);

impl RoleId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        RoleId(Uuid::now_v7().to_string())
    }

    /// Wrap an existing identifier, rejecting blank input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ModelError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ModelError::EmptyId);
        }
        Ok(RoleId(raw))
    }

    /// Wrap a literal identifier known at compile time, such as seed ids.
    pub fn from_static(raw: &'static str) -> Self {
        RoleId(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RoleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RoleId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
