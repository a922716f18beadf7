use gatehouse_model::{RoleId, User};
use serde::{Deserialize, Serialize};

/// Complete description of the user list the console shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UserQuery {
    pub search_term: String,
    pub status: StatusFilter,
    pub role: RoleFilter,
    pub sort: SortCriteria,
}

/// Filter on the account status flag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn matches(&self, is_active: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => is_active,
            StatusFilter::Inactive => !is_active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Inactive => "inactive",
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "inactive" => Ok(StatusFilter::Inactive),
            _ => Err(QueryParseError::Invalid {
                kind: "status filter",
                value: s.to_string(),
            }),
        }
    }
}

/// Filter on the assigned role id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleFilter {
    #[default]
    All,
    Role(RoleId),
}

impl RoleFilter {
    /// Exact id comparison; no name resolution happens here.
    pub fn matches(&self, role_id: &RoleId) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Role(wanted) => wanted == role_id,
        }
    }
}

impl std::str::FromStr for RoleFilter {
    type Err = QueryParseError;

    /// `all` selects every role, anything else is taken as a role id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(RoleFilter::All);
        }
        RoleId::parse(trimmed).map(RoleFilter::Role).map_err(|_| {
            QueryParseError::Invalid {
                kind: "role filter",
                value: s.to_string(),
            }
        })
    }
}

/// Columns the user list can be sorted by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    Email,
    /// Resolved role display name, not the raw id.
    Role,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Role => "role",
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "email" => Ok(SortField::Email),
            "role" => Ok(SortField::Role),
            _ => Err(QueryParseError::Invalid {
                kind: "sort field",
                value: s.to_string(),
            }),
        }
    }
}

/// Sort direction
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Active sort column and direction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub struct SortCriteria {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortCriteria {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Column header click: the active field flips direction, another field
    /// becomes active in ascending order.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// One line of the materialized user list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub user: User,
    /// Display name of the user's role, or the unknown-role sentinel.
    pub role_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryParseError {
    #[error("invalid {kind}: {value}")]
    Invalid { kind: &'static str, value: String },
}
