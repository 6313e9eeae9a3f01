use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::contract::error::DashboardError;

/// Account status; drives statistics and the toggle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub const ALL: [UserStatus; 2] = [UserStatus::Active, UserStatus::Inactive];

    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Inactive,
            UserStatus::Inactive => UserStatus::Active,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            other => Err(DashboardError::invalid_argument(format!(
                "unknown status '{other}'"
            ))),
        }
    }
}

/// One managed user record. `id` is unique within the authoritative set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: UserStatus,
    pub join_date: NaiveDate,
    pub department: String,
}

/// Form payload for creating a record; the engine assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: UserStatus,
    pub join_date: NaiveDate,
    pub department: String,
}

impl NewUserRecord {
    pub fn into_record(self, id: u32) -> UserRecord {
        UserRecord {
            id,
            name: self.name,
            email: self.email,
            role: self.role,
            status: self.status,
            join_date: self.join_date,
            department: self.department,
        }
    }
}

/// Partial update; only the fields that are `Some` are replaced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserRecordPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<UserStatus>,
    pub join_date: Option<NaiveDate>,
    pub department: Option<String>,
}

impl UserRecordPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(self, record: &mut UserRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(email) = self.email {
            record.email = email;
        }
        if let Some(role) = self.role {
            record.role = role;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(join_date) = self.join_date {
            record.join_date = join_date;
        }
        if let Some(department) = self.department {
            record.department = department;
        }
    }
}

impl From<UserRecord> for UserRecordPatch {
    /// Full replacement from an edited record (the form's "save" payload).
    fn from(r: UserRecord) -> Self {
        Self {
            name: Some(r.name),
            email: Some(r.email),
            role: Some(r.role),
            status: Some(r.status),
            join_date: Some(r.join_date),
            department: Some(r.department),
        }
    }
}

/// Counts over the authoritative set, never the filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl Statistics {
    pub fn of(records: &[UserRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            match r.status {
                UserStatus::Active => acc.active += 1,
                UserStatus::Inactive => acc.inactive += 1,
            }
            acc
        })
    }
}
