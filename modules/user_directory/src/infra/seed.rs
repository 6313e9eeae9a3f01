use async_trait::async_trait;
use chrono::NaiveDate;

use crate::contract::client::UserSource;
use crate::contract::error::DashboardError;
use crate::contract::model::{UserRecord, UserStatus};

type SeedRow = (u32, &'static str, &'static str, UserStatus, (i32, u32, u32), &'static str);

const SEED: [SeedRow; 10] = [
    (1, "John Doe", "Admin", UserStatus::Active, (2023, 1, 15), "Engineering"),
    (2, "Jane Smith", "Developer", UserStatus::Active, (2023, 3, 20), "Engineering"),
    (3, "Bob Johnson", "Manager", UserStatus::Active, (2022, 11, 10), "Marketing"),
    (4, "Alice Williams", "Designer", UserStatus::Inactive, (2023, 5, 5), "Marketing"),
    (5, "Charlie Brown", "Analyst", UserStatus::Active, (2023, 7, 12), "Finance"),
    (6, "Diana Prince", "Developer", UserStatus::Active, (2023, 2, 28), "Engineering"),
    (7, "Ethan Hunt", "Manager", UserStatus::Active, (2022, 9, 15), "Sales"),
    (8, "Fiona Green", "Developer", UserStatus::Inactive, (2023, 4, 18), "Engineering"),
    (9, "George Miller", "Analyst", UserStatus::Active, (2023, 6, 22), "Finance"),
    (10, "Hannah Lee", "Designer", UserStatus::Active, (2023, 8, 30), "Marketing"),
];

fn row_to_record(&(id, name, role, status, (y, m, d), department): &SeedRow) -> UserRecord {
    UserRecord {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        role: role.to_string(),
        status,
        // Seed dates are literal calendar dates.
        join_date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        department: department.to_string(),
    }
}

/// The 8-record set the dashboard starts with when it has no backend.
pub fn dashboard_seed() -> Vec<UserRecord> {
    SEED[..8].iter().map(row_to_record).collect()
}

/// The 10-record set served by `GET /api/users`.
pub fn server_seed() -> Vec<UserRecord> {
    SEED.iter().map(row_to_record).collect()
}

/// In-memory source answering every fetch with the same records.
#[derive(Debug, Clone, Default)]
pub struct StaticUserSource {
    records: Vec<UserRecord>,
}

impl StaticUserSource {
    pub fn new(records: Vec<UserRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl UserSource for StaticUserSource {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, DashboardError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_seed_shape() {
        let users = dashboard_seed();
        assert_eq!(users.len(), 8);
        let engineering = users.iter().filter(|u| u.department == "Engineering").count();
        assert_eq!(engineering, 4);
        let active = users.iter().filter(|u| u.status == UserStatus::Active).count();
        assert_eq!(active, 6);
        assert_eq!(users[0].email, "john.doe@example.com");
    }

    #[test]
    fn server_seed_extends_dashboard_seed() {
        let server = server_seed();
        assert_eq!(server.len(), 10);
        assert_eq!(&server[..8], dashboard_seed().as_slice());
        assert_eq!(server[9].join_date, NaiveDate::from_ymd_opt(2023, 8, 30).unwrap());
    }
}
