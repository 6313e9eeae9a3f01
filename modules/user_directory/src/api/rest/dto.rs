use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::error::DashboardError;
use crate::contract::model::{Statistics, UserRecord, UserStatus};
use crate::domain::engine::EngineConfig;
use crate::domain::error::DomainError;
use crate::domain::view::{DerivedView, FilterCriteria, Selection, SortCriteria, ViewState};

const JOIN_DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire representation of a user record (camelCase keys, `joinDate` as a string).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecordDto {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: UserStatus,
    pub join_date: String,
    pub department: String,
}

/// Envelope shared by every endpoint: `{success, data, count, message}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, count: usize) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: Some(count),
            message: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Query string of `GET /api/users/view`. Missing keys fall back to the
/// engine defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewQuery {
    pub search: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl ViewQuery {
    pub fn to_view_state(&self, defaults: &EngineConfig) -> Result<ViewState, DomainError> {
        let mut view = ViewState::new(
            self.per_page.unwrap_or(defaults.items_per_page),
            defaults.status_filter,
        )?;

        view.filter = FilterCriteria {
            search_term: self.search.clone().unwrap_or_default(),
            role: selection(&self.role),
            department: selection(&self.department),
            status: selection(&self.status),
        };

        let mut sort = SortCriteria::default();
        if let Some(field) = &self.sort {
            sort.field = field.parse()?;
        }
        if let Some(direction) = &self.direction {
            sort.direction = direction.parse()?;
        }
        view.sort = sort;
        view.current_page = self.page.unwrap_or(1);
        Ok(view)
    }
}

fn selection(raw: &Option<String>) -> Selection {
    raw.as_deref().map(Selection::from).unwrap_or_default()
}

/// One derived page as returned by `GET /api/users/view`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserViewDto {
    pub success: bool,
    pub data: Vec<UserRecordDto>,
    /// Size of the filtered set across all pages.
    pub count: usize,
    pub page: usize,
    pub total_pages: usize,
    pub items_per_page: usize,
    pub statistics: Statistics,
}

impl UserViewDto {
    pub fn new(derived: &DerivedView, statistics: Statistics) -> Self {
        Self {
            success: true,
            data: derived
                .current_page_records()
                .iter()
                .cloned()
                .map(UserRecordDto::from)
                .collect(),
            count: derived.filtered_count(),
            page: derived.current_page(),
            total_pages: derived.total_pages(),
            items_per_page: derived.items_per_page(),
            statistics,
        }
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; a timestamp keeps its date part.
pub fn parse_join_date(raw: &str) -> Result<NaiveDate, DashboardError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, JOIN_DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| DashboardError::load_failure(format!("unparseable joinDate '{raw}'")))
}

// Conversion implementations between wire DTOs and contract models

impl From<UserRecord> for UserRecordDto {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            role: r.role,
            status: r.status,
            join_date: r.join_date.format(JOIN_DATE_FORMAT).to_string(),
            department: r.department,
        }
    }
}

impl TryFrom<UserRecordDto> for UserRecord {
    type Error = DashboardError;

    fn try_from(dto: UserRecordDto) -> Result<Self, Self::Error> {
        Ok(Self {
            join_date: parse_join_date(&dto.join_date)?,
            id: dto.id,
            name: dto.name,
            email: dto.email,
            role: dto.role,
            status: dto.status,
            department: dto.department,
        })
    }
}
