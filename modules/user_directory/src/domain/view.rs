//! View state and the pure filter → sort → paginate derivation.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::contract::model::UserRecord;
use crate::domain::error::DomainError;

/// Sentinel accepted by the role/department/status selectors.
pub const ALL: &str = "all";

/// A select-box criterion: either everything, or exact equality with one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn only(value: impl Into<String>) -> Self {
        Self::Only(value.into())
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl From<&str> for Selection {
    /// `"all"` and the empty string select everything; anything else is an exact match.
    fn from(raw: &str) -> Self {
        if raw.is_empty() || raw == ALL {
            Selection::All
        } else {
            Selection::Only(raw.to_string())
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL),
            Selection::Only(v) => f.write_str(v),
        }
    }
}

/// Filter criteria. The default is all-inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against name and email.
    pub search_term: String,
    pub role: Selection,
    pub department: Selection,
    /// Compared with the lowercase status name; only honoured when the
    /// status filter is enabled for the view.
    pub status: Selection,
}

impl FilterCriteria {
    pub fn is_all_inclusive(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &UserRecord, status_filter_enabled: bool) -> bool {
        self.matches_search(record)
            && self.role.matches(&record.role)
            && self.department.matches(&record.department)
            && (!status_filter_enabled || self.status.matches(record.status.as_str()))
    }

    fn matches_search(&self, record: &UserRecord) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let term = self.search_term.to_lowercase();
        record.name.to_lowercase().contains(&term) || record.email.to_lowercase().contains(&term)
    }
}

/// Closed set of sortable columns, each with a typed comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Name,
    Email,
    Role,
    Status,
    JoinDate,
    Department,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Id,
        SortField::Name,
        SortField::Email,
        SortField::Role,
        SortField::Status,
        SortField::JoinDate,
        SortField::Department,
    ];

    /// Wire name of the column (matches the JSON key).
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Role => "role",
            SortField::Status => "status",
            SortField::JoinDate => "joinDate",
            SortField::Department => "department",
        }
    }

    /// Ascending comparison of two records on this column.
    pub fn compare(self, a: &UserRecord, b: &UserRecord) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Email => a.email.cmp(&b.email),
            SortField::Role => a.role.cmp(&b.role),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::JoinDate => a.join_date.cmp(&b.join_date),
            SortField::Department => a.department.cmp(&b.department),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "name" => Ok(SortField::Name),
            "email" => Ok(SortField::Email),
            "role" => Ok(SortField::Role),
            "status" => Ok(SortField::Status),
            "joinDate" | "join_date" => Ok(SortField::JoinDate),
            "department" => Ok(SortField::Department),
            other => Err(DomainError::unknown_sort_field(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(DomainError::unknown_sort_direction(s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortCriteria {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortCriteria {
    fn default() -> Self {
        Self {
            field: SortField::Name,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortCriteria {
    /// Column-header click: same field flips direction, a new field starts ascending.
    pub fn clicked(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.toggled(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Ascending,
            }
        }
    }

    pub fn compare(&self, a: &UserRecord, b: &UserRecord) -> Ordering {
        self.direction.apply(self.field.compare(a, b))
    }
}

/// Everything that decides which records are displayed and in what order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub filter: FilterCriteria,
    pub sort: SortCriteria,
    /// 1-based; clamped into `[1, total_pages]` by every derivation.
    pub current_page: usize,
    items_per_page: usize,
    pub status_filter_enabled: bool,
}

impl ViewState {
    pub fn new(items_per_page: usize, status_filter_enabled: bool) -> Result<Self, DomainError> {
        if items_per_page == 0 {
            return Err(DomainError::zero_items_per_page());
        }
        Ok(Self {
            filter: FilterCriteria::default(),
            sort: SortCriteria::default(),
            current_page: 1,
            items_per_page,
            status_filter_enabled,
        })
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn set_items_per_page(&mut self, n: usize) -> Result<(), DomainError> {
        if n == 0 {
            return Err(DomainError::zero_items_per_page());
        }
        self.items_per_page = n;
        Ok(())
    }
}

/// Output of one derivation: the full filtered+sorted sequence plus the page cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedView {
    matching: Vec<UserRecord>,
    current_page: usize,
    total_pages: usize,
    items_per_page: usize,
}

impl DerivedView {
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Filtered and sorted records across all pages.
    pub fn matching(&self) -> &[UserRecord] {
        &self.matching
    }

    pub fn filtered_count(&self) -> usize {
        self.matching.len()
    }

    /// Records on page `page` (1-based); empty for pages outside the range.
    pub fn page(&self, page: usize) -> &[UserRecord] {
        if page == 0 {
            return &[];
        }
        let start = (page - 1).saturating_mul(self.items_per_page);
        if start >= self.matching.len() {
            return &[];
        }
        let end = start
            .saturating_add(self.items_per_page)
            .min(self.matching.len());
        &self.matching[start..end]
    }

    pub fn current_page_records(&self) -> &[UserRecord] {
        self.page(self.current_page)
    }

    /// Moves the cursor if `page` is in range. Returns whether it moved.
    pub(crate) fn seek(&mut self, page: usize) -> bool {
        if (1..=self.total_pages).contains(&page) {
            self.current_page = page;
            true
        } else {
            false
        }
    }
}

/// `ceil(len / per_page)` with a floor of one page.
pub fn page_count(len: usize, per_page: usize) -> usize {
    len.div_ceil(per_page).max(1)
}

/// Filter → stable sort → count pages → clamp the cursor.
pub fn derive(records: &[UserRecord], view: &ViewState) -> DerivedView {
    let mut matching: Vec<UserRecord> = records
        .iter()
        .filter(|r| view.filter.matches(r, view.status_filter_enabled))
        .cloned()
        .collect();

    // sort_by is stable: equal keys keep authoritative-set order.
    matching.sort_by(|a, b| view.sort.compare(a, b));

    let total_pages = page_count(matching.len(), view.items_per_page);
    let current_page = view.current_page.clamp(1, total_pages);

    DerivedView {
        matching,
        current_page,
        total_pages,
        items_per_page: view.items_per_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::UserStatus;
    use chrono::NaiveDate;

    fn rec(id: u32, name: &str, role: &str, dept: &str, status: UserStatus) -> UserRecord {
        UserRecord {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            role: role.to_string(),
            status,
            join_date: NaiveDate::from_ymd_opt(2023, 1, id).unwrap(),
            department: dept.to_string(),
        }
    }

    fn sample() -> Vec<UserRecord> {
        vec![
            rec(1, "Carol", "Admin", "Engineering", UserStatus::Active),
            rec(2, "alice", "Developer", "Engineering", UserStatus::Inactive),
            rec(3, "Bob", "Developer", "Sales", UserStatus::Active),
            rec(4, "Bob", "Manager", "Sales", UserStatus::Active),
        ]
    }

    fn view(per_page: usize) -> ViewState {
        ViewState::new(per_page, true).unwrap()
    }

    #[test]
    fn page_count_has_floor_of_one() {
        assert_eq!(page_count(0, 5), 1);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(6, 5), 2);
        assert_eq!(page_count(11, 5), 3);
    }

    #[test]
    fn zero_items_per_page_rejected() {
        assert_eq!(ViewState::new(0, false), Err(DomainError::ZeroItemsPerPage));
        let mut v = view(3);
        assert!(v.set_items_per_page(0).is_err());
        assert_eq!(v.items_per_page(), 3);
    }

    #[test]
    fn selection_parsing() {
        assert_eq!(Selection::from("all"), Selection::All);
        assert_eq!(Selection::from(""), Selection::All);
        assert_eq!(Selection::from("Sales"), Selection::only("Sales"));
        assert!(!Selection::from("sales").matches("Sales"));
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_email() {
        let mut v = view(10);
        v.filter.search_term = "ALICE".into();
        let d = derive(&sample(), &v);
        assert_eq!(d.filtered_count(), 1);
        assert_eq!(d.matching()[0].id, 2);

        v.filter.search_term = "@EXAMPLE".into();
        assert_eq!(derive(&sample(), &v).filtered_count(), 4);
    }

    #[test]
    fn status_filter_only_applies_when_enabled() {
        let mut v = view(10);
        v.filter.status = Selection::only("inactive");
        assert_eq!(derive(&sample(), &v).filtered_count(), 1);

        v.status_filter_enabled = false;
        assert_eq!(derive(&sample(), &v).filtered_count(), 4);
    }

    #[test]
    fn unknown_status_value_matches_nothing() {
        let mut v = view(10);
        v.filter.status = Selection::only("suspended");
        let d = derive(&sample(), &v);
        assert_eq!(d.filtered_count(), 0);
        assert_eq!(d.total_pages(), 1);
        assert_eq!(d.current_page(), 1);
        assert!(d.current_page_records().is_empty());
    }

    #[test]
    fn string_sort_is_lexicographic_and_stable() {
        let d = derive(&sample(), &view(10));
        let ids: Vec<u32> = d.matching().iter().map(|r| r.id).collect();
        // Uppercase sorts before lowercase; the two Bobs keep their set order.
        assert_eq!(ids, vec![3, 4, 1, 2]);

        let mut v = view(10);
        v.sort.direction = SortDirection::Descending;
        let ids: Vec<u32> = derive(&sample(), &v).matching().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }

    #[test]
    fn date_and_status_sorts() {
        let mut v = view(10);
        v.sort = SortCriteria {
            field: SortField::JoinDate,
            direction: SortDirection::Descending,
        };
        let ids: Vec<u32> = derive(&sample(), &v).matching().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);

        v.sort = SortCriteria {
            field: SortField::Status,
            direction: SortDirection::Descending,
        };
        let derived = derive(&sample(), &v);
        let first = &derived.matching()[0];
        assert_eq!(first.status, UserStatus::Inactive);
    }

    #[test]
    fn clicking_the_same_column_flips_direction() {
        let s = SortCriteria::default();
        let s = s.clicked(SortField::Name);
        assert_eq!(s.direction, SortDirection::Descending);
        let s = s.clicked(SortField::Role);
        assert_eq!(s.field, SortField::Role);
        assert_eq!(s.direction, SortDirection::Ascending);
    }

    #[test]
    fn sort_field_names() {
        for f in SortField::ALL {
            assert_eq!(f.as_str().parse::<SortField>().unwrap(), f);
        }
        assert_eq!("join_date".parse::<SortField>().unwrap(), SortField::JoinDate);
        assert!(matches!(
            "salary".parse::<SortField>(),
            Err(DomainError::UnknownSortField { .. })
        ));
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn cursor_is_clamped_and_pages_are_clipped() {
        let mut v = view(3);
        v.current_page = 9;
        let d = derive(&sample(), &v);
        assert_eq!(d.total_pages(), 2);
        assert_eq!(d.current_page(), 2);
        assert_eq!(d.current_page_records().len(), 1);
        assert_eq!(d.page(1).len(), 3);
        assert!(d.page(0).is_empty());
        assert!(d.page(3).is_empty());
    }

    #[test]
    fn seek_ignores_out_of_range() {
        let mut d = derive(&sample(), &view(3));
        assert!(!d.seek(0));
        assert!(!d.seek(3));
        assert_eq!(d.current_page(), 1);
        assert!(d.seek(2));
        assert_eq!(d.current_page(), 2);
    }
}
