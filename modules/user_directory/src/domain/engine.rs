use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::contract::client::UserSource;
use crate::contract::error::DashboardError;
use crate::contract::model::{NewUserRecord, Statistics, UserRecord, UserRecordPatch, UserStatus};
use crate::domain::error::DomainError;
use crate::domain::view::{
    derive, DerivedView, FilterCriteria, Selection, SortCriteria, SortField, ViewState,
};

/// Static options of an engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub items_per_page: usize,
    /// Honour `FilterCriteria::status`.
    pub status_filter: bool,
    /// Role options offered by the form; not enforced on records.
    pub roles: Vec<String>,
    /// Department options offered by the form; not enforced on records.
    pub departments: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            items_per_page: 5,
            status_filter: true,
            roles: ["Admin", "Manager", "Developer", "Designer", "Analyst"]
                .map(String::from)
                .to_vec(),
            departments: ["Engineering", "Marketing", "Sales", "HR", "Finance"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Where the initial load stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing loaded yet; every view reflects an empty set.
    Pending,
    Loaded { count: usize },
    /// Terminal for that attempt; the set was left untouched.
    Failed { message: String },
}

/// Client-side list manager: owns the authoritative record set and the view
/// state, and re-derives the displayed page after every change.
///
/// Not reentrant; callers sharing one engine must serialise access themselves.
#[derive(Debug, Clone)]
pub struct ListEngine {
    records: Vec<UserRecord>,
    view: ViewState,
    derived: DerivedView,
    load_state: LoadState,
    /// Highest id ever present; new ids start above it so deleted ids stay retired.
    high_water_id: u32,
    roles: Vec<String>,
    departments: Vec<String>,
}

impl ListEngine {
    /// Empty engine waiting for its initial load.
    pub fn new(config: EngineConfig) -> Result<Self, DomainError> {
        let view = ViewState::new(config.items_per_page, config.status_filter)?;
        let derived = derive(&[], &view);
        Ok(Self {
            records: Vec::new(),
            view,
            derived,
            load_state: LoadState::Pending,
            high_water_id: 0,
            roles: config.roles,
            departments: config.departments,
        })
    }

    /// Engine seeded with a fixed record set.
    pub fn with_records(
        config: EngineConfig,
        records: Vec<UserRecord>,
    ) -> Result<Self, DomainError> {
        let mut engine = Self::new(config)?;
        engine.replace_records(records)?;
        Ok(engine)
    }

    /// Await one fetch from `source` and install the result.
    ///
    /// On failure the authoritative set is left as it was and the error is
    /// returned once; there is no retry.
    #[instrument(name = "user_directory.engine.load", level = "debug", skip_all)]
    pub async fn load(&mut self, source: &dyn UserSource) -> Result<usize, DomainError> {
        self.load_state = LoadState::Pending;

        let outcome = source
            .fetch_users()
            .await
            .map_err(|e| match e {
                DashboardError::LoadFailure { message }
                | DashboardError::InvalidArgument { message } => DomainError::load_failed(message),
            })
            .and_then(|records| {
                self.replace_records(records).map_err(|e| match e {
                    DomainError::DuplicateId { id } => {
                        DomainError::load_failed(format!("duplicate user id {id} in loaded data"))
                    }
                    other => other,
                })
            });

        match outcome {
            Ok(count) => {
                info!(count, "user records loaded");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "user records load failed");
                self.load_state = LoadState::Failed {
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    fn replace_records(&mut self, records: Vec<UserRecord>) -> Result<usize, DomainError> {
        let mut seen = HashSet::with_capacity(records.len());
        if let Some(dup) = records.iter().find(|r| !seen.insert(r.id)) {
            return Err(DomainError::duplicate_id(dup.id));
        }
        let count = records.len();
        let max_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        self.high_water_id = self.high_water_id.max(max_id);
        self.records = records;
        self.load_state = LoadState::Loaded { count };
        self.view.current_page = 1;
        self.rederive();
        Ok(count)
    }

    // --- read side ---

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn find(&self, id: u32) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn derived(&self) -> &DerivedView {
        &self.derived
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.view.filter
    }

    pub fn sort(&self) -> SortCriteria {
        self.view.sort
    }

    pub fn current_page(&self) -> usize {
        self.derived.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.derived.total_pages()
    }

    pub fn items_per_page(&self) -> usize {
        self.view.items_per_page()
    }

    pub fn filtered_count(&self) -> usize {
        self.derived.filtered_count()
    }

    pub fn current_page_records(&self) -> &[UserRecord] {
        self.derived.current_page_records()
    }

    /// Page numbers for a pager widget.
    pub fn page_numbers(&self) -> Vec<usize> {
        (1..=self.total_pages()).collect()
    }

    /// Counts over the whole authoritative set; filters are ignored.
    pub fn statistics(&self) -> Statistics {
        Statistics::of(&self.records)
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn departments(&self) -> &[String] {
        &self.departments
    }

    pub fn statuses(&self) -> &'static [UserStatus] {
        &UserStatus::ALL
    }

    /// Empty "add user" form joined today.
    pub fn blank_record(&self) -> NewUserRecord {
        self.blank_record_on(chrono::Local::now().date_naive())
    }

    /// Empty form: first configured role and department, active.
    pub fn blank_record_on(&self, join_date: NaiveDate) -> NewUserRecord {
        NewUserRecord {
            name: String::new(),
            email: String::new(),
            role: self.roles.first().cloned().unwrap_or_default(),
            status: UserStatus::Active,
            join_date,
            department: self.departments.first().cloned().unwrap_or_default(),
        }
    }

    // --- filter & sort ---

    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        debug!(?criteria, "filter replaced");
        self.view.filter = criteria;
        self.restart();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.view.filter.search_term = term.into();
        self.restart();
    }

    pub fn set_role_filter(&mut self, role: impl Into<Selection>) {
        self.view.filter.role = role.into();
        self.restart();
    }

    pub fn set_department_filter(&mut self, department: impl Into<Selection>) {
        self.view.filter.department = department.into();
        self.restart();
    }

    pub fn set_status_filter(&mut self, status: impl Into<Selection>) {
        self.view.filter.status = status.into();
        self.restart();
    }

    pub fn reset_filter(&mut self) {
        debug!("filter reset");
        self.view.filter = FilterCriteria::default();
        self.restart();
    }

    /// Same field flips direction; a different field sorts ascending.
    pub fn set_sort(&mut self, field: SortField) {
        self.view.sort = self.view.sort.clicked(field);
        debug!(field = %field, direction = self.view.sort.direction.as_str(), "sort changed");
        self.restart();
    }

    pub fn set_items_per_page(&mut self, n: usize) -> Result<(), DomainError> {
        self.view.set_items_per_page(n)?;
        self.restart();
        Ok(())
    }

    // --- navigation ---

    /// Out-of-range pages are ignored. Returns whether the page changed.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let moved = self.derived.seek(page);
        if moved {
            self.view.current_page = page;
        } else {
            debug!(page, total = self.total_pages(), "page request ignored");
        }
        moved
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page() + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.go_to_page(self.current_page().saturating_sub(1))
    }

    // --- mutations ---

    /// Append a record with `id = max(existing ids, 0) + 1`, raised above any
    /// id handed out before so a deleted id is never issued again. Fails once
    /// `u32::MAX` has been used.
    #[instrument(
        name = "user_directory.engine.add_record",
        level = "debug",
        skip(self, new),
        fields(name = %new.name)
    )]
    pub fn add_record(&mut self, new: NewUserRecord) -> Result<UserRecord, DomainError> {
        let max_existing = self.records.iter().map(|r| r.id).max().unwrap_or(0);
        let last = max_existing.max(self.high_water_id);
        let id = last.checked_add(1).ok_or_else(|| {
            warn!(last, "user id space exhausted");
            DomainError::id_space_exhausted(last)
        })?;
        self.high_water_id = id;
        let record = new.into_record(id);
        self.records.push(record.clone());
        self.rederive();
        debug!(id, "record added");
        Ok(record)
    }

    /// Replace the present fields of record `id` in place. `None` if absent;
    /// an empty patch leaves the view untouched.
    #[instrument(name = "user_directory.engine.update_record", level = "debug", skip(self, patch))]
    pub fn update_record(&mut self, id: u32, patch: UserRecordPatch) -> Option<UserRecord> {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            debug!("update target not found");
            return None;
        };
        if patch.is_empty() {
            return Some(record.clone());
        }
        patch.apply_to(record);
        let updated = record.clone();
        self.rederive();
        Some(updated)
    }

    /// Remove record `id`. `None` if absent.
    #[instrument(name = "user_directory.engine.delete_record", level = "debug", skip(self))]
    pub fn delete_record(&mut self, id: u32) -> Option<UserRecord> {
        let Some(pos) = self.records.iter().position(|r| r.id == id) else {
            debug!("delete target not found");
            return None;
        };
        let removed = self.records.remove(pos);
        self.rederive();
        Some(removed)
    }

    /// Flip active/inactive on record `id`; returns the new status.
    #[instrument(name = "user_directory.engine.toggle_status", level = "debug", skip(self))]
    pub fn toggle_status(&mut self, id: u32) -> Option<UserStatus> {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            debug!("toggle target not found");
            return None;
        };
        record.status = record.status.toggled();
        let status = record.status;
        self.rederive();
        Some(status)
    }

    // --- derivation ---

    /// View criteria changed: back to page 1.
    fn restart(&mut self) {
        self.view.current_page = 1;
        self.rederive();
    }

    /// Data changed: keep the page, clamped to the new range.
    fn rederive(&mut self) {
        self.derived = derive(&self.records, &self.view);
        self.view.current_page = self.derived.current_page();
    }
}
