//! Derived views over the resident list.
//!
//! Everything here is a pure function of the canonical list and a
//! [`ViewState`]: filter, then sort, then paginate. Derived views are never
//! persisted.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::resident::{AccessType, Resident, ResidentField};
use crate::state::ResidentsState;

/// Access type filter applied to the resident list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AccessFilter {
    /// Every access type.
    #[default]
    All,
    /// Only residents of the given access type.
    Only(AccessType),
}

impl AccessFilter {
    /// Check whether `resident` passes the filter.
    #[must_use]
    pub fn matches(&self, resident: &Resident) -> bool {
        match self {
            Self::All => true,
            Self::Only(access_type) => resident.access_type == *access_type,
        }
    }
}

impl fmt::Display for AccessFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(access_type) => write!(f, "{access_type}"),
        }
    }
}

impl FromStr for AccessFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl From<AccessFilter> for String {
    fn from(filter: AccessFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for AccessFilter {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortOrder {
    /// The opposite direction.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// Filter, sort, and page settings for the resident list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    /// Case-insensitive substring matched against name and house number.
    pub search_query: String,
    /// Access type filter.
    pub filter_type: AccessFilter,
    /// Sort column.
    pub sort_by: ResidentField,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// One-based page number.
    pub current_page: usize,
    /// Rows per page.
    pub items_per_page: usize,
}

/// Rows per page when nothing else is configured.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            filter_type: AccessFilter::All,
            sort_by: ResidentField::Name,
            sort_order: SortOrder::Asc,
            current_page: 1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl ViewState {
    /// Default view with a custom page size.
    #[must_use]
    pub fn with_items_per_page(items_per_page: usize) -> Self {
        Self {
            items_per_page: items_per_page.max(1),
            ..Self::default()
        }
    }

    /// Filtered and sorted residents, across all pages.
    #[must_use]
    pub fn filtered(&self, residents: &[Resident]) -> Vec<Resident> {
        let mut filtered = filter_residents(residents, &self.search_query, self.filter_type);
        sort_residents(&mut filtered, self.sort_by, self.sort_order);
        filtered
    }

    /// The page of residents this view currently shows.
    #[must_use]
    pub fn derive(&self, residents: &[Resident]) -> ResidentPage {
        paginate(self.filtered(residents), self.current_page, self.items_per_page)
    }
}

/// One page of the derived resident list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentPage {
    /// Residents on this page.
    pub residents: Vec<Resident>,
    /// One-based page number actually shown, after clamping.
    pub current_page: usize,
    /// Number of pages; zero when nothing matches.
    pub total_pages: usize,
    /// Number of residents matching the filters.
    pub total_items: usize,
}

/// The page a resident list state currently shows.
#[must_use]
pub fn derive_page(state: &ResidentsState) -> ResidentPage {
    state.view.derive(&state.residents)
}

/// Keep residents matching `query` (name or house number) and `filter`.
///
/// An empty or blank query matches everyone.
#[must_use]
pub fn filter_residents(residents: &[Resident], query: &str, filter: AccessFilter) -> Vec<Resident> {
    residents
        .iter()
        .filter(|r| query.is_empty() || r.matches_query(query))
        .filter(|r| filter.matches(r))
        .cloned()
        .collect()
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare_by(a: &Resident, b: &Resident, field: ResidentField) -> Ordering {
    match field {
        ResidentField::Name => compare_text(&a.name, &b.name),
        ResidentField::HouseNumber => compare_text(&a.house_number, &b.house_number),
        ResidentField::AccessType => compare_text(a.access_type.as_str(), b.access_type.as_str()),
        ResidentField::LastVisit => a.last_visit.cmp(&b.last_visit),
    }
}

/// Sort residents in place. The sort is stable in both directions.
pub fn sort_residents(residents: &mut [Resident], sort_by: ResidentField, order: SortOrder) {
    residents.sort_by(|a, b| match order {
        SortOrder::Asc => compare_by(a, b, sort_by),
        SortOrder::Desc => compare_by(b, a, sort_by),
    });
}

/// Number of pages needed for `total_items`.
#[must_use]
pub fn total_pages(total_items: usize, items_per_page: usize) -> usize {
    total_items.div_ceil(items_per_page.max(1))
}

/// Clamp a one-based page number into `1..=total_pages` (at least 1).
#[must_use]
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Cut one page out of `items`.
#[must_use]
pub fn paginate(items: Vec<Resident>, page: usize, items_per_page: usize) -> ResidentPage {
    let per_page = items_per_page.max(1);
    let total_items = items.len();
    let total_pages = total_pages(total_items, per_page);
    let current_page = clamp_page(page, total_pages);

    let residents = items
        .into_iter()
        .skip((current_page - 1) * per_page)
        .take(per_page)
        .collect();

    ResidentPage {
        residents,
        current_page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resident::seed_residents;

    fn names(residents: &[Resident]) -> Vec<&str> {
        residents.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_access_filter_parse_and_display() {
        assert_eq!("all".parse::<AccessFilter>().unwrap(), AccessFilter::All);
        assert_eq!(
            "staff".parse::<AccessFilter>().unwrap(),
            AccessFilter::Only(AccessType::Staff)
        );
        assert_eq!(AccessFilter::All.to_string(), "all");
        assert_eq!(AccessFilter::Only(AccessType::Visitor).to_string(), "Visitor");
        assert!("everyone".parse::<AccessFilter>().is_err());
    }

    #[test]
    fn test_access_filter_serializes_as_string() {
        assert_eq!(serde_json::to_string(&AccessFilter::All).unwrap(), r#""all""#);
        let parsed: AccessFilter = serde_json::from_str(r#""Resident""#).unwrap();
        assert_eq!(parsed, AccessFilter::Only(AccessType::Resident));
    }

    #[test]
    fn test_sort_order_toggled() {
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
        assert_eq!(SortOrder::Desc.toggled(), SortOrder::Asc);
    }

    #[test]
    fn test_filter_by_query_matches_name_or_house() {
        let residents = seed_residents();
        assert_eq!(names(&filter_residents(&residents, "son", AccessFilter::All)),
            vec!["Sarah Johnson", "Emma Wilson", "Lisa Anderson"]);
        assert_eq!(names(&filter_residents(&residents, "107", AccessFilter::All)),
            vec!["James Taylor"]);
    }

    #[test]
    fn test_filter_query_is_case_insensitive() {
        let residents = seed_residents();
        let found = filter_residents(&residents, "JOHN", AccessFilter::All);
        assert_eq!(names(&found), vec!["John Smith", "Sarah Johnson"]);
    }

    #[test]
    fn test_filter_query_whitespace_is_matched_literally() {
        let residents = seed_residents();
        assert!(filter_residents(&residents, " JOHN", AccessFilter::All).is_empty());
        assert_eq!(filter_residents(&residents, " ", AccessFilter::All).len(), 8);
    }

    #[test]
    fn test_filter_empty_query_keeps_all() {
        let residents = seed_residents();
        assert_eq!(filter_residents(&residents, "", AccessFilter::All).len(), 8);
    }

    #[test]
    fn test_filter_by_access_type() {
        let residents = seed_residents();
        let staff = filter_residents(&residents, "", AccessFilter::Only(AccessType::Staff));
        assert_eq!(names(&staff), vec!["Emma Wilson", "James Taylor"]);
    }

    #[test]
    fn test_filter_combines_query_and_type() {
        let residents = seed_residents();
        let found = filter_residents(&residents, "a", AccessFilter::Only(AccessType::Visitor));
        assert_eq!(names(&found), vec!["Mike Davis", "Lisa Anderson"]);
    }

    #[test]
    fn test_sort_by_name() {
        let mut residents = seed_residents();
        sort_residents(&mut residents, ResidentField::Name, SortOrder::Asc);
        assert_eq!(residents[0].name, "Emma Wilson");
        assert_eq!(residents[7].name, "Sarah Johnson");

        sort_residents(&mut residents, ResidentField::Name, SortOrder::Desc);
        assert_eq!(residents[0].name, "Sarah Johnson");
    }

    #[test]
    fn test_sort_text_ignores_case() {
        let mut residents = seed_residents();
        residents[0].name = "aaron".to_string();
        sort_residents(&mut residents, ResidentField::Name, SortOrder::Asc);
        assert_eq!(residents[0].name, "aaron");
    }

    #[test]
    fn test_sort_by_last_visit_is_chronological() {
        let mut residents = seed_residents();
        sort_residents(&mut residents, ResidentField::LastVisit, SortOrder::Asc);
        assert_eq!(residents[0].name, "Patricia Martinez");
        assert_eq!(residents[7].name, "John Smith");
    }

    #[test]
    fn test_sort_is_stable() {
        let mut residents = seed_residents();
        sort_residents(&mut residents, ResidentField::AccessType, SortOrder::Asc);
        let order: Vec<_> = residents.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "5", "8", "4", "7", "3", "6"]);

        sort_residents(&mut residents, ResidentField::AccessType, SortOrder::Desc);
        let order: Vec<_> = residents.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["3", "6", "4", "7", "1", "2", "5", "8"]);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(8, 5), 2);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 2), 1);
        assert_eq!(clamp_page(5, 2), 2);
        assert_eq!(clamp_page(3, 0), 1);
    }

    #[test]
    fn test_paginate_pages() {
        let page = paginate(seed_residents(), 2, 5);
        assert_eq!(page.total_items, 8);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.residents.len(), 3);
        assert_eq!(page.residents[0].id, "6");
    }

    #[test]
    fn test_paginate_out_of_range_clamps() {
        let page = paginate(seed_residents(), 9, 5);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.residents.len(), 3);
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate(Vec::new(), 3, 5);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
        assert!(page.residents.is_empty());
    }

    #[test]
    fn test_view_state_default() {
        let view = ViewState::default();
        assert_eq!(view.sort_by, ResidentField::Name);
        assert_eq!(view.sort_order, SortOrder::Asc);
        assert_eq!(view.filter_type, AccessFilter::All);
        assert_eq!(view.current_page, 1);
        assert_eq!(view.items_per_page, 5);
    }

    #[test]
    fn test_view_state_derive_pipeline() {
        let view = ViewState {
            search_query: "a".to_string(),
            filter_type: AccessFilter::Only(AccessType::Resident),
            sort_by: ResidentField::HouseNumber,
            sort_order: SortOrder::Desc,
            current_page: 2,
            items_per_page: 1,
        };
        let page = view.derive(&seed_residents());

        assert_eq!(page.total_items, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(names(&page.residents), vec!["Sarah Johnson"]);
        assert_eq!(
            names(&view.filtered(&seed_residents())),
            vec!["Patricia Martinez", "Sarah Johnson"]
        );
    }

    #[test]
    fn test_view_state_deserializes_partial() {
        let view: ViewState = serde_json::from_str(r#"{"sortBy":"lastVisit","sortOrder":"desc"}"#).unwrap();
        assert_eq!(view.sort_by, ResidentField::LastVisit);
        assert_eq!(view.sort_order, SortOrder::Desc);
        assert_eq!(view.items_per_page, DEFAULT_ITEMS_PER_PAGE);
    }
}
