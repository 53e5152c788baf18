//! Text rendering of views.

use std::fmt::Write as _;

use crossterm::style::{Color, StyledContent, Stylize};

use crate::auth::AuthUser;
use crate::resident::{AccessType, Resident, ResidentField};
use crate::state::{ThemeState, UiState};
use crate::stats::DashboardStats;
use crate::view::{AccessFilter, ResidentPage, SortOrder, ViewState};

const COLUMNS: [ResidentField; 4] = [
    ResidentField::Name,
    ResidentField::HouseNumber,
    ResidentField::AccessType,
    ResidentField::LastVisit,
];

/// Terminal styling for rendered output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    /// Emit ANSI color codes.
    pub color: bool,
    /// Use the dark palette.
    pub dark: bool,
}

impl Style {
    /// Style for the given theme.
    #[must_use]
    pub fn new(theme: ThemeState, color: bool) -> Self {
        Self {
            color,
            dark: theme.dark_mode,
        }
    }

    fn paint(self, styled: StyledContent<&str>) -> String {
        if self.color {
            styled.to_string()
        } else {
            (*styled.content()).to_string()
        }
    }

    fn bold(self, text: &str) -> String {
        self.paint(text.bold())
    }

    fn dim(self, text: &str) -> String {
        self.paint(text.dim())
    }

    fn badge_color(self, access_type: AccessType) -> Color {
        match (access_type, self.dark) {
            (AccessType::Resident, false) => Color::DarkBlue,
            (AccessType::Resident, true) => Color::Blue,
            (AccessType::Visitor, false) => Color::DarkGreen,
            (AccessType::Visitor, true) => Color::Green,
            (AccessType::Staff, false) => Color::DarkMagenta,
            (AccessType::Staff, true) => Color::Magenta,
        }
    }

    /// Access type badge: blue residents, green visitors, purple staff.
    fn badge(self, access_type: AccessType) -> String {
        self.paint(access_type.as_str().with(self.badge_color(access_type)))
    }
}

/// Navigation header shown above each page while the sidebar is open.
#[must_use]
pub fn header(ui: UiState, user: &AuthUser, active: &str, style: Style) -> String {
    if !ui.sidebar_open {
        return String::new();
    }
    let nav: Vec<String> = ["Dashboard", "Residents"]
        .iter()
        .map(|item| {
            if *item == active {
                style.bold(&format!("[{item}]"))
            } else {
                format!(" {item} ")
            }
        })
        .collect();
    format!(
        "{}  {}  {}\n\n",
        style.bold("Estate Access"),
        nav.join(" "),
        style.dim(&user.name)
    )
}

/// Dashboard page.
#[must_use]
pub fn dashboard(stats: &DashboardStats, style: Style) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style.bold("Dashboard"));
    let _ = writeln!(out, "Welcome to the Estate Access Management System");
    let _ = writeln!(out);

    let cards = [
        ("Total Access", stats.total),
        ("Residents", stats.residents),
        ("Visitors", stats.visitors),
        ("Staff", stats.staff),
    ];
    for (label, count) in cards {
        let _ = writeln!(
            out,
            "  {}{}",
            style.dim(&format!("{label:<14}")),
            style.bold(&count.to_string())
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Run `estatectl residents list` to manage access records."
    );
    out
}

fn format_last_visit(resident: &Resident) -> String {
    resident.last_visit.format("%Y-%m-%d %H:%M").to_string()
}

fn column_heading(field: ResidentField, view: &ViewState) -> String {
    if field == view.sort_by {
        let arrow = match view.sort_order {
            SortOrder::Asc => '↑',
            SortOrder::Desc => '↓',
        };
        format!("{} {arrow}", field.label())
    } else {
        field.label().to_string()
    }
}

fn cell(resident: &Resident, field: ResidentField) -> String {
    match field {
        ResidentField::Name => resident.name.clone(),
        ResidentField::HouseNumber => resident.house_number.clone(),
        ResidentField::AccessType => resident.access_type.to_string(),
        ResidentField::LastVisit => format_last_visit(resident),
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

fn active_filters(view: &ViewState) -> Option<String> {
    let mut parts = Vec::new();
    if !view.search_query.is_empty() {
        parts.push(format!("search \"{}\"", view.search_query));
    }
    if let AccessFilter::Only(access_type) = view.filter_type {
        parts.push(format!("type {access_type}"));
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Resident table for one page, with the sort column marked.
#[must_use]
pub fn residents_table(page: &ResidentPage, view: &ViewState, style: Style) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style.bold("Residents"));
    if let Some(filters) = active_filters(view) {
        let _ = writeln!(out, "{}", style.dim(&format!("Filtered by {filters}")));
    }
    let _ = writeln!(out);

    if page.residents.is_empty() {
        let _ = writeln!(out, "No residents found");
        return out;
    }

    let headings: Vec<String> = COLUMNS.iter().map(|f| column_heading(*f, view)).collect();
    let rows: Vec<Vec<String>> = page
        .residents
        .iter()
        .map(|r| COLUMNS.iter().map(|f| cell(r, *f)).collect())
        .collect();

    let id_width = page
        .residents
        .iter()
        .map(|r| r.id.chars().count())
        .max()
        .unwrap_or(0)
        .max(2);
    let widths: Vec<usize> = headings
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let heading_line: Vec<String> = headings
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect();
    let _ = writeln!(
        out,
        "{}",
        style.bold(format!("{}  {}", pad("ID", id_width), heading_line.join("  ")).trim_end())
    );

    for (resident, row) in page.residents.iter().zip(&rows) {
        let mut line = pad(&resident.id, id_width);
        for (i, (text, width)) in row.iter().zip(&widths).enumerate() {
            line.push_str("  ");
            if COLUMNS[i] == ResidentField::AccessType {
                let padding = " ".repeat(width.saturating_sub(text.chars().count()));
                line.push_str(&style.badge(resident.access_type));
                line.push_str(&padding);
            } else {
                line.push_str(&pad(text, *width));
            }
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }

    if page.total_pages > 1 {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Page {} of {} ({} residents)",
            page.current_page, page.total_pages, page.total_items
        );
    }
    out
}

/// One resident, field by field.
#[must_use]
pub fn resident_detail(resident: &Resident, style: Style) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  ID:            {}", resident.id);
    let _ = writeln!(out, "  Name:          {}", resident.name);
    let _ = writeln!(out, "  House Number:  {}", resident.house_number);
    let _ = writeln!(out, "  Access Type:   {}", style.badge(resident.access_type));
    let _ = writeln!(out, "  Last Visit:    {}", format_last_visit(resident));
    out
}

/// Display preferences.
#[must_use]
pub fn preferences(theme: ThemeState, ui: UiState) -> String {
    format!(
        "Theme:    {}\nSidebar:  {}\n",
        if theme.dark_mode { "dark" } else { "light" },
        if ui.sidebar_open { "open" } else { "closed" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resident::seed_residents;
    use crate::view::paginate;

    fn plain() -> Style {
        Style::default()
    }

    fn admin() -> AuthUser {
        AuthUser {
            email: "admin@estate.com".to_string(),
            name: "Admin User".to_string(),
        }
    }

    #[test]
    fn test_header_hidden_when_sidebar_closed() {
        let ui = UiState { sidebar_open: false };
        assert!(header(ui, &admin(), "Dashboard", plain()).is_empty());
    }

    #[test]
    fn test_header_marks_active_page() {
        let out = header(UiState::default(), &admin(), "Residents", plain());
        assert!(out.contains("[Residents]"));
        assert!(!out.contains("[Dashboard]"));
        assert!(out.contains("Admin User"));
    }

    #[test]
    fn test_dashboard_lists_counts() {
        let stats = DashboardStats::from_residents(&seed_residents());
        let out = dashboard(&stats, plain());
        assert!(out.contains("Total Access  8"));
        assert!(out.contains("Residents     4"));
        assert!(out.contains("Staff         2"));
    }

    #[test]
    fn test_table_marks_sort_column() {
        let view = ViewState {
            sort_order: SortOrder::Desc,
            ..ViewState::default()
        };
        let out = residents_table(&view.derive(&seed_residents()), &view, plain());
        assert!(out.contains("Name ↓"));
        assert!(!out.contains("House Number ↑"));
    }

    #[test]
    fn test_table_footer_only_with_several_pages() {
        let view = ViewState::default();
        let out = residents_table(&paginate(seed_residents(), 1, 5), &view, plain());
        assert!(out.contains("Page 1 of 2 (8 residents)"));

        let out = residents_table(&paginate(seed_residents(), 1, 10), &view, plain());
        assert!(!out.contains("Page"));
    }

    #[test]
    fn test_table_rows() {
        let view = ViewState::default();
        let out = residents_table(&paginate(seed_residents()[..1].to_vec(), 1, 5), &view, plain());
        let row = out.lines().find(|l| l.starts_with("1 ")).unwrap();
        assert!(row.contains("John Smith"));
        assert!(row.contains("101"));
        assert!(row.contains("Resident"));
        assert!(row.contains("2025-10-27 14:30"));
    }

    #[test]
    fn test_table_empty() {
        let view = ViewState::default();
        let out = residents_table(&paginate(Vec::new(), 1, 5), &view, plain());
        assert!(out.contains("No residents found"));
    }

    #[test]
    fn test_table_shows_active_filters() {
        let view = ViewState {
            search_query: "son".to_string(),
            filter_type: AccessFilter::Only(AccessType::Staff),
            ..ViewState::default()
        };
        let out = residents_table(&view.derive(&seed_residents()), &view, plain());
        assert!(out.contains("Filtered by search \"son\", type Staff"));
        assert!(out.contains("Emma Wilson"));
    }

    #[test]
    fn test_badge_colors_follow_theme() {
        let light = Style { color: true, dark: false };
        let dark = Style { color: true, dark: true };
        assert_eq!(
            light.badge(AccessType::Visitor),
            "Visitor".with(Color::DarkGreen).to_string()
        );
        assert_eq!(
            dark.badge(AccessType::Visitor),
            "Visitor".with(Color::Green).to_string()
        );
        assert_ne!(light.badge(AccessType::Staff), dark.badge(AccessType::Staff));
        assert_eq!(plain().badge(AccessType::Staff), "Staff");
    }

    #[test]
    fn test_plain_style_emits_no_escape_codes() {
        let stats = DashboardStats::from_residents(&seed_residents());
        assert!(!dashboard(&stats, plain()).contains('\x1b'));

        let colored = Style { color: true, dark: false };
        assert!(dashboard(&stats, colored).contains('\x1b'));
    }

    #[test]
    fn test_preferences() {
        let out = preferences(ThemeState { dark_mode: true }, UiState::default());
        assert!(out.contains("dark"));
        assert!(out.contains("open"));
    }
}
