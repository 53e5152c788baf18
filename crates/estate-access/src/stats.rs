//! Dashboard aggregate counts.

use serde::Serialize;

use crate::resident::{AccessType, Resident};

/// Counts shown on the dashboard, taken over the full unfiltered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Every record.
    pub total: usize,
    /// Records with [`AccessType::Resident`].
    pub residents: usize,
    /// Records with [`AccessType::Visitor`].
    pub visitors: usize,
    /// Records with [`AccessType::Staff`].
    pub staff: usize,
}

impl DashboardStats {
    /// Count `list` by access type.
    #[must_use]
    pub fn from_residents(list: &[Resident]) -> Self {
        list.iter().fold(Self::default(), |mut stats, r| {
            stats.total += 1;
            match r.access_type {
                AccessType::Resident => stats.residents += 1,
                AccessType::Visitor => stats.visitors += 1,
                AccessType::Staff => stats.staff += 1,
            }
            stats
        })
    }

    /// Count for a single access type.
    #[must_use]
    pub fn count(&self, access_type: AccessType) -> usize {
        match access_type {
            AccessType::Resident => self.residents,
            AccessType::Visitor => self.visitors,
            AccessType::Staff => self.staff,
        }
    }
}
