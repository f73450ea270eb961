use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, Priority, Status, Ticket};

/// Aggregate statistics over all tickets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketStats {
    pub total_tickets: u64,
    pub open_tickets: u64,
    pub in_progress_tickets: u64,
    pub resolved_tickets: u64,
    pub avg_tickets_per_day: f64,
    pub priority_breakdown: PriorityBreakdown,
    pub category_breakdown: CategoryBreakdown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
    pub critical: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub billing: u64,
    pub technical: u64,
    pub account: u64,
    pub general: u64,
}

impl TicketStats {
    /// Count tickets in a single pass. `now` anchors the per-day average.
    pub fn compute<'a, I>(tickets: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a Ticket>,
    {
        let mut stats = Self::default();
        let mut earliest: Option<DateTime<Utc>> = None;

        for ticket in tickets {
            stats.total_tickets += 1;

            match ticket.status {
                Status::Open => stats.open_tickets += 1,
                Status::InProgress => stats.in_progress_tickets += 1,
                Status::Resolved => stats.resolved_tickets += 1,
                Status::Closed => {}
            }

            match ticket.priority {
                Priority::Low => stats.priority_breakdown.low += 1,
                Priority::Medium => stats.priority_breakdown.medium += 1,
                Priority::High => stats.priority_breakdown.high += 1,
                Priority::Critical => stats.priority_breakdown.critical += 1,
            }

            match ticket.category {
                Category::Billing => stats.category_breakdown.billing += 1,
                Category::Technical => stats.category_breakdown.technical += 1,
                Category::Account => stats.category_breakdown.account += 1,
                Category::General => stats.category_breakdown.general += 1,
            }

            earliest = Some(match earliest {
                Some(e) if e <= ticket.created_at => e,
                _ => ticket.created_at,
            });
        }

        if let Some(earliest) = earliest {
            // Whole days elapsed, never less than one
            let days = (now - earliest).num_days().max(1);
            let avg = stats.total_tickets as f64 / days as f64;
            // Halves round to the even digit
            stats.avg_tickets_per_day = (avg * 10.0).round_ties_even() / 10.0;
        }

        stats
    }
}
