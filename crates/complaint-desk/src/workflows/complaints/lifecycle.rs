use chrono::NaiveDateTime;

use super::domain::{Complaint, ComplaintStatus};

/// Rejected status change. Leaves the complaint untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move a complaint from {} to {}", .from.label(), .to.label())]
pub struct InvalidTransition {
    pub from: ComplaintStatus,
    pub to: ComplaintStatus,
}

impl ComplaintStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    pub const fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::New, Self::InProgress)
            | (Self::New, Self::Resolved)
            | (Self::InProgress, Self::Resolved) => true,
            // Administrative close, from any non-terminal state.
            (Self::New | Self::InProgress | Self::Resolved, Self::Closed) => true,
            (Self::New, _) | (Self::InProgress, _) | (Self::Resolved, _) | (Self::Closed, _) => {
                false
            }
        }
    }

    pub fn permitted_targets(self) -> Vec<Self> {
        Self::ordered()
            .into_iter()
            .filter(|target| self.can_transition_to(*target))
            .collect()
    }

    /// Moves offered on the staff dashboard. Closing is not one of them.
    pub fn staff_actions(self) -> &'static [Self] {
        match self {
            Self::New => &[Self::InProgress, Self::Resolved],
            Self::InProgress => &[Self::Resolved],
            Self::Resolved | Self::Closed => &[],
        }
    }
}

/// Returns `complaint` moved to `target`, stamped at `now`.
///
/// `updated_at` never falls behind `created_at`, even with a skewed clock.
pub fn apply_transition(
    complaint: &Complaint,
    target: ComplaintStatus,
    now: NaiveDateTime,
) -> Result<Complaint, InvalidTransition> {
    if !complaint.status.can_transition_to(target) {
        return Err(InvalidTransition {
            from: complaint.status,
            to: target,
        });
    }

    let mut next = complaint.clone();
    next.status = target;
    next.updated_at = now.max(complaint.created_at);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::complaints::domain::{ComplaintCategory, ComplaintId};
    use chrono::{Duration, NaiveDate};

    fn opened_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 4)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid timestamp")
    }

    fn complaint(status: ComplaintStatus) -> Complaint {
        Complaint {
            id: ComplaintId("c-1".to_string()),
            name: "Meera Iyer".to_string(),
            department: "Mechanical".to_string(),
            category: ComplaintCategory::Maintenance,
            description: "Broken window latch in lab 3".to_string(),
            status,
            resolution_notes: String::new(),
            photo_reference: None,
            created_at: opened_at(),
            updated_at: opened_at(),
        }
    }

    #[test]
    fn new_complaints_can_be_resolved_directly() {
        let now = opened_at() + Duration::hours(2);
        let resolved = apply_transition(&complaint(ComplaintStatus::New), ComplaintStatus::Resolved, now)
            .expect("new -> resolved is allowed");

        assert_eq!(resolved.status, ComplaintStatus::Resolved);
        assert_eq!(resolved.updated_at, now);
        assert_eq!(resolved.created_at, opened_at());
        assert_eq!(resolved.category, ComplaintCategory::Maintenance);
    }

    #[test]
    fn resolved_complaints_cannot_reopen() {
        let original = complaint(ComplaintStatus::Resolved);
        let err = apply_transition(&original, ComplaintStatus::New, opened_at())
            .expect_err("resolved -> new is rejected");

        assert_eq!(
            err,
            InvalidTransition {
                from: ComplaintStatus::Resolved,
                to: ComplaintStatus::New,
            }
        );
        assert_eq!(err.to_string(), "cannot move a complaint from Resolved to New");
        assert_eq!(original.status, ComplaintStatus::Resolved);
    }

    #[test]
    fn closed_is_terminal() {
        for target in ComplaintStatus::ordered() {
            assert!(
                apply_transition(&complaint(ComplaintStatus::Closed), target, opened_at()).is_err(),
                "closed -> {target:?} must be rejected"
            );
        }
        assert!(ComplaintStatus::Closed.permitted_targets().is_empty());
        assert!(ComplaintStatus::Closed.is_terminal());
    }

    #[test]
    fn transition_table_matches_lifecycle() {
        use ComplaintStatus::*;

        assert_eq!(New.permitted_targets(), vec![InProgress, Resolved, Closed]);
        assert_eq!(InProgress.permitted_targets(), vec![Resolved, Closed]);
        assert_eq!(Resolved.permitted_targets(), vec![Closed]);

        for status in ComplaintStatus::ordered() {
            assert!(!status.can_transition_to(status), "{status:?} self-transition");
        }
        assert!(!InProgress.can_transition_to(New));
    }

    #[test]
    fn staff_actions_are_permitted_moves() {
        for status in ComplaintStatus::ordered() {
            for target in status.staff_actions() {
                assert!(status.can_transition_to(*target));
                assert_ne!(*target, ComplaintStatus::Closed);
            }
        }
        assert_eq!(
            ComplaintStatus::New.staff_actions(),
            &[ComplaintStatus::InProgress, ComplaintStatus::Resolved]
        );
    }

    #[test]
    fn skewed_clock_does_not_precede_creation() {
        let stale_clock = opened_at() - Duration::days(1);
        let moved = apply_transition(
            &complaint(ComplaintStatus::New),
            ComplaintStatus::InProgress,
            stale_clock,
        )
        .expect("new -> in progress is allowed");

        assert_eq!(moved.updated_at, moved.created_at);
    }
}
