use crate::infra::InMemoryComplaintStore;
use chrono::{Duration, Local, NaiveDateTime};
use clap::Args;
use complaint_desk::error::AppError;
use complaint_desk::workflows::complaints::{
    Complaint, ComplaintCard, ComplaintCategory, ComplaintDeskService, ComplaintDraft,
    ComplaintId, ComplaintReportSummary, ComplaintStatus, Role, ServiceError, SessionContext,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the final management dashboard as JSON as well.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = Local::now().naive_local();
    let store = InMemoryComplaintStore::seeded(seed_complaints(now));
    let service = ComplaintDeskService::new(Arc::new(store));

    let member = SessionContext::new("asha", Role::Member).map_err(complaint_error)?;
    let staff = SessionContext::new("warden", Role::Staff).map_err(complaint_error)?;

    println!("Complaint desk demo");
    let before = service.status_view(&member).await?;
    render_dashboard(&before.summary, &before.recent, before.skipped_records);

    println!("\nSubmitting a new complaint as {}", member.username());
    let draft = ComplaintDraft {
        name: "Asha Verma".to_string(),
        department: "Computer Science".to_string(),
        category: ComplaintCategory::Technical,
        description: "Hostel Wi-Fi drops every evening after 9pm".to_string(),
        photo_reference: None,
    };
    let created = service.submit(&member, draft).await?;
    println!(
        "- Filed complaint {} ({}, {})",
        created.id,
        created.category.label(),
        created.status.label()
    );

    println!("\nWorking the queue as {}", staff.username());
    let steps = [
        (created.id.clone(), ComplaintStatus::InProgress),
        (created.id.clone(), ComplaintStatus::Resolved),
        (ComplaintId::from("2"), ComplaintStatus::Closed),
        (ComplaintId::from("1"), ComplaintStatus::New),
    ];
    for (id, target) in steps {
        match service.transition(&staff, &id, target).await {
            Ok(updated) => println!("- Complaint {} -> {}", updated.id, updated.status.label()),
            Err(err) => println!("- Complaint {id}: {} ({err})", err.notice()),
        }
    }

    if let Err(err) = service.admin_view(&member).await {
        println!("- Management view for {}: {}", member.username(), err.notice());
    }

    let after = service.admin_view(&staff).await?;
    println!();
    render_dashboard(&after.summary, &after.recent, after.skipped_records);

    if args.json {
        match serde_json::to_string_pretty(&after) {
            Ok(json) => println!("\nManagement dashboard payload:\n{}", json),
            Err(err) => println!("\nManagement dashboard payload unavailable: {}", err),
        }
    }

    Ok(())
}

fn complaint_error<E>(err: E) -> AppError
where
    E: Into<ServiceError>,
{
    AppError::Complaint(err.into())
}

pub(crate) fn render_dashboard(
    summary: &ComplaintReportSummary,
    recent: &[ComplaintCard],
    skipped: usize,
) {
    println!(
        "Totals: {} complaints | {} active | {} resolved | {} closed | {}% success rate",
        summary.total, summary.active, summary.resolved, summary.closed, summary.success_rate
    );
    if skipped > 0 {
        println!("Skipped {} unreadable store records", skipped);
    }

    println!("\nStatus distribution");
    for entry in &summary.status_distribution {
        println!("- {}: {}", entry.status_label, entry.count);
    }

    if summary.category_distribution.is_empty() {
        println!("\nCategories: none reported");
    } else {
        println!("\nCategories");
        for entry in &summary.category_distribution {
            println!("- {}: {}", entry.category_label, entry.count);
        }
    }

    println!("\nWeekly trend (complaints / resolved)");
    for entry in &summary.weekly_trend {
        println!("- {}: {} / {}", entry.day, entry.complaints, entry.resolved);
    }

    if recent.is_empty() {
        println!("\nRecent complaints: none");
        return;
    }

    println!("\nRecent complaints");
    for card in recent {
        println!(
            "- #{} {} | {} | {} | {} ({}, submitted {})",
            card.id,
            card.status_label,
            card.category_label,
            card.description,
            card.name,
            card.department,
            card.submitted_on
        );
        if !card.actions.is_empty() {
            let labels: Vec<&str> = card.actions.iter().map(|action| action.label).collect();
            println!("    actions: {}", labels.join(", "));
        }
    }
}

fn seed_complaints(now: NaiveDateTime) -> Vec<Complaint> {
    let seeds = [
        (
            "Meera Iyer",
            "Civil",
            ComplaintCategory::Maintenance,
            "Leaking tap on the second floor washroom",
            ComplaintStatus::Resolved,
            "Plumber replaced the washer",
            6,
        ),
        (
            "Ravi Kumar",
            "Electronics",
            ComplaintCategory::Mess,
            "Dinner served cold three nights running",
            ComplaintStatus::InProgress,
            "",
            4,
        ),
        (
            "Lina Das",
            "Physics",
            ComplaintCategory::Technical,
            "Lab printer jams on every job",
            ComplaintStatus::New,
            "",
            2,
        ),
        (
            "Kabir Shah",
            "Mechanical",
            ComplaintCategory::Other,
            "Noise from the common room after midnight",
            ComplaintStatus::New,
            "",
            1,
        ),
    ];

    seeds
        .into_iter()
        .enumerate()
        .map(
            |(index, (name, department, category, description, status, notes, days_ago))| {
                let created_at = now - Duration::days(days_ago);
                let updated_at = if status == ComplaintStatus::New {
                    created_at
                } else {
                    created_at + Duration::hours(20)
                };
                Complaint {
                    id: ComplaintId((index + 1).to_string()),
                    name: name.to_string(),
                    department: department.to_string(),
                    category,
                    description: description.to_string(),
                    status,
                    resolution_notes: notes.to_string(),
                    photo_reference: None,
                    created_at,
                    updated_at,
                }
            },
        )
        .collect()
}
