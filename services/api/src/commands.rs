use std::sync::Arc;

use clap::Args;
use complaint_desk::config::AppConfig;
use complaint_desk::error::AppError;
use complaint_desk::telemetry;
use complaint_desk::workflows::complaints::{
    ComplaintCategory, ComplaintDeskService, ComplaintDraft, ComplaintId, ComplaintStatus,
    HttpComplaintStore, Role, ServiceError, SessionContext, StatusDashboard,
};

use crate::demo::render_dashboard;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Override the configured complaint store base URL
    #[arg(long)]
    pub(crate) store_url: Option<String>,
    /// Print the dashboard as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Name shown as the viewer of the report
    #[arg(long, default_value = "cli")]
    pub(crate) user: String,
}

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    /// Override the configured complaint store base URL
    #[arg(long)]
    pub(crate) store_url: Option<String>,
    /// Submitter name
    #[arg(long)]
    pub(crate) name: String,
    /// Submitter department
    #[arg(long)]
    pub(crate) department: String,
    /// One of TECHNICAL, MESS, MAINTENANCE, OTHER
    #[arg(long)]
    pub(crate) category: ComplaintCategory,
    /// What went wrong
    #[arg(long)]
    pub(crate) description: String,
    /// Reference to an already uploaded photo
    #[arg(long)]
    pub(crate) photo: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct SetStatusArgs {
    /// Complaint identifier as assigned by the store
    pub(crate) id: String,
    /// One of NEW, IN_PROGRESS, RESOLVED, CLOSED
    pub(crate) status: ComplaintStatus,
    /// Override the configured complaint store base URL
    #[arg(long)]
    pub(crate) store_url: Option<String>,
    /// Staff member recorded in the logs for this change
    #[arg(long, default_value = "cli")]
    pub(crate) user: String,
}

fn remote_service(
    store_url: Option<String>,
) -> Result<ComplaintDeskService<HttpComplaintStore>, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(url) = store_url {
        config.store = config.store.with_base_url(url)?;
    }
    telemetry::init(&config.telemetry)?;

    let store = HttpComplaintStore::new(&config.store)?;
    Ok(ComplaintDeskService::new(Arc::new(store)))
}

fn session(user: String, role: Role) -> Result<SessionContext, AppError> {
    SessionContext::new(user, role).map_err(|err| AppError::from(ServiceError::from(err)))
}

pub(crate) async fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        store_url,
        json,
        user,
    } = args;

    let service = remote_service(store_url)?;
    let viewer = session(user, Role::Member)?;
    let dashboard: StatusDashboard = service.status_view(&viewer).await?;

    if json {
        match serde_json::to_string_pretty(&dashboard) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Dashboard payload unavailable: {err}"),
        }
    } else {
        println!("Complaint report");
        println!("Store: {}", service.store().base_url());
        render_dashboard(&dashboard.summary, &dashboard.recent, dashboard.skipped_records);
    }

    Ok(())
}

pub(crate) async fn run_submit(args: SubmitArgs) -> Result<(), AppError> {
    let SubmitArgs {
        store_url,
        name,
        department,
        category,
        description,
        photo,
    } = args;

    let service = remote_service(store_url)?;
    let submitter = session(name.clone(), Role::Member)?;
    let draft = ComplaintDraft {
        name,
        department,
        category,
        description,
        photo_reference: photo,
    };

    let created = service.submit(&submitter, draft).await?;
    println!(
        "Filed complaint {} ({}) on {}",
        created.id,
        created.category.label(),
        created.created_at.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

pub(crate) async fn run_set_status(args: SetStatusArgs) -> Result<(), AppError> {
    let SetStatusArgs {
        id,
        status,
        store_url,
        user,
    } = args;

    let service = remote_service(store_url)?;
    let staff = session(user, Role::Staff)?;
    let updated = service.transition(&staff, &ComplaintId(id), status).await?;

    println!("Complaint {} is now {}", updated.id, updated.status.label());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use complaint_desk::config::TelemetryConfig;
    use complaint_desk::telemetry::TelemetryError;

    #[test]
    fn remote_commands_install_the_log_subscriber() {
        let service = remote_service(Some("http://127.0.0.1:9/api/".to_string()))
            .expect("service builds");

        assert_eq!(service.store().base_url(), "http://127.0.0.1:9/api");
        let again = telemetry::init(&TelemetryConfig {
            log_level: "info".to_string(),
        });
        assert!(matches!(again, Err(TelemetryError::Subscriber(_))));
    }
}
