//! Command handlers.
//!
//! Each handler drives the same view state the library exposes and prints
//! the result with [`crate::cli_output`]. Notices raised along the way are
//! printed after the command finishes.

use std::io::{self, BufRead, Write};

use color_eyre::eyre::{bail, eyre, Report};
use color_eyre::{Result, Section};

use super::args::{CattleCommand, CattleFields, Cli, Command, DiagnosesCommand, HistoryArgs, RegisterArgs};
use crate::api::{ApiClient, RegisterOutcome};
use crate::cli_output::{
    confidence_label, icons, print_field, print_header, print_line, print_notice, print_section,
    progress_bar, review_icon, severity_badge, stat_cards, Table, BAR_WIDTH,
};
use crate::config::ClientConfig;
use crate::domain::Session;
use crate::error::{AuthError, HerdError};
use crate::export::ExportOutcome;
use crate::models::{CattleDraft, DiagnosisRecord, LoginRequest, RegisterRequest, UserProfile};
use crate::notifications::Notifications;
use crate::view_state::{CattleList, Dashboard, DiagnosisHistory, ReviewForm};

/// Run one parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env().map_err(|e| report(e.into()))?;
    if let Some(url) = cli.api_url {
        config = config.with_base_url(url);
    }
    if let Some(path) = cli.credentials {
        config = config.with_credentials_path(path);
    }

    let api = ApiClient::from_config(&config).map_err(report)?;
    let mut session = Session::new(api);
    let mut notices = Notifications::new();

    let result = dispatch(cli.command, &config, &mut session, &mut notices).await;

    for notice in notices.drain() {
        print_notice(&notice);
    }
    result
}

async fn dispatch(
    command: Command,
    config: &ClientConfig,
    session: &mut Session,
    notices: &mut Notifications,
) -> Result<()> {
    match command {
        Command::Login { username } => login(session, username).await,
        Command::Register(args) => register(session, args).await,
        Command::Logout => {
            session.logout().await;
            print_line(icons::SUCCESS, "Signed out");
            Ok(())
        }
        Command::Whoami => {
            let user = require_user(session).await?;
            print_profile(&user);
            Ok(())
        }
        Command::Dashboard => dashboard(session).await,
        Command::Cattle(cmd) => cattle(session, notices, cmd).await,
        Command::Diagnoses(cmd) => diagnoses(config, session, notices, cmd).await,
    }
}

/// Attach the recovery hint to a library error.
fn report(err: HerdError) -> Report {
    let hint = err.recovery_hint();
    let message = err.user_message();
    Report::new(err).wrap_err(message).suggestion(hint)
}

async fn require_user(session: &mut Session) -> Result<UserProfile> {
    match session.bootstrap().await {
        Some(user) => Ok(user.clone()),
        None => Err(report(AuthError::NotAuthenticated.into())),
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_password() -> Result<String> {
    Ok(rpassword::prompt_password("Password: ")?)
}

// ============================================================================
// Account
// ============================================================================

async fn login(session: &mut Session, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(name) => name,
        None => prompt("Username")?,
    };
    let request = LoginRequest {
        username,
        password: prompt_password()?,
    };

    let user = session.login(&request).await.map_err(report)?;
    print_line(icons::SUCCESS, &format!("Signed in as {} ({})", user.display_name(), user.role.label()));
    Ok(())
}

async fn register(session: &mut Session, args: RegisterArgs) -> Result<()> {
    let request = RegisterRequest {
        username: args.username,
        email: args.email,
        password: prompt_password()?,
        full_name: args.full_name,
        role: args.role,
        farm_name: args.farm_name,
    };

    match session.register(&request).await.map_err(report)? {
        RegisterOutcome::Profile(profile) => {
            print_line(icons::SUCCESS, &format!("Created account {}", profile.username));
        }
        RegisterOutcome::Raw(_) => {
            print_line(icons::SUCCESS, &format!("Created account {}", request.username));
        }
    }
    print_line(icons::INFO, "Run `herdview login` to sign in");
    Ok(())
}

fn print_profile(user: &UserProfile) {
    print_header("SIGNED IN");
    print_field("Username", &user.username, 9);
    print_field("Name", user.display_name(), 9);
    print_field("Email", &user.email, 9);
    print_field("Role", user.role.label(), 9);
    if !user.farm_name.is_empty() {
        print_field("Farm", &user.farm_name, 9);
    }
}

// ============================================================================
// Dashboard
// ============================================================================

async fn dashboard(session: &mut Session) -> Result<()> {
    let user = require_user(session).await?;
    let mut dashboard = Dashboard::new();
    dashboard.load(session.api()).await;
    let stats = dashboard.stats();

    print_header(&format!("DASHBOARD · {}", user.display_name()));
    println!(
        "{}",
        stat_cards(&[
            ("Herd size", stats.herd_size.to_string()),
            ("Diagnoses", stats.diagnoses_total.to_string()),
            ("High severity", stats.high_severity.to_string()),
            ("Pending review", stats.pending_reviews.to_string()),
            ("Mean confidence", confidence_label(stats.mean_confidence)),
        ])
    );

    print_section("SEVERITY");
    for share in &stats.distribution {
        println!(
            "  {} {} {:>3}",
            severity_badge(share.severity),
            progress_bar(share.ratio, BAR_WIDTH),
            share.count
        );
    }

    print_section("RECENT DIAGNOSES");
    let recent = dashboard.recent();
    if recent.is_empty() {
        print_line(icons::INFO, "No diagnoses yet");
    } else {
        println!("{}", diagnosis_table(&recent));
    }
    Ok(())
}

// ============================================================================
// Cattle
// ============================================================================

async fn cattle(session: &mut Session, notices: &mut Notifications, command: CattleCommand) -> Result<()> {
    require_user(session).await?;
    let api = session.api().clone();
    let mut list = CattleList::new();

    match command {
        CattleCommand::List { query } => {
            list.load(&api).await;
            list.set_query(query);
            let visible = list.visible();

            print_header("HERD");
            let mut table = Table::new(["ID", "Tag", "Name", "Breed", "Age", "Weight", "Last checkup"]);
            for cow in &visible {
                table.push_row([
                    cow.id.to_string(),
                    cow.tag_number.clone(),
                    cow.name.clone(),
                    cow.breed.clone(),
                    cow.age_years.map(|a| a.to_string()).unwrap_or_default(),
                    cow.weight_kg.map(|w| format!("{:.1} kg", w)).unwrap_or_default(),
                    cow.last_checkup.map(|d| d.to_string()).unwrap_or_default(),
                ]);
            }
            println!("{}", table);
            println!();
            print_line(icons::INFO, &format!("{} of {} head", visible.len(), list.records().len()));
            Ok(())
        }
        CattleCommand::Add(fields) => {
            let draft = apply_fields(CattleDraft::default(), fields);
            match list.create(&api, &draft, notices).await {
                Some(_) => Ok(()),
                None => bail!("cattle was not added"),
            }
        }
        CattleCommand::Update { id, fields } => {
            list.load(&api).await;
            let current = list
                .get(id)
                .ok_or_else(|| eyre!("no cattle with id {}", id))?;
            let draft = apply_fields(CattleDraft::from_record(current), fields);
            match list.update(&api, id, &draft, notices).await {
                Some(_) => Ok(()),
                None => bail!("cattle #{} was not updated", id),
            }
        }
        CattleCommand::Delete { id } => {
            if list.delete(&api, id, notices).await {
                Ok(())
            } else {
                bail!("cattle #{} was not deleted", id)
            }
        }
    }
}

fn apply_fields(mut draft: CattleDraft, fields: CattleFields) -> CattleDraft {
    if let Some(tag) = fields.tag {
        draft.tag_number = tag;
    }
    if let Some(name) = fields.name {
        draft.name = name;
    }
    if let Some(breed) = fields.breed {
        draft.breed = breed;
    }
    if fields.age.is_some() {
        draft.age_years = fields.age;
    }
    if fields.weight.is_some() {
        draft.weight_kg = fields.weight;
    }
    draft
}

// ============================================================================
// Diagnoses
// ============================================================================

async fn diagnoses(
    config: &ClientConfig,
    session: &mut Session,
    notices: &mut Notifications,
    command: DiagnosesCommand,
) -> Result<()> {
    require_user(session).await?;

    match command {
        DiagnosesCommand::List(args) => {
            let mut history = load_history(config, session, &args).await?;
            let page = history.current_page();

            print_header("DIAGNOSIS HISTORY");
            if page.rows.is_empty() {
                print_line(icons::INFO, "No diagnoses match");
            } else {
                println!("{}", diagnosis_table(&page.rows));
            }
            println!();
            print_line(
                icons::INFO,
                &format!(
                    "Page {} of {} · {} matching of {}",
                    page.page + 1,
                    page.page_count,
                    page.matching,
                    page.total
                ),
            );
            Ok(())
        }
        DiagnosesCommand::Show { id } => {
            let record = session.api().get_diagnosis(id).await.map_err(report)?;
            print_diagnosis(&record);
            Ok(())
        }
        DiagnosesCommand::Review {
            id,
            status,
            notes,
            recommendation,
            disease,
        } => {
            let record = session.api().get_diagnosis(id).await.map_err(report)?;
            let mut history = DiagnosisHistory::new();
            history.set_records(vec![record]);

            let form = ReviewForm {
                status: Some(status),
                notes,
                recommendation,
                corrected_disease: disease,
            };
            form.submit(session, id, &mut history, notices)
                .await
                .map_err(report)?;

            if let Some(updated) = history.get(id) {
                print_diagnosis(updated);
            }
            Ok(())
        }
        DiagnosesCommand::Export { filters, out_dir } => {
            let mut history = load_history(config, session, &filters).await?;
            match history.export() {
                ExportOutcome::Ready(artifact) => {
                    let dir = out_dir.unwrap_or_else(|| config.export_dir.clone());
                    let path = artifact.write_to(&dir).map_err(report)?;
                    notices.success(format!("Exported {} rows to {}", artifact.row_count, path.display()));
                }
                ExportOutcome::NothingToExport => {
                    notices.info("Nothing to export: no diagnoses match the current filters");
                }
            }
            Ok(())
        }
    }
}

async fn load_history(config: &ClientConfig, session: &Session, args: &HistoryArgs) -> Result<DiagnosisHistory> {
    let page_size = args.page_size.unwrap_or(config.page_size);
    let mut history = DiagnosisHistory::with_page_size(page_size).map_err(|e| report(e.into()))?;
    history.load(session.api(), args.cattle_id).await;
    history.set_query(args.query.clone());
    history.set_severity_filter(args.severity);
    history.set_sort(args.sort);
    history.set_page(args.page.saturating_sub(1));
    Ok(history)
}

fn diagnosis_table(rows: &[&DiagnosisRecord]) -> Table {
    let mut table = Table::new(["ID", "Cattle", "Disease", "Conf.", "Severity", "Date", "Review"]);
    for record in rows {
        table.push_row([
            record.id.to_string(),
            record.display_name.clone(),
            record.display_disease.clone(),
            confidence_label(record.confidence),
            severity_badge(record.severity).trim_end().to_string(),
            record
                .created_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            format!("{} {}", review_icon(record.review.status), record.review.status),
        ]);
    }
    table
}

fn print_diagnosis(record: &DiagnosisRecord) {
    const W: usize = 14;

    print_header(&format!("DIAGNOSIS #{}", record.id));
    print_field("Cattle", &record.display_name, W);
    print_field("Disease", &record.display_disease, W);
    print_field("Confidence", &confidence_label(record.confidence), W);
    print_field("Severity", record.severity.as_str(), W);
    if let Some(version) = &record.model_version {
        print_field("Model", version, W);
    }
    if record.uncertain {
        print_line(icons::WARNING, "Model marked this result as uncertain");
    }
    if let Some(status) = &record.status {
        print_field("Case status", status, W);
    }
    if let Some(at) = record.created_at {
        print_field("Submitted", &at.to_rfc3339(), W);
    }
    if let Some(by) = &record.submitted_by {
        print_field("Submitted by", by, W);
    }
    if !record.symptom_text.is_empty() {
        print_field("Symptoms", &record.symptom_text, W);
    }
    if !record.recommendation.is_empty() {
        print_field("Advice", &record.recommendation, W);
    }

    if !record.predictions.is_empty() {
        print_section("PREDICTIONS");
        for prediction in &record.predictions {
            println!(
                "  {} {:>6}  {}",
                progress_bar(prediction.score, BAR_WIDTH),
                confidence_label(Some(prediction.score)),
                prediction.disease
            );
        }
    }

    print_section("REVIEW");
    print_field(
        "Status",
        &format!("{} {}", review_icon(record.review.status), record.review.status),
        W,
    );
    if let Some(reviewer) = &record.review.reviewer {
        print_field("Reviewer", reviewer, W);
    }
    if let Some(at) = record.review.reviewed_at {
        print_field("Reviewed", &at.to_rfc3339(), W);
    }
    if let Some(notes) = &record.review.notes {
        print_field("Notes", notes, W);
    }

    let overlays: Vec<&str> = record.gradcam_urls().collect();
    if !overlays.is_empty() {
        print_section("GRAD-CAM");
        for url in overlays {
            print_line(icons::INFO, url);
        }
    }
}
