//! Course announcement commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::types::NotificationId;
use portal_entity::notification::{
    NoticeTerm, Notification, NotificationDraft, OptimisticNotification,
};
use portal_service::NotificationQuery;

use crate::commands::Shell;
use crate::output;

/// Arguments for the notices command
#[derive(Debug, Args)]
pub struct NoticesArgs {
    /// Notices subcommand
    #[command(subcommand)]
    pub command: NoticesCommand,
}

/// Notices subcommands
#[derive(Debug, Subcommand)]
pub enum NoticesCommand {
    /// List announcements, newest first
    List(ListArgs),
    /// Post an announcement (teachers only)
    Create(CreateArgs),
    /// Delete an announcement (teachers only)
    Delete {
        /// Announcement ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// List filters
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Course name
    #[arg(long)]
    pub course: Option<String>,
    /// Grade
    #[arg(long)]
    pub grade: Option<i32>,
    /// Term: 前期 or 後期
    #[arg(long)]
    pub semester: Option<NoticeTerm>,
}

/// Fields of a new announcement; missing ones are prompted for
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Title
    #[arg(long)]
    pub title: Option<String>,
    /// Body text
    #[arg(long)]
    pub content: Option<String>,
    /// Course name
    #[arg(long)]
    pub course: Option<String>,
    /// Grade
    #[arg(long)]
    pub grade: Option<i32>,
    /// Term: 前期 or 後期
    #[arg(long)]
    pub semester: Option<NoticeTerm>,
    /// Link to course material
    #[arg(long)]
    pub link: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct NoticeRow {
    /// Announcement ID
    id: String,
    /// Posted
    posted: String,
    /// Course
    course: String,
    /// Grade
    grade: i32,
    /// Term
    term: String,
    /// Title
    title: String,
    /// Link
    link: String,
}

impl From<&Notification> for NoticeRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            posted: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
            course: n.course.clone(),
            grade: n.grade,
            term: n.semester.to_string(),
            title: output::truncate(&n.title, 40),
            link: n.repository_link.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute a notices subcommand
pub async fn execute(shell: &Shell, args: &NoticesArgs) -> AppResult<()> {
    match &args.command {
        NoticesCommand::List(list) => {
            let query = NotificationQuery {
                course: list.course.clone(),
                grade: list.grade,
                semester: list.semester,
            };
            print_notices(shell, &query).await
        }
        NoticesCommand::Create(create) => {
            let draft = collect_draft(create)?;
            post(shell, draft).await?;
            print_notices(shell, &NotificationQuery::default()).await
        }
        NoticesCommand::Delete { id, yes } => {
            let id: NotificationId = id
                .parse()
                .map_err(|_| AppError::validation(format!("Invalid announcement id: {id}")))?;
            if !*yes && !confirm_delete()? {
                println!("Cancelled.");
                return Ok(());
            }
            shell.client.delete_notification(id).await?;
            output::print_success(&format!("Deleted announcement {id}"));
            print_notices(shell, &NotificationQuery::default()).await
        }
    }
}

async fn print_notices(shell: &Shell, query: &NotificationQuery) -> AppResult<()> {
    let notices = shell.client.notifications(query).await?;
    let rows: Vec<NoticeRow> = notices.iter().map(NoticeRow::from).collect();
    output::print_list(&rows, shell.format);
    Ok(())
}

/// Show the announcement as pending, then reconcile with the server's copy.
async fn post(shell: &Shell, draft: NotificationDraft) -> AppResult<OptimisticNotification> {
    let mut write = OptimisticNotification::pending(draft);
    output::print_kv("Posting", &format!("{} ({})", write.draft.title, write.display_id()));

    match shell.client.create_notification(&write.draft).await {
        Ok(stored) => {
            write.confirm(&stored);
            output::print_success(&format!("Posted '{}' (id: {})", write.draft.title, write.display_id()));
            Ok(write)
        }
        Err(e) => {
            write.fail(e.message.clone());
            output::print_error(&format!("Not posted: {}", e.message));
            Err(e)
        }
    }
}

fn collect_draft(args: &CreateArgs) -> AppResult<NotificationDraft> {
    let text = |value: &Option<String>, prompt: &str| -> AppResult<String> {
        match value {
            Some(v) => Ok(v.clone()),
            None => dialoguer::Input::<String>::new()
                .with_prompt(prompt)
                .interact_text()
                .map_err(|e| AppError::internal(format!("Input error: {}", e))),
        }
    };

    let title = text(&args.title, "Title")?;
    let content = text(&args.content, "Content")?;
    let course = text(&args.course, "Course")?;
    let grade = match args.grade {
        Some(g) => g,
        None => dialoguer::Input::<i32>::new()
            .with_prompt("Grade")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
    };
    let semester = match args.semester {
        Some(s) => s,
        None => {
            let terms = [NoticeTerm::Early, NoticeTerm::Late];
            let labels = terms.map(|t| t.as_str());
            let index = dialoguer::Select::new()
                .with_prompt("Term")
                .items(&labels)
                .default(0)
                .interact()
                .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
            terms[index]
        }
    };
    let repository_link = match &args.link {
        Some(link) => Some(link.clone()),
        None => {
            let link: String = dialoguer::Input::new()
                .with_prompt("Repository link (optional, press Enter to skip)")
                .allow_empty(true)
                .interact_text()
                .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
            Some(link)
        }
    }
    .filter(|l| !l.trim().is_empty());

    Ok(NotificationDraft {
        title,
        content,
        course,
        grade,
        semester,
        repository_link,
    })
}

fn confirm_delete() -> AppResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Delete this announcement?")
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}
