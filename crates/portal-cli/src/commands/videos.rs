//! Video catalog commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tokio::io::{AsyncBufReadExt, BufReader};

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::types::VideoId;
use portal_entity::video::{Video, VideoSemester};
use portal_service::{PublishVideo, SearchParams};

use crate::commands::Shell;
use crate::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::output::{self, OutputFormat};

/// Arguments for the videos command
#[derive(Debug, Args)]
pub struct VideosArgs {
    /// Videos subcommand
    #[command(subcommand)]
    pub command: VideosCommand,
}

/// Videos subcommands
#[derive(Debug, Subcommand)]
pub enum VideosCommand {
    /// Recently published videos
    Recent,
    /// Search by grade, semester, lecture name, and keyword
    Search(SearchArgs),
    /// Show one video
    Show {
        /// Video ID
        id: String,
    },
    /// Upload a file and publish it to the catalog (teachers only)
    Upload(UploadArgs),
}

/// Search filters
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Exact grade (1-6)
    #[arg(long)]
    pub grade: Option<i32>,
    /// Semester: first or second
    #[arg(long)]
    pub semester: Option<VideoSemester>,
    /// Lecture-name prefix
    #[arg(long)]
    pub lecture: Option<String>,
    /// Keyword in title, description, or lecture name
    #[arg(long)]
    pub keyword: Option<String>,
    /// Read filter changes (`key=value`) from stdin and re-run the search
    #[arg(short, long)]
    pub interactive: bool,
}

/// Upload arguments
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Path to the video file
    pub file: PathBuf,
    /// Title
    #[arg(long)]
    pub title: String,
    /// Lecture name
    #[arg(long)]
    pub lecture: String,
    /// Grade (1-6)
    #[arg(long)]
    pub grade: i32,
    /// Semester: first or second
    #[arg(long)]
    pub semester: VideoSemester,
    /// Description
    #[arg(long, default_value = "")]
    pub description: String,
    /// Length in seconds
    #[arg(long, default_value_t = 0.0)]
    pub duration: f64,
    /// Override the content type guessed from the file extension
    #[arg(long)]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct VideoRow {
    /// Video ID
    id: String,
    /// Title
    title: String,
    /// Lecture
    lecture: String,
    /// Grade
    grade: i32,
    /// Semester
    semester: String,
    /// Length
    length: String,
    /// Views
    views: i64,
    /// Teacher
    teacher: String,
}

impl From<&Video> for VideoRow {
    fn from(v: &Video) -> Self {
        Self {
            id: v.id.to_string(),
            title: output::truncate(&v.title, 40),
            lecture: output::truncate(&v.lecture_name, 24),
            grade: v.grade,
            semester: v.semester.to_string(),
            length: output::clock(v.duration),
            views: v.view_count,
            teacher: v.teacher_email.clone(),
        }
    }
}

/// Execute a videos subcommand
pub async fn execute(shell: &Shell, args: &VideosArgs) -> AppResult<()> {
    match &args.command {
        VideosCommand::Recent => {
            let videos = shell.client.recent_videos().await?;
            print_videos(&videos, shell.format);
        }
        VideosCommand::Search(search) => {
            let params = SearchParams {
                grade: search.grade,
                semester: search.semester,
                lecture_name: search.lecture.clone(),
                keyword: search.keyword.clone(),
            };
            if search.interactive {
                interactive_search(shell, params).await?;
            } else {
                let videos = shell.client.search_videos(&params).await?;
                print_videos(&videos, shell.format);
            }
        }
        VideosCommand::Show { id } => {
            let id: VideoId = id
                .parse()
                .map_err(|_| AppError::validation(format!("Invalid video id: {id}")))?;
            let video = shell.client.video(id).await?;
            match shell.format {
                OutputFormat::Json => output::print_json(&video),
                OutputFormat::Table => print_detail(&video),
            }
        }
        VideosCommand::Upload(upload) => upload_and_publish(shell, upload).await?,
    }
    Ok(())
}

fn print_videos(videos: &[Video], format: OutputFormat) {
    let rows: Vec<VideoRow> = videos.iter().map(VideoRow::from).collect();
    output::print_list(&rows, format);
}

fn print_detail(video: &Video) {
    output::print_kv("Title", &video.title);
    output::print_kv("Lecture", &video.lecture_name);
    output::print_kv("Grade", &video.grade.to_string());
    output::print_kv("Semester", video.semester.as_str());
    output::print_kv("Length", &output::clock(video.duration));
    output::print_kv("Views", &video.view_count.to_string());
    output::print_kv("Teacher", &video.teacher_email);
    output::print_kv("URL", &video.video_url);
    if !video.description.is_empty() {
        println!();
        println!("{}", video.description);
    }
}

/// Apply one `key=value` filter change. An empty value clears the filter.
pub fn apply_filter(params: &mut SearchParams, line: &str) -> AppResult<()> {
    let (key, value) = line
        .split_once('=')
        .ok_or_else(|| AppError::validation("Expected key=value, e.g. grade=2"))?;
    let value = value.trim();
    let value = (!value.is_empty()).then(|| value.to_string());

    match key.trim() {
        "grade" => {
            params.grade = value
                .map(|v| {
                    v.parse()
                        .map_err(|_| AppError::validation(format!("Invalid grade: {v}")))
                })
                .transpose()?;
        }
        "semester" => {
            params.semester = value.map(|v| v.parse::<VideoSemester>()).transpose()?;
        }
        "lecture" => params.lecture_name = value,
        "keyword" => params.keyword = value,
        other => {
            return Err(AppError::validation(format!(
                "Unknown filter '{other}'. Use grade, semester, lecture, or keyword"
            )));
        }
    }
    Ok(())
}

/// Re-run the search 500 ms after the last filter change read from stdin.
async fn interactive_search(shell: &Shell, mut params: SearchParams) -> AppResult<()> {
    println!("Enter filter changes as key=value (grade, semester, lecture, keyword). Ctrl+D ends.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut debouncer = Debouncer::new(SEARCH_DEBOUNCE);
    debouncer.push(params.clone());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => match apply_filter(&mut params, &line) {
                        Ok(()) => debouncer.push(params.clone()),
                        Err(e) => output::print_warning(&e.message),
                    },
                    None => break,
                }
            }
            settled = debouncer.settled() => {
                match shell.client.search_videos(&settled).await {
                    Ok(videos) => print_videos(&videos, shell.format),
                    Err(e) => output::print_error(&e.message),
                }
            }
        }
    }
    Ok(())
}

async fn upload_and_publish(shell: &Shell, args: &UploadArgs) -> AppResult<()> {
    let content_type = match &args.content_type {
        Some(ct) => ct.clone(),
        None => mime_guess::from_path(&args.file)
            .first_or_octet_stream()
            .to_string(),
    };

    println!("Uploading '{}' ({})...", args.file.display(), content_type);
    let video_url = shell.client.upload(&args.file, &content_type).await?;
    output::print_success(&format!("Uploaded to {video_url}"));

    let video = shell
        .client
        .publish(&PublishVideo {
            title: args.title.clone(),
            description: args.description.clone(),
            lecture_name: args.lecture.clone(),
            grade: args.grade,
            semester: args.semester,
            video_url,
            duration: args.duration,
        })
        .await?;
    output::print_success(&format!("Published '{}' (id: {})", video.title, video.id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_filter() {
        let mut params = SearchParams::default();
        apply_filter(&mut params, "grade=2").unwrap();
        apply_filter(&mut params, "semester = second").unwrap();
        apply_filter(&mut params, "keyword=wave optics").unwrap();
        assert_eq!(params.grade, Some(2));
        assert_eq!(params.semester, Some(VideoSemester::Second));
        assert_eq!(params.keyword.as_deref(), Some("wave optics"));

        apply_filter(&mut params, "grade=").unwrap();
        assert_eq!(params.grade, None);
    }

    #[test]
    fn test_apply_filter_rejects_garbage() {
        let mut params = SearchParams::default();
        assert!(apply_filter(&mut params, "grade").is_err());
        assert!(apply_filter(&mut params, "grade=two").is_err());
        assert!(apply_filter(&mut params, "teacher=suzuki").is_err());
        assert_eq!(params, SearchParams::default());
    }
}
