use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use lettervideo_application::{ApplicationError, PublishVideoRequest, SubmitOutcome};
use lettervideo_domain::{find_voice, Route, VOICE_CATEGORIES};
use lettervideo_setup::Application;

use crate::follow::{follow_job, FollowOutcome};
use crate::{CreateArgs, FollowArgs, LetterSource, PublishArgs};

const EXCERPT_CHARS: usize = 60;

pub async fn create(mut app: Application, args: CreateArgs) -> Result<()> {
    let letter = read_letter(&args.source)?;
    let (category, _) = find_voice(&args.voice)
        .ok_or_else(|| anyhow!("unknown voice `{}`; see `lettervideo voices`", args.voice))?;

    let controller = &app.controller;
    controller.set_letter(letter).await?;
    controller.advance_to_voice_category().await?;
    controller.choose_category(category).await?;
    controller.choose_voice(&args.voice).await?;
    controller
        .set_options(!args.no_subtitles, !args.no_music)
        .await?;

    match controller.submit_draft().await? {
        SubmitOutcome::Queued {
            job,
            queue_position,
        } => println!(
            "Queued job {} at queue position {queue_position}",
            job.job_id
        ),
        SubmitOutcome::Resumed { job } => println!(
            "Job {} from an earlier run is still pending; following it instead",
            job.job_id
        ),
        SubmitOutcome::Rejected { message, .. } | SubmitOutcome::Failed { message } => {
            bail!(message)
        }
    }

    follow_and_finish(&mut app, &args.follow).await
}

pub async fn resume(mut app: Application, args: FollowArgs) -> Result<()> {
    match app.controller.resume_if_pending().await? {
        Some(job) => {
            println!("Resuming job {}", job.job_id);
            follow_and_finish(&mut app, &args).await
        }
        None => {
            println!("No pending job");
            Ok(())
        }
    }
}

async fn follow_and_finish(app: &mut Application, args: &FollowArgs) -> Result<()> {
    if args.detach {
        app.controller.shutdown().await;
        println!("Detached; run `lettervideo resume` to keep following the job");
        return Ok(());
    }

    let mut routes = app
        .take_routes()
        .ok_or_else(|| anyhow!("navigation is already being consumed"))?;

    match follow_job(&app.controller, &mut routes).await {
        FollowOutcome::Completed(Route::Result { job_id, .. }) => {
            println!("Video ready: {}", app.endpoints.video(&job_id));
            if let Some(path) = &args.download {
                save_video(app, &job_id, Some(path.clone())).await?;
            }
            println!("Publish it with `lettervideo publish {job_id} --letter-file <FILE>`");
            Ok(())
        }
        FollowOutcome::Completed(route) => {
            println!("Moved to {route}");
            Ok(())
        }
        FollowOutcome::Failed(message) => bail!(message),
        FollowOutcome::Detached => {
            println!("Detached; run `lettervideo resume` to keep following the job");
            Ok(())
        }
    }
}

pub async fn gallery(app: &Application, columns: usize) -> Result<()> {
    let page = app.gallery.gallery(columns).await.map_err(describe)?;
    if page.videos.is_empty() {
        println!("No published videos yet");
        return Ok(());
    }

    for (index, column) in page.columns.iter().enumerate() {
        println!("── column {} ──", index + 1);
        for video in column {
            println!(
                "{}  {}  {}",
                video.id,
                video.author.as_deref().unwrap_or("anonymous"),
                excerpt(&video.letter_text)
            );
        }
    }
    Ok(())
}

pub async fn show(app: &Application, id: &str, preview: Option<PathBuf>) -> Result<()> {
    let video = match app.gallery.video_detail(id).await {
        Ok(video) => video,
        Err(ApplicationError::Gateway(err)) if err.is_not_found() => {
            bail!("video {id} not found")
        }
        Err(err) => return Err(describe(err)),
    };

    println!("Video {}", video.id);
    println!("Author: {}", video.author.as_deref().unwrap_or("anonymous"));
    println!("Watch: {}", app.endpoints.video(&video.id));
    println!("Preview: {}", app.endpoints.preview_image(&video.id));
    println!();
    println!("{}", video.letter_text);

    if let Some(path) = preview {
        let bytes = app
            .gallery
            .preview_image(&video.id)
            .await
            .map_err(describe)?;
        write_file(&path, &bytes)?;
        println!("Saved preview to {}", path.display());
    }
    Ok(())
}

pub async fn download(app: &Application, job_id: &str, output: Option<PathBuf>) -> Result<()> {
    save_video(app, job_id, output).await
}

pub async fn publish(app: &Application, args: PublishArgs) -> Result<()> {
    let letter = read_letter(&args.source)?;
    let request = PublishVideoRequest::new(letter, args.author, args.job_id);
    let response = app.results.publish(request).await.map_err(describe)?;
    println!("{}", response.message);
    Ok(())
}

pub fn voices() {
    for category in VOICE_CATEGORIES {
        println!("{category} ({})", category.card().display_name_ref);
        for voice in category.voices() {
            println!("  {:<12} {}", voice.key, voice.display_name_ref);
        }
    }
}

async fn save_video(app: &Application, job_id: &str, output: Option<PathBuf>) -> Result<()> {
    let video = app
        .results
        .download_video(job_id)
        .await
        .map_err(describe)?;
    let path = output.unwrap_or_else(|| PathBuf::from(&video.file_name));
    write_file(&path, &video.bytes)?;
    println!("Saved {} bytes to {}", video.bytes.len(), path.display());
    Ok(())
}

fn read_letter(source: &LetterSource) -> Result<String> {
    match (&source.letter, &source.letter_file) {
        (Some(letter), _) => Ok(letter.clone()),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read letter from {}", path.display())),
        (None, None) => bail!("a letter is required"),
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

/// The backend's own message when it sent one, the full error otherwise.
fn describe(err: ApplicationError) -> anyhow::Error {
    if let ApplicationError::Gateway(gateway) = &err {
        if let Some(message) = gateway.backend_message() {
            return anyhow!(message.to_string());
        }
    }
    anyhow::Error::from(err)
}

fn excerpt(text: &str) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= EXCERPT_CHARS {
        return text;
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{}…", cut.trim_end())
}
