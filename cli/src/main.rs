mod commands;
mod follow;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lettervideo_configuration::{
    apply_env_overrides, load_config, load_config_from_path, setup_logging,
};
use lettervideo_setup::Application;

#[derive(Debug, Parser)]
#[command(author, version, about = "Turn letters into narrated videos", long_about = None)]
struct Cli {
    /// Config file; defaults to config/<RUN_ENV>.toml
    #[arg(short, long, env = "LETTER_VIDEO_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit a letter and follow the job until the video is ready
    Create(CreateArgs),
    /// Keep following a job left pending by an earlier run
    Resume(FollowArgs),
    /// List published videos, most recent first
    Gallery {
        #[arg(long, default_value_t = 3)]
        columns: usize,
    },
    /// Show one published video
    Show {
        id: String,
        /// Save the preview image to this path
        #[arg(long)]
        preview: Option<PathBuf>,
    },
    /// Download the video rendered for a job
    Download {
        job_id: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Publish a rendered video to the gallery
    Publish(PublishArgs),
    /// List the narrator voices
    Voices,
}

#[derive(Debug, Args)]
struct LetterSource {
    /// Letter text
    #[arg(long, conflicts_with = "letter_file", required_unless_present = "letter_file")]
    letter: Option<String>,

    /// Read the letter from a file
    #[arg(long)]
    letter_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[command(flatten)]
    source: LetterSource,

    /// Voice key, see `voices`
    #[arg(long)]
    voice: String,

    #[arg(long)]
    no_subtitles: bool,

    #[arg(long)]
    no_music: bool,

    #[command(flatten)]
    follow: FollowArgs,
}

#[derive(Debug, Args)]
struct FollowArgs {
    /// Return right after queueing; the job stays pending for `resume`
    #[arg(long)]
    detach: bool,

    /// Save the finished video to this path
    #[arg(long)]
    download: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct PublishArgs {
    job_id: String,

    #[command(flatten)]
    source: LetterSource,

    /// Shown in the gallery; anonymous when omitted
    #[arg(long)]
    author: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let mut config = load_config_from_path(path)?;
            apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
            config.validate()?;
            config
        }
        None => load_config()?,
    };
    setup_logging(&config.logging);

    tracing::debug!(command = ?cli.command, "running command");
    let app = Application::new(config).await?;
    match cli.command {
        Command::Create(args) => commands::create(app, args).await,
        Command::Resume(args) => commands::resume(app, args).await,
        Command::Gallery { columns } => commands::gallery(&app, columns).await,
        Command::Show { id, preview } => commands::show(&app, &id, preview).await,
        Command::Download { job_id, output } => commands::download(&app, &job_id, output).await,
        Command::Publish(args) => commands::publish(&app, args).await,
        Command::Voices => {
            commands::voices();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_takes_a_letter_and_a_voice() {
        let cli = Cli::try_parse_from([
            "lettervideo",
            "create",
            "--letter",
            "Dear mother",
            "--voice",
            "levitan",
            "--no-music",
        ])
        .unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.source.letter.as_deref(), Some("Dear mother"));
        assert_eq!(args.voice, "levitan");
        assert!(args.no_music);
        assert!(!args.no_subtitles);
        assert!(!args.follow.detach);
    }

    #[test]
    fn letter_is_required_once() {
        assert!(Cli::try_parse_from(["lettervideo", "create", "--voice", "levitan"]).is_err());
        assert!(Cli::try_parse_from([
            "lettervideo",
            "create",
            "--voice",
            "levitan",
            "--letter",
            "a",
            "--letter-file",
            "b.txt",
        ])
        .is_err());
    }

    #[test]
    fn publish_author_is_optional() {
        let cli = Cli::try_parse_from([
            "lettervideo",
            "publish",
            "5f0c3b8e-8d7a-4e43-9a55-2f4d0c1f7b21",
            "--letter-file",
            "letter.txt",
        ])
        .unwrap();
        let Command::Publish(args) = cli.command else {
            panic!("expected publish");
        };
        assert_eq!(args.author, None);
        assert_eq!(args.source.letter_file, Some(PathBuf::from("letter.txt")));
    }
}
