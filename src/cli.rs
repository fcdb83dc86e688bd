//! Command-line front end.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use futures::{StreamExt, TryStreamExt};
use tokio_util::io::ReaderStream;
use tracing::info;

use fsa_app::FileSaveRequest;
use fsa_core::ports::FileHandle;
use fsa_core::settings::Settings;
use fsa_core::{ByteStream, DataSource, FileSaveOptions, HostError, StartIn, WellKnownDirectory};

use crate::bootstrap::wire_file_save;

/// Save a file through the system save dialog.
#[derive(Debug, Parser)]
#[command(name = "file-save", version, about)]
pub struct Cli {
    /// File to save; `-` reads standard input
    pub input: PathBuf,

    /// Suggested file name (defaults to the input's name)
    #[arg(long)]
    pub name: Option<String>,

    /// Media type offered in the type filter
    #[arg(long = "type", value_name = "MIME")]
    pub mime_type: Option<String>,

    /// Extension offered in the type filter, repeatable
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Label of the type filter
    #[arg(long)]
    pub description: Option<String>,

    /// Remembers the chosen directory under this id
    #[arg(long)]
    pub id: Option<String>,

    /// Well-known directory name or a path to open the dialog in
    #[arg(long, value_name = "DIR", value_parser = parse_start_in)]
    pub start_in: Option<StartIn>,

    /// Hide the "All Files" filter
    #[arg(long)]
    pub exclude_accept_all: bool,

    /// Save into this directory without a dialog
    #[arg(long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Settings file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

fn parse_start_in(value: &str) -> Result<StartIn, String> {
    if value.is_empty() {
        return Err("start directory must not be empty".to_string());
    }
    Ok(match value.parse::<WellKnownDirectory>() {
        Ok(dir) => StartIn::WellKnown(dir),
        Err(_) => StartIn::Directory(PathBuf::from(value)),
    })
}

impl Cli {
    fn reads_stdin(&self) -> bool {
        self.input == Path::new("-")
    }

    /// The single save option described by the flags.
    pub fn save_options(&self) -> FileSaveOptions {
        let mut options = FileSaveOptions::new()
            .with_extensions(self.extensions.iter().cloned())
            .exclude_accept_all(self.exclude_accept_all);

        let file_name = self.name.clone().or_else(|| {
            if self.reads_stdin() {
                None
            } else {
                self.input
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            }
        });
        if let Some(name) = file_name {
            options = options.with_file_name(name);
        }
        if let Some(mime) = &self.mime_type {
            options = options.with_mime_types([mime.as_str()]);
        }
        if let Some(description) = &self.description {
            options = options.with_description(description.clone());
        }
        if let Some(id) = &self.id {
            options = options.with_id(id.clone());
        }
        if let Some(start_in) = &self.start_in {
            options = options.with_start_in(start_in.clone());
        }
        options
    }

    async fn open_input(&self) -> anyhow::Result<ByteStream> {
        let stream: ByteStream = if self.reads_stdin() {
            ReaderStream::new(tokio::io::stdin())
                .map_err(|e| HostError::from_io(e, "stdin"))
                .boxed()
        } else {
            let file = tokio::fs::File::open(&self.input)
                .await
                .with_context(|| format!("Failed to open input: {}", self.input.display()))?;
            let context = self.input.display().to_string();
            ReaderStream::new(file)
                .map_err(move |e| HostError::from_io(e, &context))
                .boxed()
        };
        Ok(stream)
    }
}

/// Streams the input into the destination picked per `settings`.
pub async fn run(cli: Cli, settings: &Settings) -> anyhow::Result<FileHandle> {
    let use_case = wire_file_save(&settings.picker, cli.directory.clone())?;
    let options = cli.save_options();
    let stream = cli.open_input().await?;

    let handle = use_case
        .execute(FileSaveRequest::new(DataSource::Stream(stream)).with_option(options))
        .await?;
    info!(input = %cli.input.display(), "Input saved");
    Ok(handle)
}
