use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};

use crate::cli::options::{AppfsCli, Commands};
use crate::config::FilesystemConfig;
use crate::files::{Blob, FileHandle, FileMode, Filesystem};

/// Build the effective configuration: file first, then flag overrides
pub async fn load_config(cli: &AppfsCli) -> Result<FilesystemConfig> {
    let mut config = match &cli.config {
        Some(path) => FilesystemConfig::from_file(path)
            .await
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => FilesystemConfig::default(),
    };

    if let Some(dir) = &cli.resources_dir {
        config = config.with_resources_directory(dir);
    }
    if let Some(dir) = &cli.app_data_dir {
        config = config.with_application_data_directory(dir);
    }
    if let Some(dir) = &cli.temp_dir {
        config = config.with_temp_directory(dir);
    }

    debug!(?config, "effective filesystem configuration");
    Ok(config)
}

#[derive(Debug, Serialize)]
struct ExistsReport {
    path: String,
    exists: bool,
    is_file: bool,
    is_directory: bool,
}

#[derive(Debug, Serialize)]
struct SpaceReport {
    path: String,
    available_bytes: u64,
}

const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Resolve CLI path segments, inside `--base` when one is given
fn handle_for<S: AsRef<str>>(cli: &AppfsCli, fs: &Filesystem, segments: &[S]) -> FileHandle {
    match cli.base {
        Some(base) => fs.get_file_in(base, segments),
        None => fs.get_file(segments),
    }
}

/// Run one CLI command against `fs`
pub async fn execute(cli: &AppfsCli, fs: &Filesystem) -> Result<()> {
    match &cli.command {
        Commands::Exists { path } => {
            let handle = handle_for(cli, fs, path);
            let report = ExistsReport {
                path: handle.native_path(),
                exists: handle.exists().await,
                is_file: handle.is_file().await,
                is_directory: handle.is_directory().await,
            };
            if cli.json {
                print_json(&report)?;
            } else if report.exists {
                let kind = if report.is_directory { "directory" } else { "file" };
                println!("✅ {} ({kind})", report.path);
            } else {
                println!("❌ {} does not exist", report.path);
            }
        }
        Commands::Stat { path } => {
            let info = handle_for(cli, fs, path).stat().await;
            if cli.json {
                print_json(&info)?;
            } else {
                println!("📄 {}", info.path);
                println!("  exists:        {}", info.exists);
                println!("  file:          {}", info.is_file);
                println!("  directory:     {}", info.is_directory);
                println!("  symbolic link: {}", info.symbolic_link);
                println!("  size:          {}", info.size);
                println!("  readonly:      {}", info.readonly);
                println!("  writable:      {}", info.writable);
                println!("  executable:    {}", info.executable);
                println!("  hidden:        {}", info.hidden);
                println!("  created:       {}", format_timestamp(info.create_timestamp));
                println!("  modified:      {}", format_timestamp(info.modification_timestamp));
            }
        }
        Commands::Read { path } => {
            let handle = handle_for(cli, fs, path);
            let blob = handle
                .read()
                .await
                .with_context(|| format!("reading {handle}"))?;
            let mut stdout = tokio::io::stdout();
            stdout.write_all(blob.bytes()).await?;
            stdout.flush().await?;
        }
        Commands::Write { path, text, from } => {
            write_command(cli, fs, path, text.as_deref(), from.as_deref(), false).await?;
        }
        Commands::Append { path, text, from } => {
            write_command(cli, fs, path, text.as_deref(), from.as_deref(), true).await?;
        }
        Commands::Mkdir { path } => {
            let handle = handle_for(cli, fs, path);
            handle
                .try_create_directory()
                .await
                .with_context(|| format!("creating directory {handle}"))?;
            info!(path = %handle, "created directory");
        }
        Commands::Touch { path } => {
            let handle = handle_for(cli, fs, path);
            handle
                .try_create_file()
                .await
                .with_context(|| format!("creating file {handle}"))?;
            info!(path = %handle, "created file");
        }
        Commands::Rm { path } => {
            let handle = handle_for(cli, fs, path);
            handle
                .try_delete_file()
                .await
                .with_context(|| format!("deleting file {handle}"))?;
            info!(path = %handle, "deleted file");
        }
        Commands::Rmdir { path, recursive } => {
            let handle = handle_for(cli, fs, path);
            handle
                .try_delete_directory(*recursive)
                .await
                .with_context(|| format!("deleting directory {handle}"))?;
            info!(path = %handle, recursive, "deleted directory");
        }
        Commands::Cp {
            source,
            destination,
        } => {
            let handle = handle_for(cli, fs, &[source]);
            let destination = handle_for(cli, fs, &[destination]);
            handle
                .try_copy(destination.path())
                .await
                .with_context(|| format!("copying {handle} to {destination}"))?;
            info!(from = %handle, to = %destination, "copied");
        }
        Commands::Mv {
            source,
            destination,
        } => {
            let handle = handle_for(cli, fs, &[source]);
            let destination = handle_for(cli, fs, &[destination]);
            handle
                .try_move_to(destination.path())
                .await
                .with_context(|| format!("moving {handle} to {destination}"))?;
            info!(from = %handle, to = %destination, "moved");
        }
        Commands::Ls { path } => {
            let mut names = handle_for(cli, fs, path).directory_listing().await;
            names.sort();
            if cli.json {
                print_json(&names)?;
            } else {
                for name in names {
                    println!("{name}");
                }
            }
        }
        Commands::Df { path } => {
            let handle = handle_for(cli, fs, path);
            let report = SpaceReport {
                path: handle.native_path(),
                available_bytes: handle.space_available().await,
            };
            if cli.json {
                print_json(&report)?;
            } else {
                println!("💾 {}: {} bytes available", report.path, report.available_bytes);
            }
        }
        Commands::Resolve { path } => {
            println!("{}", handle_for(cli, fs, path).resolve());
        }
        Commands::Cat { path, chunk_size } => {
            cat_command(&handle_for(cli, fs, path), *chunk_size).await?;
        }
        Commands::Stream { path, mode, text } => {
            let handle = handle_for(cli, fs, path);
            if mode.is_readable() {
                cat_command(&handle, DEFAULT_CHUNK_SIZE).await?;
            } else {
                stream_command(&handle, *mode, text.as_deref()).await?;
            }
        }
    }

    Ok(())
}

async fn write_command(
    cli: &AppfsCli,
    fs: &Filesystem,
    path: &[String],
    text: Option<&str>,
    from: Option<&str>,
    append: bool,
) -> Result<()> {
    let handle = handle_for(cli, fs, path);

    let result = match (text, from) {
        (Some(text), _) => handle.try_write(text, append).await,
        (None, Some(from)) => {
            let source = handle_for(cli, fs, &[from]);
            handle.try_write(&source, append).await
        }
        (None, None) => {
            let bytes = read_stdin().await?;
            handle.try_write(Blob::new(bytes), append).await
        }
    };

    result.with_context(|| format!("writing {handle}"))?;
    info!(path = %handle, append, "wrote file");
    Ok(())
}

/// Write `text` (or stdin) through a stream opened in a writable `mode`
async fn stream_command(handle: &FileHandle, mode: FileMode, text: Option<&str>) -> Result<()> {
    let bytes = match text {
        Some(text) => text.as_bytes().to_vec(),
        None => read_stdin().await?,
    };

    let mut stream = handle
        .open(mode)
        .await
        .with_context(|| format!("opening {handle} for {mode}"))?;
    let written = stream.write(&bytes).await;
    stream.close().await?;

    let written = written.with_context(|| format!("writing {handle}"))?;
    info!(path = %handle, %mode, bytes = written, "streamed to file");
    Ok(())
}

async fn read_stdin() -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut bytes)
        .await
        .context("reading stdin")?;
    Ok(bytes)
}

async fn cat_command(handle: &FileHandle, chunk_size: usize) -> Result<()> {
    let mut stream = handle
        .open(FileMode::Read)
        .await
        .with_context(|| format!("opening {handle}"))?;

    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut stdout = tokio::io::stdout();
    let copied = async {
        loop {
            let read = stream.read(&mut buffer).await?;
            if read == 0 {
                break;
            }
            stdout.write_all(&buffer[..read]).await?;
        }
        stdout.flush().await?;
        anyhow::Ok(())
    }
    .await;

    stream.close().await?;
    copied
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_timestamp(millis: i64) -> String {
    if millis == 0 {
        return "unavailable".to_string();
    }
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis)
        .map(|time| time.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}
