use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use millpost::{init_logging, post_process, Job, PostConfig, BUILD_DATE, VERSION};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Job file to post-process (JSON, or TOML with a .toml extension)
    #[arg()]
    job: PathBuf,

    /// Post configuration file (JSON or TOML). Defaults to the user config
    /// file when it exists, built-in settings otherwise.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write G-code to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<PostConfig> {
    if let Some(path) = explicit {
        return PostConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()));
    }

    match PostConfig::default_path() {
        Ok(path) if path.exists() => PostConfig::load_from_file(&path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        Ok(_) => Ok(PostConfig::default()),
        Err(e) => {
            debug!("No configuration directory: {}", e);
            Ok(PostConfig::default())
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let args = Args::parse();
    debug!(version = VERSION, build = BUILD_DATE, "millpost starting");

    let config = load_config(args.config.as_deref())?;
    let job = Job::load(&args.job)
        .with_context(|| format!("Failed to read job {}", args.job.display()))?;

    let output = post_process(&job, config)
        .with_context(|| format!("Post-processing {} failed", args.job.display()))?;

    match &args.output {
        Some(path) => {
            fs::write(path, &output.program)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "G-code written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.program.as_bytes())
                .context("Failed to write G-code to stdout")?;
        }
    }

    Ok(())
}
