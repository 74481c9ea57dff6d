use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "plys", version)]
struct Cli {
    /// Log every frame as it is copied.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Concatenate a directory of PLY frames into a PLYS file.
    Build(BuildArgs),
    /// Print the sequence header of an existing PLYS file.
    Header(HeaderArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Directory containing the frame files.
    #[arg(long = "in", required_unless_present = "config", conflicts_with = "config")]
    in_dir: Option<PathBuf>,

    /// Build job JSON, used instead of `--in`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PLYS path.
    #[arg(long)]
    out: PathBuf,

    /// Wrap the output in gzip.
    #[arg(long)]
    gzip: bool,

    /// Framerate recorded in the header.
    #[arg(long, conflicts_with = "raw")]
    framerate: Option<plys::Framerate>,

    /// Write frames without a header.
    #[arg(long)]
    raw: bool,

    /// Abort on the first unreadable frame instead of skipping it.
    #[arg(long)]
    fail_fast: bool,

    /// Only pick up files with this extension (e.g. `ply`).
    #[arg(long)]
    ext: Option<String>,

    /// Directory for the temporary artifact. Defaults to the output's directory.
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// Print progress while building.
    #[arg(long)]
    progress: bool,
}

#[derive(Args, Debug)]
struct HeaderArgs {
    /// PLYS or PLYS.GZ file.
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Header(args) => cmd_header(args),
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else if quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn make_config(args: &BuildArgs) -> anyhow::Result<plys::BuildConfig> {
    let mut cfg = match (&args.config, &args.in_dir) {
        (Some(path), _) => {
            let cfg = plys::BuildConfig::from_path(path)?;
            if args.gzip {
                cfg.with_compression(plys::Compression::Gzip)
            } else {
                cfg
            }
        }
        (None, Some(dir)) => {
            let inputs = plys::list_frame_files(dir, args.ext.as_deref())?;
            plys::BuildConfig::new(inputs)
                .with_compression(plys::Compression::from_flag(args.gzip))
        }
        (None, None) => anyhow::bail!("either --in or --config is required"),
    };

    if let Some(fps) = args.framerate {
        cfg = cfg.with_framerate(fps);
    }
    if args.raw {
        cfg = cfg.raw();
    }
    if args.fail_fast {
        cfg = cfg.with_policy(plys::ReadFailurePolicy::FailFast);
    }
    if let Some(dir) = &args.temp_dir {
        cfg = cfg.with_temp_dir(dir);
    } else if cfg.temp_dir.is_none() {
        // Keep the rename on one filesystem.
        let parent = args
            .out
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        cfg = cfg.with_temp_dir(parent);
    }

    Ok(cfg)
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let cfg = make_config(&args)?;

    let suffix = cfg.compression.suffix();
    if !args.out.to_string_lossy().ends_with(&suffix) {
        tracing::warn!(out = %args.out.display(), expected = %suffix, "unexpected output extension");
    }

    let control = plys::BuildControl::new();
    let mut generator = if args.progress {
        build_with_progress(&cfg, control)?
    } else {
        plys::Generator::build_with(&cfg, control)?
    };

    for failure in generator.failures() {
        eprintln!("skipped {}: {}", failure.path.display(), failure.message);
    }

    generator
        .publish(&args.out)
        .with_context(|| format!("save '{}'", args.out.display()))?;

    let (processed, total) = generator.progress();
    eprintln!(
        "wrote {} ({processed}/{total} frames)",
        args.out.display()
    );
    Ok(())
}

fn build_with_progress(
    cfg: &plys::BuildConfig,
    control: plys::BuildControl,
) -> plys::PlysResult<plys::Generator> {
    std::thread::scope(|s| {
        let worker = {
            let control = control.clone();
            s.spawn(move || plys::Generator::build_with(cfg, control))
        };

        let mut last = None;
        while !worker.is_finished() {
            let now = control.progress();
            if last != Some(now) {
                eprint!("\rbuilding: {}/{}", now.0, now.1);
                last = Some(now);
            }
            std::thread::sleep(Duration::from_millis(100));
        }
        let (processed, total) = control.progress();
        eprintln!("\rbuilding: {processed}/{total}");

        worker
            .join()
            .unwrap_or_else(|_| Err(plys::PlysError::artifact("build thread panicked")))
    })
}

fn cmd_header(args: HeaderArgs) -> anyhow::Result<()> {
    let header = plys::read_artifact_header(&args.path)?;
    println!("format: {}", plys::FORMAT_TAG);
    match header.framerate {
        Some(fps) => println!("framerate: {fps}"),
        None => println!("framerate: (none)"),
    }
    Ok(())
}
