//! roi-projector CLI: project depth-camera regions into the second camera.

use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;
use roi_projector::core::{init_with_level, DEFAULT_OVERLAP_THRESHOLD};
use roi_projector::outcome::quad_from_array;
use roi_projector::{
    run_job, CornersOutcome, DepthPixel, OverlapOutcome, ProjectionJob, ProjectorParams, Rect,
    RectOutcome, RoiProjector,
};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

const DEFAULT_CORNERS: [DepthPixel; 4] = [
    DepthPixel {
        u: 100.0,
        v: 200.0,
        z: 1000.0,
    },
    DepthPixel {
        u: 400.0,
        v: 200.0,
        z: 1000.0,
    },
    DepthPixel {
        u: 400.0,
        v: 350.0,
        z: 1000.0,
    },
    DepthPixel {
        u: 100.0,
        v: 350.0,
        z: 1000.0,
    },
];

#[derive(Parser)]
#[command(name = "roi-projector")]
#[command(about = "Project depth-camera regions into a second camera and check their overlap")]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit tracing spans instead of plain log lines.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    trace: bool,

    /// Format tracing output as JSON (with --trace).
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    trace_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project four corners, each with its own depth.
    Corners {
        /// Calibration record.
        calibration: PathBuf,

        /// `u v z` for each of the 4 corners (12 values). A fixed sample
        /// region at depth 1000 is used when omitted.
        #[arg(allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Project an axis-aligned rectangle at one depth and print its bounding box.
    Rect(RectArgs),

    /// Fraction of the target quad lying inside the ROI quad.
    Overlap {
        /// ROI corners as `x1,y1,...,x4,y4`, clockwise in image coordinates.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        roi: Vec<f64>,

        /// Target corners as `x1,y1,...,x4,y4`.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        target: Vec<f64>,

        /// Ratio that must be exceeded to count as overlapping.
        #[arg(long, default_value_t = DEFAULT_OVERLAP_THRESHOLD)]
        threshold: f64,
    },

    /// Run a JSON projection job and print (or write) its report.
    Job {
        /// Job file; relative paths inside it are resolved against its folder.
        job: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct RectArgs {
    /// Calibration record.
    calibration: PathBuf,

    #[arg(long, allow_negative_numbers = true)]
    x: f64,

    #[arg(long, allow_negative_numbers = true)]
    y: f64,

    #[arg(long, allow_negative_numbers = true)]
    w: f64,

    #[arg(long, allow_negative_numbers = true)]
    h: f64,

    /// Depth shared by all four corners.
    #[arg(long, allow_negative_numbers = true)]
    depth: f64,

    /// Also project through the plane homography at `--depth`.
    #[arg(long)]
    planar: bool,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.command {
        Commands::Corners {
            calibration,
            values,
        } => run_corners(&calibration, &values),
        Commands::Rect(args) => run_rect(&args),
        Commands::Overlap {
            roi,
            target,
            threshold,
        } => run_overlap(&roi, &target, threshold),
        Commands::Job { job } => run_job_file(&job),
    }
}

fn init_logging(cli: &Cli) -> CliResult<()> {
    #[cfg(feature = "tracing")]
    if cli.trace {
        roi_projector::core::init_tracing(cli.trace_json);
        return Ok(());
    }
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    init_with_level(level)?;
    Ok(())
}

fn load_projector(calibration: &Path, params: ProjectorParams) -> CliResult<RoiProjector> {
    let mut projector = RoiProjector::new(params);
    projector
        .load_calibration_file(calibration)
        .map_err(|err| format!("calibration {}: {err}", calibration.display()))?;
    Ok(projector)
}

fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_corners(values: &[f64]) -> CliResult<[DepthPixel; 4]> {
    match values.len() {
        0 => Ok(DEFAULT_CORNERS),
        12 => {
            let mut corners = DEFAULT_CORNERS;
            for (c, uvz) in corners.iter_mut().zip(values.chunks_exact(3)) {
                *c = DepthPixel::new(uvz[0], uvz[1], uvz[2]);
            }
            Ok(corners)
        }
        n => Err(format!("expected 12 values (u v z for 4 corners), got {n}").into()),
    }
}

fn parse_quad(name: &str, values: &[f64]) -> CliResult<[[f64; 2]; 4]> {
    if values.len() != 8 {
        return Err(format!("--{name} needs 8 comma-separated values, got {}", values.len()).into());
    }
    let mut quad = [[0.0; 2]; 4];
    for (slot, xy) in quad.iter_mut().zip(values.chunks_exact(2)) {
        *slot = [xy[0], xy[1]];
    }
    Ok(quad)
}

fn run_corners(calibration: &Path, values: &[f64]) -> CliResult<()> {
    let corners = parse_corners(values)?;
    let projector = load_projector(calibration, ProjectorParams::default())?;
    let outcome = CornersOutcome::from(projector.project_corners(&corners));
    print_json(&outcome)?;
    if !outcome.ok {
        return Err(outcome.message.into());
    }
    Ok(())
}

fn run_rect(args: &RectArgs) -> CliResult<()> {
    let params = ProjectorParams {
        plane_depth: args.depth,
        ..ProjectorParams::default()
    };
    let projector = load_projector(&args.calibration, params)?;
    let rect = Rect::new(args.x, args.y, args.w, args.h);

    let outcome = RectOutcome::from(projector.project_rect(&rect, args.depth));
    let planar = args
        .planar
        .then(|| RectOutcome::from(projector.project_rect_planar(&rect)));

    match &planar {
        Some(p) => print_json(&serde_json::json!({ "rect": outcome, "planar_rect": p }))?,
        None => print_json(&outcome)?,
    }
    if let Some(failed) = std::iter::once(&outcome).chain(&planar).find(|o| !o.ok) {
        return Err(failed.message.clone().into());
    }
    Ok(())
}

fn run_overlap(roi: &[f64], target: &[f64], threshold: f64) -> CliResult<()> {
    let roi = quad_from_array(&parse_quad("roi", roi)?);
    let target = quad_from_array(&parse_quad("target", target)?);
    print_json(&OverlapOutcome::evaluate(&roi, &target, threshold))
}

fn run_job_file(path: &Path) -> CliResult<()> {
    let mut job = ProjectionJob::load_json(path)?;
    if let Some(dir) = path.parent() {
        job.rebase(dir);
    }
    let report = run_job(&job)?;

    match job.output_path() {
        Some(out) => {
            report.write_json(&out)?;
            log::info!("report written to {}", out.display());
            println!("{}", out.display());
        }
        None => print_json(&report)?,
    }

    if !report.all_ok() {
        return Err("one or more projections failed".into());
    }
    Ok(())
}
