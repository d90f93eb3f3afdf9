use crate::block_matching::{BoundingBox, DegeneratePolicy, Metric, TrackConfig};
use crate::sequence::SequenceOptions;
use std::env;
use std::path::PathBuf;

/// Start box used when `--box` is not given
pub const DEFAULT_BOX: BoundingBox = BoundingBox {
    top_left: (19, 50),
    bottom_right: (67, 92),
};

pub const DEFAULT_FRAMES_DIR: &str = "image_girl";

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub frames_dir: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub metric: Metric,
    pub radius: Option<u32>,
    pub initial_box: BoundingBox,
    pub degenerate_policy: DegeneratePolicy,
    pub debug_mode: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Args),
    Help,
    Version,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            frames_dir: PathBuf::from(DEFAULT_FRAMES_DIR),
            output_dir: None,
            metric: Metric::NormalizedCrossCorrelation,
            radius: None,
            initial_box: DEFAULT_BOX,
            degenerate_policy: DegeneratePolicy::default(),
            debug_mode: false,
        }
    }
}

impl Args {
    /// Parse the process arguments; prints help, version or errors and
    /// returns `None` when there is nothing to run
    pub fn parse() -> Option<Self> {
        match Self::parse_from(env::args().skip(1)) {
            Ok(Command::Run(args)) => Some(args),
            Ok(Command::Help) => {
                print_help();
                None
            }
            Ok(Command::Version) => {
                println!("Window Tracker v{}", env!("CARGO_PKG_VERSION"));
                None
            }
            Err(message) => {
                eprintln!("❌ {message}");
                print_help();
                None
            }
        }
    }

    /// Parse flags (program name already stripped)
    pub fn parse_from<I>(args: I) -> Result<Command, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();

        for arg in args {
            if arg == "--help" || arg == "-h" {
                return Ok(Command::Help);
            } else if arg == "--version" || arg == "-v" {
                return Ok(Command::Version);
            } else if arg == "--debug" {
                parsed.debug_mode = true;
            } else if let Some(val) = arg.strip_prefix("--frames=") {
                parsed.frames_dir = PathBuf::from(val);
            } else if let Some(val) = arg.strip_prefix("--output=") {
                parsed.output_dir = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--metric=") {
                parsed.metric = val.parse()?;
            } else if let Some(val) = arg.strip_prefix("--radius=") {
                parsed.radius = Some(
                    val.parse::<u32>()
                        .map_err(|_| format!("Invalid radius value: {val}"))?,
                );
            } else if let Some(val) = arg.strip_prefix("--box=") {
                parsed.initial_box = BoundingBox::parse(val)
                    .ok_or_else(|| format!("Invalid box '{val}', expected ROW,COL,ROW,COL"))?;
            } else if let Some(val) = arg.strip_prefix("--on-flat=") {
                parsed.degenerate_policy = match val {
                    "worst" => DegeneratePolicy::Disqualify,
                    "error" => DegeneratePolicy::Fail,
                    other => {
                        return Err(format!(
                            "Unknown --on-flat value '{other}', expected 'worst' or 'error'"
                        ));
                    }
                };
            } else {
                return Err(format!("Unknown argument: {arg}"));
            }
        }

        Ok(Command::Run(parsed))
    }

    pub fn track_config(&self) -> TrackConfig {
        let config = TrackConfig::for_metric(self.metric)
            .with_degenerate_policy(self.degenerate_policy);
        match self.radius {
            Some(radius) => config.with_radius(radius),
            None => config,
        }
    }

    pub fn sequence_options(&self) -> SequenceOptions {
        let output_dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}_boxed", self.metric.short_name())));
        SequenceOptions {
            frames_dir: self.frames_dir.clone(),
            output_dir,
            initial_box: self.initial_box,
            config: self.track_config(),
        }
    }
}

fn print_help() {
    println!("🎯 Window Tracker");
    println!();
    println!("USAGE:");
    println!("    window-tracker [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --frames=DIR           Directory of frames, processed in file name order (default: image_girl)");
    println!("    --output=DIR           Directory for annotated frames (default: <metric>_boxed)");
    println!("    --metric=<ssd|cc|ncc>  Similarity metric (default: ncc)");
    println!("    --radius=N             Search radius in pixels (default: 6 for ssd, 2 for cc/ncc)");
    println!("    --box=ROW,COL,ROW,COL  Initial box corners, top-left then bottom-right (default: 19,50,67,92)");
    println!("    --on-flat=<worst|error> NCC on a constant patch: score as worst or abort (default: worst)");
    println!("    --debug                Enable debug output");
    println!("    --help, -h             Show this help message");
    println!("    --version, -v          Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    window-tracker --metric=ssd");
    println!("    window-tracker --frames=clip --box=10,10,40,30 --metric=ncc --radius=4");
}
