use std::process::ExitCode;
use window_tracker::args::Args;
use window_tracker::sequence::run_sequence;

fn main() -> ExitCode {
    let Some(args) = Args::parse() else {
        return ExitCode::SUCCESS;
    };

    let default_level = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let options = args.sequence_options();
    println!(
        "🚀 Tracking {} in {:?} with {}...",
        options.initial_box, options.frames_dir, options.config.metric
    );

    match run_sequence(&options) {
        Ok(summary) => {
            let lost = summary.frames.iter().filter(|f| f.all_disqualified).count();
            if lost > 0 {
                println!("⚠️ {lost} frames had no scorable candidate");
            }
            println!(
                "✅ Tracked {} frames, annotated output in {:?}",
                summary.frames.len(),
                options.output_dir
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Tracking failed: {e}");
            eprintln!("❌ Tracking failed: {e}");
            ExitCode::FAILURE
        }
    }
}
