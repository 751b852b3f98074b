use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use stitchline::{
    Clock as _, CpuRenderer, ElapsedBreakdown, RenderSettings, SubmitOutcome, SystemClock,
    TimerAnimator, TimerPhase, Tracker, default_start_epoch_ms,
};

#[derive(Parser, Debug)]
#[command(name = "stitchline", version)]
struct Cli {
    /// Directory holding the persisted progress record.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the scarf as a PNG.
    Render(RenderArgs),
    /// Update the completed row count.
    Set(SetArgs),
    /// Reset progress to zero (asks for confirmation).
    Reset(ResetArgs),
    /// Show progress stats and the elapsed time since the start date.
    Status,
    /// Run the animated elapsed-time counter.
    Timer(TimerArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Container width in pixels the canvas is sized for.
    #[arg(long, default_value_t = 640.0)]
    container_width: f64,
}

#[derive(Parser, Debug)]
struct SetArgs {
    /// Completed row count, 0 to 150.
    rows: String,
}

#[derive(Parser, Debug)]
struct ResetArgs {
    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,
}

#[derive(Parser, Debug)]
struct TimerArgs {
    /// Stop after this many live one-second ticks (runs until interrupted by
    /// default).
    #[arg(long)]
    ticks: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(&cli.data_dir, args),
        Command::Set(args) => cmd_set(&cli.data_dir, args),
        Command::Reset(args) => cmd_reset(&cli.data_dir, args),
        Command::Status => cmd_status(&cli.data_dir),
        Command::Timer(args) => cmd_timer(args),
    }
}

fn cmd_render(data_dir: &PathBuf, args: RenderArgs) -> anyhow::Result<()> {
    let tracker = Tracker::open(data_dir)?;
    let canvas = tracker.canvas_for_container(args.container_width);
    let scene = tracker.scene(canvas)?;

    let mut renderer = CpuRenderer::new(RenderSettings {
        clear_rgba: Some([255, 255, 255, 255]),
    });
    let frame = renderer.render(&scene)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_set(data_dir: &PathBuf, args: SetArgs) -> anyhow::Result<()> {
    let mut tracker = Tracker::open(data_dir)?;
    match tracker.submit(&args.rows)? {
        SubmitOutcome::Rejected(rejection) => {
            eprintln!("{rejection}");
            std::process::exit(1);
        }
        SubmitOutcome::Updated { stats, celebrate } => {
            print_stats(&stats);
            if celebrate {
                println!("🎉 Congratulations! You've completed your scarf! 🧣");
            }
            Ok(())
        }
    }
}

fn cmd_reset(data_dir: &PathBuf, args: ResetArgs) -> anyhow::Result<()> {
    let mut tracker = Tracker::open(data_dir)?;
    let confirmed = args.yes || prompt_confirm("Are you sure you want to reset your progress?")?;
    if tracker.reset(confirmed)? {
        println!("progress reset");
    } else {
        println!("reset cancelled");
    }
    Ok(())
}

fn cmd_status(data_dir: &PathBuf) -> anyhow::Result<()> {
    let tracker = Tracker::open(data_dir)?;
    print_stats(&tracker.stats());
    if let Some(last_updated) = tracker.last_updated() {
        println!("last updated:   {last_updated}");
    }

    let epoch = default_start_epoch_ms()?;
    let now = SystemClock.now_ms();
    if epoch > now {
        anyhow::bail!("configured start date is in the future");
    }
    println!("knitting for:   {}", ElapsedBreakdown::from_ms(now - epoch));
    Ok(())
}

fn cmd_timer(args: TimerArgs) -> anyhow::Result<()> {
    let mut timer = TimerAnimator::start(SystemClock, default_start_epoch_ms()?)?;
    let mut live_ticks = 0u64;
    loop {
        let sample = timer.sample();
        print!("\rknitting for: {}   ", sample.display);
        std::io::stdout().flush()?;

        match sample.phase {
            TimerPhase::Animating => std::thread::sleep(Duration::from_millis(16)),
            TimerPhase::Live => {
                if let Some(limit) = args.ticks {
                    live_ticks += 1;
                    if live_ticks > limit {
                        println!();
                        return Ok(());
                    }
                }
                std::thread::sleep(Duration::from_secs(1));
            }
        }
    }
}

fn print_stats(stats: &stitchline::ProgressStats) {
    println!("rows completed: {}", stats.rows_completed);
    println!("total stitches: {}", group_thousands(stats.total_stitches));
    println!("progress:       {}%", stats.percent);
}

fn prompt_confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
