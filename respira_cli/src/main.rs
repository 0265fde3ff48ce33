use clap::{Parser, Subcommand};
use respira_core::*;
use std::path::{Path, PathBuf};

/// Cycles run when neither --cycles nor --seconds is given
const DEFAULT_CYCLES: u32 = 5;

#[derive(Parser)]
#[command(name = "respira")]
#[command(about = "Guided breathing exercises in the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a breathing exercise (default)
    Run {
        /// Exercise to run (coherence, square, triangle)
        #[arg(long)]
        kind: Option<String>,

        /// Inhale duration in seconds (1-10)
        #[arg(long)]
        inspire: Option<u8>,

        /// Hold duration in seconds (1-10)
        #[arg(long)]
        hold: Option<u8>,

        /// Exhale duration in seconds (1-10)
        #[arg(long)]
        expire: Option<u8>,

        /// Stop after this many cycles
        #[arg(long, conflicts_with = "seconds")]
        cycles: Option<u32>,

        /// Stop after this many seconds
        #[arg(long, conflicts_with = "cycles")]
        seconds: Option<u32>,

        /// Disable the audio cue
        #[arg(long)]
        mute: bool,

        /// Don't wait between ticks (for testing)
        #[arg(long)]
        fast: bool,

        /// Don't record the session in the journal
        #[arg(long)]
        no_log: bool,

        /// Print every notification as a JSON line
        #[arg(long)]
        json: bool,
    },

    /// List available exercises
    Patterns,

    /// Show recorded sessions
    History {
        /// Number of sessions to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

struct RunOptions {
    kind: Option<String>,
    inspire: Option<u8>,
    hold: Option<u8>,
    expire: Option<u8>,
    stop: StopCondition,
    mute: bool,
    fast: bool,
    no_log: bool,
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    respira_core::logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_config_path);

    let mut config = Config::load_or_default(&config_path)?;
    if let Some(data_dir) = cli.data_dir.clone() {
        config.data.data_dir = data_dir;
    }

    match cli.command {
        Some(Commands::Run {
            kind,
            inspire,
            hold,
            expire,
            cycles,
            seconds,
            mute,
            fast,
            no_log,
            json,
        }) => {
            let stop = match (cycles, seconds) {
                (_, Some(secs)) => StopCondition::Seconds(secs),
                (Some(n), None) => StopCondition::Cycles(n),
                (None, None) => StopCondition::Cycles(DEFAULT_CYCLES),
            };
            let options = RunOptions {
                kind,
                inspire,
                hold,
                expire,
                stop,
                mute,
                fast,
                no_log,
                json,
            };
            cmd_run(&config, options)
        }
        Some(Commands::Patterns) => cmd_patterns(&config),
        Some(Commands::History { limit }) => cmd_history(&config, limit),
        Some(Commands::Config { action }) => cmd_config(&config, &config_path, action),
        None => {
            let options = RunOptions {
                kind: None,
                inspire: None,
                hold: None,
                expire: None,
                stop: StopCondition::Cycles(DEFAULT_CYCLES),
                mute: false,
                fast: false,
                no_log: false,
                json: false,
            };
            cmd_run(&config, options)
        }
    }
}

fn cmd_run(config: &Config, options: RunOptions) -> Result<()> {
    let mut engine = BreathingEngine::with_config(config)?;

    if let Some(ref kind) = options.kind {
        engine.select_exercise(kind.parse()?);
    }

    for (phase, seconds) in [
        (Phase::Inspire, options.inspire),
        (Phase::Hold, options.hold),
        (Phase::Expire, options.expire),
    ] {
        if let Some(seconds) = seconds {
            engine.set_duration(phase, seconds)?;
        }
    }

    if options.mute && engine.sound_enabled() {
        engine.toggle_sound();
    }

    if !options.json {
        display_header(&engine);
    }

    let json = options.json;
    let observer = move |engine: &BreathingEngine, notification: &Notification| {
        if json {
            match serde_json::to_string(notification) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!("Failed to encode notification: {}", e),
            }
        } else if let Notification::PhaseChanged {
            remaining_secs,
            cycles_completed,
            ..
        } = notification
        {
            display_phase(engine, *remaining_secs, *cycles_completed);
        }
    };

    let cue = TerminalBell::stderr();
    let summary = if options.fast {
        SessionDriver::new(InstantPacer, cue).run(&mut engine, options.stop, observer)?
    } else {
        SessionDriver::new(SleepPacer, cue).run(&mut engine, options.stop, observer)?
    };

    if !json {
        println!();
        println!(
            "✓ {} cycles of {} in {}s",
            summary.cycles_completed, summary.exercise, summary.elapsed_secs
        );
    }

    if options.no_log {
        return Ok(());
    }

    let mut journal = JsonlJournal::in_dir(&config.journal_dir());
    journal.append(&SessionRecord::from(&summary))?;
    if !json {
        println!("✓ Session logged!");
    }

    Ok(())
}

fn cmd_patterns(config: &Config) -> Result<()> {
    for def in get_default_catalog().iter() {
        let sequence: Vec<_> = def.phases.iter().map(|p| p.as_str()).collect();
        println!("{:<10} {}", def.kind, def.name);
        println!("           {}", def.description);
        println!(
            "           {} ({}s per cycle)",
            sequence.join(" → "),
            config.durations.cycle_seconds(def.kind)
        );
        println!();
    }
    Ok(())
}

fn cmd_history(config: &Config, limit: usize) -> Result<()> {
    let journal = JsonlJournal::in_dir(&config.journal_dir());
    let records = read_records(journal.path())?;

    if records.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }

    for record in records.iter().rev().take(limit) {
        println!(
            "{}  {:<10} {:>3} cycles  {:>4}s",
            record
                .started_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            record.exercise,
            record.cycles_completed,
            record.elapsed_secs
        );
    }

    println!();
    println!("Totals:");
    for (kind, totals) in summarize(&records) {
        println!(
            "  {:<10} {} sessions, {} cycles, {} min",
            kind,
            totals.sessions,
            totals.cycles,
            totals.seconds / 60
        );
    }

    Ok(())
}

fn cmd_config(config: &Config, config_path: &Path, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let contents = toml::to_string_pretty(config)
                .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
            println!("# {}", config_path.display());
            print!("{}", contents);
        }
        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                return Err(Error::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                )));
            }
            Config::default().save_to(config_path)?;
            println!("✓ Wrote {}", config_path.display());
        }
    }
    Ok(())
}

fn display_header(engine: &BreathingEngine) {
    let def = get_default_catalog().definition(engine.exercise());
    let durations = engine.durations();

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", def.name.to_uppercase());
    println!("╰─────────────────────────────────────────╯");
    println!();
    for phase in def.phases {
        println!("  → {:<8} {}s", phase.as_str(), durations.get(*phase));
    }
    println!(
        "  Sound: {}",
        if engine.sound_enabled() { "on" } else { "off" }
    );
    println!();
}

fn display_phase(engine: &BreathingEngine, remaining_secs: u8, cycles_completed: u32) {
    println!(
        "  [{:>2}] {:<9} {:>2}s  ball {}  ({})",
        cycles_completed,
        engine.current_phase_label(),
        remaining_secs,
        engine.ball_position(),
        engine.current_phase_style_class()
    );
}
