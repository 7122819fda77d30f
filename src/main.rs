use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use digiclock::commands;
use digiclock::readline;
use digiclock::AppState;
use digiclock_skin::TimeFormatOptions;

fn main() -> Result<(), String> {
    digiclock::logging::init();
    let mut state = AppState::load();

    // One-shot mode when a command is given on the command line
    let cli = Cli::parse();
    if let Some(command) = cli.command {
        run(command, &mut state)?;
        return Ok(());
    }

    loop {
        let line = readline()?;
        if line.is_empty() {
            // EOF
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut state) {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "digital clock skin renderer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one frame to a PNG file
    Render {
        #[arg(short, long)]
        out: PathBuf,
        /// Time to render (YYYY-MM-DD HH:MM[:SS]), defaults to now
        #[arg(long)]
        at: Option<String>,
        #[arg(short, long)]
        scale: Option<f32>,
    },
    /// Print the tokens a format produces
    Tokens {
        #[arg(short, long)]
        format: Option<String>,
        #[arg(long)]
        at: Option<String>,
    },
    /// Validate a format string
    CheckFormat { format: String },
    /// Run the clock for a number of half-second frames
    Tick {
        #[arg(short, long, default_value_t = 10)]
        frames: u32,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show or edit the stored configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    Exit,
}

#[derive(Subcommand)]
enum ConfigCommands {
    Show,
    Path,
    SetFormat {
        format: String,
    },
    /// Build a standard format from options
    SetStandard {
        #[arg(long)]
        use_24h: bool,
        #[arg(long)]
        no_leading_zero: bool,
        #[arg(long)]
        seconds: bool,
        #[arg(long)]
        no_am_pm: bool,
        #[arg(long)]
        no_space: bool,
        #[arg(long)]
        uppercase: bool,
        #[arg(long)]
        date: bool,
    },
    SetSeparators {
        separators: String,
    },
    SetLayout {
        layout: String,
    },
    Reset,
}

fn respond(line: &str, state: &mut AppState) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "digiclock".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(command) => run(command, state),
        None => Ok(false),
    }
}

/// Execute a command. Returns true when the session should end.
fn run(command: Commands, state: &mut AppState) -> Result<bool, String> {
    match command {
        Commands::Render { out, at, scale } => commands::render(state, at.as_deref(), scale, &out)?,
        Commands::Tokens { format, at } => {
            commands::tokens(state, format.as_deref(), at.as_deref())?
        }
        Commands::CheckFormat { format } => commands::check_format(&format)?,
        Commands::Tick { frames, out } => commands::tick(state, frames, out.as_deref())?,
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::show_config(state)?,
            ConfigCommands::Path => commands::show_config_path()?,
            ConfigCommands::SetFormat { format } => commands::set_format(state, &format)?,
            ConfigCommands::SetStandard {
                use_24h,
                no_leading_zero,
                seconds,
                no_am_pm,
                no_space,
                uppercase,
                date,
            } => {
                let options = TimeFormatOptions {
                    use_24h,
                    leading_zero: !no_leading_zero,
                    show_seconds: seconds,
                    show_am_pm: !no_am_pm,
                    space_before_am_pm: !no_space,
                    uppercase_am_pm: uppercase,
                    show_date: date,
                };
                commands::set_standard_format(state, options)?
            }
            ConfigCommands::SetSeparators { separators } => {
                commands::set_separators(state, &separators)?
            }
            ConfigCommands::SetLayout { layout } => commands::set_layout(state, &layout)?,
            ConfigCommands::Reset => commands::reset_config(state)?,
        },
        Commands::Exit => {
            write!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
            std::io::stdout().flush().map_err(|e| e.to_string())?;
            return Ok(true);
        }
    }
    Ok(false)
}
