use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::Path;

pub const DEFAULT_RAND_COUNT: usize = 10;

/// lap – locate and play media files via MPRIS, a command, or shell piping
///
/// Accepts multiple space- and/or comma-separated choices (ranges as A:B)
/// after presenting the results. Type `q` anywhere in your answer to enqueue
/// instead of play.
///
/// Called as `ap`/`aq` the arguments are paths; as `lap`/`laq` they are
/// search keywords; as `rap`/`raq` random files are picked below them. The
/// `q` variants enqueue by default.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// Paths, or search keywords with --locate. Defaults to your music directory.
    #[arg(value_name = "ARG")]
    pub args: Vec<String>,

    /// Print the results separated by NUL characters (good for `xargs -0`).
    #[arg(short = '0', long = "print0")]
    pub print_null: bool,

    /// Use this command to enqueue/play rather than the media player.
    #[arg(short = 'e', long = "exec", value_name = "CMD", default_value = "")]
    pub exec_cmd: String,

    /// Treat the arguments as search keywords rather than paths.
    #[arg(short, long)]
    pub locate: bool,

    /// Number of randomly-chosen songs to pick.
    #[arg(short = 'n', long = "song-count", value_name = "NUM", default_value_t = DEFAULT_RAND_COUNT)]
    pub wanted_count: usize,

    /// Use the plain numbered prompt even when a full-screen chooser is possible.
    #[arg(long)]
    pub no_tui: bool,

    /// Print the results, one per line.
    #[arg(short = 'p', long = "print")]
    pub print_lines: bool,

    /// Show the full path to each result.
    #[arg(short = 'P', long)]
    pub show_path: bool,

    /// Decrease verbosity. Repeat for extra effect.
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Don't start the first song playing after enqueueing it.
    #[arg(short = 'Q', long)]
    pub enqueue: bool,

    /// Select NUM entries at random from the provided paths.
    #[arg(short, long)]
    pub random: bool,

    /// Like --print but shell-quoted, for use with backticks.
    #[arg(long = "sh")]
    pub print_quoted: bool,

    /// Increase verbosity. Repeat for extra effect.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Defaults implied by the name the program was invoked under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Personality {
    pub locate: bool,
    pub enqueue: bool,
    pub random: bool,
}

impl Personality {
    pub fn from_program_name(argv0: &str) -> Self {
        let name = Path::new(argv0)
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Personality {
            locate: matches!(name.as_str(), "lap" | "laq"),
            enqueue: matches!(name.as_str(), "aq" | "laq" | "raq"),
            random: matches!(name.as_str(), "rap" | "raq"),
        }
    }
}

impl Cli {
    /// Switch on whatever the personality implies. Flags already given stay on.
    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.locate |= personality.locate;
        self.enqueue |= personality.enqueue;
        self.random |= personality.random;
        self
    }

    pub fn log_level(&self) -> LevelFilter {
        const LEVELS: [LevelFilter; 5] = [
            LevelFilter::Off,
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
        ];
        let index = (2 + self.verbose as isize - self.quiet as isize).clamp(0, 4);
        LEVELS[index as usize]
    }

    /// Plain and NUL-separated printing skip the chooser and list every hit.
    /// `--sh` still lets the user pick, for use inside backticks.
    pub fn prints_without_choosing(&self) -> bool {
        self.print_lines || self.print_null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lap").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert!(cli.args.is_empty());
        assert_eq!(cli.wanted_count, DEFAULT_RAND_COUNT);
        assert_eq!(cli.exec_cmd, "");
        assert!(!cli.enqueue && !cli.locate && !cli.random && !cli.prints_without_choosing());
        assert_eq!(cli.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn short_flags() {
        let cli = parse(&["-0", "-Q", "-l", "-P", "-n", "3", "-e", "mpv", "jazz", "blue"]);
        assert!(cli.print_null && cli.enqueue && cli.locate && cli.show_path);
        assert_eq!(cli.wanted_count, 3);
        assert_eq!(cli.exec_cmd, "mpv");
        assert_eq!(cli.args, vec!["jazz", "blue"]);
    }

    #[test]
    fn verbosity_is_clamped() {
        assert_eq!(parse(&["-vv"]).log_level(), LevelFilter::Debug);
        assert_eq!(parse(&["-vvvvv"]).log_level(), LevelFilter::Debug);
        assert_eq!(parse(&["-q"]).log_level(), LevelFilter::Error);
        assert_eq!(parse(&["-qqqq"]).log_level(), LevelFilter::Off);
        assert_eq!(parse(&["-v", "-q"]).log_level(), LevelFilter::Warn);
    }

    #[test]
    fn only_plain_printing_skips_the_chooser() {
        assert!(parse(&["-p"]).prints_without_choosing());
        assert!(parse(&["-0"]).prints_without_choosing());
        assert!(!parse(&["--sh"]).prints_without_choosing());
    }

    #[test]
    fn personalities() {
        assert_eq!(Personality::from_program_name("/usr/bin/ap"), Personality::default());
        assert_eq!(
            Personality::from_program_name("laq"),
            Personality {
                locate: true,
                enqueue: true,
                random: false
            }
        );
        assert_eq!(
            Personality::from_program_name("./RAP"),
            Personality {
                locate: false,
                enqueue: false,
                random: true
            }
        );
        let cli = parse(&["-Q"]).with_personality(Personality::from_program_name("lap"));
        assert!(cli.locate && cli.enqueue);
    }
}
