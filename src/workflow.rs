use crate::cli::Cli;
use crate::dispatch::{self, DispatchReport, SinkError, TrackSink};
use crate::mpris::MprisSink;
use crate::output::{self, PrintMode};
use crate::selection::ChooserOutcome;
use crate::{fallback, file_scanner, tui};
use anyhow::{Context, Result, bail};
use rustyline::DefaultEditor;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::Command;

/// Chooser title: program name followed by the arguments as typed.
pub fn session_title(argv: &[String]) -> String {
    let program = argv
        .first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "lap".to_string());
    std::iter::once(program)
        .chain(argv.iter().skip(1).cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

// Fall back to the XDG music directory when no arguments were given.
fn effective_args(cli_args: &Cli) -> Result<Vec<String>> {
    if !cli_args.args.is_empty() {
        return Ok(cli_args.args.clone());
    }
    match dirs::audio_dir() {
        Some(dir) => Ok(vec![dir.to_string_lossy().into_owned()]),
        None => bail!("Could not locate your music library. Please provide an argument."),
    }
}

// Resolve arguments into the initial candidate list: locate hits narrowed by
// the remaining keywords, or the arguments themselves as absolute paths.
fn gather_initial_candidates(cli_args: &Cli, args: &[String]) -> Result<Vec<String>> {
    if !cli_args.locate {
        return Ok(file_scanner::absolute_paths(args));
    }
    let Some((query, keywords)) = args.split_first() else {
        return Ok(Vec::new());
    };
    let results = file_scanner::locate(query)?;
    Ok(file_scanner::narrow_by_keywords(results, keywords))
}

fn choose(candidates: &[String], cli_args: &Cli, title: &str) -> Result<ChooserOutcome> {
    let use_tui =
        !cli_args.no_tui && io::stdin().is_terminal() && io::stdout().is_terminal();
    if use_tui {
        match tui::run_chooser(title, candidates, cli_args.enqueue, &cli_args.exec_cmd) {
            Ok(outcome) => return Ok(outcome),
            Err(e) => log::warn!("Full-screen chooser unavailable ({}). Using prompt.", e),
        }
    }

    let mut editor = DefaultEditor::new().context("could not set up the choice prompt")?;
    let mut stdout = io::stdout();
    let mut outcome = fallback::choose(
        candidates,
        !cli_args.show_path,
        cli_args.enqueue,
        &mut editor,
        &mut stdout,
    )?;
    // The prompt has no exec field; keep the one from the command line.
    outcome.override_command = Some(cli_args.exec_cmd.clone()).filter(|c| !c.is_empty());
    Ok(outcome)
}

fn print_mode(cli_args: &Cli) -> Option<PrintMode> {
    if cli_args.print_quoted {
        Some(PrintMode::ShellQuoted)
    } else if cli_args.print_null {
        Some(PrintMode::Null)
    } else if cli_args.print_lines {
        Some(PrintMode::Lines)
    } else {
        None
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Delivery {
    Printed(PrintMode),
    Executed,
    Dispatched(DispatchReport),
    NoResults,
}

// Hand the final list to whichever target applies, in priority order:
// print modes, exec command, media player (falling back to printing when
// no player answers), or a "No Results" notice.
pub(crate) fn deliver<W, F>(
    paths: &[String],
    enqueue: bool,
    exec_cmd: Option<&str>,
    mode: Option<PrintMode>,
    connect_sink: F,
    out: &mut W,
) -> Result<Delivery>
where
    W: Write,
    F: FnOnce() -> Result<Box<dyn TrackSink>, SinkError>,
{
    if let Some(mode) = mode {
        writeln!(out, "{}", output::render(paths, mode))?;
        return Ok(Delivery::Printed(mode));
    }
    if paths.is_empty() {
        writeln!(out, "No Results")?;
        return Ok(Delivery::NoResults);
    }
    if let Some(cmd) = exec_cmd {
        let status = Command::new(cmd)
            .args(paths)
            .status()
            .with_context(|| format!("could not run {}", cmd))?;
        if !status.success() {
            log::warn!("{} exited with {}", cmd, status);
        }
        return Ok(Delivery::Executed);
    }

    match connect_sink() {
        Ok(mut sink) => {
            let report = dispatch::dispatch(sink.as_mut(), paths, !enqueue)
                .context("could not hand tracks to the media player")?;
            Ok(Delivery::Dispatched(report))
        }
        Err(e) => {
            log::info!("media player lookup failed: {}", e);
            writeln!(out, "Cannot connect to a media player. Assuming --print.")?;
            writeln!(out, "{}", output::render(paths, PrintMode::Lines))?;
            Ok(Delivery::Printed(PrintMode::Lines))
        }
    }
}

fn connect_mpris() -> Result<Box<dyn TrackSink>, SinkError> {
    let sink = MprisSink::connect()?;
    log::debug!("dispatching to {}", sink.bus_name());
    Ok(Box::new(sink))
}

// Main orchestrator for the lap application logic.
pub fn run_lap(cli_args: Cli, title: &str) -> Result<()> {
    // Step 1: Turn arguments into candidate paths.
    let args = effective_args(&cli_args)?;
    let candidates = gather_initial_candidates(&cli_args, &args)?;

    // Step 2: Random pick, interactive choice, or take everything as-is.
    let (results, enqueue, exec_cmd) = if cli_args.random {
        let picked =
            file_scanner::gather_random(&candidates, cli_args.wanted_count, &mut rand::thread_rng());
        (picked, cli_args.enqueue, cli_args.exec_cmd.clone())
    } else if cli_args.locate && !cli_args.prints_without_choosing() && !candidates.is_empty() {
        let outcome = choose(&candidates, &cli_args, title)?;
        (
            outcome.paths,
            outcome.enqueue,
            outcome.override_command.unwrap_or_default(),
        )
    } else {
        (candidates, cli_args.enqueue, cli_args.exec_cmd.clone())
    };

    // Step 3: Print, run the exec command, or feed the media player.
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let exec_cmd = Some(exec_cmd.as_str()).filter(|c| !c.trim().is_empty());
    match deliver(
        &results,
        enqueue,
        exec_cmd,
        print_mode(&cli_args),
        connect_mpris,
        &mut out,
    )? {
        Delivery::Dispatched(report) if !report.missing.is_empty() => {
            log::warn!(
                "{} of {} file(s) did not exist but were sent anyway",
                report.missing.len(),
                report.dispatched
            );
        }
        _ => {}
    }
    Ok(())
}
