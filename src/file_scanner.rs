use crate::filetypes;
use anyhow::{Context, Result};
use glob::Pattern;
use rand::Rng;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use walkdir::WalkDir;

pub const LOCATE_COMMAND: &[&str] = &["locate", "-i"];

/// Ask `locate` for `query` and keep the playable hits, sorted.
pub fn locate(query: &str) -> Result<Vec<String>> {
    let (program, args) = LOCATE_COMMAND
        .split_first()
        .context("locate command is empty")?;
    let mut child = Command::new(program)
        .args(args)
        .arg(query)
        .stdout(Stdio::piped())
        .spawn()
        .with_context(|| format!("could not run {}", program))?;

    let stdout = child
        .stdout
        .take()
        .context("could not capture locate output")?;
    let results = playable_lines(std::io::BufReader::new(stdout));

    let status = child.wait()?;
    if !status.success() {
        // locate exits non-zero when nothing matched
        log::debug!("{} exited with {}", program, status);
    }
    Ok(results)
}

fn playable_lines<R: BufRead>(reader: R) -> Vec<String> {
    let mut results: Vec<String> = reader
        .lines()
        .map_while(|line| line.ok())
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty() && filetypes::is_playable(Path::new(line)))
        .collect();
    results.sort();
    results
}

/// Keep only results containing every keyword (case-insensitive, glob
/// characters in a keyword are honoured).
pub fn narrow_by_keywords(results: Vec<String>, keywords: &[String]) -> Vec<String> {
    let matchers: Vec<Box<dyn Fn(&str) -> bool>> = keywords
        .iter()
        .map(|kw| {
            let kw = kw.to_lowercase();
            match Pattern::new(&format!("*{}*", kw)) {
                Ok(pattern) => Box::new(move |s: &str| pattern.matches(s)) as Box<dyn Fn(&str) -> bool>,
                Err(e) => {
                    log::warn!("Invalid keyword pattern '{}': {}", kw, e);
                    Box::new(move |s: &str| s.contains(kw.as_str()))
                }
            }
        })
        .collect();

    results
        .into_iter()
        .filter(|path| {
            let lower = path.to_lowercase();
            matchers.iter().all(|matches| matches(&lower))
        })
        .collect()
}

/// Pick up to `wanted_count` distinct files below `roots` at random.
pub fn gather_random<R: Rng + ?Sized>(
    roots: &[String],
    wanted_count: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut choices: Vec<String> = Vec::new();
    for root in roots {
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = match entry {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("Warning during scan: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && filetypes::is_random_candidate(entry.path()) {
                choices.push(entry.path().to_string_lossy().into_owned());
            }
        }
    }

    let mut chosen = Vec::with_capacity(wanted_count.min(choices.len()));
    while chosen.len() < wanted_count && !choices.is_empty() {
        let pick = rng.gen_range(0..choices.len());
        chosen.push(choices.swap_remove(pick));
    }
    chosen
}

pub fn absolute_paths(args: &[String]) -> Vec<String> {
    args.iter()
        .map(|arg| {
            std::path::absolute(arg)
                .unwrap_or_else(|_| PathBuf::from(arg))
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}
