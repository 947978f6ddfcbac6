use crate::model::Resolution;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Per-location belief table in declaration order, the winner marked with `*`.
pub fn format_beliefs(resolution: &Resolution) -> String {
    let width = resolution.beliefs.iter().map(|b| b.location.len()).max().unwrap_or(0).max("LOCATION".len());
    let mut out = String::new();
    let _ = writeln!(out, "HAZARD BELIEFS at step {}:", resolution.step);
    let _ = writeln!(out, "  {:<width$}  P(hazard)", "LOCATION", width = width);
    let _ = writeln!(out, "  {}", "-".repeat(width + 11));
    for belief in &resolution.beliefs {
        let marker = if belief.location == resolution.location { " *" } else { "" };
        let _ = writeln!(
            out,
            "  {:<width$}  {:.6}{}",
            belief.location,
            belief.probability,
            marker,
            width = width
        );
    }
    out
}

/// Where the solution for `input` is written: the input's file name inside `output_dir`.
pub fn solution_path(output_dir: &Path, input: &Path) -> io::Result<PathBuf> {
    let name = input.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("{} has no file name", input.display()))
    })?;
    Ok(output_dir.join(name))
}

/// Writes `<location> <probability>` and a newline, creating `output_dir` if needed.
pub fn write_solution(output_dir: &Path, input: &Path, resolution: &Resolution) -> io::Result<PathBuf> {
    let path = solution_path(output_dir, input)?;
    fs::create_dir_all(output_dir)?;
    fs::write(&path, format!("{}\n", resolution))?;
    Ok(path)
}
