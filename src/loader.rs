//! Reads the line-oriented facility description into a [`Problem`].
//!
//! Each non-blank line starts with a one-letter code followed by
//! whitespace-separated tokens:
//!
//! ```text
//! R lobby gallery vault
//! C lobby,gallery gallery,vault
//! S s1:gallery:0.9:0.1 s2:vault:0.8:0.05
//! P 0.7
//! M s1:T
//! M s1:F s2:T
//! ```
//!
//! Every `M` line is one time step, in order.
use crate::error::{HazardError, Result};
use crate::model::{Problem, Reading, Sensor};
use tracing::warn;

/// Truthy spellings accepted for a reading value, compared case-insensitively.
const TRUE_WORDS: [&str; 5] = ["yes", "y", "true", "t", "1"];

/// Any other spelling reads as `false`.
pub fn parse_flag(token: &str) -> bool {
    let lower = token.to_lowercase();
    TRUE_WORDS.contains(&lower.as_str())
}

pub fn parse_problem(text: &str) -> Result<Problem> {
    let mut problem = Problem::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let mut tokens = raw.split_whitespace();
        let Some(code) = tokens.next() else { continue };
        let args: Vec<&str> = tokens.collect();

        match code {
            "R" => problem.locations.extend(args.iter().map(|s| s.to_string())),
            "C" => {
                for arg in args {
                    let (a, b) = split_pair(arg, ',', line, "connection")?;
                    problem.connections.push((a.to_string(), b.to_string()));
                }
            }
            "S" => {
                for arg in args {
                    let sensor = parse_sensor(arg, line)?;
                    // Redeclaring a sensor replaces it in place.
                    match problem.sensors.iter_mut().find(|s| s.name == sensor.name) {
                        Some(existing) => *existing = sensor,
                        None => problem.sensors.push(sensor),
                    }
                }
            }
            "P" => {
                let value = args.first().ok_or_else(|| HazardError::Parse {
                    line,
                    msg: "propagation line has no value".into(),
                })?;
                problem.propagation = parse_float(value, line, "propagation")?;
            }
            "M" => {
                let round = args
                    .iter()
                    .map(|arg| {
                        split_pair(arg, ':', line, "reading")
                            .map(|(sensor, value)| Reading { sensor: sensor.to_string(), value: parse_flag(value) })
                    })
                    .collect::<Result<Vec<_>>>()?;
                problem.readings.push(round);
            }
            _ => warn!(line, content = raw.trim(), "Unrecognized line"),
        }
    }

    Ok(problem)
}

fn split_pair<'t>(token: &'t str, sep: char, line: usize, what: &str) -> Result<(&'t str, &'t str)> {
    match token.split(sep).collect::<Vec<_>>()[..] {
        [a, b] if !a.is_empty() && !b.is_empty() => Ok((a, b)),
        _ => Err(HazardError::Parse { line, msg: format!("malformed {} '{}'", what, token) }),
    }
}

fn parse_sensor(token: &str, line: usize) -> Result<Sensor> {
    let fields: Vec<&str> = token.split(':').collect();
    let [name, location, tpr, fpr] = fields[..] else {
        return Err(HazardError::Parse {
            line,
            msg: format!("sensor '{}' should read id:location:tpr:fpr", token),
        });
    };
    Ok(Sensor {
        name: name.to_string(),
        location: location.to_string(),
        tpr: parse_float(tpr, line, "tpr")?,
        fpr: parse_float(fpr, line, "fpr")?,
    })
}

fn parse_float(token: &str, line: usize, what: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|e| HazardError::Parse { line, msg: format!("bad {} '{}': {}", what, token, e) })
}
