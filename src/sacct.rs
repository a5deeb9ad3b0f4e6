use crate::errors::PreparerError;
use crate::models::FIELDS;
use chrono::NaiveDate;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Default location of the SLURM client tools on the cluster.
pub const DEFAULT_SACCT: &str = "/mnt/nfs/slurm/releases/production/bin/sacct";

/// sacct's error when a non-operator asks for other users' jobs.
const PERMISSION_MARKER: &str = "rc = Invalid user";
const INVALID_USER_MARKER: &str = "Invalid user";

/// Anything that can hand back one day of raw accounting lines.
pub trait AccountingSource {
    fn fetch_day(&self, day: NaiveDate) -> Result<Vec<String>, PreparerError>;
}

/// Queries the SLURM accounting database through the `sacct` binary.
#[derive(Debug, Clone)]
pub struct Sacct {
    program: PathBuf,
}

impl Sacct {
    pub fn new<P: AsRef<Path>>(program: P) -> Self {
        Sacct {
            program: program.as_ref().to_path_buf(),
        }
    }

    /// Arguments selecting all finished jobs of `day`.
    pub fn day_args(day: NaiveDate) -> Vec<String> {
        let day = day.format("%Y-%m-%d");
        vec![
            "--parsable2".to_string(),
            "--noheader".to_string(),
            "--duplicates".to_string(),
            "--state=COMPLETED,TIMEOUT".to_string(),
            "-S".to_string(),
            format!("{}T00:00:00", day),
            "-E".to_string(),
            format!("{}T23:59:59", day),
            format!("--format={}", FIELDS.join(",")),
        ]
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl AccountingSource for Sacct {
    fn fetch_day(&self, day: NaiveDate) -> Result<Vec<String>, PreparerError> {
        let args = Self::day_args(day);
        log::debug!("{} {}", self.program_name(), args.join(" "));

        let output = Command::new(&self.program).args(&args).output().map_err(|e| {
            PreparerError::Execution {
                program: self.program_name(),
                stdout: String::new(),
                stderr: String::new(),
                source: e,
            }
        })?;

        let lines = classify_output(&self.program_name(), output)?;
        log::debug!("sacct returned {} lines", lines.len());
        Ok(lines)
    }
}

/// Turns a finished sacct run into its output lines or a tagged error.
///
/// Output is decoded lossily: bytes that are not UTF-8 become U+FFFD, so a
/// job with an oddly encoded name is still reported.
fn classify_output(program: &str, output: Output) -> Result<Vec<String>, PreparerError> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if stderr.contains(PERMISSION_MARKER) {
        return Err(PreparerError::Permission);
    }
    if stderr.contains(INVALID_USER_MARKER) {
        return Err(PreparerError::InvalidUser);
    }
    if !output.status.success() {
        return Err(PreparerError::Execution {
            program: program.to_string(),
            stdout: stdout.into_owned(),
            stderr: stderr.into_owned(),
            source: io::Error::other(output.status.to_string()),
        });
    }

    Ok(stdout.lines().map(str::to_string).collect())
}
