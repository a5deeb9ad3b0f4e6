// src/errors.rs
use crate::models::FIELD_COUNT;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the accounting preparer.
#[derive(Error, Debug)]
pub enum PreparerError {
    #[error("Permission error")]
    Permission,

    #[error("Invalid user")]
    InvalidUser,

    #[error(
        "{program}() error\nsubprocess returned data: {stdout}\n{stderr}\nException: {source}\nError no. 1"
    )]
    Execution {
        program: String,
        stdout: String,
        stderr: String,
        source: std::io::Error,
    },

    #[error("Malformed record on line {line}: expected {} fields, found {fields}", FIELD_COUNT)]
    MalformedRecord { line: usize, fields: usize },

    #[error("Unable to write data to logfile: {}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PreparerError {
    /// Process exit status reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            PreparerError::InvalidUser => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io;

    #[rstest]
    #[case(PreparerError::Permission, 1)]
    #[case(PreparerError::InvalidUser, 2)]
    #[case(PreparerError::MalformedRecord { line: 3, fields: 2 }, 1)]
    #[case(
        PreparerError::Write {
            path: PathBuf::from("/nonexistent/20171116"),
            source: io::Error::from(io::ErrorKind::NotFound),
        },
        1
    )]
    fn test_exit_codes(#[case] err: PreparerError, #[case] expected: i32) {
        assert_eq!(err.exit_code(), expected);
    }

    #[test]
    fn test_malformed_record_message() {
        let err = PreparerError::MalformedRecord { line: 4, fields: 1 };
        assert_eq!(
            err.to_string(),
            format!("Malformed record on line 4: expected {} fields, found 1", FIELD_COUNT)
        );
    }

    #[test]
    fn test_execution_report_includes_captured_output() {
        let err = PreparerError::Execution {
            program: "/usr/bin/sacct".to_string(),
            stdout: "partial".to_string(),
            stderr: "sacct: error: boom".to_string(),
            source: io::Error::other("exit status: 1"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("/usr/bin/sacct() error"));
        assert!(msg.contains("subprocess returned data: partial\nsacct: error: boom"));
        assert!(msg.contains("Exception: exit status: 1"));
        assert!(msg.ends_with("Error no. 1"));
    }
}
