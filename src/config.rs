use crate::sacct::DEFAULT_SACCT;
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;

/// Where daily files go when `--save` is given without a path.
pub const DEFAULT_LOGPATH: &str = "/mnt/nfs/slurm/accounting/apel";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// Get SLURM jobs data for the APEL parser.
/// Uncompressed data from yesterday is printed on stdout by default.
pub struct Cli {
    /// Compress (gzip) data
    #[arg(short = 'c', long = "compress", short_alias = 'g', alias = "gzip")]
    pub compress: bool,

    /// Day of logs [default: yesterday]
    #[arg(short = 'd', long = "day", alias = "date", value_name = "YYYY-MM-DD", value_parser = parse_day)]
    pub day: Option<NaiveDate>,

    /// Debug mode
    #[arg(short = 'D', long = "debug")]
    pub debug: bool,

    /// Save data to a daily logfile under PATH
    #[arg(
        short = 's',
        long = "save",
        alias = "save-to-files",
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = DEFAULT_LOGPATH
    )]
    pub save: Option<PathBuf>,

    /// sacct binary to query
    #[arg(long = "sacct", env = "APEL_SACCT", value_name = "PATH", default_value = DEFAULT_SACCT)]
    pub sacct: PathBuf,
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| format!("Bad date specified: {}", value))
}

/// Settings for one run, resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub day: NaiveDate,
    pub compress: bool,
    pub debug: bool,
    pub save_dir: Option<PathBuf>,
    pub sacct: PathBuf,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Self {
        Config {
            day: cli.day.unwrap_or_else(yesterday),
            compress: cli.compress,
            debug: cli.debug,
            save_dir: cli.save,
            sacct: cli.sacct,
        }
    }

    /// Log level selected by `--debug`.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }
}

fn yesterday() -> NaiveDate {
    let today = Local::now().date_naive();
    today.pred_opt().unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Config {
        let argv = std::iter::once("apel_preparer").chain(args.iter().copied());
        Config::from_cli(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.day, Local::now().date_naive().pred_opt().unwrap());
        assert!(!config.compress);
        assert!(!config.debug);
        assert_eq!(config.save_dir, None);
        assert_eq!(config.log_level(), log::LevelFilter::Warn);
    }

    #[rstest]
    #[case(&["-c"])]
    #[case(&["-g"])]
    #[case(&["--compress"])]
    #[case(&["--gzip"])]
    fn test_compress_flags(#[case] args: &[&str]) {
        assert!(parse(args).compress);
    }

    #[rstest]
    #[case(&["-d", "2017-11-16"])]
    #[case(&["--day", "2017-11-16"])]
    #[case(&["--date=2017-11-16"])]
    fn test_day_flags(#[case] args: &[&str]) {
        assert_eq!(parse(args).day, NaiveDate::from_ymd_opt(2017, 11, 16).unwrap());
    }

    #[rstest]
    #[case("2017-02-30")]
    #[case("16-11-2017")]
    #[case("yesterday")]
    fn test_bad_day_is_usage_error(#[case] day: &str) {
        let err = Cli::try_parse_from(["apel_preparer", "-d", day]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains(&format!("Bad date specified: {}", day)));
    }

    #[rstest]
    #[case(&["-s"], Some(DEFAULT_LOGPATH))]
    #[case(&["--save-to-files"], Some(DEFAULT_LOGPATH))]
    #[case(&["--save", "/tmp/apel"], Some("/tmp/apel"))]
    #[case(&["-s", "/tmp/apel", "-c"], Some("/tmp/apel"))]
    #[case(&["-c"], None)]
    fn test_save_flags(#[case] args: &[&str], #[case] expected: Option<&str>) {
        assert_eq!(parse(args).save_dir, expected.map(PathBuf::from));
    }

    #[test]
    fn test_debug_selects_log_level() {
        assert_eq!(parse(&["-D"]).log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_sacct_override() {
        assert_eq!(parse(&["--sacct", "/usr/bin/sacct"]).sacct, PathBuf::from("/usr/bin/sacct"));
    }
}
