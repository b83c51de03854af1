mod error;
mod fluctuation;
mod options;
mod output;
mod table;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{ArgAction, Parser, ValueHint};
use indicatif::{ProgressBar, ProgressStyle};
use multi_tau::{correlate_columns, evaluate_all};

use crate::error::AppError;
use crate::options::{parse_shape, parse_timestep, ColumnSet};

/// Multi-tau autocorrelation of every column of a whitespace-delimited table.
#[derive(Parser, Debug)]
#[command(name = "correlator-io", version, about)]
struct Cli {
    /// Input table, one sample per row
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output file: time lag followed by one value per correlated column
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Sampling interval used to scale lags into time
    #[arg(short, long, default_value_t = 1.0, value_parser = parse_timestep)]
    timestep: f64,

    /// Columns whose mean is removed before correlating, e.g. `1,3-5`
    #[arg(short, long)]
    fluct: Option<String>,

    /// Columns that are not correlated (0 is usually time); empty skips nothing
    #[arg(short, long, default_value = "0")]
    skip: String,

    /// Number of levels, points per level, values averaged per carry
    #[arg(short, long, default_value = "32,16,2")]
    correlator: String,

    /// Subtract the squared mean of each column from its correlation
    #[arg(short, long)]
    normalize: bool,

    /// Process columns on the current thread only
    #[arg(long)]
    sequential: bool,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .target(env_logger::Target::Stderr)
        .init();
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}]",
    ) {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_message("columns");
    pb
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let total = Instant::now();

    let skip = ColumnSet::try_from(cli.skip.as_str())?;
    let fluct = match &cli.fluct {
        Some(s) => ColumnSet::try_from(s.as_str())?,
        None => ColumnSet::default(),
    };
    let config = parse_shape(&cli.correlator)?;

    let t = Instant::now();
    let table = table::read_table(&cli.input)?;
    let (n_rows, n_cols) = (table.n_rows(), table.n_cols());
    log::info!(
        "Reading file: {:.3} s ({n_rows} rows, {n_cols} columns)",
        t.elapsed().as_secs_f64()
    );

    fluct.check_bounds("fluctuation", n_cols)?;
    for c in fluct.iter().filter(|&c| skip.contains(c)) {
        log::warn!("column {c} is skipped, ignoring its mean removal");
    }
    let mut columns = table.select(&skip)?;
    log::debug!("skipping {} columns, correlating {}", skip.len(), columns.len());

    if !fluct.is_empty() {
        let t = Instant::now();
        let n_fluct = fluctuation::remove_means(&mut columns, &fluct);
        log::info!(
            "Removing means from {n_fluct} columns: {:.3} s",
            t.elapsed().as_secs_f64()
        );
    }

    let t = Instant::now();
    let pb = progress_bar(columns.len());
    let correlators = correlate_columns(&columns, &config, cli.sequential, &|| pb.inc(1))?;
    pb.finish_and_clear();
    log::info!("Populating correlators: {:.3} s", t.elapsed().as_secs_f64());

    let t = Instant::now();
    let results = evaluate_all(&correlators, cli.normalize, cli.sequential);
    log::info!("Evaluating correlators: {:.3} s", t.elapsed().as_secs_f64());

    let t = Instant::now();
    output::write_correlations(&cli.output, cli.timestep, &results)?;
    log::info!(
        "Writing {} ({} lags): {:.3} s",
        cli.output.display(),
        results.first().map_or(0, |r| r.len()),
        t.elapsed().as_secs_f64()
    );

    log::info!("Total time: {:.3} s", total.elapsed().as_secs_f64());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::fs;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("correlator-io").chain(args.iter().copied())).unwrap()
    }

    fn read_rows(path: &std::path::Path) -> Vec<Vec<f64>> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| l.split_whitespace().map(|t| t.parse().unwrap()).collect())
            .collect()
    }

    #[test]
    fn test_defaults() {
        let c = cli(&["-i", "in.dat", "-o", "out.dat"]);
        assert_eq!(c.timestep, 1.0);
        assert_eq!(c.skip, "0");
        assert_eq!(c.correlator, "32,16,2");
        assert!(c.fluct.is_none());
        assert!(!c.normalize);
        assert_eq!(c.verbose, 0);
    }

    #[test]
    fn test_rejects_bad_timestep() {
        let res = Cli::try_parse_from(["correlator-io", "-i", "a", "-o", "b", "-t", "-1"]);
        assert!(res.is_err());
        let res = Cli::try_parse_from(["correlator-io", "-i", "a", "-o", "b", "-t", "0"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_end_to_end() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.dat");
        let output = dir.path().join("out.dat");

        let mut text = String::from("# t  a  b  c\n");
        for i in 0..8 {
            let b = if i % 2 == 0 { 1.0 } else { 3.0 };
            text.push_str(&format!("{} 1.0 {b} {}\n", i as f64 * 0.1, 10.0 + b));
        }
        fs::write(&input, text).unwrap();

        let c = cli(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-t",
            "0.1",
            "-c",
            "4,4,2",
            "-f",
            "3",
            "--sequential",
        ]);
        run(&c).unwrap();

        let rows = read_rows(&output);
        // Level 0 lags 0..=3, level 1 lags 2 and 3 (labels 4 and 6).
        let lags: Vec<f64> = rows.iter().map(|r| r[0]).collect();
        let expected = [0.0, 0.1, 0.2, 0.3, 0.4, 0.6];
        assert_eq!(lags.len(), expected.len());
        for (got, want) in lags.iter().zip(expected) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-12);
        }

        for row in &rows {
            assert_eq!(row.len(), 4);
            assert_abs_diff_eq!(row[1], 1.0, epsilon = 1e-12);
        }
        // Alternating 1, 3: <x^2> = 5, <x(t)x(t+1)> = 3.
        assert_abs_diff_eq!(rows[0][2], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rows[1][2], 3.0, epsilon = 1e-12);
        // Column 3 had its mean (12) removed: alternating -1, 1.
        assert_abs_diff_eq!(rows[0][3], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rows[1][3], -1.0, epsilon = 1e-12);
        // Block means of column 3 are all zero.
        assert_abs_diff_eq!(rows[4][3], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_flag() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.dat");
        let output = dir.path().join("out.dat");
        fs::write(&input, "1\n3\n1\n3\n").unwrap();

        let c = cli(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-s",
            "",
            "-c",
            "2,4,2",
            "-n",
        ]);
        run(&c).unwrap();

        let rows = read_rows(&output);
        assert_eq!(rows.len(), 4);
        assert_abs_diff_eq!(rows[0][1], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rows[1][1], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_exit_codes() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.dat");
        let output = dir.path().join("out.dat");
        fs::write(&input, "0 1\n1 2\n").unwrap();
        let (i, o) = (input.to_str().unwrap(), output.to_str().unwrap());

        let err = run(&cli(&["-i", i, "-o", o, "-s", "2-1"])).unwrap_err();
        assert_eq!(err.exit_code(), error::RANGE_STRING_ERROR);

        let err = run(&cli(&["-i", i, "-o", o, "-c", "4,6,4"])).unwrap_err();
        assert!(matches!(err, AppError::Correlator(_)));
        assert_eq!(err.exit_code(), error::COMMAND_LINE_ERROR);

        let err = run(&cli(&["-i", i, "-o", o, "-f", "5"])).unwrap_err();
        assert_eq!(err.exit_code(), error::COMMAND_LINE_ERROR);

        let missing = dir.path().join("missing.dat");
        let err = run(&cli(&["-i", missing.to_str().unwrap(), "-o", o])).unwrap_err();
        assert_eq!(err.exit_code(), error::FILE_ERROR);
        assert!(!output.exists());
    }
}
