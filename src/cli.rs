//! Command-line front end.

use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use gravmap_engine::{Algorithm, Output, Tunables};
use log::debug;

use crate::dump;
use crate::ingest;

const USAGE: &str = "\
usage: gravmap [options] <input.csv>

Clusters weighted geographic points into a complete merge tree and writes
one record per merge:

    seq idA nA latA lonA origLatA origLonA idB nB latB lonB origLatB origLonB

Options:
    -a, --algorithm <name>   merge loop variant: Cached (default), Exhaustive,
                             or Compare (runs both and cross-checks them)
    -t, --threshold <n>      cache refreshed potentials once a merged region
                             exceeds n members [default: 100]
    -c, --cap <n>            stop after n merge records [default: unlimited]
    -o, --output <path>      write the merge stream to <path> instead of stdout
        --skip-timing        do not print the elapsed wall-clock time
    -v, --verbose            print run statistics
    -h, --help               show this message
";

#[derive(Debug)]
pub struct Options {
    algorithm: Algorithm,
    cache_threshold: usize,
    max_records: Option<usize>,
    output: Option<PathBuf>,
    skip_timing: bool,
    verbose: bool,
    input: PathBuf,
}

impl Options {
    pub fn from_env() -> Result<Options, Box<dyn Error>> {
        let mut args = pico_args::Arguments::from_env();

        if args.contains(["-h", "--help"]) {
            print!("{}", USAGE);
            process::exit(0);
        }

        let options = Options {
            algorithm: args
                .opt_value_from_str(["-a", "--algorithm"])?
                .unwrap_or(Algorithm::Cached),
            cache_threshold: args
                .opt_value_from_str(["-t", "--threshold"])?
                .unwrap_or_else(|| Tunables::default().cache_threshold),
            max_records: args.opt_value_from_str(["-c", "--cap"])?,
            output: args.opt_value_from_str(["-o", "--output"])?,
            skip_timing: args.contains("--skip-timing"),
            verbose: args.contains(["-v", "--verbose"]),
            input: {
                let mut free = args.finish();
                if free.len() != 1 {
                    return Err("expected exactly one input file; see --help".into());
                }
                PathBuf::from(free.remove(0))
            },
        };
        Ok(options)
    }
}

pub fn main(options: Options) -> Result<(), Box<dyn Error>> {
    let points = ingest::load_points(&options.input)?;
    let point_count = points.len();

    let tunables = Tunables {
        cache_threshold: options.cache_threshold,
        max_records: options.max_records.unwrap_or(usize::MAX),
    };
    debug!(
        "clustering {} points with {:?}, threshold {}",
        point_count, options.algorithm, tunables.cache_threshold
    );

    let (duration, result) = timed(|| Output::compute(points, options.algorithm, &tunables));
    let output = result?;

    dump::dump_merges(&output, &options.output)?;

    if options.verbose {
        println!(
            "{} points, {} merges emitted",
            point_count,
            output.merges.len()
        );
    }
    if !options.skip_timing {
        let seconds: f64 = duration.as_secs() as f64;
        let millis: f64 = f64::from(duration.subsec_nanos()) * 0.000_000_001_f64;
        println!("Time: {:0.3}s", seconds + millis);
    }
    Ok(())
}

fn timed<T>(op: impl FnOnce() -> T) -> (Duration, T) {
    let start = Instant::now();
    let output = op();
    let duration = start.elapsed();
    (duration, output)
}
