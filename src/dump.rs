//! Merge-stream emitter.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use gravmap_engine::Output;

/// Writes one 13-field record per merge, heavier side first:
///
/// ```text
/// seq idA nA latA lonA origLatA origLonA idB nB latB lonB origLatB origLonB
/// ```
///
/// `seq` is 1-based and contiguous over emitted records. Records whose
/// lighter side carries zero weight are suppressed; ingest filtering makes
/// them unreachable, but the guard documents the intent.
pub(crate) fn dump_merges(output: &Output, out_path: &Option<PathBuf>) -> io::Result<()> {
    let mut stream = writer_for(out_path)?;
    let mut seq = 0u64;
    for step in &output.merges {
        if step.absorbed.weight == 0.0 {
            continue;
        }
        seq += 1;
        let a = &step.absorber;
        let b = &step.absorbed;
        writeln!(
            stream,
            "{} {} {} {} {} {} {} {} {} {} {} {} {}",
            seq,
            a.id.index(),
            a.weight,
            a.lat,
            a.lon,
            a.orig_lat,
            a.orig_lon,
            b.id.index(),
            b.weight,
            b.lat,
            b.lon,
            b.orig_lat,
            b.orig_lon,
        )?;
    }
    stream.flush()
}

fn writer_for(out_path: &Option<PathBuf>) -> io::Result<Box<dyn Write>> {
    // write to the requested path, otherwise dump to stdout
    Ok(match out_path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    })
}
