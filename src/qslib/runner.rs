use crate::qslib::{
    ApplyFilters, ChromDepthMap, FeatArgs, FeatureMap, FilterParams, Locus, LocusRecord,
    QscoreFeatures,
};
use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::thread;

type InputType = Option<(usize, Vec<LocusRecord>)>;
type OutputType = (usize, Result<Vec<FeatureRow>>);

/// One output line of the features command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub chrom: String,
    /// one-based
    pub pos: u64,
    pub kind: &'static str,
    pub gt: &'static str,
    pub filter: String,
    /// Non-finite values serialize as null
    pub features: FeatureMap,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sites: usize,
    pub indels: usize,
    pub passing: usize,
}

impl RunSummary {
    fn add(&mut self, row: &FeatureRow) {
        match row.kind {
            "site" => self.sites += 1,
            _ => self.indels += 1,
        }
        if row.filter == "PASS" {
            self.passing += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.sites + self.indels
    }
}

/// Settings for a features run, independent of where input and output live
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub threads: usize,
    pub chunk_size: usize,
    pub apply_filters: bool,
    pub filt: FilterParams,
}

impl From<&FeatArgs> for RunOptions {
    fn from(args: &FeatArgs) -> Self {
        Self {
            threads: args.io.threads,
            chunk_size: args.io.chunk_size,
            apply_filters: args.io.apply_filters,
            filt: args.filt.clone(),
        }
    }
}

/// Filter (optionally) and featurize one locus against its chromosome depth
pub fn featurize(
    mut record: LocusRecord,
    chrom_depth: &ChromDepthMap,
    opts: &RunOptions,
) -> Result<FeatureRow> {
    let depth = chrom_depth
        .get(&record.chrom)
        .ok_or_else(|| anyhow!("no depth for chromosome {}", record.chrom))?;

    if opts.apply_filters {
        let max_depth = Some(depth * opts.filt.max_depth_factor);
        record.locus.apply_filters(&opts.filt, max_depth);
    }

    let features = record.locus.qscore_features(depth);
    let kind = match record.locus {
        Locus::Site(_) => "site",
        Locus::Indel(_) => "indel",
    };
    Ok(FeatureRow {
        pos: record.locus.pos() + 1,
        kind,
        gt: record.locus.get_gt(),
        filter: record.locus.render_filters(),
        features,
        chrom: record.chrom,
    })
}

/// Read JSON-lines loci, featurize them on `opts.threads` workers and write
/// JSON-lines rows in input order.
pub fn process_stream<R: BufRead, W: Write + Send>(
    reader: R,
    out: &mut W,
    chrom_depth: &ChromDepthMap,
    opts: &RunOptions,
) -> Result<RunSummary> {
    let (task_sender, task_receiver): (Sender<InputType>, Receiver<InputType>) = unbounded();
    let (result_sender, result_receiver): (Sender<OutputType>, Receiver<OutputType>) =
        unbounded();

    thread::scope(|scope| -> Result<RunSummary> {
        debug!("spawning {} threads", opts.threads);
        for _ in 0..opts.threads {
            let m_receiver = task_receiver.clone();
            let m_result_sender = result_sender.clone();
            scope.spawn(move || loop {
                match m_receiver.recv() {
                    Ok(None) | Err(_) => break,
                    Ok(Some((idx, chunk))) => {
                        let rows = chunk
                            .into_iter()
                            .map(|rec| featurize(rec, chrom_depth, opts))
                            .collect::<Result<Vec<_>>>();
                        // receiver only hangs up after an error
                        if m_result_sender.send((idx, rows)).is_err() {
                            break;
                        }
                    }
                }
            });
        }
        // reading stops once every worker has hung up
        drop(task_receiver);
        // writer sees the channel close once every worker is done
        drop(result_sender);

        let writer = scope.spawn(move || write_in_order(result_receiver, out));

        let read_result = send_chunks(reader, &task_sender, opts.chunk_size);
        for _ in 0..opts.threads {
            // workers may already be gone after a write error
            let _ = task_sender.send(None);
        }

        let summary = writer
            .join()
            .map_err(|_| anyhow!("writer thread panicked"))??;
        let n_chunks = read_result?;
        debug!("processed {} chunks", n_chunks);
        Ok(summary)
    })
}

/// Parse input into chunks and hand them to the workers
fn send_chunks<R: BufRead>(
    reader: R,
    task_sender: &Sender<InputType>,
    chunk_size: usize,
) -> Result<usize> {
    let mut chunk_count = 0;
    let mut chunk = Vec::with_capacity(chunk_size);
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let rec: LocusRecord = serde_json::from_str(&line)
            .with_context(|| format!("malformed locus on line {}", idx + 1))?;
        chunk.push(rec);
        if chunk.len() >= chunk_size {
            let full = std::mem::replace(&mut chunk, Vec::with_capacity(chunk_size));
            if task_sender.send(Some((chunk_count, full))).is_err() {
                break;
            }
            chunk_count += 1;
        }
    }
    if !chunk.is_empty() && task_sender.send(Some((chunk_count, chunk))).is_ok() {
        chunk_count += 1;
    }
    Ok(chunk_count)
}

/// Workers finish out of order; hold results until their turn
fn write_in_order<W: Write>(
    result_receiver: Receiver<OutputType>,
    out: &mut W,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    let mut pending: BTreeMap<usize, Vec<FeatureRow>> = BTreeMap::new();
    let mut next_chunk = 0;

    for (idx, rows) in result_receiver.iter() {
        pending.insert(idx, rows?);
        while let Some(rows) = pending.remove(&next_chunk) {
            for row in rows {
                serde_json::to_writer(&mut *out, &row)?;
                out.write_all(b"\n")?;
                summary.add(&row);
            }
            next_chunk += 1;
        }
    }
    out.flush()?;
    Ok(summary)
}

/// Entry point of the features command
pub fn features_main(args: &FeatArgs) -> Result<RunSummary> {
    let chrom_depth = ChromDepthMap::from_path(&args.io.chrom_depth)?;
    info!("loaded mean depth of {} chromosomes", chrom_depth.len());

    let reader = BufReader::new(
        File::open(&args.io.input)
            .with_context(|| format!("unable to open {}", args.io.input.display()))?,
    );
    let opts = RunOptions::from(args);

    let summary = match &args.io.out {
        Some(path) => {
            let mut out = BufWriter::with_capacity(
                page_size::get() * 500,
                File::create(path)
                    .with_context(|| format!("unable to create {}", path.display()))?,
            );
            process_stream(reader, &mut out, &chrom_depth, &opts)?
        }
        None => {
            let mut out = BufWriter::new(io::stdout());
            process_stream(reader, &mut out, &chrom_depth, &opts)?
        }
    };
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::Value;

    fn depth() -> ChromDepthMap {
        let mut m = ChromDepthMap::new();
        m.insert("chr1", 60.0).unwrap();
        m.insert("chr2", 40.0).unwrap();
        m
    }

    fn opts(threads: usize, chunk_size: usize) -> RunOptions {
        RunOptions {
            threads,
            chunk_size,
            apply_filters: false,
            filt: FilterParams::default(),
        }
    }

    fn input(n: usize) -> String {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    format!(
                        r#"{{"chrom":"chr1","kind":"site","pos":{},"dgt":{{"ref_gt":"A","genome":{{"snp_qphred":30}}}},"n_used_calls":40,"known_counts":[35,0,5,0],"smod":{{"gq":25,"gqx":20,"max_gt":"AG"}}}}"#,
                        i
                    )
                } else {
                    format!(
                        r#"{{"chrom":"chr2","kind":"indel","pos":{},"isri":{{"depth":20}},"iri":{{"repeat_unit":"A"}}}}"#,
                        i
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn output_keeps_input_order() {
        let text = input(25);
        let mut out = Vec::new();
        let summary = process_stream(text.as_bytes(), &mut out, &depth(), &opts(4, 3)).unwrap();
        assert_eq!(summary.total(), 25);
        assert_eq!(summary.sites, 13);
        assert_eq!(summary.indels, 12);

        let rows: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(rows.len(), 25);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row["pos"], (i + 1) as u64);
        }
        assert_eq!(rows[0]["features"]["QUAL"], 0.5);
        assert_eq!(rows[1]["kind"], "indel");
        assert_eq!(rows[1]["features"]["F_DPI"], 0.5);
        // infinite VFStar has no JSON number
        assert!(rows[0]["features"]["VFStar"].is_null());
    }

    #[test]
    fn filters_applied_when_asked() {
        let text = input(2);
        let mut o = opts(1, 10);
        o.apply_filters = true;
        let mut out = Vec::new();
        let summary = process_stream(text.as_bytes(), &mut out, &depth(), &o).unwrap();
        assert_eq!(summary.passing, 0);
        let text = String::from_utf8(out).unwrap();
        let first: Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["filter"], "LowGQX");
    }

    #[test]
    fn agreeing_indel_passes_low_gqx() {
        let mut o = opts(1, 10);
        o.apply_filters = true;
        let rec: LocusRecord = serde_json::from_str(concat!(
            r#"{"chrom":"chr2","kind":"indel","pos":9,"#,
            r#""dindel":{"max_gt":"het","max_gt_poly":"het","max_gt_qphred":90,"max_gt_poly_qphred":70},"#,
            r#""isri":{"depth":30}}"#
        ))
        .unwrap();
        let row = featurize(rec, &depth(), &o).unwrap();
        assert_eq!(row.filter, "PASS");
        assert_eq!(row.gt, "0/1");
        assert_relative_eq!(row.features["F_GQX"], 70.0 / 40.0);
    }

    #[test]
    fn site_quality_kept_from_input() {
        let mut o = opts(1, 10);
        o.apply_filters = true;
        let rec: LocusRecord = serde_json::from_str(&input(1)).unwrap();
        let row = featurize(rec, &depth(), &o).unwrap();
        // genotype calls would give gqx 0; the record's own gqx stays
        assert_relative_eq!(row.features["F_GQX"], 20.0 / 60.0);
        assert_relative_eq!(row.features["F_GQ"], 25.0 / 60.0);
    }

    #[test]
    fn reading_stops_without_workers() {
        let (task_sender, task_receiver) = unbounded();
        drop(task_receiver);
        let n = send_chunks(input(10).as_bytes(), &task_sender, 2).unwrap();
        assert_eq!(n, 0);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_error_ends_run() {
        let text = input(200);
        let err = process_stream(text.as_bytes(), &mut BrokenPipe, &depth(), &opts(3, 2));
        assert!(err.is_err());
    }

    #[test]
    fn unknown_chromosome_is_an_error() {
        let text = r#"{"chrom":"chrZ","kind":"indel","pos":1}"#;
        let mut out = Vec::new();
        let err = process_stream(text.as_bytes(), &mut out, &depth(), &opts(2, 1)).unwrap_err();
        assert!(err.to_string().contains("chrZ"));
    }

    #[test]
    fn malformed_line_is_an_error() {
        let text = format!("{}\nnot json\n", input(1));
        let mut out = Vec::new();
        let err = process_stream(text.as_bytes(), &mut out, &depth(), &opts(2, 1)).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn empty_input() {
        let mut out = Vec::new();
        let summary = process_stream("".as_bytes(), &mut out, &depth(), &opts(3, 5)).unwrap();
        assert_eq!(summary, RunSummary::default());
        assert!(out.is_empty());
    }
}
