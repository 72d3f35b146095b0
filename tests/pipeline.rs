use clap::Parser;
use qscore::{
    features_main, ChromDepthMap, Cli, Commands, FilterParams, SampleType, VcfHeaderWriter,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(text: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(text.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

#[test]
fn features_command_end_to_end() {
    let depth = write_temp("chr1\t60\nchr7\t42.5\n");
    let loci = write_temp(concat!(
        r#"{"chrom":"chr1","kind":"site","pos":99,"dgt":{"ref_gt":"A","genome":{"snp_qphred":30}},"#,
        r#""n_used_calls":40,"n_unused_calls":5,"known_counts":[35,0,5,0],"#,
        r#""smod":{"gq":25,"gqx":20,"max_gt":"AG","filters":["HighDepth","SiteConflict"]}}"#,
        "\n",
        r#"{"chrom":"chr7","kind":"indel","pos":4,"dindel":{"indel_qphred":85,"max_gt":"het","#,
        r#""max_gt_poly":"hom","max_gt_qphred":40,"max_gt_poly_qphred":35},"#,
        r#""iri":{"ref_repeat_count":3,"indel_repeat_count":4,"repeat_unit":"TG"},"#,
        r#""isri":{"depth":30,"n_q30_ref_reads":10,"n_q30_indel_reads":17,"n_q30_alt_reads":1}}"#,
        "\n"
    ));
    let out = NamedTempFile::new().unwrap();

    let cli = Cli::try_parse_from([
        "qscore",
        "features",
        "--input",
        loci.path().to_str().unwrap(),
        "--chrom-depth",
        depth.path().to_str().unwrap(),
        "--out",
        out.path().to_str().unwrap(),
        "--threads",
        "2",
    ])
    .unwrap();
    let args = match cli.command {
        Commands::Features(args) => args,
        _ => panic!("expected features"),
    };

    let summary = features_main(&args).unwrap();
    assert_eq!(summary.total(), 2);
    assert_eq!(summary.passing, 1);

    let text = std::fs::read_to_string(out.path()).unwrap();
    let rows: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(rows[0]["chrom"], "chr1");
    assert_eq!(rows[0]["pos"], 100);
    assert_eq!(rows[0]["filter"], "SiteConflict;HighDepth");
    let f = &rows[0]["features"];
    assert!((f["F_GQX"].as_f64().unwrap() - 0.333).abs() < 1e-3);
    assert!((f["AD0"].as_f64().unwrap() - 0.583).abs() < 1e-3);
    assert!((f["AD1"].as_f64().unwrap() - 0.083).abs() < 1e-3);

    assert_eq!(rows[1]["filter"], "PASS");
    assert_eq!(rows[1]["gt"], "1/1");
    let f = &rows[1]["features"];
    assert_eq!(f["F_GQX"], 0.0);
    assert_eq!(f["REFREP1"], 3.0);
    assert_eq!(f["RULEN1"], 2.0);
    assert!((f["F_DPI"].as_f64().unwrap() - 30.0 / 42.5).abs() < 1e-12);
}

#[test]
fn header_max_depth_line() {
    let depth = write_temp("chrX\t42.5\n");
    let map = ChromDepthMap::from_path(depth.path()).unwrap();
    let params = FilterParams {
        max_depth_factor: 3.0,
        ..Default::default()
    };
    let samples = [SampleType::Proband];
    let writer = VcfHeaderWriter {
        params: &params,
        chrom_depth: Some(&map),
        samples: &samples,
        cmdline: "qscore header",
    };
    let mut out = Vec::new();
    writer.write(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\n##MaxDepth_chrX=127.50\n"));
    assert!(text.ends_with("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tPROBAND\n"));
}
