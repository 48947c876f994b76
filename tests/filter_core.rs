use contignado::assembly::{Assembly, Contig};
use contignado::filter::ContigFilter;

fn contig(id: &str, length: usize) -> Contig {
    Contig {
        id: id.to_string(),
        description: None,
        sequence: vec![b'a'; length],
    }
}

fn assembly_with_lengths(lengths: &[usize]) -> Assembly {
    let contigs = lengths
        .iter()
        .enumerate()
        .map(|(i, &length)| contig(&format!("contig_{}", i), length))
        .collect();
    Assembly::new("lengths", contigs)
}

#[test]
fn count_satisfies_invariant() {
    let assembly = assembly_with_lengths(&[1, 4, 7, 10, 13, 16, 19, 22, 25]);

    for threshold in [0, 5, 10, 26] {
        let filter = ContigFilter::new(Some(threshold), None);
        let counts = filter.count(&assembly.summaries());
        assert_eq!(
            counts.n_initial_contigs,
            counts.n_contigs_removed + counts.n_contigs_remaining
        );
        let expected = assembly
            .contigs()
            .iter()
            .filter(|c| c.len() >= threshold)
            .count() as u64;
        assert_eq!(counts.n_contigs_remaining, expected);
    }
}

#[test]
fn bounds_are_inclusive() {
    let filter = ContigFilter::new(Some(10), Some(12));

    assert!(!filter.accepts_length(9));
    assert!(filter.accepts_length(10));
    assert!(filter.accepts_length(11));
    assert!(filter.accepts_length(12));
    assert!(!filter.accepts_length(13));
}

#[test]
fn partition_preserves_source_order() {
    let assembly = assembly_with_lengths(&[12, 3, 20, 5, 15]);
    let filter = ContigFilter::new(Some(10), Some(100));

    let (filtered, counts) = filter.partition(&assembly, "lengths.filtered");

    assert_eq!(filtered.name(), "lengths.filtered");
    assert_eq!(counts.n_initial_contigs, 5);
    assert_eq!(counts.n_contigs_removed, 2);
    assert_eq!(counts.n_contigs_remaining, 3);

    let ids: Vec<&str> = filtered.contigs().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["contig_0", "contig_2", "contig_4"]);
}

#[test]
fn stats_track_failure_reasons() {
    let assembly = assembly_with_lengths(&[5, 10, 50]);
    let filter = ContigFilter::new(Some(8), Some(20));

    filter.count(&assembly.summaries());
    let stats = filter.stats();

    assert_eq!(stats.n_total(), 3);
    assert_eq!(stats.n_failed(), 2);
}

#[test]
fn fasta_round_trips_through_assembly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.fasta");

    let assembly = Assembly::new(
        "roundtrip",
        vec![
            Contig {
                id: "seq1".to_string(),
                description: Some("first contig".to_string()),
                sequence: b"agcttttcat".to_vec(),
            },
            contig("seq2", 5),
        ],
    );
    assembly.to_fasta(&path).unwrap();

    let reloaded = Assembly::from_fasta("roundtrip", &path).unwrap();
    assert_eq!(reloaded.n_contigs(), 2);
    assert_eq!(reloaded.contigs()[0].id, "seq1");
    assert_eq!(
        reloaded.contigs()[0].description.as_deref(),
        Some("first contig")
    );
    assert_eq!(reloaded.contigs()[0].sequence, b"agcttttcat".to_vec());
    assert_eq!(reloaded.contigs()[1].len(), 5);
}
