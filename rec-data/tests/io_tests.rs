use rec_data::triplets::{read_rating_triplets, write_rating_triplets};

#[test]
fn triplet_file_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("ratings.tsv");
    let file = file.to_str().unwrap();

    let triplets = vec![(101u64, 5u64, 3.0), (101, 7, 1.0), (202, 5, 2.0)];
    write_rating_triplets(&triplets, file)?;

    let read_back = read_rating_triplets(file)?;
    assert_eq!(read_back, triplets);
    Ok(())
}

#[test]
fn triplet_file_round_trip_gzipped() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("ratings.tsv.gz");
    let file = file.to_str().unwrap();

    let triplets: Vec<(u64, u64, f64)> =
        (0..100).map(|t| (t, t % 11, (t % 4 + 1) as f64)).collect();
    write_rating_triplets(&triplets, file)?;

    let read_back = read_rating_triplets(file)?;
    assert_eq!(read_back, triplets);
    Ok(())
}

#[test]
fn comments_and_blank_lines_are_skipped() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("ratings.txt");
    std::fs::write(
        &file,
        "# user item value\n%%MatrixMarket-ish comment\n\n1 2 3.5\n4 5 1\n",
    )?;

    let read_back = read_rating_triplets(file.to_str().unwrap())?;
    assert_eq!(read_back, vec![(1, 2, 3.5), (4, 5, 1.0)]);
    Ok(())
}

#[test]
fn malformed_lines_are_reported() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("bad.txt");
    std::fs::write(&file, "1 2 3.0\nnot a triplet\n")?;

    assert!(read_rating_triplets(file.to_str().unwrap()).is_err());
    Ok(())
}
