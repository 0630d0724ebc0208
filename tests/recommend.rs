use std::io::Write;

use tunematch::data::features::standardize;
use tunematch::data::filter::apply_filter;
use tunematch::data::similarity::rank_all;
use tunematch::{ErrorKind, FilterCriteria, LoadOptions, RecommendError, Session, load_file};

const HEADER: &str = "title;artist;top genre;year;bpm;energy;danceability ;dB;liveness;valence;duration;acousticness;speechiness ;popularity";

fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn session(rows: &[&str]) -> Session {
    let file = write_csv(rows);
    let dataset = load_file(file.path(), &LoadOptions::default()).unwrap();
    Session::new(dataset, 10)
}

fn titles(recs: &[tunematch::Recommendation]) -> Vec<&str> {
    recs.iter().map(|r| r.track.title()).collect()
}

#[test]
fn identical_neighbour_outranks_energy_outlier() {
    // Same vectors except B's energy: after standardization C points
    // exactly where A does and B points the opposite way.
    let mut s = session(&[
        "A;x;pop;2012;120;50;60;-5;10;50;200;10;5;70",
        "B;y;pop;2012;120;90;60;-5;10;50;200;10;5;70",
        "C;z;pop;2012;120;50;60;-5;10;50;200;10;5;70",
    ]);
    let out = s.recommend("A").unwrap();
    assert_eq!(titles(&out), vec!["C", "B"]);
    assert!((out[0].score - 1.0).abs() < 1e-12);
    assert!((out[1].score + 1.0).abs() < 1e-12);
}

#[test]
fn filter_that_removes_every_row() {
    let mut s = session(&[
        "A;x;pop;2012;120;50;60;-5;10;50;200;10;5;70",
        "B;y;pop;2013;110;70;65;-6;12;40;210;20;6;60",
    ]);
    s.set_filters(FilterCriteria {
        year: Some(2015),
        genre: None,
    });
    let err = s.recommend("A").unwrap_err();
    assert_eq!(err, RecommendError::EmptySelection);
    assert_eq!(err.kind(), ErrorKind::EmptySelection);
}

#[test]
fn missing_danceability_is_named() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "title;artist;top genre;year;bpm;energy;dB;liveness;valence;duration;acousticness;speechiness;popularity"
    )
    .unwrap();
    writeln!(file, "A;x;pop;2012;120;50;-5;10;50;200;10;5;70").unwrap();
    file.flush().unwrap();

    let dataset = load_file(file.path(), &LoadOptions::default()).unwrap();
    let err = Session::new(dataset, 10).recommend("A").unwrap_err();
    assert_eq!(err, RecommendError::MissingFeatures(vec!["danceability".into()]));
    assert!(err.to_string().ends_with("danceability"));
}

#[test]
fn duplicate_titles() {
    let mut s = session(&[
        "Intro;w;pop;2012;90;30;40;-9;30;20;260;60;9;40",
        "Echo;x;pop;2012;120;50;60;-5;10;50;200;10;5;70",
        "Near;y;pop;2012;119;52;61;-5;11;49;201;11;5;69",
        "Echo;z;pop;2012;95;35;45;-8;28;25;250;55;8;45",
    ]);
    let out = s.recommend("Echo").unwrap();
    assert_eq!(titles(&out), vec!["Near", "Intro"]);

    // The first Echo anchors the ranking: it scores itself 1.0.
    let matrix = standardize(&s.filtered).unwrap();
    let ranked = rank_all(&s.filtered, &matrix, 1).unwrap();
    assert_eq!(ranked[0].track.row, 1);
    assert!((ranked[0].score - 1.0).abs() < 1e-12);
}

#[test]
fn statistics_come_from_the_filtered_subset() {
    let s = session(&[
        "A;x;pop;2012;100;50;60;-5;10;50;200;10;5;70",
        "B;y;pop;2012;140;70;60;-5;10;50;200;10;5;60",
        "C;z;rock;2013;300;10;10;-20;90;5;400;90;40;5",
    ]);
    let subset = apply_filter(
        &s.dataset,
        &FilterCriteria {
            year: Some(2012),
            genre: None,
        },
    );
    let matrix = standardize(&subset).unwrap();
    assert_eq!(matrix.scaler.mean[0], 120.0);
    assert_eq!(matrix.scaler.std[0], 20.0);
    assert_eq!(matrix.rows[0][0], -1.0);
    assert_eq!(matrix.rows[1][0], 1.0);
}

#[test]
fn result_length_is_capped() {
    let rows: Vec<String> = (0..14)
        .map(|i| format!("T{i};x;pop;2012;{};{};60;-5;10;50;200;10;5;70", 100 + i, 50 + 2 * i))
        .collect();
    let borrowed: Vec<&str> = rows.iter().map(String::as_str).collect();
    let mut s = session(&borrowed);
    assert_eq!(s.recommend("T3").unwrap().len(), 10);

    s.set_filters(FilterCriteria {
        year: Some(2012),
        genre: Some("pop".into()),
    });
    s.top_n = 50;
    assert_eq!(s.recommend("T3").unwrap().len(), 13);
}

#[test]
fn single_track_yields_empty_result() {
    let mut s = session(&["Solo;x;pop;2012;120;50;60;-5;10;50;200;10;5;70"]);
    assert!(s.recommend("Solo").unwrap().is_empty());
}

#[test]
fn title_removed_by_the_filter_is_not_found() {
    let mut s = session(&[
        "A;x;pop;2012;120;50;60;-5;10;50;200;10;5;70",
        "B;y;pop;2013;110;70;65;-6;12;40;210;20;6;60",
        "C;z;pop;2013;100;60;55;-7;14;45;220;15;4;65",
    ]);
    s.set_filters(FilterCriteria {
        year: Some(2013),
        genre: None,
    });
    let err = s.recommend("A").unwrap_err();
    assert_eq!(err, RecommendError::NotFound("A".into()));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn untitled_row_is_never_selected() {
    let mut s = session(&[
        "A;x;pop;2012;120;50;60;-5;10;50;200;10;5;70",
        ";y;pop;2012;110;70;65;-6;12;40;210;20;6;60",
    ]);
    let err = s.recommend("").unwrap_err();
    assert_eq!(err, RecommendError::NotFound(String::new()));

    let out = s.recommend("A").unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].track.row, 1);
}
