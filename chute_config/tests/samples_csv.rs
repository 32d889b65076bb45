use std::fs::File;
use std::io::Write;

use chute_config::{SampleRow, load_samples_csv, parse_samples_csv};
use rstest::rstest;
use tempfile::tempdir;

const HEADER: &str = "time_s,pitch_deg,altitude_m,vertical_velocity_mps,vertical_accel_mps2";

#[rstest]
fn parses_well_formed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("samples.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "{HEADER}").unwrap();
    writeln!(f, "0.0,0.5,1000.0,0.0,-9.8").unwrap();
    writeln!(f, "0.5,-2.0,998.8,-4.9,-9.7").unwrap();
    drop(f);

    let rows = load_samples_csv(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[1],
        SampleRow {
            time_s: 0.5,
            pitch_deg: -2.0,
            altitude_m: 998.8,
            vertical_velocity_mps: -4.9,
            vertical_accel_mps2: -9.7,
        }
    );
    let s: chute_traits::Sample = rows[1].into();
    assert_eq!(s.vertical_velocity_mps, -4.9);
}

#[rstest]
fn rejects_wrong_headers() {
    let csv = "t,pitch,alt,v,a\n0,0,0,0,0\n";
    let err = parse_samples_csv(csv.as_bytes()).unwrap_err();
    assert!(format!("{err}").contains("sample CSV must have headers"));
}

#[rstest]
#[case("0.0,0,0,0,0\n0.0,0,0,0,0\n", "strictly increasing")]
#[case("1.0,0,0,0,0\n0.5,0,0,0,0\n", "strictly increasing")]
#[case("0.0,0,abc,0,0\n", "invalid CSV row 2")]
#[case("", "no rows")]
fn rejects_bad_rows(#[case] body: &str, #[case] needle: &str) {
    let csv = format!("{HEADER}\n{body}");
    let err = parse_samples_csv(csv.as_bytes()).unwrap_err();
    assert!(
        format!("{err}").contains(needle),
        "error `{err}` does not mention `{needle}`"
    );
}

#[rstest]
fn non_finite_measurements_pass_through() {
    // Only the timestamp is checked here; the engine degrades on bad values.
    let csv = format!("{HEADER}\n0.0,NaN,100.0,0.0,0.0\n");
    let rows = parse_samples_csv(csv.as_bytes()).unwrap();
    assert!(rows[0].pitch_deg.is_nan());
}

#[rstest]
fn missing_file_is_reported_with_path() {
    let dir = tempdir().unwrap();
    let err = load_samples_csv(&dir.path().join("nope.csv")).unwrap_err();
    assert!(format!("{err}").contains("open sample CSV"));
}
