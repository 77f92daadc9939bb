mod common;

use assert_approx_eq::assert_approx_eq;
use common::{
    write_text,
    DemoMatrixBuilder,
};
use heisenberg::data_structs::typedef::DEMOGRAPHIC_PROBE_START;
use heisenberg::io::compression::open_reader;
use heisenberg::io::metadata::{
    load_sra_demographics,
    load_tcga_demographics,
};
use heisenberg::prelude::*;
use heisenberg::tools::{
    filter_by_demographics,
    match_by_demographics,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const NORMALS: &str = "case\tsample\tbiospecimen\ttissue\tcg02\tcg01\n\
                       n1\tgsm1\tblood\tnormal blood\t0.2\t0.4\n\
                       n2\tgsm2\tblood\tnormal blood\t0.6\tNA\n\
                       n3\tgsm3\tblood\tnormal blood\t0.1\t0.1\n";

const TUMORS: &str = "case\tsample\tbiospecimen\ttissue\tcg01\tcg02\n\
                      t1\tt1-01A\ttumor\tPrimary Tumor\t0.9\t0.8\n\
                      t2\tt2-06A\ttumor\tMetastatic\t0.9\t0.8\n";

const SRA: &str = "project\tsample\tage\tage_group\tgender\n\
                   p1\tgsm1\t42\t35-54\tfemale\n\
                   p1\tgsm2\t29\t0-34\tfemale\n\
                   p1\tgsm3\t61\t55-64\tmale\n";

fn clinical_row(
    case: &str,
    gender: &str,
    days: u32,
) -> String {
    let mut row = vec![String::new(); 13];
    row[0] = format!("{case}-uuid");
    row[1] = case.to_string();
    row[3] = gender.to_string();
    row[11] = "stage iia".to_string();
    row[12] = days.to_string();
    row.join("\t")
}

#[test]
fn mixed_values_follow_fraction() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let normals_path = write_text(dir.path(), "normals.tsv", NORMALS)?;
    let tumors_path = write_text(dir.path(), "tumors.tsv", TUMORS)?;
    let (_, normals) = load_samples(&normals_path, 4, SampleParseConfig::default())?;
    let (_, tumors) = load_samples(&tumors_path, 4, SampleParseConfig::default())?;

    let store = ProbeAnnotStore::new();
    let mixer = Mixer::new(
        MixConfig::default()
            .with_tumor_fraction(0.3)
            .with_all_by_all(true),
        &store,
    )?;
    let tumor = &tumors["t1-01A"];
    let MixOutcome::Mixed(mixed) = mixer.mix(&normals, tumor, &mut StdRng::seed_from_u64(3))?
    else {
        panic!("every normal is a candidate without matching");
    };
    assert_eq!(mixed.len(), 3);

    let n1 = &mixed[0];
    assert_eq!(n1.sample(), "n1_t1");
    assert_approx_eq!(n1.value("cg02").unwrap(), 0.7 * 0.2 + 0.3 * 0.8);
    assert_approx_eq!(n1.value("cg02").unwrap(), 0.38);
    // missing normal reading stays below zero without annotation
    assert_approx_eq!(mixed[1].value("cg01").unwrap(), 0.7 * -1.0 + 0.3 * 0.9);

    let rendered = n1.render();
    assert!(rendered.starts_with("ct-sim\tn1_t1\t0.700:0.300\ttumor\t"));
    Ok(())
}

const TUMOR_COHORT: &str = "case\tsample\tbiospecimen\ttissue\tcg01\tcg02\n\
                            t1\tt1-01A\ttumor\tPrimary Tumor\t0.9\t0.8\n\
                            t2\tt2-06A\ttumor\tMetastatic\t0.9\t0.8\n\
                            t3\tt3-01A\ttumor\tPrimary Tumor\t0.5\t0.5\n\
                            t4\tt4-01A\ttumor\tPrimary Tumor\t0.5\t0.5\n\
                            t5\tt5-01A\ttumor\tPrimary Tumor\t0.3\t0.7\n";

#[test]
fn tumor_cohort_is_mixed_with_skips_counted() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let normals_path = write_text(dir.path(), "normals.tsv", NORMALS)?;
    let tumors_path = write_text(dir.path(), "tumors.tsv", TUMOR_COHORT)?;
    let (schema, mut normals) = load_samples(&normals_path, 4, SampleParseConfig::default())?;
    load_sra_demographics(SRA.as_bytes(), &mut normals)?;

    // t4 has no clinical row
    let clinical = [
        "case_id\tcase_submitter_id".to_string(),
        clinical_row("t1", "female", 40 * 365 + 100),
        clinical_row("t3", "male", 20 * 365),
        clinical_row("t5", "male", 60 * 365 + 10),
    ]
    .join("\n");
    let metadata = load_tcga_demographics(clinical.as_bytes())?;

    let store = ProbeAnnotStore::new();
    let mixer = Mixer::new(
        MixConfig::default()
            .with_tumor_fraction(0.5)
            .with_demographic_match(true)
            .with_min_age(35.0),
        &store,
    )?;
    let (normals, dropped) = mixer.filter_normals(normals);
    assert_eq!(dropped, 1);

    let tumors = MatrixReader::try_new(
        open_reader(&tumors_path)?,
        4,
        SampleParseConfig::default(),
    )?;
    let header = schema.output_header(true, None, false);
    let mut writer = MatrixWriter::try_new(Vec::new(), &header, true)?;
    let summary = mixer.mix_tumors(
        tumors,
        &normals,
        Some(&metadata),
        &mut writer,
        &mut StdRng::seed_from_u64(1),
    )?;
    assert_eq!(
        summary,
        MixSummary {
            tumors:           5,
            written:          2,
            metastatic:       1,
            unmatched:        1,
            missing_metadata: 1,
        }
    );

    let text = String::from_utf8(writer.finish()?)?;
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], header.join("\t"));
    assert_eq!(
        lines[1],
        "ct-sim\tn1_t1\t0.500:0.500\ttumor\tfemale\t40.0\t35-54\tstage iia\t0.6500000\t0.5000000"
    );
    assert!(lines[2].starts_with("ct-sim\tn3_t5\t0.500:0.500\ttumor\tmale\t60.0\t55-64\t"));
    assert!(lines.iter().all(|l| !l.contains("_t2")));
    Ok(())
}

#[test]
fn tumor_cohort_without_matching_mixes_everything_but_metastatic() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let normals_path = write_text(dir.path(), "normals.tsv", NORMALS)?;
    let tumors_path = write_text(dir.path(), "tumors.tsv", TUMOR_COHORT)?;
    let (schema, normals) = load_samples(&normals_path, 4, SampleParseConfig::default())?;

    let store = ProbeAnnotStore::new();
    let mixer = Mixer::new(MixConfig::default().with_tumor_fraction(0.2), &store)?;
    let tumors = MatrixReader::try_new(
        open_reader(&tumors_path)?,
        4,
        SampleParseConfig::default(),
    )?;
    let header = schema.output_header(false, None, false);
    let mut writer = MatrixWriter::try_new(Vec::new(), &header, false)?;
    let summary = mixer.mix_tumors(
        tumors,
        &normals,
        None,
        &mut writer,
        &mut StdRng::seed_from_u64(2),
    )?;
    assert_eq!(summary.written, 4);
    assert_eq!(summary.metastatic, 1);
    assert_eq!(summary.unmatched + summary.missing_metadata, 0);

    let text = String::from_utf8(writer.finish()?)?;
    let n_columns = header.len();
    for row in text.lines().skip(1) {
        assert_eq!(row.split('\t').count(), n_columns);
        assert!(row.contains("\t0.800:0.200\ttumor\t"));
    }
    Ok(())
}

#[test]
fn demographic_matching_with_metadata_files() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let normals_path = write_text(dir.path(), "normals.tsv", NORMALS)?;
    let (_, mut normals) = load_samples(&normals_path, 4, SampleParseConfig::default())?;

    assert_eq!(load_sra_demographics(SRA.as_bytes(), &mut normals)?, 3);
    let (normals, skipped) = filter_by_demographics(normals, 35.0);
    assert_eq!(skipped, 1);
    assert_eq!(normals.keys().collect::<Vec<_>>(), vec!["gsm1", "gsm3"]);

    let clinical = [
        "case_id\tcase_submitter_id".to_string(),
        clinical_row("t1", "female", 40 * 365 + 100),
        clinical_row("t9", "male", 20 * 365),
    ]
    .join("\n");
    let metadata = load_tcga_demographics(clinical.as_bytes())?;
    assert_approx_eq!(metadata["t1"].age, 40.0);

    let tumors_path = write_text(dir.path(), "tumors.tsv", TUMORS)?;
    let (_, mut tumors) = load_samples(&tumors_path, 4, SampleParseConfig::default())?;
    let tumor = tumors.get_mut("t1-01A").unwrap();
    let tumor_metadata = metadata.get(tumor.case()).cloned();
    tumor.set_demographics(tumor_metadata);

    let store = ProbeAnnotStore::new();
    let mixer = Mixer::new(
        MixConfig::default()
            .with_tumor_fraction(0.5)
            .with_demographic_match(true),
        &store,
    )?;
    let outcome = mixer.mix(&normals, &tumors["t1-01A"], &mut StdRng::seed_from_u64(5))?;
    let MixOutcome::Mixed(mixed) = outcome
    else {
        panic!("gsm1 matches on age group and gender");
    };
    assert_eq!(mixed.len(), 1);
    assert_eq!(mixed[0].sample(), "n1_t1");

    let demographics = mixed[0].demographics().unwrap();
    assert_eq!(demographics.gender, "female");
    assert_eq!(demographics.stage.as_deref(), Some("stage iia"));
    let schema = MatrixSchema::from_path(&normals_path, 4)?;
    let header = schema.output_header(true, None, false);
    let mut writer = MatrixWriter::try_new(Vec::new(), &header, true)?;
    writer.write_sample(&mixed[0])?;
    let text = String::from_utf8(writer.finish()?)?;
    let row = text.lines().nth(1).unwrap();
    assert_eq!(
        row,
        "ct-sim\tn1_t1\t0.500:0.500\ttumor\tfemale\t40.0\t35-54\tstage iia\t0.6500000\t0.5000000"
    );

    // a tumor nobody matches is skipped
    let mut unmatched = tumors["t1-01A"].clone();
    unmatched.set_demographics(Some(Demographics::new("male", 20.0, None)));
    assert_eq!(
        mixer.mix(&normals, &unmatched, &mut StdRng::seed_from_u64(5))?,
        MixOutcome::NoMatch
    );
    Ok(())
}

#[test]
fn demographics_embedded_in_matrix() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let normals_path = DemoMatrixBuilder::new(8, 5, Some(11))
        .with_case_prefix("n")
        .with_demographics(vec![("F", 40.0), ("M", 41.0), ("F", 80.0), ("F", 30.0)])
        .write(dir.path(), "normals.tsv")?;
    let (schema, normals) = load_samples(
        &normals_path,
        DEMOGRAPHIC_PROBE_START,
        SampleParseConfig::default(),
    )?;
    assert_eq!(schema.n_probes(), 5);
    assert!(normals.values().all(|s| s.demographics().is_some()));

    let (normals, skipped) = filter_by_demographics(normals, 35.0);
    assert_eq!(skipped, 2);

    let target = Demographics::new("F", 50.0, None);
    let matched = match_by_demographics(&normals, &target);
    assert_eq!(
        matched.iter().map(|s| s.case().as_str()).collect::<Vec<_>>(),
        vec!["n0", "n4"]
    );
    Ok(())
}
