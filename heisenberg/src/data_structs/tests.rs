use assert_approx_eq::assert_approx_eq;
use rstest::{
    fixture,
    rstest,
};

use super::typedef::{
    ProbeLabel,
    ProbeSet,
    DEMOGRAPHIC_PROBE_START,
    IDENTITY_COLUMNS,
};
use super::*;
use crate::error::ConfigError;
use crate::io::MatrixSchema;

const HEADER: &str = "case\tsample\tbiospecimen\ttissue\tcg03\tcg01\tcg02";
const META_HEADER: &str =
    "case\tsample\tbiospecimen\ttissue\tgender\tage\tage_group\ttumor_stage\tcg02\tcg01";

#[fixture]
fn schema() -> MatrixSchema {
    MatrixSchema::from_header(HEADER, IDENTITY_COLUMNS).unwrap()
}

fn probe_set(labels: &[&str]) -> ProbeSet {
    labels.iter().map(|l| ProbeLabel::from(*l)).collect()
}

#[rstest]
#[case(0.0, AgeGroup::Under35)]
#[case(34.999, AgeGroup::Under35)]
#[case(35.0, AgeGroup::From35To54)]
#[case(54.999, AgeGroup::From35To54)]
#[case(55.0, AgeGroup::From55To64)]
#[case(64.999, AgeGroup::From55To64)]
#[case(65.0, AgeGroup::From65To74)]
#[case(75.0, AgeGroup::Over75)]
#[case(102.0, AgeGroup::Over75)]
fn age_group_boundaries(
    #[case] age: f64,
    #[case] group: AgeGroup,
) {
    assert_eq!(AgeGroup::from_age(age), group);
}

#[test]
fn age_group_labels() {
    assert_eq!(AgeGroup::Under35.to_string(), "0-34");
    assert_eq!(AgeGroup::From65To74.to_string(), "65-74");
    assert_eq!(AgeGroup::Over75.to_string(), "75+");
}

#[rstest]
#[case("normal peripheral blood", TissueClass::Normal)]
#[case("Solid Tissue Normal", TissueClass::Normal)]
#[case("Primary Tumor", TissueClass::Tumor)]
#[case("tumor", TissueClass::Tumor)]
fn tissue_class_from_label(
    #[case] label: &str,
    #[case] class: TissueClass,
) {
    assert_eq!(TissueClass::from_label(label), class);
}

#[rstest]
#[case("DEL", true)]
#[case("deletion", true)]
#[case("INS", false)]
#[case("DUP", false)]
fn variant_kind_parsing(
    #[case] raw: &str,
    #[case] deletion: bool,
) {
    let kind: VariantKind = raw.parse().unwrap();
    assert_eq!(kind.is_deletion(), deletion);
}

#[rstest]
fn unparsable_cells_become_missing(schema: MatrixSchema) {
    let sample = Sample::parse(
        "c1\ts1\tb1\tnormal\tabc\t0.5\t\n",
        Some(&schema),
        &SampleParseConfig::default(),
    )
    .unwrap();
    assert_eq!(sample.case(), "c1");
    assert_eq!(sample.tissue(), "normal");
    assert_approx_eq!(sample.value("cg03").unwrap(), -1.0);
    assert_approx_eq!(sample.value("cg01").unwrap(), 0.5);
    assert_approx_eq!(sample.value("cg02").unwrap(), -1.0);
    assert!(sample.demographics().is_none());
}

#[rstest]
fn short_rows_are_padded(schema: MatrixSchema) {
    let config = SampleParseConfig::default().with_missing(-9.0);
    let sample = Sample::parse("c1\ts1\tb1\tnormal\t0.1", Some(&schema), &config).unwrap();
    assert_eq!(sample.n_probes(), 3);
    assert_approx_eq!(sample.value("cg03").unwrap(), 0.1);
    assert_approx_eq!(sample.value("cg02").unwrap(), -9.0);
}

#[rstest]
fn required_probes_are_padded(schema: MatrixSchema) {
    let config =
        SampleParseConfig::default().with_required(Some(probe_set(&["cg01", "cg99"])));
    let sample =
        Sample::parse("c1\ts1\tb1\tnormal\t0.3\t0.1\t0.2", Some(&schema), &config).unwrap();
    assert_eq!(sample.n_probes(), 4);
    assert_approx_eq!(sample.value("cg99").unwrap(), -1.0);
    assert_approx_eq!(sample.value("cg03").unwrap(), 0.3);
}

#[rstest]
fn required_only_drops_other_probes(schema: MatrixSchema) {
    let config = SampleParseConfig::default()
        .with_required(Some(probe_set(&["cg01", "cg99"])))
        .with_required_only(true);
    let sample =
        Sample::parse("c1\ts1\tb1\tnormal\t0.3\t0.1\t0.2", Some(&schema), &config).unwrap();
    assert_eq!(sample.sorted_labels(), vec!["cg01", "cg99"]);
    assert_approx_eq!(sample.value("cg01").unwrap(), 0.1);
}

#[test]
fn demographic_columns_are_parsed() {
    let schema = MatrixSchema::from_header(META_HEADER, DEMOGRAPHIC_PROBE_START).unwrap();
    let sample = Sample::parse(
        "c1\ts1\tb1\ttumor\tfemale\t61\t55-64\tstage iib\t0.2\t0.1",
        Some(&schema),
        &SampleParseConfig::default(),
    )
    .unwrap();
    let demographics = sample.demographics().unwrap();
    assert_eq!(demographics.gender, "female");
    assert_approx_eq!(demographics.age, 61.0);
    assert_eq!(demographics.stage.as_deref(), Some("stage iib"));
    assert_eq!(sample.age_group(), Some(AgeGroup::From55To64));
    assert_eq!(sample.n_probes(), 2);
}

#[test]
fn unparsable_age_leaves_demographics_unset() {
    let schema = MatrixSchema::from_header(META_HEADER, DEMOGRAPHIC_PROBE_START).unwrap();
    let sample = Sample::parse(
        "c1\ts1\tb1\ttumor\tfemale\tunknown\t\t\t0.2\t0.1",
        Some(&schema),
        &SampleParseConfig::default(),
    )
    .unwrap();
    assert!(sample.demographics().is_none());
    assert_approx_eq!(sample.value("cg01").unwrap(), 0.1);
}

#[test]
fn parse_without_schema_fails() {
    let err = Sample::parse("c1\ts1\tb1\tnormal\t0.1", None, &SampleParseConfig::default())
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::MissingLabelIndex)
    );
}

#[rstest]
fn render_sorts_probes_and_fixes_precision(schema: MatrixSchema) {
    let sample = Sample::parse(
        "c1\ts1\tb1\tnormal\t0.3\t0.123456789\t1",
        Some(&schema),
        &SampleParseConfig::default(),
    )
    .unwrap();
    assert_eq!(
        sample.render(),
        "c1\ts1\tb1\tnormal\t0.1234568\t1.0000000\t0.3000000"
    );
}

#[rstest]
fn render_then_parse_preserves_values(schema: MatrixSchema) {
    let config = SampleParseConfig::default();
    let original =
        Sample::parse("c1\ts1\tb1\tnormal\t0.25\t0.5\t0.75", Some(&schema), &config).unwrap();

    let sorted_header = schema.output_header(false, None, false).join("\t");
    let sorted = MatrixSchema::from_header(&sorted_header, IDENTITY_COLUMNS).unwrap();
    let parsed = Sample::parse(&original.render(), Some(&sorted), &config).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn render_includes_demographics_when_set() {
    let sample = Sample::new("c1", "s1", "b1", "tumor", Default::default())
        .with_demographics(Some(Demographics::new("male", 70.0, None)));
    assert_eq!(sample.render(), "c1\ts1\tb1\ttumor\tmale\t70.0\t65-74\t");
    assert_eq!(sample.render_with_layout(false), "c1\ts1\tb1\ttumor");
}

#[rstest]
#[case(40.0, "40.0")]
#[case(40.5, "40.5")]
#[case(63.0, "63.0")]
fn age_keeps_its_decimal_point(
    #[case] age: f64,
    #[case] expected: &str,
) {
    let sample = Sample::new("c1", "s1", "b1", "tumor", Default::default())
        .with_demographics(Some(Demographics::new("female", age, None)));
    let rendered = sample.render();
    assert_eq!(rendered.split('\t').nth(5), Some(expected));
}

#[rstest]
#[case::same_group_and_gender(40.0, "F", true)]
#[case::other_gender(40.0, "M", false)]
#[case::other_group(60.0, "F", false)]
fn demographics_matching(
    #[case] age: f64,
    #[case] gender: &str,
    #[case] matches: bool,
) {
    let tumor = Demographics::new("F", 50.0, Some("stage i".into()));
    let normal = Demographics::new(gender, age, None);
    assert_eq!(tumor.matches(&normal), matches);
}

#[test]
fn probe_stats_merge_keeps_absent_values() {
    let mut probe = Probe::new("cg01");
    probe.set_stats(Some(0.1), Some(0.9), Some(0.5), None);
    probe.set_stats(None, Some(0.8), None, Some(0.2));
    assert_eq!(probe.minimum(), Some(0.1));
    assert_eq!(probe.maximum(), Some(0.8));
    assert_eq!(probe.mean(), Some(0.5));
    assert_eq!(probe.stdev(), Some(0.2));

    probe.fill_span(Some(GenomicSpan::new("chr1", 10, 60)));
    probe.fill_span(Some(GenomicSpan::new("chr2", 1, 2)));
    assert_eq!(probe.span().unwrap().to_string(), "chr1:10-60");
}
