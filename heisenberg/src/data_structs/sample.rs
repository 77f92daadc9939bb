use std::fmt::{
    self,
    Display,
};

use hashbrown::HashMap;
use itertools::Itertools;
use log::warn;
use serde::{
    Deserialize,
    Serialize,
};

use super::enums::{
    AgeGroup,
    TissueClass,
};
use super::typedef::{
    MethylValue,
    ProbeLabel,
    ProbeSet,
    DEFAULT_MISSING,
    IDENTITY_COLUMNS,
};
use crate::error::ConfigError;
use crate::io::MatrixSchema;
use crate::utils::parse_or_missing;
use crate::{
    getter_fn,
    with_field_fn,
};

/// Demographic attributes of a sample. The age group is always derived
/// from `age`, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub gender: String,
    /// Age in years.
    pub age:    f64,
    pub stage:  Option<String>,
}

impl Demographics {
    pub fn new(
        gender: impl Into<String>,
        age: f64,
        stage: Option<String>,
    ) -> Self {
        Self {
            gender: gender.into(),
            age,
            stage,
        }
    }

    pub fn age_group(&self) -> AgeGroup { AgeGroup::from_age(self.age) }

    /// Same derived age group and exactly the same gender.
    pub fn matches(
        &self,
        other: &Demographics,
    ) -> bool {
        self.age_group() == other.age_group() && self.gender == other.gender
    }
}

/// Options applied while turning a matrix row into a [`Sample`].
#[derive(Debug, Clone)]
pub struct SampleParseConfig {
    /// Probes that must be present in every sample, padded with `missing`.
    pub required:      Option<ProbeSet>,
    /// Drop every probe column that is not in `required`.
    pub required_only: bool,
    pub missing:       MethylValue,
}

impl SampleParseConfig {
    with_field_fn!(required, Option<ProbeSet>);

    with_field_fn!(required_only, bool);

    with_field_fn!(missing, MethylValue);

    fn keeps(
        &self,
        label: &ProbeLabel,
    ) -> bool {
        match (&self.required, self.required_only) {
            (Some(required), true) => required.contains(label),
            _ => true,
        }
    }
}

impl Default for SampleParseConfig {
    fn default() -> Self {
        Self {
            required:      None,
            required_only: false,
            missing:       DEFAULT_MISSING,
        }
    }
}

/// One biological or synthetic sample and its probe values.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    case:         String,
    sample:       String,
    biospecimen:  String,
    tissue:       String,
    demographics: Option<Demographics>,
    probe_vals:   HashMap<ProbeLabel, MethylValue>,
}

impl Sample {
    getter_fn!(case, String);

    getter_fn!(sample, String);

    getter_fn!(biospecimen, String);

    getter_fn!(tissue, String);

    getter_fn!(probe_vals, HashMap<ProbeLabel, MethylValue>);

    pub fn new(
        case: impl Into<String>,
        sample: impl Into<String>,
        biospecimen: impl Into<String>,
        tissue: impl Into<String>,
        probe_vals: HashMap<ProbeLabel, MethylValue>,
    ) -> Self {
        Self {
            case: case.into(),
            sample: sample.into(),
            biospecimen: biospecimen.into(),
            tissue: tissue.into(),
            demographics: None,
            probe_vals,
        }
    }

    pub fn with_demographics(
        mut self,
        demographics: Option<Demographics>,
    ) -> Self {
        self.demographics = demographics;
        self
    }

    /// Back-fills demographics from a separate metadata source.
    pub fn set_demographics(
        &mut self,
        demographics: Option<Demographics>,
    ) {
        self.demographics = demographics;
    }

    pub fn demographics(&self) -> Option<&Demographics> {
        self.demographics.as_ref()
    }

    pub fn age_group(&self) -> Option<AgeGroup> {
        self.demographics.as_ref().map(Demographics::age_group)
    }

    pub fn tissue_class(&self) -> TissueClass {
        TissueClass::from_label(&self.tissue)
    }

    pub fn value(
        &self,
        label: &str,
    ) -> Option<MethylValue> {
        self.probe_vals.get(label).copied()
    }

    pub fn n_probes(&self) -> usize { self.probe_vals.len() }

    /// Parses one tab-delimited matrix row.
    ///
    /// Unparsable probe cells and cells missing from a short row become
    /// `config.missing`. The only failure is a missing `schema`.
    pub fn parse(
        line: &str,
        schema: Option<&MatrixSchema>,
        config: &SampleParseConfig,
    ) -> anyhow::Result<Sample> {
        let schema = schema.ok_or(ConfigError::MissingLabelIndex)?;
        let fields = line.trim_end_matches(['\n', '\r']).split('\t').collect_vec();
        let field = |i: usize| fields.get(i).copied().unwrap_or_default();

        let demographics = if schema.has_demographics() {
            parse_demographics(&fields)
        }
        else {
            None
        };

        let mut probe_vals = HashMap::with_capacity(schema.n_probes());
        for (offset, label) in schema.probe_labels().iter().enumerate() {
            if !config.keeps(label) {
                continue;
            }
            let value = fields
                .get(schema.probe_start() + offset)
                .map(|cell| parse_or_missing(cell, config.missing))
                .unwrap_or(config.missing);
            probe_vals.insert(label.clone(), value);
        }

        if let Some(required) = config.required.as_ref() {
            for label in required {
                probe_vals
                    .entry(label.clone())
                    .or_insert(config.missing);
            }
        }

        Ok(Sample {
            case: field(0).to_string(),
            sample: field(1).to_string(),
            biospecimen: field(2).to_string(),
            tissue: field(3).to_string(),
            demographics,
            probe_vals,
        })
    }

    /// Row rendering with demographic columns exactly when they are set.
    pub fn render(&self) -> String {
        self.render_fields(self.demographics.is_some()).join("\t")
    }

    /// Row rendering aligned to a header that does (or does not) carry the
    /// demographic columns. Absent demographics render as empty cells.
    pub fn render_with_layout(
        &self,
        include_demographics: bool,
    ) -> String {
        self.render_fields(include_demographics).join("\t")
    }

    fn render_fields(
        &self,
        include_demographics: bool,
    ) -> Vec<String> {
        let mut fields = Vec::with_capacity(
            IDENTITY_COLUMNS + 4 + self.probe_vals.len(),
        );
        fields.extend([
            self.case.clone(),
            self.sample.clone(),
            self.biospecimen.clone(),
            self.tissue.clone(),
        ]);

        if include_demographics {
            match self.demographics.as_ref() {
                Some(d) => {
                    fields.extend([
                        d.gender.clone(),
                        format!("{:?}", d.age),
                        d.age_group().to_string(),
                        d.stage.clone().unwrap_or_default(),
                    ])
                },
                None => fields.extend(std::iter::repeat(String::new()).take(4)),
            }
        }

        fields.extend(
            self.probe_vals
                .iter()
                .sorted_by(|a, b| a.0.cmp(b.0))
                .map(|(_, value)| format!("{:.7}", value)),
        );
        fields
    }

    /// Probe labels in the order [`Sample::render`] writes them.
    pub fn sorted_labels(&self) -> Vec<&ProbeLabel> {
        self.probe_vals.keys().sorted().collect()
    }
}

impl Display for Sample {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

fn parse_demographics(fields: &[&str]) -> Option<Demographics> {
    let gender = fields.get(4)?;
    let age = match fields.get(5).map(|a| a.trim().parse::<f64>()) {
        Some(Ok(age)) => age,
        _ => {
            warn!(
                "Unparsable age for sample {}, demographics left unset",
                fields.get(1).unwrap_or(&"")
            );
            return None;
        },
    };
    let stage = fields
        .get(7)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    Some(Demographics::new(*gender, age, stage))
}
