#![allow(dead_code)]
use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};

/// Generates sample matrices with random beta values.
pub struct DemoMatrixBuilder<R: Rng> {
    n_samples:    usize,
    n_probes:     usize,
    tissue:       String,
    case_prefix:  String,
    demographics: Option<Vec<(String, f64)>>,
    missing_rate: f64,
    rng:          R,
}

impl DemoMatrixBuilder<StdRng> {
    pub fn new(
        n_samples: usize,
        n_probes: usize,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            n_samples,
            n_probes,
            tissue: "normal peripheral blood".to_string(),
            case_prefix: "case".to_string(),
            demographics: None,
            missing_rate: 0.0,
            rng,
        }
    }
}

impl<R: Rng> DemoMatrixBuilder<R> {
    pub fn with_tissue(
        mut self,
        tissue: &str,
    ) -> Self {
        self.tissue = tissue.to_string();
        self
    }

    pub fn with_case_prefix(
        mut self,
        prefix: &str,
    ) -> Self {
        self.case_prefix = prefix.to_string();
        self
    }

    /// One `(gender, age)` per sample, cycled if shorter.
    pub fn with_demographics(
        mut self,
        demographics: Vec<(&str, f64)>,
    ) -> Self {
        self.demographics = Some(
            demographics
                .into_iter()
                .map(|(g, a)| (g.to_string(), a))
                .collect(),
        );
        self
    }

    pub fn with_missing_rate(
        mut self,
        rate: f64,
    ) -> Self {
        self.missing_rate = rate;
        self
    }

    pub fn probe_labels(&self) -> Vec<String> {
        (0..self.n_probes)
            .map(|i| format!("cg{:08}", i))
            .collect()
    }

    pub fn case_id(
        &self,
        i: usize,
    ) -> String {
        format!("{}{}", self.case_prefix, i)
    }

    pub fn header(&self) -> String {
        let mut columns = vec!["case", "sample", "biospecimen", "tissue"]
            .into_iter()
            .map(String::from)
            .collect_vec();
        if self.demographics.is_some() {
            columns.extend(
                ["gender", "age", "age_group", "tumor_stage"].map(String::from),
            );
        }
        // reversed so that engines have to sort
        columns.extend(self.probe_labels().into_iter().rev());
        columns.join("\t")
    }

    pub fn build(&mut self) -> String {
        let mut lines = vec![self.header()];
        for i in 0..self.n_samples {
            let mut fields = vec![
                self.case_id(i),
                format!("sample{}", i),
                format!("bio{}", i),
                self.tissue.clone(),
            ];
            if let Some(demographics) = self.demographics.as_ref() {
                let (gender, age) = &demographics[i % demographics.len()];
                fields.extend([
                    gender.clone(),
                    age.to_string(),
                    String::new(),
                    "stage i".to_string(),
                ]);
            }
            for _ in 0..self.n_probes {
                if self.rng.gen_bool(self.missing_rate) {
                    fields.push("NA".to_string());
                }
                else {
                    fields.push(format!("{:.4}", self.rng.gen_range(0.0..1.0)));
                }
            }
            lines.push(fields.join("\t"));
        }
        lines.join("\n") + "\n"
    }

    pub fn write(
        &mut self,
        dir: &Path,
        name: &str,
    ) -> anyhow::Result<PathBuf> {
        let text = self.build();
        write_text(dir, name, &text)
    }
}

pub fn write_text(
    dir: &Path,
    name: &str,
    text: &str,
) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path)?;
    file.write_all(text.as_bytes())?;
    Ok(path)
}

pub fn structural_variant_row(
    probe: &str,
    sv: &str,
    kind: &str,
    freq: f64,
    hom_freq: f64,
) -> String {
    format!(
        "{probe}\tchr1\t100\t150\t{sv}\t{kind}\t90\t200\t{freq}\t{hom_freq}\t0.0"
    )
}

pub fn confounding_snp_table(rows: &[(&str, &[(&str, i64, f64)])]) -> String {
    let mut lines =
        vec!["TargetID\tSNP_ID\tSNP_DISTANCE\tSNP_MinorAlleleFrequency".to_string()];
    for (probe, snps) in rows {
        lines.push(format!(
            "{}\t{}\t{}\t{}",
            probe,
            snps.iter().map(|s| s.0).join(";"),
            snps.iter().map(|s| s.1).join(";"),
            snps.iter().map(|s| s.2).join(";"),
        ));
    }
    lines.join("\n") + "\n"
}

pub fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text.lines().map(String::from).collect())
}
