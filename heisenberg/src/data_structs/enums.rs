use std::convert::Infallible;
use std::fmt::Display;
use std::str::FromStr;

use arcstr::ArcStr;
use serde::{
    Deserialize,
    Serialize,
};

/// Fixed age buckets used for display and demographic matching.
///
/// Lower bounds are inclusive, upper bounds exclusive.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord)]
pub enum AgeGroup {
    /// `[0, 35)`
    Under35,
    /// `[35, 55)`
    From35To54,
    /// `[55, 65)`
    From55To64,
    /// `[65, 75)`
    From65To74,
    /// `[75, inf)`
    Over75,
}

impl AgeGroup {
    pub fn from_age(age: f64) -> Self {
        if age < 35.0 {
            AgeGroup::Under35
        }
        else if age < 55.0 {
            AgeGroup::From35To54
        }
        else if age < 65.0 {
            AgeGroup::From55To64
        }
        else if age < 75.0 {
            AgeGroup::From65To74
        }
        else {
            AgeGroup::Over75
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            AgeGroup::Under35 => "0-34",
            AgeGroup::From35To54 => "35-54",
            AgeGroup::From55To64 => "55-64",
            AgeGroup::From65To74 => "65-74",
            AgeGroup::Over75 => "75+",
        }
    }
}

impl Display for AgeGroup {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Binary tissue class derived from the free-text tissue label.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
pub enum TissueClass {
    Normal,
    /// Anything that is not labelled normal.
    Tumor,
}

impl TissueClass {
    pub fn from_label(label: &str) -> Self {
        if label.contains("Normal") || label.contains("normal") {
            TissueClass::Normal
        }
        else {
            TissueClass::Tumor
        }
    }
}

impl Display for TissueClass {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            TissueClass::Normal => write!(f, "Normal"),
            TissueClass::Tumor => write!(f, "Tumor"),
        }
    }
}

/// Structural variant type as it appears in the overlap file.
#[derive(Eq, Hash, PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum VariantKind {
    Deletion,
    /// Any other type, kept verbatim. These never alter probe values.
    Other(ArcStr),
}

impl VariantKind {
    pub fn is_deletion(&self) -> bool {
        matches!(self, VariantKind::Deletion)
    }
}

impl FromStr for VariantKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("DEL")
            || trimmed.eq_ignore_ascii_case("deletion")
        {
            Ok(VariantKind::Deletion)
        }
        else {
            Ok(VariantKind::Other(ArcStr::from(trimmed)))
        }
    }
}

impl Display for VariantKind {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            VariantKind::Deletion => write!(f, "DEL"),
            VariantKind::Other(name) => write!(f, "{}", name),
        }
    }
}
