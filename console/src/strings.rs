macro_rules! define_strings {
    (
        $($name:ident = $value:literal);*$(;)?
    ) => {
        $(
            pub const $name: &str = $value;
        )*
    };
}

pub mod simulate {
    define_strings! {
        INPUT =
            "Source matrix of methylation values, one sample per row.";
        OUTPUT =
            "Output file. Compression follows the extension, `-` writes to \
            standard output.";
        CHOOSE =
            "Number of individuals averaged into each simulated sample.";
        MAX_INDIVIDUALS =
            "Maximum number of simulated samples to create. Defaults to every \
            possible combination.";
        WITH_REPLACEMENT =
            "Choose with replacement, so one individual may appear more than \
            once in a combination.";
        TISSUE =
            "Tissue label of simulated samples.";
        STAGE =
            "Stage label of simulated samples. Written only when the input \
            carries demographic columns.";
        PROBE_START =
            "Column index of the first probe in the input. Use 8 when the \
            matrix carries gender, age, age group and stage columns.";
    }
}

pub mod mix {
    define_strings! {
        NORMAL =
            "Matrix of normal methylation values.";
        TUMOR =
            "Matrix of tumor methylation values. Rows with a Metastatic tissue \
            label are skipped.";
        OUTPUT =
            "Output file. Compression follows the extension, `-` writes to \
            standard output.";
        TUMOR_FRACTION =
            "Fraction of tumor signal in the output, between 0 and 1.";
        ALL_BY_ALL =
            "Mix every tumor with every candidate normal instead of a single \
            random partner.";
        DEMOGRAPHIC =
            "Only mix samples of the same gender and age group. Requires tumor \
            metadata.";
        NORMAL_METADATA =
            "Table of project, sample, age, age group and gender for normal \
            samples. Without it demographics are read from the normal matrix.";
        TUMOR_METADATA =
            "Clinical table with gender, tumor stage and age in days per case.";
        MIN_AGE =
            "Exclude normal samples younger than this when matching by \
            demographics.";
        NORMAL_PROBE_START =
            "Column index of the first probe in the normal matrix.";
        TUMOR_PROBE_START =
            "Column index of the first probe in the tumor matrix.";
    }
}

pub mod stats {
    define_strings! {
        INPUT =
            "Source matrix of methylation values, one sample per row.";
        OUTPUT =
            "Output file. Compression follows the extension, `-` writes to \
            standard output.";
        PROBE_START =
            "Column index of the first probe in the input.";
        MAX_PROBES =
            "Number of probes summarised per pass over the input. Lower values \
            use less memory.";
        SKIP_MISSING =
            "Leave unparsable values out of the statistics instead of counting \
            them as the missing value.";
        PROBES =
            "Only compute statistics for the probes listed in this file.";
    }
}

pub mod shared {
    define_strings! {
        MISSING =
            "Placeholder for missing probe values.";
        REQUIRED_PROBES =
            "File listing probes written for every sample. Probes absent from \
            the input are padded with the missing value.";
        REQUIRED_ONLY =
            "Write only the required probes.";
        STRUCTURAL_VARIANTS =
            "Structural variant probe overlap file.";
        CONFOUNDING_SNPS =
            "Confounding SNPs per probe.";
        PROBE_STATS =
            "Descriptive statistics per probe, used to add random noise.";
        MAX_DISTANCE =
            "Ignore confounding SNPs further than this many bp from the probe.";
        MAX_SNP_MAF =
            "Ignore confounding SNPs with a minor allele frequency above this.";
        MAX_SV_MAF =
            "Ignore structural variants with an allele frequency above this.";
        PROGRESS =
            "Display a progress bar.";
        VERBOSE =
            "Log every simulated sample and every zeroed probe value.";
        SEED =
            "Seed for the random number generator. Runs with the same seed and \
            inputs write identical output.";
    }
}
