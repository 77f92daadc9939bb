//! Helper macros shared by the data structures and tool configurations.
//!
//! - [`getter_fn!`] generates a borrowing accessor for a private field.
//! - [`with_field_fn!`] generates a builder-style `with_<field>` setter, used
//!   by every configuration struct in [`crate::tools`].

#[macro_export]
macro_rules! getter_fn {
    ($field_name: ident, $field_type: ty) => {
        #[cfg_attr(coverage_nightly, coverage(off))]
        pub fn $field_name(&self) -> &$field_type {
            &self.$field_name
        }
    };
}
pub use getter_fn;

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            #[cfg_attr(coverage_nightly, coverage(off))]
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
            self.$field_name = value;
            self
            }
        }
    };
}
pub use with_field_fn;

/// Formats a fraction the way synthetic biospecimen ids encode it.
pub fn format_fraction(value: f64) -> String {
    format!("{:.3}", value)
}

/// Parses a float, falling back to `missing` for anything unparsable.
pub fn parse_or_missing(
    field: &str,
    missing: f64,
) -> f64 {
    field.trim().parse::<f64>().unwrap_or(missing)
}
