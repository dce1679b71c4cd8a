//! Output configuration.
//!
//! Controls how the results of a run are presented: as human-readable
//! lines or a JSON document, with decimal or binary size units.

/// Options that control how results are presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct OutputOptions {
    /// Print a single JSON document instead of human-readable lines
    pub json: bool,

    /// Format sizes with binary units (KiB, MiB, ...) instead of decimal ones
    pub binary: bool,

    /// Log debug information to stderr
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_options_default() {
        let options = OutputOptions::default();

        assert!(!options.json);
        assert!(!options.binary);
        assert!(!options.verbose);
    }
}
