pub mod global;
pub mod output;
pub mod probe;

pub use global::{CommandLineArgs, GlobalArgs, Mode};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{output::ReportOutputFormat, *};
    use crate::catalog::DEFAULT_CATALOG_URL;

    #[test]
    fn profile_is_required() {
        assert!(CommandLineArgs::try_parse_args_from(["iamprobe"]).is_err());
    }

    #[test]
    fn defaults_apply() {
        let args = CommandLineArgs::try_parse_args_from(["iamprobe", "--profile", "dev"]).unwrap();
        assert_eq!(args.probe_args.profile, "dev");
        assert_eq!(args.probe_args.arn, None);
        assert_eq!(args.probe_args.batch_size, 50);
        assert_eq!(args.probe_args.catalog_url.as_str(), DEFAULT_CATALOG_URL);
        assert_eq!(args.output_args.format, ReportOutputFormat::Pretty);
    }

    #[test]
    fn batch_size_is_bounded() {
        for bad in ["0", "51"] {
            let parsed = CommandLineArgs::try_parse_args_from([
                "iamprobe",
                "--profile",
                "dev",
                "--batch-size",
                bad,
            ]);
            assert!(parsed.is_err(), "batch size {bad} should be rejected");
        }
    }

    #[test]
    fn quiet_disables_progress() {
        let args =
            CommandLineArgs::try_parse_args_from(["iamprobe", "--profile", "dev", "-q"]).unwrap();
        assert_eq!(args.global_args.progress, Mode::Never);
        assert!(!args.global_args.use_progress());
    }

    #[test]
    fn explicit_arn_and_json_output() {
        let args = CommandLineArgs::try_parse_args_from([
            "iamprobe",
            "--profile",
            "dev",
            "--arn",
            "arn:aws:iam::123456789012:role/ci",
            "--format",
            "json",
            "--batch-size",
            "10",
        ])
        .unwrap();
        assert_eq!(args.probe_args.arn.as_deref(), Some("arn:aws:iam::123456789012:role/ci"));
        assert_eq!(args.probe_args.batch_size, 10);
        assert_eq!(args.output_args.format, ReportOutputFormat::Json);
    }
}
