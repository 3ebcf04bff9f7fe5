use std::io::Write;

use anyhow::{Context, Result};

use crate::{
    cli::output::{OutputArgs, ReportOutputFormat},
    prober::AllowedPermissionSet,
};

mod json_format;
mod pretty_format;
pub mod styles;

use styles::Styles;

/// Writes an [`AllowedPermissionSet`] in the requested format.
pub struct PermissionReporter {
    pub styles: Styles,
    pub format: ReportOutputFormat,
}

impl PermissionReporter {
    pub fn new(format: ReportOutputFormat, styles: Styles) -> Self {
        Self { styles, format }
    }

    /// Sort `allowed` and write it to `writer`.
    pub fn report<W: Write>(&self, allowed: AllowedPermissionSet, mut writer: W) -> Result<()> {
        let allowed = allowed.sorted();
        match self.format {
            ReportOutputFormat::Pretty => self.pretty_format(&mut writer, &allowed)?,
            ReportOutputFormat::Json => self.json_format(&mut writer, &allowed)?,
        }
        writer.flush()?;
        Ok(())
    }
}

/// Write `allowed`, sorted, to the destination and in the format chosen in
/// `output`. Color is only ever applied to stdout.
pub fn present(allowed: AllowedPermissionSet, output: &OutputArgs, use_color: bool) -> Result<()> {
    let styles = Styles::for_term(use_color && !output.has_output(), &styles::Term::stdout());
    let writer = output.get_writer().context("Failed to open report output")?;
    PermissionReporter::new(output.format, styles).report(allowed, writer)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::action::ActionIdentifier;

    fn allowed(actions: &[&str]) -> AllowedPermissionSet {
        let mut set = AllowedPermissionSet::new("arn:aws:iam::123456789012:user/alice");
        for action in actions {
            set.push(action.parse::<ActionIdentifier>().unwrap());
        }
        set
    }

    fn render(format: ReportOutputFormat, set: AllowedPermissionSet) -> String {
        let mut out = Vec::new();
        PermissionReporter::new(format, Styles::new(false)).report(set, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn pretty_output_is_sorted_with_header() {
        let text = render(
            ReportOutputFormat::Pretty,
            allowed(&["s3:GetObject", "ec2:StartInstances", "S3:Legacy"]),
        );
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Allowed permissions for arn:aws:iam::123456789012:user/alice (3):",
                "  - S3:Legacy",
                "  - ec2:StartInstances",
                "  - s3:GetObject",
            ]
        );
    }

    #[test]
    fn pretty_output_lines_are_ordered() {
        let text = render(
            ReportOutputFormat::Pretty,
            allowed(&["sqs:SendMessage", "iam:PassRole", "iam:GetRole", "a:b"]),
        );
        let entries: Vec<_> = text.lines().skip(1).collect();
        assert!(entries.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn empty_set_prints_only_header() {
        let text = render(ReportOutputFormat::Pretty, allowed(&[]));
        assert_eq!(text, "Allowed permissions for arn:aws:iam::123456789012:user/alice (0):\n");
    }

    #[test]
    fn present_writes_requested_format_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("allowed.json");
        let output = OutputArgs { output: Some(path.clone()), format: ReportOutputFormat::Json };

        present(allowed(&["s3:GetObject", "ec2:StartInstances"]), &output, true).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["allowed"], serde_json::json!(["ec2:StartInstances", "s3:GetObject"]));
    }

    #[test]
    fn present_never_colors_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("allowed.txt");
        let output = OutputArgs { output: Some(path.clone()), format: ReportOutputFormat::Pretty };

        present(allowed(&["s3:GetObject"]), &output, true).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Allowed permissions for arn:aws:iam::123456789012:user/alice (1):\n  - s3:GetObject\n"
        );
    }

    #[test]
    fn json_output_lists_sorted_actions() {
        let text = render(ReportOutputFormat::Json, allowed(&["s3:GetObject", "ec2:StartInstances"]));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "principal": "arn:aws:iam::123456789012:user/alice",
                "allowed": ["ec2:StartInstances", "s3:GetObject"],
            })
        );
    }
}
