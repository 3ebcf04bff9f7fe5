use super::*;

impl PermissionReporter {
    pub fn pretty_format<W: Write>(
        &self,
        mut writer: W,
        allowed: &AllowedPermissionSet,
    ) -> Result<()> {
        writeln!(
            writer,
            "{} {}{}",
            self.styles.style_heading.apply_to("Allowed permissions for"),
            self.styles.style_principal.apply_to(allowed.principal()),
            self.styles.style_heading.apply_to(format!(" ({}):", allowed.len())),
        )?;
        for action in allowed.actions() {
            writeln!(writer, "  - {}", self.styles.style_action.apply_to(action))?;
        }
        Ok(())
    }
}
