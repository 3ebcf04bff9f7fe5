use super::*;

impl PermissionReporter {
    pub fn json_format<W: Write>(
        &self,
        mut writer: W,
        allowed: &AllowedPermissionSet,
    ) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, allowed)?;
        writeln!(writer)?;
        Ok(())
    }
}
