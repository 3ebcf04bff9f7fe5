use std::{fmt, str::FromStr};

use anyhow::{bail, Result};
use serde::{Serialize, Serializer};

/// A fully-qualified IAM action such as `s3:GetObject`.
///
/// Ordering and equality follow the `service:action` string, byte-wise.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionIdentifier(String);

impl ActionIdentifier {
    pub const SEPARATOR: char = ':';

    pub fn new(service: &str, action: &str) -> Self {
        Self(format!("{service}{}{action}", Self::SEPARATOR))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn service(&self) -> &str {
        self.0.split_once(Self::SEPARATOR).map(|(service, _)| service).unwrap_or_default()
    }

    pub fn action(&self) -> &str {
        self.0.split_once(Self::SEPARATOR).map(|(_, action)| action).unwrap_or_default()
    }
}

impl FromStr for ActionIdentifier {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(Self::SEPARATOR) {
            Some((service, action))
                if !service.is_empty()
                    && !action.is_empty()
                    && !action.contains(Self::SEPARATOR) =>
            {
                Ok(Self::new(service, action))
            }
            _ => bail!("`{s}` is not a service:action identifier"),
        }
    }
}

impl fmt::Display for ActionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ActionIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for ActionIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn joins_service_and_action() {
        let id = ActionIdentifier::new("s3", "GetObject");
        assert_eq!(id.as_str(), "s3:GetObject");
        assert_eq!(id.service(), "s3");
        assert_eq!(id.action(), "GetObject");
    }

    #[test]
    fn parses_well_formed_identifiers() {
        let id: ActionIdentifier = "ec2:StartInstances".parse().unwrap();
        assert_eq!(id, ActionIdentifier::new("ec2", "StartInstances"));
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for bad in ["", "s3", ":GetObject", "s3:", "a:b:c"] {
            assert!(bad.parse::<ActionIdentifier>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn orders_case_sensitively() {
        let mut ids = vec![
            ActionIdentifier::new("s3", "getObject"),
            ActionIdentifier::new("s3", "GetObject"),
            ActionIdentifier::new("ec2", "StartInstances"),
        ];
        ids.sort();
        let names: Vec<_> = ids.iter().map(ActionIdentifier::as_str).collect();
        assert_eq!(names, ["ec2:StartInstances", "s3:GetObject", "s3:getObject"]);
    }
}
