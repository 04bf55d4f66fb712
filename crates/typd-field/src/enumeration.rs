//! # Enumeration Fields
//!
//! An [`EnumDef`] names an enumeration and its members. Its field accepts
//! [`EnumMember`] values of that enumeration, and member names given as
//! text, which are normalized to `EnumMember`s.

use typd_core::{EnumMember, ValidationError, ValidationResult, Value};

use crate::field::type_mismatch;

/// A declared enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    name: String,
    members: Vec<String>,
}

impl EnumDef {
    /// Declare enumeration `name` with `members` in order.
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Enumeration name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member names in declaration order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// The member called `member`, if declared.
    pub fn member(&self, member: &str) -> Option<EnumMember> {
        self.members
            .iter()
            .any(|m| m == member)
            .then(|| EnumMember::new(self.name.clone(), member))
    }
}

/// Field accepting members of one enumeration.
#[derive(Debug, Clone)]
pub struct EnumField {
    def: EnumDef,
}

impl EnumField {
    /// Field for `def`.
    pub fn new(def: EnumDef) -> Self {
        Self { def }
    }

    /// The enumeration.
    pub fn def(&self) -> &EnumDef {
        &self.def
    }

    pub(crate) fn check(&self, name: &str) -> ValidationResult<()> {
        if self.def.members.is_empty() {
            return Err(ValidationError::invalid_declaration(
                name,
                format!("enumeration {} has no members", self.def.name),
            ));
        }
        Ok(())
    }

    pub(crate) fn validate(&self, name: &str, value: Value) -> ValidationResult<Value> {
        let member = match &value {
            Value::Enum(m) if m.enum_name == self.def.name => m.member.as_str(),
            Value::Str(s) => s.as_str(),
            other => {
                return Err(type_mismatch(
                    name,
                    &format!("a member of {}", self.def.name),
                    other,
                ))
            }
        };
        match self.def.member(member) {
            Some(m) => Ok(Value::Enum(m)),
            None => Err(ValidationError::invalid_value(
                name,
                format!("Expected one of {}; Got {value}", self.def.members.join(", ")),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue() -> EnumDef {
        EnumDef::new("Venue", ["NYSE", "CBOT", "AMEX", "NASDAQ"])
    }

    #[test]
    fn members_and_names_are_accepted() {
        let f = EnumField::new(venue());
        let nyse = Value::Enum(EnumMember::new("Venue", "NYSE"));
        assert_eq!(f.validate("venue", nyse.clone()).unwrap(), nyse);
        assert_eq!(f.validate("venue", Value::from("NYSE")).unwrap(), nyse);
    }

    #[test]
    fn unknown_member_is_a_value_error() {
        let err = EnumField::new(venue())
            .validate("venue", Value::from("LSE"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "venue: Expected one of NYSE, CBOT, AMEX, NASDAQ; Got 'LSE'"
        );
        assert!(err.is_value_error());
    }

    #[test]
    fn other_enumerations_are_type_errors() {
        let err = EnumField::new(venue())
            .validate("venue", Value::Enum(EnumMember::new("Side", "BUY")))
            .unwrap_err();
        assert!(err.is_type_error());
        assert!(err.to_string().contains("Expected a member of Venue"));
    }

    #[test]
    fn empty_enumeration_is_rejected() {
        let f = EnumField::new(EnumDef::new("Empty", Vec::<String>::new()));
        assert!(f.check("e").is_err());
    }
}
