use thiserror::Error;

use crate::config::FormOptions;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct OptionsValidator;

impl OptionsValidator {
    pub fn validate(options: &FormOptions) -> Result<(), Vec<ValidationError>> {
        let classes = &options.custom_classes;
        let roles = [
            ("field", &classes.field),
            ("input", &classes.input),
            ("label", &classes.label),
            ("required", &classes.required),
            ("boolean", &classes.boolean),
            ("enumeration", &classes.enumeration),
            ("button", &classes.button),
        ];

        let errors: Vec<ValidationError> = roles
            .into_iter()
            .chain(classes.extra.iter().map(|(role, token)| (role.as_str(), token)))
            .filter_map(|(role, token)| Self::validate_token(role, token).err())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    // Class tokens end up inside attribute values
    fn validate_token(role: &str, token: &str) -> Result<(), ValidationError> {
        if let Some(bad) = token.chars().find(|c| matches!(c, '"' | '\'' | '<' | '>' | '\n')) {
            return Err(ValidationError::InvalidValue {
                field: format!("custom_classes.{}", role),
                reason: format!("class token contains {:?}", bad),
            });
        }
        Ok(())
    }
}
