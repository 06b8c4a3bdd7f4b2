use serde_json::Value;
use validator::Validate;

use crate::domain::contact_email::ContactEmail;
use crate::domain::contact_form::{ContactFormData, Field};
use crate::domain::field_errors::FieldErrors;

/// A contact message that has passed every field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    name: String,
    email: ContactEmail,
    subject: String,
    message: String,
}

/// Runs the field rules against an untyped, decoded request body.
pub fn validate(input: &Value) -> Result<ContactSubmission, FieldErrors> {
    ContactSubmission::parse(input)
}

impl ContactSubmission {
    /// Anything that is not a JSON object is treated as an empty record.
    /// Missing, `null` and non-string fields are reported alongside rule
    /// violations; extra keys are ignored.
    pub fn parse(input: &Value) -> Result<Self, FieldErrors> {
        let record = input.as_object();
        let mut shape_errors = FieldErrors::default();
        let mut form = ContactFormData::default();

        for field in Field::ALL {
            match record.and_then(|r| r.get(field.as_str())) {
                None | Some(Value::Null) => {
                    shape_errors.add(field.as_str(), format!("{} is required.", field.label()))
                }
                Some(Value::String(value)) => *form.get_mut(field) = value.clone(),
                Some(_) => shape_errors.add(
                    field.as_str(),
                    format!("{} must be a string.", field.label()),
                ),
            }
        }

        match Self::try_from(form) {
            Ok(submission) if shape_errors.is_empty() => Ok(submission),
            Ok(_) => Err(shape_errors),
            Err(rule_errors) => {
                shape_errors.extend_absent(rule_errors);
                Err(shape_errors)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &ContactEmail {
        &self.email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl TryFrom<ContactFormData> for ContactSubmission {
    type Error = FieldErrors;

    fn try_from(form: ContactFormData) -> Result<Self, Self::Error> {
        form.validate()?;
        let email = ContactEmail::parse(form.email).map_err(|e| {
            let mut errors = FieldErrors::default();
            errors.add(Field::Email.as_str(), e);
            errors
        })?;
        Ok(Self {
            name: form.name,
            email,
            subject: form.subject,
            message: form.message,
        })
    }
}

impl From<&ContactSubmission> for ContactFormData {
    fn from(submission: &ContactSubmission) -> Self {
        Self {
            name: submission.name.clone(),
            email: submission.email.as_ref().to_string(),
            subject: submission.subject.clone(),
            message: submission.message.clone(),
        }
    }
}
