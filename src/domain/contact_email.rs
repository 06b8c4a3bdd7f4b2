use crate::domain::contact_form::INVALID_EMAIL;

/// An email address in `local@domain` form whose domain has at least one dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail(String);

impl ContactEmail {
    pub fn parse(s: String) -> Result<ContactEmail, String> {
        if is_valid_email(&s) {
            Ok(Self(s))
        } else {
            Err(INVALID_EMAIL.to_string())
        }
    }
}

pub(crate) fn is_valid_email(s: &str) -> bool {
    // validator accepts dotless domains such as `user@localhost` and
    // address literals such as `user@[127.0.0.1]`
    validator::validate_email(s)
        && s.rsplit_once('@')
            .map(|(_, domain)| !domain.starts_with('[') && domain.contains('.'))
            .unwrap_or(false)
}

impl AsRef<str> for ContactEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContactEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
