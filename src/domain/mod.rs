mod contact_email;
mod contact_form;
mod contact_submission;
mod field_errors;
mod submission_result;

// expose chosen features on a sub-crate level
pub use contact_email::ContactEmail;
pub use contact_form::ContactFormData;
pub use contact_form::Field;
pub use contact_submission::validate;
pub use contact_submission::ContactSubmission;
pub use field_errors::FieldErrors;
pub use submission_result::SubmissionResult;
