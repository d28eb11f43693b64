pub mod answers;
pub mod types;

pub use answers::{answer_number, answer_text, is_answered, Answers};
pub use types::{
    ApplicantType, Category, Document, DocumentStatus, FieldType, FormField, Template,
    UnknownVariant, ValidationRules,
};
