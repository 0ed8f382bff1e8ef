pub mod field_set;
pub mod invoice;
pub mod submission;
