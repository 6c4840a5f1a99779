// Strongly-typed values for command-line arguments.
pub mod type_enums;
