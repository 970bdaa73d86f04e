// Submit Use Case

pub mod submit;

#[cfg(test)]
mod submit_test;

pub use submit::{execute, validate_request, SubmitRequest};
