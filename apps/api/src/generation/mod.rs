// Resume adaptation: validate the submission, call the external generation
// service, render the annotated output through the markup transformer.

pub mod client;
pub mod handlers;
pub mod models;
pub mod validation;
