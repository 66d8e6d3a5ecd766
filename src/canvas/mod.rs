//! Canvas LMS publishing
//!
//! Everything needed to push a converted assignment to Canvas: the private
//! local config file, natural-language due date parsing, and the REST
//! client. Conversion never depends on this module; it is the outer layer.

pub mod config;
pub mod due_date;
pub mod publish;

pub use config::{CanvasConfig, CourseLocation};
pub use due_date::{format_due_at, parse_due_date};
pub use publish::{
    extract_body_if_full_html, AssignmentRequest, CanvasClient, PublishOutcome, SUBMISSION_TYPES,
};
