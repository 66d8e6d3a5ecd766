//! Canvas assignment REST client
//!
//! Builds the form-encoded assignment payload and performs the create or
//! update call. Every request publishes the assignment. A dry-run mode
//! prints the payload instead of sending it.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::config::CourseLocation;
use crate::utils::error::{PublishError, PublishResult};

/// Submission types the Canvas API accepts
pub const SUBMISSION_TYPES: [&str; 8] = [
    "on_paper",
    "none",
    "online_text_entry",
    "online_url",
    "online_upload",
    "media_recording",
    "student_annotation",
    "external_tool",
];

lazy_static! {
    static ref BODY: Regex = Regex::new(r"(?is)<body[^>]*>(.*?)</body>").unwrap();
}

/// Pull the body fragment out of a standalone HTML page. Canvas descriptions
/// take fragments only; a page without a `<body>` is assumed to be one.
pub fn extract_body_if_full_html(text: &str) -> String {
    match BODY.captures(text) {
        Some(caps) => caps[1].trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// Fields for an assignment create or update call
#[derive(Debug, Clone, Default)]
pub struct AssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub points: Option<f64>,
    pub due_at: Option<String>,
    pub unlock_at: Option<String>,
    pub lock_at: Option<String>,
    submission_type: String,
}

impl AssignmentRequest {
    /// Create a request with the given submission type.
    pub fn new(submission_type: &str) -> PublishResult<Self> {
        if !SUBMISSION_TYPES.contains(&submission_type) {
            return Err(PublishError::invalid(format!(
                "unknown submission type '{}'; expected one of: {}",
                submission_type,
                SUBMISSION_TYPES.join(", ")
            )));
        }
        Ok(AssignmentRequest {
            submission_type: submission_type.to_string(),
            ..Default::default()
        })
    }

    /// Encode as Canvas form fields. Published is always true; optional
    /// fields are omitted when unset so updates leave them untouched.
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("assignment[published]".to_string(), "true".to_string()),
            (
                "assignment[submission_types][]".to_string(),
                self.submission_type.clone(),
            ),
        ];
        if let Some(title) = &self.title {
            fields.push(("assignment[name]".to_string(), title.clone()));
        }
        if let Some(description) = &self.description {
            if !description.is_empty() {
                fields.push(("assignment[description]".to_string(), description.clone()));
            }
        }
        if let Some(points) = self.points {
            fields.push(("assignment[points_possible]".to_string(), points.to_string()));
        }
        if let Some(due_at) = &self.due_at {
            fields.push(("assignment[due_at]".to_string(), due_at.clone()));
        }
        if let Some(unlock_at) = &self.unlock_at {
            fields.push(("assignment[unlock_at]".to_string(), unlock_at.clone()));
        }
        if let Some(lock_at) = &self.lock_at {
            fields.push(("assignment[lock_at]".to_string(), lock_at.clone()));
        }
        fields
    }
}

/// What Canvas reported back (all fields empty on a dry run)
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub id: Option<u64>,
    pub html_url: Option<String>,
    pub published: bool,
}

/// Client for the Canvas assignments API
#[derive(Debug)]
pub struct CanvasClient {
    course: CourseLocation,
    token: String,
    http: reqwest::blocking::Client,
    dry_run: bool,
}

impl CanvasClient {
    pub fn new(course: CourseLocation, token: impl Into<String>) -> Self {
        CanvasClient {
            course,
            token: token.into(),
            http: reqwest::blocking::Client::new(),
            dry_run: false,
        }
    }

    /// Print payloads instead of calling the API.
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    fn assignments_url(&self) -> String {
        format!(
            "{}/courses/{}/assignments",
            self.course.api_base, self.course.course_id
        )
    }

    /// Create and publish a new assignment. A title is mandatory here,
    /// unlike updates.
    pub fn create_assignment(&self, request: &AssignmentRequest) -> PublishResult<PublishOutcome> {
        if request
            .title
            .as_deref()
            .map_or(true, |title| title.trim().is_empty())
        {
            return Err(PublishError::invalid(
                "a title is required when creating a new assignment",
            ));
        }
        self.send(reqwest::Method::POST, &self.assignments_url(), request)
    }

    /// Update (and publish) an existing assignment.
    pub fn update_assignment(
        &self,
        assignment_id: &str,
        request: &AssignmentRequest,
    ) -> PublishResult<PublishOutcome> {
        let url = format!("{}/{}", self.assignments_url(), assignment_id);
        self.send(reqwest::Method::PUT, &url, request)
    }

    fn send(
        &self,
        method: reqwest::Method,
        url: &str,
        request: &AssignmentRequest,
    ) -> PublishResult<PublishOutcome> {
        let fields = request.fields();

        if self.dry_run {
            println!("DRY RUN: {} {}", method, url);
            for (key, value) in &fields {
                println!("  {}={}", key, value);
            }
            return Ok(PublishOutcome {
                id: None,
                html_url: None,
                published: true,
            });
        }

        let response = self
            .http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&fields)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(PublishError::http(status.as_u16(), body));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|err| PublishError::invalid(format!("unexpected Canvas response: {}", err)))?;
        Ok(PublishOutcome {
            id: value.get("id").and_then(Value::as_u64),
            html_url: value
                .get("html_url")
                .and_then(Value::as_str)
                .map(str::to_string),
            published: value
                .get("published")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_body_from_full_page() {
        let page = "<!DOCTYPE html><html><body class=\"x\">\n<p>hi</p>\n</body></html>";
        assert_eq!(extract_body_if_full_html(page), "<p>hi</p>");
    }

    #[test]
    fn test_fragment_passes_through_trimmed() {
        assert_eq!(extract_body_if_full_html("  <p>hi</p>  "), "<p>hi</p>");
    }

    #[test]
    fn test_unknown_submission_type_rejected() {
        let err = AssignmentRequest::new("carrier_pigeon").unwrap_err();
        assert!(err.to_string().contains("carrier_pigeon"));
    }

    #[test]
    fn test_fields_always_publish() {
        let request = AssignmentRequest::new("on_paper").unwrap();
        let fields = request.fields();
        assert_eq!(
            fields[0],
            ("assignment[published]".to_string(), "true".to_string())
        );
        assert_eq!(
            fields[1],
            (
                "assignment[submission_types][]".to_string(),
                "on_paper".to_string()
            )
        );
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_optional_fields_included_when_set() {
        let mut request = AssignmentRequest::new("online_upload").unwrap();
        request.title = Some("HW 3".to_string());
        request.points = Some(10.0);
        request.due_at = Some("2026-04-01T23:59:00-05:00".to_string());
        let fields = request.fields();
        assert!(fields.contains(&("assignment[name]".to_string(), "HW 3".to_string())));
        assert!(fields.contains(&("assignment[points_possible]".to_string(), "10".to_string())));
        assert!(fields
            .iter()
            .any(|(key, _)| key == "assignment[due_at]"));
        assert!(!fields.iter().any(|(key, _)| key == "assignment[lock_at]"));
    }

    #[test]
    fn test_create_requires_title() {
        let course = CourseLocation {
            api_base: "https://x.test/api/v1".to_string(),
            course_id: "1".to_string(),
        };
        let client = CanvasClient::new(course, "token").dry_run(true);
        let request = AssignmentRequest::new("on_paper").unwrap();
        assert!(client.create_assignment(&request).is_err());
    }

    #[test]
    fn test_dry_run_does_not_touch_the_network() {
        let course = CourseLocation {
            api_base: "https://x.test/api/v1".to_string(),
            course_id: "1".to_string(),
        };
        let client = CanvasClient::new(course, "token").dry_run(true);
        let mut request = AssignmentRequest::new("on_paper").unwrap();
        request.title = Some("HW 1".to_string());
        let outcome = client.create_assignment(&request).unwrap();
        assert!(outcome.published);
        assert!(outcome.id.is_none());
    }
}
