//! Private Canvas configuration
//!
//! Credentials live in a local JSON file that is never committed. The
//! course URL is whatever the instructor copies out of the browser; the
//! API base and course id are derived from it.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::utils::error::{PublishError, PublishResult};

lazy_static! {
    static ref COURSE_URL: Regex = Regex::new(r"^(https?://[^/?#]+)(/[^?#]*)?").unwrap();
    static ref COURSE_PATH: Regex = Regex::new(r"/(?:api/v1/)?courses/(\d+)").unwrap();
}

/// Contents of the private config file
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasConfig {
    pub access_token: String,
    pub course_url: String,
}

impl CanvasConfig {
    /// Load and validate the config file.
    pub fn load(path: &Path) -> PublishResult<Self> {
        if !path.exists() {
            return Err(PublishError::config(format!(
                "config file not found: {}; create it from canvas_config.example.json and keep it private",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        let config: CanvasConfig = serde_json::from_str(&text).map_err(|err| {
            PublishError::config(format!("invalid JSON in {}: {}", path.display(), err))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> PublishResult<()> {
        if self.access_token.trim().is_empty() {
            return Err(PublishError::config("missing 'access_token'"));
        }
        if self.course_url.trim().is_empty() {
            return Err(PublishError::config("missing 'course_url'"));
        }
        Ok(())
    }

    /// Derive the API location from the configured course URL.
    pub fn course(&self) -> PublishResult<CourseLocation> {
        parse_course_url(self.course_url.trim())
    }
}

/// API base and course id derived from a browser course URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseLocation {
    /// e.g. `https://school.instructure.com/api/v1`
    pub api_base: String,
    pub course_id: String,
}

/// Parse a course URL like
/// `https://school.instructure.com/courses/12345` (an `api/v1` prefix on the
/// path is tolerated).
pub fn parse_course_url(url: &str) -> PublishResult<CourseLocation> {
    let caps = COURSE_URL.captures(url).filter(|c| c.get(1).is_some());
    let caps = caps.ok_or_else(|| {
        PublishError::config(
            "course_url must be a full URL, e.g. https://school.instructure.com/courses/12345",
        )
    })?;

    let base = caps[1].to_string();
    let path = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    let id = COURSE_PATH.captures(path).ok_or_else(|| {
        PublishError::config("could not find course id in course_url; expected .../courses/<id>")
    })?;

    Ok(CourseLocation {
        api_base: format!("{}/api/v1", base),
        course_id: id[1].to_string(),
    })
}
