//! Notification content composition backed by Handlebars.

use handlebars::Handlebars;
use serde_json::Value;
use tracing::{debug, warn};

use crate::Result;

const USER_CREATED_SUBJECT: &str = "Welcome to Our Platform";
const USER_CREATED_HTML: &str = "<h1>Welcome, {{firstname}}!</h1>\
<p>Your account has been created.</p>\
<p><strong>Username:</strong> {{username}}</p>\
<p><strong>Password:</strong> {{password}}</p>\
<p><a href=\"{{loginurl}}\">Login Here</a></p>";

const LICENSE_ALLOCATION_SUBJECT: &str = "Course License Assigned";
const LICENSE_ALLOCATION_HTML: &str = "<h1>Hello {{firstname}}</h1>\
<p>You have been assigned a license for the course: <strong>{{course_name}}</strong></p>\
<p>License: {{license_name}}</p>";

/// Subject used when no specific template applies.
pub const GENERIC_SUBJECT: &str = "Notification";
/// Body used when no specific template applies.
pub const GENERIC_HTML: &str = "<p>You have a new notification.</p>";

/// Kind of notification a job carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// An account was created for the recipient.
    UserCreated,
    /// A course license was granted to the recipient.
    LicenseAllocation,
    /// Anything else.
    Generic,
}

impl NotificationKind {
    /// Map a job type string to a notification kind.
    pub fn from_job_type(job_type: &str) -> Self {
        match job_type {
            "user_created" => Self::UserCreated,
            "license_allocation" => Self::LicenseAllocation,
            _ => Self::Generic,
        }
    }

    fn template_name(self) -> &'static str {
        match self {
            Self::UserCreated => "user_created",
            Self::LicenseAllocation => "license_allocation",
            Self::Generic => "generic",
        }
    }
}

/// A composed subject and HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
}

impl Composed {
    fn generic() -> Self {
        Self {
            subject: GENERIC_SUBJECT.to_string(),
            html: GENERIC_HTML.to_string(),
        }
    }
}

/// Renders notification content for a recipient.
///
/// Interpolated values are HTML-escaped and absent fields render empty.
pub struct Composer {
    handlebars: Handlebars<'static>,
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer").finish_non_exhaustive()
    }
}

impl Composer {
    /// Create a composer with the built-in templates registered.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);

        let builtin = [
            (NotificationKind::UserCreated, USER_CREATED_SUBJECT, USER_CREATED_HTML),
            (
                NotificationKind::LicenseAllocation,
                LICENSE_ALLOCATION_SUBJECT,
                LICENSE_ALLOCATION_HTML,
            ),
            (NotificationKind::Generic, GENERIC_SUBJECT, GENERIC_HTML),
        ];

        for (kind, subject, html) in builtin {
            let name = kind.template_name();
            handlebars.register_template_string(&format!("{name}/subject"), subject)?;
            handlebars.register_template_string(&format!("{name}/html"), html)?;
        }

        debug!("Registered built-in notification templates");
        Ok(Self { handlebars })
    }

    /// Compose the subject and body for one recipient.
    ///
    /// Overrides win only when both are present and non-empty. This never
    /// fails; a render error falls back to the generic notification.
    pub fn compose(
        &self,
        job_type: &str,
        data: &Value,
        override_subject: Option<&str>,
        override_html: Option<&str>,
    ) -> Composed {
        if let (Some(subject), Some(html)) = (
            override_subject.filter(|s| !s.is_empty()),
            override_html.filter(|s| !s.is_empty()),
        ) {
            return Composed {
                subject: subject.to_string(),
                html: html.to_string(),
            };
        }

        let kind = NotificationKind::from_job_type(job_type);
        match self.render(kind, data) {
            Ok(composed) => composed,
            Err(e) => {
                warn!(job_type = %job_type, error = %e, "Template render failed, using generic notification");
                Composed::generic()
            }
        }
    }

    fn render(&self, kind: NotificationKind, data: &Value) -> Result<Composed> {
        let name = kind.template_name();
        let subject = self.handlebars.render(&format!("{name}/subject"), data)?;
        let html = self.handlebars.render(&format!("{name}/html"), data)?;
        Ok(Composed { subject, html })
    }
}
