//! Lead records and their text layout for the staff chat.

use chrono::NaiveDateTime;

use crate::session::Answers;

/// Rendered in place of any answer that was never collected.
pub const PLACEHOLDER: &str = "—";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The person who submitted a lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub user_id: u64,
    pub username: Option<String>,
    pub full_name: Option<String>,
}

impl Sender {
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            username: None,
            full_name: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// `@username`, else the full name, else the placeholder.
    pub fn display(&self) -> String {
        if let Some(username) = self.username.as_deref().filter(|u| !u.is_empty()) {
            return format!("@{}", username);
        }
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => PLACEHOLDER.to_string(),
        }
    }
}

/// One completed intake, built right before delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRecord {
    pub audience: Option<String>,
    pub language: Option<String>,
    pub goal: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub sender: Sender,
    pub submitted_at: NaiveDateTime,
}

impl LeadRecord {
    pub fn new(answers: Answers, sender: Sender, submitted_at: NaiveDateTime) -> Self {
        Self {
            audience: answers.audience,
            language: answers.language,
            goal: answers.goal,
            name: answers.name,
            phone: answers.phone,
            sender,
            submitted_at,
        }
    }
}

fn or_placeholder(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(PLACEHOLDER)
}

/// Render a lead in the fixed layout posted to the staff chat.
pub fn format_lead(lead: &LeadRecord) -> String {
    format!(
        "🟢 New lead\n\
        Audience: {}\n\
        Language: {}\n\
        Goal: {}\n\
        Name: {}\n\
        Phone: {}\n\
        User: {} (id {})\n\
        Time: {}",
        or_placeholder(&lead.audience),
        or_placeholder(&lead.language),
        or_placeholder(&lead.goal),
        or_placeholder(&lead.name),
        or_placeholder(&lead.phone),
        lead.sender.display(),
        lead.sender.user_id,
        lead.submitted_at.format(TIME_FORMAT),
    )
}
