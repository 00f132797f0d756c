use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// Payload
///
/// Read-only access to the string fields of a request body, looked up by the
/// same path names the schemas use.
pub trait Payload {
    fn field(&self, path: &str) -> Option<&str>;
}

/// Rule
///
/// A single declarative predicate on one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present and not blank.
    Required,
    MinLength(usize),
    MaxLength(usize),
    ExactLength(usize),
    /// Upper bound on the UTF-8 encoded size.
    MaxBytes(usize),
    /// Basic `local@domain.tld` shape.
    Email,
}

/// FieldRule
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub path: &'static str,
    pub rule: Rule,
    pub message: &'static str,
}

const fn rule(path: &'static str, rule: Rule, message: &'static str) -> FieldRule {
    FieldRule {
        path,
        rule,
        message,
    }
}

/// Schema
///
/// An ordered list of field rules. Violations are reported in this order.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub rules: &'static [FieldRule],
}

/// Mode
///
/// `Full` checks every rule. `Partial` only checks fields that are present in
/// the payload, against the same rules (a present but blank field still fails
/// `Required`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Full,
    Partial,
}

/// FieldError
///
/// One violated rule: the field path and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// ValidationFailure
///
/// Every violated rule of one validation pass, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed for {} field(s)", .errors.len())]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    /// The distinct field paths that failed, in order.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        for error in &self.errors {
            if !paths.contains(&error.path.as_str()) {
                paths.push(&error.path);
            }
        }
        paths
    }
}

// --- Schemas ---

const PROFILE_RULES: [FieldRule; 6] = [
    rule("fullname", Rule::Required, "Full name is required"),
    rule("fullname", Rule::MinLength(2), "Full name must contain at least 2 characters"),
    rule("profession", Rule::Required, "Profession is required"),
    rule("city", Rule::Required, "City is required"),
    rule("contact", Rule::Required, "Contact is required"),
    rule("contact", Rule::ExactLength(10), "Contact must contain exactly 10 characters"),
];

const CREDENTIAL_RULES: [FieldRule; 5] = [
    rule("email", Rule::Required, "Email is required"),
    rule("email", Rule::Email, "Email is invalid"),
    rule("password", Rule::Required, "Password is required"),
    rule("password", Rule::MinLength(6), "Password must contain at least 6 characters"),
    rule("password", Rule::MaxBytes(72), "Password must not exceed 72 bytes"),
];

const USER_RULES: [FieldRule; 11] = [
    PROFILE_RULES[0],
    PROFILE_RULES[1],
    CREDENTIAL_RULES[0],
    CREDENTIAL_RULES[1],
    PROFILE_RULES[2],
    PROFILE_RULES[3],
    PROFILE_RULES[4],
    PROFILE_RULES[5],
    CREDENTIAL_RULES[2],
    CREDENTIAL_RULES[3],
    CREDENTIAL_RULES[4],
];

/// Registration: every profile field plus email and password.
pub static USER_SCHEMA: Schema = Schema {
    name: "user",
    rules: &USER_RULES,
};

/// Profile update: only the mutable profile fields.
pub static USER_PROFILE_SCHEMA: Schema = Schema {
    name: "user_profile",
    rules: &PROFILE_RULES,
};

/// Login: email shape and a non-blank password. Length rules are not applied
/// here so a wrong password is reported as a credential mismatch.
pub static LOGIN_SCHEMA: Schema = Schema {
    name: "login",
    rules: &[
        CREDENTIAL_RULES[0],
        CREDENTIAL_RULES[1],
        CREDENTIAL_RULES[2],
    ],
};

pub static ARTICLE_SCHEMA: Schema = Schema {
    name: "article",
    rules: &[
        rule("title", Rule::Required, "Article title is required"),
        rule("title", Rule::MinLength(2), "Article title must contain at least 2 characters"),
        rule("type", Rule::Required, "Article type is required"),
        rule("content", Rule::Required, "Article content is required"),
        rule("author", Rule::Required, "Article author is required"),
    ],
};

// --- Validation ---

/// validate
///
/// Checks `payload` against every rule of `schema` without stopping at the first
/// violation. A missing or blank field yields only its `Required` violation; the
/// other rules of that field are evaluated only once a value is there.
pub fn validate(
    schema: &Schema,
    payload: &impl Payload,
    mode: Mode,
) -> Result<(), ValidationFailure> {
    let mut errors = Vec::new();

    for field_rule in schema.rules {
        let value = payload.field(field_rule.path);

        if mode == Mode::Partial && value.is_none() {
            continue;
        }

        let blank = value.is_none_or(|v| v.trim().is_empty());
        let violated = match (field_rule.rule, value) {
            (Rule::Required, _) => blank,
            (_, _) if blank => false,
            (_, None) => false,
            (Rule::MinLength(min), Some(v)) => v.chars().count() < min,
            (Rule::MaxLength(max), Some(v)) => v.chars().count() > max,
            (Rule::ExactLength(len), Some(v)) => v.chars().count() != len,
            (Rule::MaxBytes(max), Some(v)) => v.len() > max,
            (Rule::Email, Some(v)) => !is_email(v),
        };

        if violated {
            errors.push(FieldError {
                path: field_rule.path.to_string(),
                message: field_rule.message.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(schema = schema.name, count = errors.len(), "payload rejected");
        Err(ValidationFailure { errors })
    }
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty() && !host.starts_with('.') && !host.ends_with('.') && tld.len() >= 2
        }
        None => false,
    }
}
