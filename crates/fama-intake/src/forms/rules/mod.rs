//! Declarative field rules and the single-pass validator shared by both lead forms.
//!
//! A [`FormSchema`] is an ordered list of [`FieldRule`]s. Rules are resolved top-down, and a
//! conditional rule's predicate only sees the values already resolved above it, so a chain
//! such as education level → status → institution → modality → shift is expressed as data.

mod checks;
mod submission;

pub use checks::{age_on, format_phone, is_phone, parse_birth_date, phone_digits};
pub use submission::{FieldValue, SubmissionRaw, ValidatedRecord};

use chrono::NaiveDate;
use serde::Serialize;

pub const NAME_FIELD: &str = "nome";
pub const PHONE_FIELD: &str = "whatsapp";

const UNKNOWN_FIELD_MESSAGE: &str = "Campo não permitido";

/// A single failed rule, reported back to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub value: Option<String>,
}

/// Predicate over fields resolved earlier in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Equals(&'static str, &'static str),
    OneOf(&'static str, &'static [&'static str]),
}

impl Condition {
    fn holds(&self, resolved: &ValidatedRecord) -> bool {
        match self {
            Condition::Equals(field, expected) => resolved.text(field) == Some(*expected),
            Condition::OneOf(field, allowed) => resolved
                .text(field)
                .map(|value| allowed.contains(&value))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Always,
    When(Condition),
}

/// Age gate applied to a birth date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeLimit {
    AtLeast(u32),
    Between(u32, u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    Text { min: usize, max: usize },
    Handle { min: usize, max: usize },
    Choice(Vec<&'static str>),
    Phone,
    BirthDate(AgeLimit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Normalize {
    Trim,
    CanonicalChoice,
    PhoneMask,
}

/// Rule for one field: when it applies, how it is normalized, and what it must satisfy.
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: &'static str,
    requirement: Requirement,
    check: FieldCheck,
    normalize: Normalize,
    missing_message: &'static str,
    invalid_message: Option<&'static str>,
}

impl FieldRule {
    fn new(name: &'static str, check: FieldCheck, normalize: Normalize) -> Self {
        Self {
            name,
            requirement: Requirement::Always,
            check,
            normalize,
            missing_message: "Campo obrigatório",
            invalid_message: None,
        }
    }

    pub fn text(name: &'static str, min: usize, max: usize) -> Self {
        Self::new(name, FieldCheck::Text { min, max }, Normalize::Trim)
    }

    /// Social handle: must start with `@`.
    pub fn handle(name: &'static str, min: usize, max: usize) -> Self {
        Self::new(name, FieldCheck::Handle { min, max }, Normalize::Trim)
    }

    pub fn choice<I>(name: &'static str, allowed: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        Self::new(
            name,
            FieldCheck::Choice(allowed.into_iter().collect()),
            Normalize::Trim,
        )
    }

    pub fn phone(name: &'static str) -> Self {
        Self::new(name, FieldCheck::Phone, Normalize::PhoneMask)
    }

    pub fn birth_date(name: &'static str, limit: AgeLimit) -> Self {
        Self::new(name, FieldCheck::BirthDate(limit), Normalize::Trim)
    }

    /// Only applies when `condition` holds; otherwise the field is recorded as absent.
    pub fn when(mut self, condition: Condition) -> Self {
        self.requirement = Requirement::When(condition);
        self
    }

    /// Matches choices ignoring case and rewrites them to the canonical casing.
    pub fn case_insensitive(mut self) -> Self {
        self.normalize = Normalize::CanonicalChoice;
        self
    }

    pub fn missing(mut self, message: &'static str) -> Self {
        self.missing_message = message;
        self
    }

    /// Overrides the message for choice and pattern failures.
    pub fn invalid(mut self, message: &'static str) -> Self {
        self.invalid_message = Some(message);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    pub fn allowed_values(&self) -> Option<&[&'static str]> {
        match &self.check {
            FieldCheck::Choice(allowed) => Some(allowed.as_slice()),
            _ => None,
        }
    }

    fn applies(&self, resolved: &ValidatedRecord) -> bool {
        match self.requirement {
            Requirement::Always => true,
            Requirement::When(condition) => condition.holds(resolved),
        }
    }

    /// Normalized value, `None` when blank.
    fn normalized(&self, raw: Option<&str>) -> Option<String> {
        let trimmed = raw.map(str::trim).filter(|value| !value.is_empty())?;
        let value = match self.normalize {
            Normalize::Trim => trimmed.to_string(),
            Normalize::PhoneMask => format_phone(trimmed),
            Normalize::CanonicalChoice => self
                .allowed_values()
                .and_then(|allowed| {
                    allowed
                        .iter()
                        .find(|option| option.to_lowercase() == trimmed.to_lowercase())
                })
                .map(|option| option.to_string())
                .unwrap_or_else(|| trimmed.to_string()),
        };
        Some(value)
    }

    fn check(&self, value: String, today: NaiveDate) -> Result<FieldValue, String> {
        match &self.check {
            FieldCheck::Text { min, max } => {
                check_length(&value, *min, *max)?;
                Ok(FieldValue::Text(value))
            }
            FieldCheck::Handle { min, max } => {
                if !value.starts_with('@') {
                    return Err(self.invalid_or("Deve começar com @"));
                }
                check_length(&value, *min, *max)?;
                Ok(FieldValue::Text(value))
            }
            FieldCheck::Choice(allowed) => {
                if allowed.contains(&value.as_str()) {
                    Ok(FieldValue::Text(value))
                } else {
                    Err(self.invalid_or("Selecione uma opção válida"))
                }
            }
            FieldCheck::Phone => {
                if is_phone(&value) {
                    Ok(FieldValue::Text(value))
                } else {
                    Err(self.invalid_or("Formato: (XX) XXXXX-XXXX"))
                }
            }
            FieldCheck::BirthDate(limit) => {
                let birth = parse_birth_date(&value)
                    .ok_or_else(|| "Data de nascimento inválida".to_string())?;
                let age = age_on(birth, today)
                    .ok_or_else(|| "Data de nascimento não pode ser no futuro".to_string())?;
                check_age(age, *limit)?;
                Ok(FieldValue::Date(birth))
            }
        }
    }

    fn invalid_or(&self, default: &str) -> String {
        self.invalid_message.unwrap_or(default).to_string()
    }
}

fn check_length(value: &str, min: usize, max: usize) -> Result<(), String> {
    let length = value.chars().count();
    if length < min {
        return Err(format!("Deve ter pelo menos {min} caracteres"));
    }
    if length > max {
        return Err(format!("Deve ter no máximo {max} caracteres"));
    }
    Ok(())
}

fn check_age(age: u32, limit: AgeLimit) -> Result<(), String> {
    match limit {
        AgeLimit::AtLeast(min) if age < min => Err(format!("Deve ter pelo menos {min} anos")),
        AgeLimit::Between(min, _) if age < min => Err(format!(
            "Você deve ter pelo menos {min} anos para se inscrever"
        )),
        AgeLimit::Between(min, max) if age > max => Err(format!(
            "Esta inscrição é destinada a pessoas de {min} a {max} anos"
        )),
        _ => Ok(()),
    }
}

/// Ordered rule set for one form. Built once and shared read-only.
#[derive(Debug, Clone)]
pub struct FormSchema {
    rules: Vec<FieldRule>,
}

impl FormSchema {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rule(name).is_some()
    }

    /// Validates every field in one pass and returns all failures together.
    pub fn validate(
        &self,
        raw: &SubmissionRaw,
        today: NaiveDate,
    ) -> Result<ValidatedRecord, Vec<FieldError>> {
        let mut resolved = ValidatedRecord::default();
        let mut errors = Vec::new();

        for rule in &self.rules {
            if !rule.applies(&resolved) {
                resolved.insert(rule.name, FieldValue::Absent);
                continue;
            }

            let submitted = raw.get(rule.name);
            let outcome = match rule.normalized(submitted) {
                None => Err(rule.missing_message.to_string()),
                Some(value) => rule.check(value, today),
            };

            match outcome {
                Ok(value) => resolved.insert(rule.name, value),
                Err(message) => errors.push(FieldError {
                    field: rule.name.to_string(),
                    message,
                    value: submitted.map(str::to_string),
                }),
            }
        }

        for name in raw.field_names().filter(|name| !self.contains(name)) {
            errors.push(FieldError {
                field: name.to_string(),
                message: UNKNOWN_FIELD_MESSAGE.to_string(),
                value: raw.get(name).map(str::to_string),
            });
        }

        if errors.is_empty() {
            Ok(resolved)
        } else {
            Err(errors)
        }
    }
}
