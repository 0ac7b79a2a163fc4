use chrono::NaiveDate;
use serde::Serialize;

use crate::forms::rules::{FieldError, ValidatedRecord, NAME_FIELD, PHONE_FIELD};
use crate::forms::store::{Contact, Stored};

use super::schema::{BIRTH_DATE_FIELD, HANDLE_FIELD};

/// Validated event sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRegistration {
    pub nome: String,
    pub whatsapp: String,
    pub nascimento: NaiveDate,
    pub instagram: String,
}

pub type RegistrationRecord = Stored<EventRegistration>;

impl Contact for EventRegistration {
    fn name(&self) -> &str {
        &self.nome
    }

    fn whatsapp(&self) -> &str {
        &self.whatsapp
    }
}

impl TryFrom<ValidatedRecord> for EventRegistration {
    type Error = FieldError;

    fn try_from(record: ValidatedRecord) -> Result<Self, Self::Error> {
        let text = |field: &str| {
            record
                .text(field)
                .map(str::to_string)
                .ok_or_else(|| missing(field))
        };

        Ok(Self {
            nome: text(NAME_FIELD)?,
            whatsapp: text(PHONE_FIELD)?,
            nascimento: record
                .date(BIRTH_DATE_FIELD)
                .ok_or_else(|| missing(BIRTH_DATE_FIELD))?,
            instagram: text(HANDLE_FIELD)?,
        })
    }
}

fn missing(field: &str) -> FieldError {
    FieldError {
        field: field.to_string(),
        message: "Campo obrigatório".to_string(),
        value: None,
    }
}
