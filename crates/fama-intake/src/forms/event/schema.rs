use std::sync::OnceLock;

use crate::forms::rules::{AgeLimit, FieldRule, FormSchema, NAME_FIELD, PHONE_FIELD};

pub const MINIMUM_AGE: u32 = 20;
pub const MAXIMUM_AGE: u32 = 30;

pub(crate) const BIRTH_DATE_FIELD: &str = "nascimento";
pub(crate) const HANDLE_FIELD: &str = "instagram";

pub fn registration_schema() -> &'static FormSchema {
    static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        FormSchema::new(vec![
            FieldRule::text(NAME_FIELD, 2, 255).missing("Nome é obrigatório"),
            FieldRule::phone(PHONE_FIELD)
                .missing("WhatsApp é obrigatório")
                .invalid("WhatsApp deve estar no formato (XX) XXXXX-XXXX"),
            FieldRule::birth_date(BIRTH_DATE_FIELD, AgeLimit::Between(MINIMUM_AGE, MAXIMUM_AGE))
                .missing("Data de nascimento é obrigatória"),
            FieldRule::handle(HANDLE_FIELD, 2, 100)
                .missing("Instagram é obrigatório")
                .invalid("Instagram deve começar com @"),
        ])
    })
}
