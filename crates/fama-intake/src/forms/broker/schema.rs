use std::sync::OnceLock;

use crate::forms::rules::{AgeLimit, Condition, FieldRule, FormSchema, NAME_FIELD, PHONE_FIELD};

use super::scoring::AnswerPointsTable;

pub const RELATIONSHIP_OPTIONS: &[&str] = &[
    "Casado(a)",
    "Noivo(a)",
    "Namora",
    "Solteiro(a)",
    "Divorciado(a)",
    "Viúvo(a)",
];

const YES_NO: &[&str] = &["SIM", "NÃO"];

pub const EDUCATION_LEVELS: &[&str] = &[
    "Ensino Fundamental",
    "Ensino Médio",
    "Ensino Técnico",
    "Ensino Superior",
    "Pós-graduação",
    "Mestrado",
    "Doutorado",
];

/// Levels that ask for course details.
const DETAILED_EDUCATION: &[&str] = &[
    "Ensino Técnico",
    "Ensino Superior",
    "Pós-graduação",
    "Mestrado",
    "Doutorado",
];

const EDUCATION_STATUS: &[&str] = &["Concluido", "Cursando"];
const MODALITIES: &[&str] = &["Presencial", "EAD"];
const SHIFTS: &[&str] = &["Manhã", "Tarde", "Integral", "Noturno"];

const MINIMUM_AGE: u32 = 16;

/// Broker recruitment questionnaire, in the order the form presents it.
pub fn questionnaire_schema() -> &'static FormSchema {
    static SCHEMA: OnceLock<FormSchema> = OnceLock::new();
    SCHEMA.get_or_init(build_schema)
}

fn build_schema() -> FormSchema {
    let mut rules = vec![
        // personal data
        FieldRule::text(NAME_FIELD, 2, 255).missing("Nome é obrigatório"),
        FieldRule::phone(PHONE_FIELD)
            .missing("WhatsApp é obrigatório")
            .invalid("WhatsApp deve estar no formato (XX) XXXXX-XXXX"),
        FieldRule::birth_date("nascimento", AgeLimit::AtLeast(MINIMUM_AGE))
            .missing("Data de nascimento é obrigatória"),
        FieldRule::handle("instagram", 2, 100)
            .missing("Instagram é obrigatório")
            .invalid("Instagram deve começar com @"),
        FieldRule::choice("relacionamento", RELATIONSHIP_OPTIONS.iter().copied())
            .case_insensitive()
            .missing("Estado de relacionamento é obrigatório")
            .invalid("Selecione uma opção válida para relacionamento"),
        FieldRule::choice("temFilho", YES_NO.iter().copied()).invalid("Selecione SIM ou NÃO"),
        FieldRule::choice("religiao", YES_NO.iter().copied()).invalid("Selecione SIM ou NÃO"),
        FieldRule::text("qualReligiao", 1, 100)
            .when(Condition::Equals("religiao", "SIM"))
            .missing("Informe qual religião quando responder SIM"),
        FieldRule::text("cidadeNascimento", 1, 100)
            .missing("Cidade de nascimento é obrigatória"),
        FieldRule::text("cidadeMora", 1, 100).missing("Cidade onde mora é obrigatória"),
        FieldRule::text("comQuemMora", 1, 200).missing("Informe com quem mora"),
        // academic history
        FieldRule::choice("formacaoAcademica", EDUCATION_LEVELS.iter().copied())
            .missing("Formação acadêmica é obrigatória"),
        FieldRule::choice("statusFormacao", EDUCATION_STATUS.iter().copied())
            .when(Condition::OneOf("formacaoAcademica", DETAILED_EDUCATION))
            .missing("Status da formação é obrigatório para formação superior")
            .invalid("Selecione se concluiu ou está cursando"),
        FieldRule::text("instituicao", 1, 200)
            .when(Condition::OneOf("statusFormacao", EDUCATION_STATUS))
            .missing("Nome da instituição é obrigatório"),
        FieldRule::text("curso", 1, 200)
            .when(Condition::OneOf("statusFormacao", EDUCATION_STATUS))
            .missing("Nome do curso é obrigatório"),
        FieldRule::text("periodoAtual", 1, 50)
            .when(Condition::Equals("statusFormacao", "Cursando"))
            .missing("Período atual é obrigatório para quem está cursando"),
        FieldRule::choice("modalidade", MODALITIES.iter().copied())
            .when(Condition::Equals("statusFormacao", "Cursando"))
            .missing("Modalidade é obrigatória para quem está cursando")
            .invalid("Selecione Presencial ou EAD"),
        FieldRule::choice("turno", SHIFTS.iter().copied())
            .when(Condition::Equals("modalidade", "Presencial"))
            .missing("Turno é obrigatório para modalidade presencial")
            .invalid("Selecione um turno válido"),
        // motivation
        FieldRule::text("motivoCorretor", 10, 1000),
        FieldRule::text("conheceMercado", 10, 1000),
    ];

    // behavioural profile: allowed answers are exactly the scored ones
    rules.extend(
        AnswerPointsTable::standard()
            .questions()
            .iter()
            .map(|question| FieldRule::choice(question.key(), question.answers())),
    );
    rules.push(FieldRule::text("decisaoRapida", 10, 1000));

    FormSchema::new(rules)
}
