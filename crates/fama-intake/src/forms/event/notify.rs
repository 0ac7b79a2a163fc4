use serde::Serialize;

use crate::forms::rules::phone_digits;
use crate::forms::store::Contact;

const COUNTRY_CODE: &str = "55";

/// Outbound WhatsApp text addressed to a registrant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationMessage {
    pub number: String,
    pub text: String,
}

impl ConfirmationMessage {
    /// Confirmation for a new event registration. The number is `55` followed by the phone digits.
    pub fn for_registrant<C: Contact>(registrant: &C) -> Self {
        Self {
            number: format!("{COUNTRY_CODE}{}", phone_digits(registrant.whatsapp())),
            text: confirmation_text(registrant.name()),
        }
    }
}

fn confirmation_text(name: &str) -> String {
    format!(
        "🎉 *Inscrição Confirmada!*\n\
         \n\
         Olá, *{name}*!\n\
         \n\
         Sua inscrição para o evento da *Fama*: *Quero ser um Corretor de Imóveis* foi realizada com sucesso! ✅\n\
         \n\
         📅 Em breve entraremos em contato com você com todos os detalhes da apresentação\n\
         \n\
         📱 Fique atento aqui no Whatsapp.\n\
         \n\
         Obrigado por participar conosco!\n\
         \n\
         *Equipe Fama Negócios Imobiliários*\n\
         🏡💼"
    )
}

/// Outbound messaging hook (WhatsApp gateway adapters, test doubles).
pub trait ConfirmationNotifier: Send + Sync {
    fn send(&self, message: &ConfirmationMessage) -> Result<(), NotifyError>;
}

/// Confirmation dispatch error. Never fails a registration.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("whatsapp number does not exist: {0}")]
    UnknownNumber(String),
}
