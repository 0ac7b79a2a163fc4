use serde::Serialize;

/// Ordinal bucket for a candidate's percentage. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Classification {
    Insufficient,
    Regular,
    Good,
    Excellent,
}

impl Classification {
    /// Buckets a percentage expressed in tenths (`853` is 85.3%).
    pub const fn from_tenths(tenths: u32) -> Self {
        match tenths {
            850..=u32::MAX => Classification::Excellent,
            700..=849 => Classification::Good,
            500..=699 => Classification::Regular,
            _ => Classification::Insufficient,
        }
    }

    /// Label shown to the recruitment team.
    pub const fn label(self) -> &'static str {
        match self {
            Classification::Excellent => "Excelente",
            Classification::Good => "Bom",
            Classification::Regular => "Regular",
            Classification::Insufficient => "Insuficiente",
        }
    }
}
