use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::ACCEPT_LANGUAGE, request::Parts, HeaderMap},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    pub fn new(locale_str: &str) -> Option<Self> {
        if locale_str.is_empty() {
            return None;
        }

        let parts: Vec<&str> = locale_str.split(&['-', '_'][..]).collect();

        let language = parts.first()?.to_lowercase();
        if language.len() < 2 || language.len() > 3 {
            return None;
        }

        let region = parts.get(1).map(|r| r.to_uppercase());

        Some(Self { language, region })
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    #[must_use]
    pub fn to_bcp47(&self) -> String {
        match &self.region {
            Some(r) => format!("{}-{r}", self.language),
            None => self.language.clone(),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            region: None,
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_bcp47())
    }
}

/// Take the first tag of an `Accept-Language` header; defaults to `en`.
pub fn locale_from_headers(headers: &HeaderMap) -> Locale {
    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|header| header.split(',').next())
        .and_then(|first| first.split(';').next())
        .and_then(|tag| Locale::new(tag.trim()))
        .unwrap_or_default()
}

/// Locale negotiated from the `Accept-Language` header.
pub struct RequestLocale(pub Locale);

#[async_trait]
impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(locale_from_headers(&parts.headers)))
    }
}

/// Resolve a message key for a locale. Unknown keys echo the key back so a
/// missing catalog entry is visible instead of silent.
pub fn t(locale: &Locale, key: &str) -> String {
    let message: Option<&str> = match locale.language() {
        "pt" => message_pt_br(key),
        _ => message_en(key),
    };
    message.unwrap_or(key).to_string()
}

fn message_en(key: &str) -> Option<&'static str> {
    Some(match key {
        "crm.lead-not-found" => "Lead not found",
        "crm.lead-already-converted" => "Lead has already been converted",
        "crm.lead-contact-not-found" => "Lead contact not found",
        "crm.deal-not-found" => "Deal not found",
        "crm.organization-not-found" => "Organization not found",
        "crm.cadence-not-found" => "Cadence not found",
        "crm.cadence-application-not-found" => "Cadence application not found",
        "crm.cadence-not-active" => "Cadence is not active",
        "crm.cadence-has-no-steps" => "Cadence has no steps",
        "crm.cadence-already-applied" => "Cadence is already applied to this lead",
        "crm.cadence-transition-invalid" => "Cadence application does not allow this change",
        "crm.stage-not-in-pipeline" => "Stage does not belong to the deal's pipeline",
        "crm.deal-already-closed" => "Deal is already won or lost",
        "crm.stage-requires-contact" => "This stage requires a contact or organization",
        "crm.unauthorized" => "Authentication required",
        "crm.internal-error" => "Something went wrong, please try again",
        _ => return None,
    })
}

fn message_pt_br(key: &str) -> Option<&'static str> {
    Some(match key {
        "crm.lead-not-found" => "Lead não encontrado",
        "crm.lead-already-converted" => "O lead já foi convertido",
        "crm.lead-contact-not-found" => "Contato do lead não encontrado",
        "crm.deal-not-found" => "Negócio não encontrado",
        "crm.organization-not-found" => "Organização não encontrada",
        "crm.cadence-not-found" => "Cadência não encontrada",
        "crm.cadence-application-not-found" => "Aplicação de cadência não encontrada",
        "crm.cadence-not-active" => "A cadência não está ativa",
        "crm.cadence-has-no-steps" => "A cadência não possui etapas",
        "crm.cadence-already-applied" => "A cadência já foi aplicada a este lead",
        "crm.cadence-transition-invalid" => "A aplicação de cadência não permite esta mudança",
        "crm.stage-not-in-pipeline" => "A etapa não pertence ao funil deste negócio",
        "crm.deal-already-closed" => "O negócio já foi ganho ou perdido",
        "crm.stage-requires-contact" => "Esta etapa exige um contato ou organização",
        "crm.unauthorized" => "Autenticação necessária",
        "crm.internal-error" => "Algo deu errado, tente novamente",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language_and_region() {
        let locale = Locale::new("pt-BR").expect("valid");
        assert_eq!(locale.language(), "pt");
        assert_eq!(locale.region(), Some("BR"));
        assert_eq!(locale.to_bcp47(), "pt-BR");
    }

    #[test]
    fn rejects_malformed_tags() {
        assert!(Locale::new("").is_none());
        assert!(Locale::new("x").is_none());
        assert!(Locale::new("toolong").is_none());
    }

    #[test]
    fn translates_with_english_fallback() {
        let en = Locale::default();
        let pt = Locale::new("pt-BR").expect("valid");
        let de = Locale::new("de").expect("valid");
        assert_eq!(t(&en, "crm.deal-not-found"), "Deal not found");
        assert_eq!(t(&pt, "crm.deal-not-found"), "Negócio não encontrado");
        assert_eq!(t(&de, "crm.deal-not-found"), "Deal not found");
    }

    #[test]
    fn unknown_key_is_echoed() {
        assert_eq!(t(&Locale::default(), "crm.nope"), "crm.nope");
    }
}
