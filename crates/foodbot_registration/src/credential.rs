// --- File: crates/foodbot_registration/src/credential.rs ---
//
// Turning whatever the kiosk, the card reader or the mobile link hands us
// into a user from the directory.

use crate::logic::RegistrationError;
use foodbot_common::validation::{
    strip_kiosk_prefix, truncate_chars, CARD_ID_MAX, KIOSK_QR_PREFIX, PERSONAL_NUMBER_MAX,
};
use foodbot_common::User;
use foodbot_db::{Repositories, UserRepository};
use serde::Deserialize;
use tracing::{debug, warn};

/// How a user identifies at a terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    PersonalNumber(String),
    CardId(String),
    MobileToken(String),
    /// Raw keyboard-wedge input: a typed personal number, a scanned QR badge
    /// (`FOODBOT:<personal number>`) or a card id.
    Kiosk(String),
}

/// Identification fields accepted by the sign-up endpoints. The first
/// non-blank one wins, in field order.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CredentialFields {
    #[serde(default)]
    pub personal_number: Option<String>,
    #[serde(default)]
    pub card_id: Option<String>,
    #[serde(default)]
    pub kiosk_input: Option<String>,
}

impl CredentialFields {
    pub fn credential(&self) -> Option<Credential> {
        fn present(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        if let Some(pn) = present(&self.personal_number) {
            // QR badges are sometimes scanned into the personal number field.
            return Some(Credential::Kiosk(pn));
        }
        if let Some(card) = present(&self.card_id) {
            return Some(Credential::CardId(card));
        }
        present(&self.kiosk_input).map(Credential::Kiosk)
    }
}

/// Look up the user a credential belongs to.
///
/// Kiosk input is tried as a personal number first and as a card id second.
/// Unknown credentials are logged and reported as [`RegistrationError::NotFound`].
pub async fn resolve_credential(
    repos: &Repositories,
    credential: &Credential,
) -> Result<User, RegistrationError> {
    let found = match credential {
        Credential::PersonalNumber(pn) => {
            repos
                .users
                .find_by_personal_number(&truncate_chars(pn.trim(), PERSONAL_NUMBER_MAX))
                .await?
        }
        // A QR badge read into the card field carries a personal number.
        Credential::CardId(card) if card.trim().starts_with(KIOSK_QR_PREFIX) => {
            repos
                .users
                .find_by_personal_number(&truncate_chars(strip_kiosk_prefix(card), PERSONAL_NUMBER_MAX))
                .await?
        }
        Credential::CardId(card) => {
            repos
                .users
                .find_by_card_id(&truncate_chars(card.trim(), CARD_ID_MAX))
                .await?
        }
        Credential::MobileToken(token) => repos.users.find_by_mobile_token(token.trim()).await?,
        Credential::Kiosk(raw) => {
            let input = strip_kiosk_prefix(raw);
            if input.is_empty() {
                None
            } else {
                match repos
                    .users
                    .find_by_personal_number(&truncate_chars(input, PERSONAL_NUMBER_MAX))
                    .await?
                {
                    Some(user) => Some(user),
                    None => {
                        debug!("Kiosk input is not a personal number, trying card id");
                        repos
                            .users
                            .find_by_card_id(&truncate_chars(input, CARD_ID_MAX))
                            .await?
                    }
                }
            }
        }
    };

    found.ok_or_else(|| {
        warn!("Unknown credential ({})", credential.kind());
        RegistrationError::NotFound
    })
}

impl Credential {
    /// Credential kind for log lines; never the value itself.
    pub fn kind(&self) -> &'static str {
        match self {
            Credential::PersonalNumber(_) => "personal number",
            Credential::CardId(_) => "card id",
            Credential::MobileToken(_) => "mobile token",
            Credential::Kiosk(_) => "kiosk input",
        }
    }
}
