//! The fixed set of credentials the client keeps.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// A named secret held by the [`CredentialStore`](super::CredentialStore).
///
/// The string form is the account name used in secure storage and the key
/// used by the legacy plain store.
///
/// ```
/// use roost::auth::CredentialKind;
///
/// let kind: CredentialKind = "refreshToken".parse().unwrap();
/// assert_eq!(kind, CredentialKind::RefreshToken);
/// assert_eq!(kind.expiry_key(), Some("refreshTokenExpiration"));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum CredentialKind {
    #[strum(serialize = "accessToken")]
    #[serde(rename = "accessToken")]
    AccessToken,
    #[strum(serialize = "refreshToken")]
    #[serde(rename = "refreshToken")]
    RefreshToken,
    #[strum(serialize = "kakaoToken")]
    #[serde(rename = "kakaoToken")]
    KakaoToken,
    #[strum(serialize = "appleToken")]
    #[serde(rename = "appleToken")]
    AppleToken,
}

impl CredentialKind {
    pub const ALL: [CredentialKind; 4] = [
        CredentialKind::AccessToken,
        CredentialKind::RefreshToken,
        CredentialKind::KakaoToken,
        CredentialKind::AppleToken,
    ];

    /// Account name in secure storage.
    pub fn account(self) -> &'static str {
        self.into()
    }

    /// Key under which the legacy plain store kept this credential.
    pub fn legacy_key(self) -> &'static str {
        self.account()
    }

    /// Whether an expiry claim is read out of the stored value.
    pub fn derives_expiry(self) -> bool {
        matches!(self, Self::AccessToken | Self::RefreshToken)
    }

    /// Companion key holding the derived expiry, for kinds that derive one.
    pub fn expiry_key(self) -> Option<&'static str> {
        match self {
            Self::AccessToken => Some("accessTokenExpiration"),
            Self::RefreshToken => Some("refreshTokenExpiration"),
            Self::KakaoToken | Self::AppleToken => None,
        }
    }
}
