//! Federated identity providers and their chooser contents.
//!
//! The two providers share one protocol path; they differ only in chooser
//! contents and styling, so the provider is data handed to the channel,
//! not a second implementation.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::users::Role;

/// A federated identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Google,
    Github,
}

impl Provider {
    /// URL-safe provider name.
    pub fn slug(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Github => "github",
        }
    }

    /// Human-readable provider name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Google => "Google",
            Provider::Github => "GitHub",
        }
    }

    /// Chooser URL for this provider under the configured identity origin.
    pub fn chooser_url(&self, identity_origin: &Url) -> Url {
        let mut url = identity_origin.clone();
        url.set_path(&format!("/choose/{}", self.slug()));
        url
    }

    /// The fixed identities this provider's chooser offers.
    pub fn candidate_identities(&self) -> Vec<CandidateIdentity> {
        match self {
            Provider::Google => vec![
                CandidateIdentity::new("ana.moreno@gmail.com", "Ana Moreno", None),
                CandidateIdentity::new(
                    "liam.okafor@gmail.com",
                    "Liam Okafor",
                    Some(Role::Creator),
                ),
                CandidateIdentity::new("sofia.lind@gmail.com", "Sofia Lind", None),
            ],
            Provider::Github => vec![
                CandidateIdentity::new("dev.arjun@outlook.com", "Arjun Patel", None),
                CandidateIdentity::new(
                    "kate.lindgren@hey.com",
                    "Kate Lindgren",
                    Some(Role::Creator),
                ),
                CandidateIdentity::new(
                    "registrar@northvale.edu",
                    "Northvale University",
                    Some(Role::Institution),
                ),
            ],
        }
    }
}

/// One row in a provider's chooser screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateIdentity {
    pub email: String,
    pub name: String,
    /// Role the identity signs in with; absent means student.
    #[serde(default)]
    pub role: Option<Role>,
}

impl CandidateIdentity {
    fn new(email: &str, name: &str, role: Option<Role>) -> Self {
        Self {
            email: email.to_string(),
            name: name.to_string(),
            role,
        }
    }
}

/// The single "selection made" message a chooser surface emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSelection {
    pub provider: Provider,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl ProviderSelection {
    /// Build the selection message for a chooser row.
    pub fn from_candidate(provider: Provider, candidate: &CandidateIdentity) -> Self {
        Self {
            provider,
            email: candidate.email.clone(),
            name: candidate.name.clone(),
            role: candidate.role,
        }
    }
}
