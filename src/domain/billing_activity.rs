use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{BillingActivityId, TypeConstraintError};

/// Closed set of user actions written to the audit ledger.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum ActivityKind {
    Login,
    Logout,
    DownloadFront,
    DownloadBack,
    UploadBill,
    SendEmail,
}

impl ActivityKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Login => "login",
            ActivityKind::Logout => "logout",
            ActivityKind::DownloadFront => "download_front",
            ActivityKind::DownloadBack => "download_back",
            ActivityKind::UploadBill => "upload_bill",
            ActivityKind::SendEmail => "send_email",
        }
    }
}

impl Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "login" => Ok(ActivityKind::Login),
            "logout" => Ok(ActivityKind::Logout),
            "download_front" => Ok(ActivityKind::DownloadFront),
            "download_back" => Ok(ActivityKind::DownloadBack),
            "upload_bill" => Ok(ActivityKind::UploadBill),
            "send_email" => Ok(ActivityKind::SendEmail),
            other => Err(TypeConstraintError::UnknownAction(other.to_string())),
        }
    }
}

impl TryFrom<String> for ActivityKind {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActivityKind> for String {
    fn from(kind: ActivityKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Who performed an audited action.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BillingActivity {
    pub id: BillingActivityId,
    pub actor: Actor,
    pub action: ActivityKind,
    pub contract_no: Option<String>,
    pub card_no: Option<String>,
    pub detail: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewBillingActivity {
    pub actor: Actor,
    pub action: ActivityKind,
    pub contract_no: Option<String>,
    pub card_no: Option<String>,
    pub detail: Option<String>,
    pub created_at: NaiveDateTime,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl NewBillingActivity {
    #[must_use]
    pub fn new(actor: Actor, action: ActivityKind) -> Self {
        Self {
            actor,
            action,
            contract_no: None,
            card_no: None,
            detail: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[must_use]
    pub fn contract_no(mut self, contract_no: Option<String>) -> Self {
        self.contract_no = non_blank(contract_no);
        self
    }

    #[must_use]
    pub fn card_no(mut self, card_no: Option<String>) -> Self {
        self.card_no = non_blank(card_no);
        self
    }

    #[must_use]
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = non_blank(Some(detail.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_closed_action_vocabulary() {
        for kind in [
            ActivityKind::Login,
            ActivityKind::Logout,
            ActivityKind::DownloadFront,
            ActivityKind::DownloadBack,
            ActivityKind::UploadBill,
            ActivityKind::SendEmail,
        ] {
            assert_eq!(kind.as_str().parse::<ActivityKind>(), Ok(kind));
        }
        assert_eq!(
            "downloadCard".parse::<ActivityKind>(),
            Err(TypeConstraintError::UnknownAction("downloadCard".into()))
        );
    }

    #[test]
    fn blank_correlation_is_dropped() {
        let actor = Actor {
            id: "1".into(),
            name: "Clerk".into(),
            email: "clerk@example.com".into(),
        };
        let entry = NewBillingActivity::new(actor, ActivityKind::UploadBill)
            .contract_no(Some(" G/182 ".into()))
            .card_no(Some("   ".into()))
            .detail("");

        assert_eq!(entry.contract_no.as_deref(), Some("G/182"));
        assert_eq!(entry.card_no, None);
        assert_eq!(entry.detail, None);
    }
}
