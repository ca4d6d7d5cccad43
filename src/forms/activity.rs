use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::billing_activity::{ActivityKind, NewBillingActivity};
use crate::domain::period::BillingPeriod;
use crate::forms::billing::PeriodQuery;
use crate::forms::{FormError, non_blank};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Explicit ledger entry posted by the client.
pub struct ActivityForm {
    pub action_type: String,
    pub contract_no: Option<String>,
    pub card_no: Option<String>,
}

impl ActivityForm {
    pub fn into_activity(self, user: &AuthenticatedUser) -> Result<NewBillingActivity, FormError> {
        let action = self
            .action_type
            .parse::<ActivityKind>()
            .map_err(|_| FormError::UnknownAction(self.action_type.clone()))?;

        Ok(NewBillingActivity::new(user.actor(), action)
            .contract_no(self.contract_no)
            .card_no(self.card_no))
    }
}

#[derive(Debug, Default, Deserialize)]
/// Filters of the ledger listing.
pub struct ActivityListParams {
    pub page: Option<usize>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub action: Option<String>,
}

impl ActivityListParams {
    pub fn period(&self) -> Result<Option<BillingPeriod>, FormError> {
        PeriodQuery {
            month: self.month.clone(),
            year: self.year.clone(),
        }
        .optional()
    }

    pub fn action(&self) -> Result<Option<ActivityKind>, FormError> {
        non_blank(self.action.as_deref())
            .map(|action| {
                action
                    .parse::<ActivityKind>()
                    .map_err(|_| FormError::UnknownAction(action.to_string()))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "3".into(),
            email: "clerk@example.com".into(),
            name: "Clerk".into(),
            roles: vec!["billing".into()],
            exp: 0,
        }
    }

    #[test]
    fn unknown_action_type_is_rejected() {
        let form = ActivityForm {
            action_type: "downloadCard".into(),
            contract_no: None,
            card_no: None,
        };
        assert!(matches!(
            form.into_activity(&user()),
            Err(FormError::UnknownAction(action)) if action == "downloadCard"
        ));
    }

    #[test]
    fn activity_carries_actor_and_correlation() {
        let form = ActivityForm {
            action_type: "download_front".into(),
            contract_no: Some("G/182".into()),
            card_no: Some("2".into()),
        };
        let activity = form.into_activity(&user()).unwrap();

        assert_eq!(activity.action, ActivityKind::DownloadFront);
        assert_eq!(activity.actor.email, "clerk@example.com");
        assert_eq!(activity.contract_no.as_deref(), Some("G/182"));
        assert_eq!(activity.card_no.as_deref(), Some("2"));
    }

    #[test]
    fn list_params_parse_filters() {
        let params = ActivityListParams {
            page: Some(2),
            month: Some("10".into()),
            year: Some("2025".into()),
            action: Some("send_email".into()),
        };
        assert_eq!(
            params.period().unwrap(),
            Some(BillingPeriod::new(10, 2025).unwrap())
        );
        assert_eq!(params.action().unwrap(), Some(ActivityKind::SendEmail));

        let empty = ActivityListParams::default();
        assert_eq!(empty.period().unwrap(), None);
        assert_eq!(empty.action().unwrap(), None);
    }
}
