//! DTOs of the activity ledger.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::billing_activity::BillingActivity;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDto {
    pub id: i32,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub action_type: String,
    pub contract_no: Option<String>,
    pub card_no: Option<String>,
    pub detail: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<BillingActivity> for ActivityDto {
    fn from(activity: BillingActivity) -> Self {
        Self {
            id: activity.id.get(),
            user_id: activity.actor.id,
            user_name: activity.actor.name,
            user_email: activity.actor.email,
            action_type: activity.action.to_string(),
            contract_no: activity.contract_no,
            card_no: activity.card_no,
            detail: activity.detail,
            created_at: activity.created_at,
        }
    }
}

/// Page of ledger entries, newest first.
#[derive(Debug, Serialize)]
pub struct ActivityPage {
    pub total: usize,
    pub page: usize,
    pub items: Vec<ActivityDto>,
}
