//! Diesel models for the append-only billing activity ledger.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::billing_activity::{
    Actor, BillingActivity as DomainBillingActivity,
    NewBillingActivity as DomainNewBillingActivity,
};
use crate::domain::types::{BillingActivityId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::billing_activities)]
pub struct BillingActivity {
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

#[derive(Insertable)]
#[diesel(table_name = crate::schema::billing_activities)]
pub struct NewBillingActivity<'a> {
    pub user_id: &'a str,
    pub user_name: &'a str,
    pub user_email: &'a str,
    pub action_type: &'static str,
    pub contract_no: Option<&'a str>,
    pub card_no: Option<&'a str>,
    pub detail: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<BillingActivity> for DomainBillingActivity {
    type Error = TypeConstraintError;

    fn try_from(activity: BillingActivity) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BillingActivityId::new(activity.id)?,
            actor: Actor {
                id: activity.user_id,
                name: activity.user_name,
                email: activity.user_email,
            },
            action: activity.action_type.parse()?,
            contract_no: activity.contract_no,
            card_no: activity.card_no,
            detail: activity.detail,
            created_at: activity.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewBillingActivity> for NewBillingActivity<'a> {
    fn from(activity: &'a DomainNewBillingActivity) -> Self {
        Self {
            user_id: activity.actor.id.as_str(),
            user_name: activity.actor.name.as_str(),
            user_email: activity.actor.email.as_str(),
            action_type: activity.action.as_str(),
            contract_no: activity.contract_no.as_deref(),
            card_no: activity.card_no.as_deref(),
            detail: activity.detail.as_deref(),
            created_at: activity.created_at,
        }
    }
}
