//! Repository implementation for the billing activity ledger.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::billing_activity::{BillingActivity, NewBillingActivity};
use crate::models::billing_activity::{
    BillingActivity as DbBillingActivity, NewBillingActivity as DbNewBillingActivity,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    ActivityListQuery, BillingActivityReader, BillingActivityWriter, DieselRepository,
};

impl BillingActivityReader for DieselRepository {
    fn list_activities(
        &self,
        query: ActivityListQuery,
    ) -> RepositoryResult<(usize, Vec<BillingActivity>)> {
        use crate::schema::billing_activities;

        let mut conn = self.conn()?;

        let window = query.period.and_then(|period| period.calendar_window());

        let query_builder = || {
            let mut items = billing_activities::table.into_boxed::<Sqlite>();

            if let Some(window) = &window {
                items = items
                    .filter(billing_activities::created_at.ge(window.start))
                    .filter(billing_activities::created_at.lt(window.end));
            }

            if let Some(action) = query.action {
                items = items.filter(billing_activities::action_type.eq(action.as_str()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let db_activities = items
            .order((
                billing_activities::created_at.desc(),
                billing_activities::id.desc(),
            ))
            .load::<DbBillingActivity>(&mut conn)?;

        let activities = db_activities
            .into_iter()
            .map(|a| BillingActivity::try_from(a).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, activities))
    }
}

impl BillingActivityWriter for DieselRepository {
    fn create_activity(&self, activity: &NewBillingActivity) -> RepositoryResult<BillingActivity> {
        use crate::schema::billing_activities;

        let mut conn = self.conn()?;

        let db_new_activity: DbNewBillingActivity = activity.into();

        let db_activity = diesel::insert_into(billing_activities::table)
            .values(&db_new_activity)
            .get_result::<DbBillingActivity>(&mut conn)?;

        BillingActivity::try_from(db_activity).map_err(RepositoryError::from)
    }
}
