use serde::Deserialize;
use validator::Validate;

use crate::domain::billing_activity::ActivityKind;
use crate::domain::period::BillingPeriod;
use crate::domain::types::TypeConstraintError;
use crate::forms::{FormError, non_blank};

/// `?month=&year=` query of the card listings.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

impl PeriodQuery {
    /// Parses an optional period. Both parts absent is `None`, one of them
    /// absent is an error.
    pub fn optional(&self) -> Result<Option<BillingPeriod>, FormError> {
        match (non_blank(self.month.as_deref()), non_blank(self.year.as_deref())) {
            (None, None) => Ok(None),
            (Some(month), Some(year)) => parse_period(month, year).map(Some),
            _ => Err(FormError::MissingPeriod),
        }
    }
}

impl TryFrom<&PeriodQuery> for BillingPeriod {
    type Error = FormError;

    fn try_from(query: &PeriodQuery) -> Result<Self, Self::Error> {
        query.optional()?.ok_or(FormError::MissingPeriod)
    }
}

pub(crate) fn parse_period(month: &str, year: &str) -> Result<BillingPeriod, FormError> {
    let month = month
        .trim()
        .parse::<u32>()
        .map_err(|_| FormError::InvalidPeriod(TypeConstraintError::InvalidMonth))?;
    let year = year
        .trim()
        .parse::<i32>()
        .map_err(|_| FormError::InvalidPeriod(TypeConstraintError::InvalidYear))?;
    BillingPeriod::new(month, year).map_err(FormError::InvalidPeriod)
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CardSide {
    Front,
    Back,
}

impl CardSide {
    pub fn activity(self) -> ActivityKind {
        match self {
            CardSide::Front => ActivityKind::DownloadFront,
            CardSide::Back => ActivityKind::DownloadBack,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CardSide::Front => "front",
            CardSide::Back => "back",
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Card download notification sent by the client after saving an image.
pub struct DownloadCardForm {
    #[validate(length(min = 1))]
    pub contract_no: String,
    pub card_side: CardSide,
    #[validate(length(min = 1))]
    pub card_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(month: Option<&str>, year: Option<&str>) -> PeriodQuery {
        PeriodQuery {
            month: month.map(str::to_string),
            year: year.map(str::to_string),
        }
    }

    #[test]
    fn period_requires_both_parts() {
        assert!(matches!(
            BillingPeriod::try_from(&query(Some("10"), None)),
            Err(FormError::MissingPeriod)
        ));
        assert!(matches!(
            BillingPeriod::try_from(&query(None, None)),
            Err(FormError::MissingPeriod)
        ));
        assert_eq!(
            FormError::MissingPeriod.to_string(),
            "Month and year query required."
        );
    }

    #[test]
    fn period_parses_and_validates() {
        let period = BillingPeriod::try_from(&query(Some(" 10 "), Some("2025"))).unwrap();
        assert_eq!(period, BillingPeriod::new(10, 2025).unwrap());

        assert!(matches!(
            BillingPeriod::try_from(&query(Some("13"), Some("2025"))),
            Err(FormError::InvalidPeriod(_))
        ));
        assert!(matches!(
            BillingPeriod::try_from(&query(Some("oct"), Some("2025"))),
            Err(FormError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn optional_period_allows_absence() {
        assert_eq!(query(None, Some(" ")).optional().unwrap(), None);
    }

    #[test]
    fn card_side_maps_to_download_activity() {
        let form: DownloadCardForm = serde_json::from_str(
            r#"{"contractNo":"G/182","cardSide":"back","cardPath":"/uploads/b.jpg"}"#,
        )
        .unwrap();
        assert_eq!(form.card_side.activity(), ActivityKind::DownloadBack);
        assert!(form.validate().is_ok());
    }
}
