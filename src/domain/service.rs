use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::frequency::Frequency;
use crate::domain::period::DueTag;
use crate::domain::types::{CardNumber, ContractId, ServiceId};

/// One service card of a contract.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: ServiceId,
    pub contract_id: ContractId,
    pub card_number: CardNumber,
    pub frequency: Frequency,
    /// Front side image of the physical service card.
    pub card_image: Option<String>,
    /// Month labels (`Mon YYYY`) the card is due in.
    pub billing_months: BTreeSet<String>,
}

impl Service {
    pub fn is_due(&self, tag: &DueTag) -> bool {
        self.billing_months.contains(tag.as_str())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewService {
    pub contract_id: ContractId,
    pub card_number: CardNumber,
    pub frequency: Frequency,
    pub card_image: Option<String>,
    pub billing_months: BTreeSet<String>,
}

impl NewService {
    #[must_use]
    pub fn new<I, S>(
        contract_id: ContractId,
        card_number: CardNumber,
        frequency: Frequency,
        billing_months: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            contract_id,
            card_number,
            frequency,
            card_image: None,
            billing_months: billing_months
                .into_iter()
                .map(|s| s.into().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn card_image(mut self, path: impl Into<String>) -> Self {
        self.card_image = Some(path.into()).filter(|s: &String| !s.trim().is_empty());
        self
    }
}
