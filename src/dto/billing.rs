//! DTOs of the card listings.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::billing_card::BillingCard;

/// Flattened [`BillingCard`] as consumed by the billing dashboard.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillingCardDto {
    pub service_id: i32,
    pub contract_id: i32,
    pub contract_no: String,
    pub service_card_number: i32,
    pub total_cards_in_contract: usize,
    pub service_card_label: String,
    pub bill_to: String,
    pub ship_to: String,
    pub frequency: String,
    pub card_front_image: Option<String>,
    pub card_back_image: Option<String>,
    pub service_date: Option<NaiveDateTime>,
}

impl From<BillingCard> for BillingCardDto {
    fn from(card: BillingCard) -> Self {
        let (card_back_image, service_date) = match card.evidence {
            Some(evidence) => (evidence.back_image, Some(evidence.service_date)),
            None => (None, None),
        };

        Self {
            service_id: card.service_id.get(),
            contract_id: card.contract_id.get(),
            contract_no: card.contract_no.into_inner(),
            service_card_number: card.card_number.get(),
            total_cards_in_contract: card.total_cards,
            service_card_label: card.label,
            bill_to: card.bill_to,
            ship_to: card.ship_to,
            frequency: card.frequency,
            card_front_image: card.front_image,
            card_back_image,
            service_date,
        }
    }
}

/// `{ data, message? }` envelope of the card listings.
#[derive(Debug, Serialize)]
pub struct CardsResponse {
    pub data: Vec<BillingCardDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CardsResponse {
    pub fn new(cards: Vec<BillingCard>, message: Option<String>) -> Self {
        Self {
            data: cards.into_iter().map(BillingCardDto::from).collect(),
            message,
        }
    }
}
