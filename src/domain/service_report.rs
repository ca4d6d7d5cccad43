use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ServiceId, ServiceReportId};

/// Record of a field visit for a service card.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ServiceReport {
    pub id: ServiceReportId,
    pub service_id: ServiceId,
    pub service_date: NaiveDateTime,
    /// Scans of the filled-in card, the first one is the back side.
    pub images: Vec<String>,
}

impl ServiceReport {
    pub fn back_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewServiceReport {
    pub service_id: ServiceId,
    pub service_date: NaiveDateTime,
    pub images: Vec<String>,
}

impl NewServiceReport {
    #[must_use]
    pub fn new(service_id: ServiceId, service_date: NaiveDateTime) -> Self {
        Self {
            service_id,
            service_date,
            images: Vec::new(),
        }
    }

    #[must_use]
    pub fn image(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        if !path.trim().is_empty() {
            self.images.push(path);
        }
        self
    }
}
