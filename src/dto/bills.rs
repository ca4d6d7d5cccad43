//! DTOs of the bill upload and dispatch endpoints.

use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBillResponse {
    pub success: bool,
    pub message: String,
    pub bill_paths: Vec<String>,
    pub card_paths: Vec<String>,
    pub contract_no: String,
}

#[derive(Debug, Serialize)]
pub struct SendBillEmailResponse {
    pub success: bool,
    pub message: String,
}
