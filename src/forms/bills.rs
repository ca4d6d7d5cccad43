use std::path::PathBuf;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::period::BillingPeriod;
use crate::domain::types::ContractNo;
use crate::forms::billing::parse_period;
use crate::forms::{FormError, non_blank};
use crate::services::bills::UPLOADS_PREFIX;

#[derive(MultipartForm)]
/// Multipart body of a bill upload.
pub struct UploadBillForm {
    #[multipart(rename = "billFiles", limit = "10MB")]
    pub bill_files: Vec<TempFile>,
    #[multipart(rename = "contractNo")]
    pub contract_no: Option<Text<String>>,
    pub month: Option<Text<String>>,
    pub year: Option<Text<String>>,
}

/// Uploaded file waiting to be copied into the upload directory.
#[derive(Debug, Clone)]
pub struct BillFile {
    pub file_name: String,
    pub source: PathBuf,
}

#[derive(Debug, Clone)]
pub struct UploadBillPayload {
    pub contract_no: ContractNo,
    pub period: BillingPeriod,
    pub files: Vec<BillFile>,
}

impl TryFrom<&UploadBillForm> for UploadBillPayload {
    type Error = FormError;

    fn try_from(form: &UploadBillForm) -> Result<Self, Self::Error> {
        if form.bill_files.is_empty() {
            return Err(FormError::NoFiles);
        }

        let contract_no = non_blank(form.contract_no.as_ref().map(|t| t.as_str()))
            .ok_or(FormError::MissingContractNo)?;
        let contract_no = ContractNo::new(contract_no).map_err(|_| FormError::MissingContractNo)?;

        let month = non_blank(form.month.as_ref().map(|t| t.as_str()));
        let year = non_blank(form.year.as_ref().map(|t| t.as_str()));
        let period = match (month, year) {
            (Some(month), Some(year)) => parse_period(month, year)?,
            _ => return Err(FormError::MissingPeriod),
        };

        let files = form
            .bill_files
            .iter()
            .map(|file| BillFile {
                file_name: file.file_name.clone().unwrap_or_default(),
                source: file.file.path().to_path_buf(),
            })
            .collect();

        Ok(Self {
            contract_no,
            period,
            files,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Request to email stored bills and cards to the contract's bill-to contact.
pub struct SendBillEmailForm {
    #[validate(length(min = 1))]
    pub contract_no: String,
    #[validate(length(min = 1), custom(function = "stored_upload_paths"))]
    pub file_paths: Vec<String>,
    #[serde(default)]
    #[validate(custom(function = "stored_upload_paths"))]
    pub card_paths: Vec<String>,
}

/// Attachments must be public paths of stored uploads.
fn stored_upload_paths(paths: &[String]) -> Result<(), ValidationError> {
    let stored = |path: &String| {
        path.strip_prefix(UPLOADS_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|rest| {
                !rest.is_empty()
                    && !rest.contains('\\')
                    && rest.split('/').all(|segment| !matches!(segment, "" | "." | ".."))
            })
    };

    if paths.iter().all(stored) {
        Ok(())
    } else {
        Err(ValidationError::new("upload_path"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_email_requires_a_bill() {
        let form: SendBillEmailForm =
            serde_json::from_str(r#"{"contractNo":"G/182","filePaths":[]}"#).unwrap();
        assert!(form.validate().is_err());

        let form: SendBillEmailForm = serde_json::from_str(
            r#"{"contractNo":"G/182","filePaths":["/uploads/bills/1.pdf"]}"#,
        )
        .unwrap();
        assert!(form.validate().is_ok());
        assert!(form.card_paths.is_empty());
    }

    #[test]
    fn attachments_must_be_stored_uploads() {
        for path in [
            "/etc/passwd",
            "/uploads/../config/default.yaml",
            "/uploads/bills/../../app.db",
            "/uploadsx/bill.pdf",
            "/uploads/",
            "uploads/bills/1.pdf",
            "/uploads/bills\\..\\app.db",
        ] {
            let form = SendBillEmailForm {
                contract_no: "G/182".into(),
                file_paths: vec![path.into()],
                card_paths: Vec::new(),
            };
            assert!(form.validate().is_err(), "{path} should be rejected");
        }

        let form = SendBillEmailForm {
            contract_no: "G/182".into(),
            file_paths: vec!["/uploads/bills/1759276800000-a-bill.pdf".into()],
            card_paths: vec!["/app/secret.key".into()],
        };
        assert!(form.validate().is_err());

        let form = SendBillEmailForm {
            contract_no: "G/182".into(),
            file_paths: vec!["/uploads/bills/1759276800000-a-bill.pdf".into()],
            card_paths: vec!["/uploads/cards/1-1.jpg".into()],
        };
        assert!(form.validate().is_ok());
    }
}
