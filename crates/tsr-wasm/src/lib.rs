//! WASM bindings for term sheet review.
//!
//! The browser has no native model backend, so documents are processed with
//! the mock table. Fields cross the boundary as plain `{ id, label, value, valid }`
//! objects.

use js_sys::{Array, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::console;

use tsr_core::validate::check_consistency;
use tsr_core::{DocumentField, TERM_SHEET_FIELDS, TermSheetPipeline};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn fields_from_js(fields: JsValue) -> Result<Vec<DocumentField>, JsValue> {
    serde_wasm_bindgen::from_value(fields).map_err(to_js_error)
}

fn fields_to_js(fields: &[DocumentField]) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(fields).map_err(to_js_error)
}

/// Extract and validate the term sheet fields of an uploaded document.
///
/// Resolves to the validated fields, or rejects with the processing error.
#[wasm_bindgen(js_name = processDocument)]
pub fn process_document(data_url: String) -> Promise {
    future_to_promise(async move {
        let mut pipeline = TermSheetPipeline::mock();
        let fields = pipeline.process_data_url(&data_url).map_err(|e| {
            console::error_1(&JsValue::from_str(&format!("Error in document processing: {}", e)));
            to_js_error(e)
        })?;

        for warning in check_consistency(&fields) {
            console::warn_1(&JsValue::from_str(&warning));
        }

        fields_to_js(&fields)
    })
}

/// Re-validate fields, e.g. after the user edited values.
#[wasm_bindgen(js_name = validateTerms)]
pub fn validate_terms(fields: JsValue) -> Promise {
    future_to_promise(async move {
        let fields = fields_from_js(fields)?;
        let validated = TermSheetPipeline::mock().validate_terms(&fields);
        fields_to_js(&validated)
    })
}

/// Percentage of valid fields. Throws on an empty field list.
#[wasm_bindgen(js_name = validationScore)]
pub fn validation_score(fields: JsValue) -> Result<u8, JsValue> {
    let fields = fields_from_js(fields)?;
    tsr_core::validation_score(&fields).map_err(to_js_error)
}

/// Labels of the fields extracted from every term sheet, in display order.
#[wasm_bindgen(js_name = termSheetFields)]
pub fn term_sheet_fields() -> Array {
    TERM_SHEET_FIELDS.iter().map(|label| JsValue::from_str(label)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_term_sheet_fields() {
        let fields = term_sheet_fields();
        assert_eq!(fields.length(), 12);
        assert_eq!(fields.get(0).as_string().as_deref(), Some("Company Name"));
        assert_eq!(fields.get(11).as_string().as_deref(), Some("Closing Date"));
    }

    #[wasm_bindgen_test]
    async fn test_process_pdf_data_url() {
        let result = JsFuture::from(process_document("data:application/pdf;base64,JVBERi0xLjQK".into()))
            .await
            .unwrap();

        let fields: Vec<DocumentField> = serde_wasm_bindgen::from_value(result).unwrap();
        assert_eq!(fields.len(), 12);
        assert_eq!(fields[0].id, "field-1");
        assert_eq!(validation_score(fields_to_js(&fields).unwrap()).unwrap(), 100);
    }

    #[wasm_bindgen_test]
    async fn test_process_rejects_malformed_url() {
        let result = JsFuture::from(process_document("not a data url".into())).await;
        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    async fn test_validate_terms_after_edit() {
        let fields = vec![
            DocumentField::new("field-1", "Closing Date", "invalid-date", true),
            DocumentField::new("field-2", "Investment Amount", "$5,000,000", false),
        ];

        let result = JsFuture::from(validate_terms(fields_to_js(&fields).unwrap()))
            .await
            .unwrap();
        let validated: Vec<DocumentField> = serde_wasm_bindgen::from_value(result).unwrap();

        assert!(!validated[0].valid);
        assert!(validated[1].valid);
    }

    #[wasm_bindgen_test]
    fn test_validation_score_empty() {
        assert!(validation_score(fields_to_js(&[]).unwrap()).is_err());
    }
}
