use crate::config::{Config, SHARED_PIN_HEADER};
use crate::error::AppError;
use crate::sheets::{count_row, resolve_client};
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use inventory_common::model::submission::SubmitReceipt;
use inventory_common::requests::CountSubmission;

pub async fn process(
    req: HttpRequest,
    payload: web::Json<CountSubmission>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let pin = req
        .headers()
        .get(SHARED_PIN_HEADER)
        .and_then(|value| value.to_str().ok());

    let receipt = submit_count(&state, payload.into_inner(), pin).await?;
    Ok(HttpResponse::Ok().json(receipt))
}

/// Checks the PIN, appends the row and returns the receipt.
pub async fn submit_count(
    state: &AppState,
    submission: CountSubmission,
    pin: Option<&str>,
) -> Result<SubmitReceipt, AppError> {
    check_pin(&state.config, pin)?;

    let sheet = resolve_client(&state.config, state.connector.as_ref())
        .await
        .map_err(|e| e.context("Config error"))?;

    let row = count_row(&submission, (state.today)());
    sheet
        .append_row(&state.config.append_range(), row)
        .await
        .map_err(|e| e.context("Sheets append failed"))?;

    log::info!(
        "Appended count for '{}' at {} / {} by {}",
        submission.item_name,
        submission.store_name,
        submission.sub_location,
        submission.counter_name
    );

    Ok(SubmitReceipt::ok(submission))
}

/// No PIN configured means open access; otherwise the header must match exactly.
fn check_pin(config: &Config, supplied: Option<&str>) -> Result<(), AppError> {
    match &config.shared_pin {
        Some(expected) if supplied != Some(expected.as_str()) => {
            log::warn!("Rejected count submission with invalid PIN");
            Err(AppError::Authorization)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use crate::services::test_support::{routes, configured_env, test_state, AppendCall, StubConnector};
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use inventory_common::model::error::ErrorDetail;
    use inventory_common::model::submission::SubmitReceipt;
    use inventory_common::requests::CountSubmission;
    use serde_json::json;

    fn submission() -> CountSubmission {
        CountSubmission {
            counter_name: "A".to_string(),
            store_name: "B".to_string(),
            sub_location: "C".to_string(),
            item_name: "D".to_string(),
            condition: "E".to_string(),
            qty: 3.5,
        }
    }

    async fn post(
        env: &[(&str, &str)],
        connector: StubConnector,
        pin: Option<&str>,
        body: serde_json::Value,
    ) -> ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(env, connector)))
                .configure(routes),
        )
        .await;
        let mut req = test::TestRequest::post().uri("/submit_count").set_json(body);
        if let Some(pin) = pin {
            req = req.insert_header(("X-Shared-Pin", pin));
        }
        test::call_service(&app, req.to_request()).await
    }

    fn with_pin(pin: &'static str) -> Vec<(&'static str, &'static str)> {
        let mut env = configured_env();
        env.push(("SHARED_PIN", pin));
        env
    }

    #[actix_web::test]
    async fn appends_row_in_column_order_and_echoes_submission() {
        let connector = StubConnector::default();
        let resp = post(&configured_env(), connector.clone(), None, json!(submission())).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let receipt: SubmitReceipt = test::read_body_json(resp).await;
        assert_eq!(receipt, SubmitReceipt::ok(submission()));
        assert_eq!(
            connector.appended(),
            vec![AppendCall {
                spreadsheet_id: "sheet-123".to_string(),
                range: "Input_Counts!A:G".to_string(),
                row: vec![
                    json!("A"),
                    json!("B"),
                    json!("C"),
                    json!("2024-01-15"),
                    json!("D"),
                    json!("E"),
                    json!(3.5)
                ],
            }]
        );
    }

    #[actix_web::test]
    async fn open_access_ignores_any_pin_header() {
        for pin in [None, Some(""), Some("whatever")] {
            let connector = StubConnector::default();
            let resp = post(&configured_env(), connector.clone(), pin, json!(submission())).await;
            assert_eq!(resp.status(), StatusCode::OK, "pin header {:?}", pin);
            assert_eq!(connector.appended().len(), 1);
        }
    }

    #[actix_web::test]
    async fn wrong_pin_is_rejected_before_any_remote_call() {
        for pin in [None, Some(""), Some("123"), Some("12345"), Some(" 1234")] {
            let connector = StubConnector::default();
            let resp = post(&with_pin("1234"), connector.clone(), pin, json!(submission())).await;

            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "pin header {:?}", pin);
            let body: ErrorDetail = test::read_body_json(resp).await;
            assert_eq!(body.detail, "Invalid PIN");
            assert_eq!(connector.connect_count(), 0);
            assert!(connector.appended().is_empty());
        }
    }

    #[actix_web::test]
    async fn matching_pin_is_accepted() {
        let connector = StubConnector::default();
        let resp = post(&with_pin("1234"), connector.clone(), Some("1234"), json!(submission())).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(connector.appended().len(), 1);
    }

    #[actix_web::test]
    async fn missing_sheet_id_is_a_config_error() {
        let env = [("SERVICE_ACCOUNT_JSON", crate::services::test_support::STUB_ACCOUNT)];
        let connector = StubConnector::default();
        let resp = post(&env, connector.clone(), None, json!(submission())).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorDetail = test::read_body_json(resp).await;
        assert_eq!(body.detail, "Config error: SHEET_ID env var is not set");
        assert!(connector.appended().is_empty());
    }

    #[actix_web::test]
    async fn missing_credentials_is_a_config_error() {
        let resp = post(
            &[("SHEET_ID", "sheet-123")],
            StubConnector::default(),
            None,
            json!(submission()),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorDetail = test::read_body_json(resp).await;
        assert_eq!(body.detail, "Config error: No service account credentials configured.");
    }

    #[actix_web::test]
    async fn append_failure_surfaces_as_server_error() {
        let connector = StubConnector {
            fail_append: true,
            ..Default::default()
        };
        let resp = post(&configured_env(), connector, None, json!(submission())).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorDetail = test::read_body_json(resp).await;
        assert_eq!(body.detail, "Sheets append failed: quota exceeded");
    }

    #[actix_web::test]
    async fn numeric_string_qty_is_appended_as_number() {
        let connector = StubConnector::default();
        let body = json!({
            "counter_name": "A",
            "store_name": "B",
            "sub_location": "C",
            "item_name": "D",
            "condition": "E",
            "qty": "3.5"
        });
        let resp = post(&configured_env(), connector.clone(), None, body).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let receipt: SubmitReceipt = test::read_body_json(resp).await;
        assert_eq!(receipt.received.qty, 3.5);
        let appended = connector.appended();
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].row[6], json!(3.5));
    }

    #[actix_web::test]
    async fn body_without_content_type_is_parsed_as_json() {
        let connector = StubConnector::default();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&configured_env(), connector.clone())))
                .configure(routes),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/submit_count")
            .set_payload(json!(submission()).to_string())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(connector.appended().len(), 1);
    }

    #[actix_web::test]
    async fn malformed_body_is_unprocessable() {
        let connector = StubConnector::default();
        let body = json!({
            "counter_name": "A",
            "store_name": "B",
            "sub_location": "C",
            "item_name": "D",
            "condition": "E",
            "qty": "three"
        });
        let resp = post(&configured_env(), connector.clone(), None, body).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(connector.connect_count(), 0);
        assert!(connector.appended().is_empty());
    }

    #[actix_web::test]
    async fn missing_field_is_unprocessable_even_with_wrong_pin() {
        let connector = StubConnector::default();
        let resp = post(&with_pin("1234"), connector, Some("nope"), json!({"counter_name": "A"})).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
