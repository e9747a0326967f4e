//! Envelope-to-wire mapping laws over generated envelopes.

use http::StatusCode;
use httpmediator::dispatcher::ResponseBody;
use httpmediator::response::{EnvelopeError, HttpResponse, UntypedResponse};
use httpmediator::typed::into_handler_response;
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Shipment {
    shipment_id: i64,
    label: String,
    parcels: Vec<u32>,
    express: Option<bool>,
    tags: BTreeMap<String, i32>,
}

fn shipment() -> impl Strategy<Value = Shipment> {
    (
        any::<i64>(),
        "\\PC{0,24}",
        proptest::collection::vec(any::<u32>(), 0..8),
        proptest::option::of(any::<bool>()),
        proptest::collection::btree_map("[a-z]{1,8}", any::<i32>(), 0..4),
    )
        .prop_map(|(shipment_id, label, parcels, express, tags)| Shipment {
            shipment_id,
            label,
            parcels,
            express,
            tags,
        })
}

fn status() -> impl Strategy<Value = StatusCode> {
    (100u16..600).prop_map(|code| StatusCode::from_u16(code).unwrap())
}

fn non_blank_message() -> impl Strategy<Value = String> {
    "\\PC{1,64}".prop_filter("message must not be blank", |m| !m.trim().is_empty())
}

fn blank_message() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop::sample::select(vec![' ', '\t', '\n', '\r', '\u{a0}', '\u{2003}']),
        0..12,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn model_round_trips_through_json_body(model in shipment(), status in status()) {
        let resp = into_handler_response(HttpResponse::with_model(model.clone(), status));
        prop_assert_eq!(resp.status, status.as_u16());
        let body = resp.body.as_json().cloned();
        prop_assert!(body.is_some(), "expected a JSON body, got {:?}", resp.body);
        let decoded: Shipment = serde_json::from_value(body.unwrap()).unwrap();
        prop_assert_eq!(decoded, model);
    }

    #[test]
    fn failure_body_is_the_message(message in non_blank_message(), status in status()) {
        let envelope: HttpResponse<Shipment> = HttpResponse::failure(message.clone(), status);
        prop_assert!(!envelope.succeeded());
        let resp = into_handler_response(envelope);
        prop_assert_eq!(resp.status, status.as_u16());
        prop_assert_eq!(resp.body, ResponseBody::Text(message));
    }

    #[test]
    fn failure_wins_over_model(model in shipment(), message in non_blank_message(), status in status()) {
        let envelope = HttpResponse::from_parts(Some(model), status, Some(message.clone()));
        let resp = into_handler_response(envelope);
        prop_assert_eq!(resp.body, ResponseBody::Text(message));
    }

    #[test]
    fn blank_message_is_rejected(message in blank_message(), status in status()) {
        let result = UntypedResponse::try_failure(message, status);
        prop_assert_eq!(result, Err(EnvelopeError::BlankErrorMessage));
    }

    #[test]
    fn status_only_envelope_has_empty_body(status in status()) {
        let envelope: UntypedResponse = HttpResponse::status(status);
        prop_assert!(envelope.succeeded());
        let resp = into_handler_response(envelope);
        prop_assert_eq!(resp.status, status.as_u16());
        prop_assert!(resp.body.is_empty());
    }
}
