//! Property-based tests using proptest

use kubigo_core::inputs::parse_image_list;
use kubigo_core::response::map_response;
use kubigo_core::{ActionKind, ErrorKind, GitHubContext, HttpResponse, InputMap, RequestBuilder};
use proptest::prelude::*;

fn arb_action() -> impl Strategy<Value = ActionKind> {
    prop_oneof![
        Just(ActionKind::CreateRelease),
        Just(ActionKind::Approve),
        Just(ActionKind::Deploy),
        Just(ActionKind::Rollback),
    ]
}

// Image references with no separators or surrounding whitespace
fn arb_image() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9./-]{1,20}:[a-z0-9.]{1,8}").expect("valid regex")
}

// Separator runs of commas, newlines and blanks
fn arb_separator() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ \t]*[,\n][ ,\n\t]*").expect("valid regex")
}

fn complete_inputs(kind: ActionKind) -> InputMap {
    let inputs = InputMap::new().with("api-key", "k");
    match kind {
        ActionKind::CreateRelease => inputs
            .with("service", "checkout")
            .with("images", "web:1")
            .with("target", "staging"),
        ActionKind::Approve | ActionKind::Deploy => inputs.with("release-id", "42"),
        ActionKind::Rollback => inputs.with("target-id", "t1"),
    }
}

proptest! {
    #[test]
    fn test_image_list_keeps_order_and_drops_separators(
        images in prop::collection::vec(arb_image(), 1..6),
        seps in prop::collection::vec(arb_separator(), 6),
    ) {
        let mut raw = String::new();
        for (image, sep) in images.iter().zip(seps.iter()) {
            raw.push_str(image);
            raw.push_str(sep);
        }

        let parsed = parse_image_list(&raw).unwrap();
        prop_assert_eq!(&parsed, &images);
    }

    #[test]
    fn test_image_list_idempotent(raw in "[a-z:, \n]{0,60}") {
        if let Ok(first) = parse_image_list(&raw) {
            prop_assert!(first.iter().all(|i| !i.is_empty() && i.trim() == i));
            let second = parse_image_list(&first.join(",")).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn test_separators_only_is_validation_error(raw in "[, \n\t]{0,20}") {
        let err = parse_image_list(&raw).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_missing_required_input_is_named(kind in arb_action(), index in 0usize..4) {
        let required = RequestBuilder::required_inputs(kind);
        let missing = required[index % required.len()];

        let full = complete_inputs(kind);
        let mut inputs = InputMap::new();
        for name in required.iter().filter(|n| **n != missing) {
            let value = kubigo_core::inputs::optional(&full, name).unwrap();
            inputs.insert(name, value);
        }

        let ctx = GitHubContext::default();
        let err = RequestBuilder::new(&inputs, &ctx).build(kind).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Validation);
        prop_assert!(err.to_string().contains(missing));
    }

    #[test]
    fn test_build_deterministic(kind in arb_action(), id in "[A-Za-z0-9_-]{1,16}") {
        let inputs = complete_inputs(kind)
            .with("release-id", id.as_str())
            .with("target-id", id.as_str());
        let ctx = GitHubContext::default();
        let builder = RequestBuilder::new(&inputs, &ctx);

        let a = builder.build(kind).unwrap();
        let b = builder.build(kind).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn test_success_outputs_always_complete(kind in arb_action(), body in "\\{\\}|\\{\"status\":\"[a-z]{1,8}\"\\}") {
        let mapped = map_response(kind, &HttpResponse::new(200, body)).unwrap();
        for name in kubigo_core::response::mapper::output_names(kind) {
            prop_assert!(mapped.outputs.contains_key(name));
        }
    }

    #[test]
    fn test_non_success_status_never_maps(kind in arb_action(), status in 300u16..600, body in ".{0,40}") {
        prop_assert!(map_response(kind, &HttpResponse::new(status, body)).is_err());
    }
}
