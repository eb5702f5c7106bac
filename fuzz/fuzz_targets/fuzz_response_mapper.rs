#![no_main]

use kubigo_core::response::map_response;
use kubigo_core::{ActionKind, HttpResponse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let kind = ActionKind::ALL[data[0] as usize % ActionKind::ALL.len()];
    let status = 100 + u16::from_le_bytes([data[1], data[2]]) % 500;
    let body = String::from_utf8_lossy(&data[3..]);
    let response = HttpResponse::new(status, body);

    match map_response(kind, &response) {
        Ok(mapped) => assert!(response.is_success() && !mapped.outputs.is_empty()),
        Err(err) => {
            // Every failure renders a non-empty message
            assert!(!err.to_string().is_empty());
        }
    }
});
