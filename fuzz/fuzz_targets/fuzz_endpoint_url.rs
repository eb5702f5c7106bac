#![no_main]

use kubigo_core::request::endpoint_url;
use kubigo_core::ActionKind;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let text: &str = &text;
    let (base, id) = text.split_once('\n').unwrap_or((text, "42"));

    for kind in ActionKind::ALL {
        let id = (kind != ActionKind::CreateRelease).then_some(id);
        if let Ok(url) = endpoint_url(base, kind, id) {
            assert!(url.contains("/api/v2/release-management/releases/"));
            assert!(url.starts_with("http://") || url.starts_with("https://"));
        }
    }

    // Arbitrary ids must stay inside a single path segment
    if let Ok(url) = endpoint_url("https://app.kubigo.cloud", ActionKind::Deploy, Some(text)) {
        assert!(url.ends_with("/deploy"));
        let tail = &url["https://app.kubigo.cloud/api/v2/release-management/releases/".len()..];
        assert_eq!(tail.matches('/').count(), 1);
    }
});
