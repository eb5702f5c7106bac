#![no_main]

use kubigo_core::inputs::parse_image_list;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);

    // Should never panic; success means a non-empty list of trimmed entries
    if let Ok(images) = parse_image_list(&raw) {
        assert!(!images.is_empty());
        for image in &images {
            assert!(!image.is_empty());
            assert_eq!(image.trim(), image);
            assert!(!image.contains(',') && !image.contains('\n'));
        }
    }
});
