#![no_main]

use facturae::core::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    // Rejections are fine, panics are bugs.
    let Ok(item) = LineItemInput::from_json(s, &WithholdingCatalog::default()) else {
        return;
    };
    let policy = PrecisionPolicy::standard();
    for version in SchemaVersion::ALL {
        if let Ok(line) = item.compute(version, &policy) {
            let _ = policy.format(line.gross_amount, Field::ItemGrossAmount, version);
        }
    }
});
