#![no_main]

use facturae::core::*;
use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(policy) = PrecisionPolicy::from_json(s) else {
        return;
    };
    for version in SchemaVersion::ALL {
        for field in Field::ALL {
            let _ = policy.format(Decimal::new(-123_456_789, 5), field, version);
        }
    }
});
