#![no_main]

use libfuzzer_sys::fuzz_target;
use tributo::core::*;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Arbitrary profiles may be rejected, never panic.
        if let Ok(profile) = TaxProfile::from_json(s) {
            let _ = validate_profile(&profile);
            let draft = OrderDraftBuilder::new(OrderType::Delivery)
                .add_line(LineBuilder::new("1", "Pizza", 2, 4500).build())
                .add_line(LineBuilder::new("2", "Cerveza", 1, 2000).tag("alcohol").build())
                .delivery_fee(1500)
                .delivery_address(AddressBuilder::new("GT").zip("01010").build())
                .build();
            if let Ok(draft) = draft {
                let _ = tributo::engine::calculate_tax_snapshot(&draft, &profile);
            }
        }
    }
});
