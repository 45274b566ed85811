#![no_main]

use libfuzzer_sys::fuzz_target;
use tributo::core::*;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(draft) = OrderDraft::from_json(s) {
            let profile = TaxProfileBuilder::new("GT", "GTQ")
                .add_rate(TaxRateBuilder::new("iva", 1200).build())
                .add_surcharge(SurchargeBuilder::new("service", 1000).taxable("iva").build())
                .delivery(DeliveryPolicy::taxable_line("iva"))
                .build();
            // Overflow must surface as an error, never as a panic.
            if let Ok(snapshot) = tributo::engine::calculate_tax_snapshot(&draft, &profile) {
                assert!(verify_snapshot(&snapshot).is_empty());
            }
        }
    }
});
