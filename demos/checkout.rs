use tributo::core::*;
use tributo::engine::calculate_breakdown;

const PROFILE: &str = r#"{
    "country": "GT",
    "currency": "GTQ",
    "pricesIncludeTax": true,
    "rounding": "half_up",
    "rates": [
        { "code": "iva", "label": "IVA", "rateBps": 1200, "appliesTo": "all" },
        { "code": "tur", "label": "Turismo", "rateBps": 1000, "appliesTo": "filtered", "itemTagIn": ["lodging"] }
    ],
    "surcharges": [
        { "code": "service", "label": "Servicio", "percentBps": 1000,
          "applyWhenOrderTypeIn": ["dine_in"], "taxable": false }
    ],
    "delivery": { "mode": "as_line", "taxable": true, "taxCode": "iva" },
    "jurisdictions": [
        { "code": "antigua", "match": { "country": "GT", "city": "Antigua Guatemala" },
          "surchargesOverride": [] }
    ]
}"#;

fn main() {
    let profile = TaxProfile::from_json(PROFILE).expect("profile should parse");

    let lint = validate_profile(&profile);
    if !lint.is_empty() {
        for e in &lint {
            eprintln!("profile: {e}");
        }
        return;
    }

    let draft = OrderDraftBuilder::new(OrderType::Delivery)
        .currency("GTQ")
        .add_line(LineBuilder::new("1", "Pepián de pollo", 2, 6500).build())
        .add_line(
            LineBuilder::new("2", "Limonada", 3, 1500)
                .options_delta(300)
                .build(),
        )
        .delivery_fee(2500)
        .delivery_address(
            AddressBuilder::new("GT")
                .city("Antigua Guatemala")
                .zip("03001")
                .build(),
        )
        .customer_tax_id("1234567-8")
        .build()
        .expect("draft should be valid");

    let breakdown = calculate_breakdown(&draft, &profile).expect("calculation should succeed");
    let snapshot = &breakdown.snapshot;

    println!(
        "Jurisdiction: {}",
        breakdown.jurisdiction.as_deref().unwrap_or("(base profile)")
    );
    for line in &breakdown.lines {
        println!(
            "  {:<10} gross {:>8} base {:>8} tax {:>6}",
            line.line_id,
            line.gross,
            line.base,
            line.tax()
        );
    }

    let major = |minor: i64| to_major_units(minor, snapshot.currency()).unwrap_or_default();
    println!("Subtotal: {} {}", major(snapshot.totals().sub_total), snapshot.currency());
    for rate in snapshot.summary_by_rate() {
        println!("  {} ({} bps): {}", rate.code, rate.rate_bps, major(rate.tax));
    }
    println!("Total:    {} {}", major(snapshot.totals().grand_total), snapshot.currency());

    let problems = verify_snapshot(snapshot);
    assert!(problems.is_empty(), "snapshot does not reconcile: {problems:?}");

    println!("{}", snapshot.to_json().expect("snapshot should serialize"));
}
