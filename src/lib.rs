//! # tributo
//!
//! Deterministic tax engine for restaurant orders: multi-jurisdiction
//! profiles, composite rates, inclusive or exclusive pricing, configurable
//! rounding, taxable surcharges, and an immutable snapshot for receipts,
//! cashier reconciliation, and invoice issuance.
//!
//! All monetary values are integer minor units (`i64`), never floating
//! point. Quotients are rounded through [`rust_decimal::Decimal`].
//!
//! ## Quick Start
//!
//! ```rust
//! use tributo::core::*;
//! use tributo::engine::calculate_tax_snapshot;
//!
//! let profile = TaxProfileBuilder::new("GT", "GTQ")
//!     .add_rate(TaxRateBuilder::new("iva", 1200).label("IVA").build())
//!     .add_surcharge(SurchargeBuilder::new("service", 1000).label("Servicio").build())
//!     .build();
//!
//! let draft = OrderDraftBuilder::new(OrderType::DineIn)
//!     .add_line(LineBuilder::new("1", "Hilachas", 1, 6000).build())
//!     .add_line(LineBuilder::new("2", "Horchata", 2, 1500).build())
//!     .build()
//!     .unwrap();
//!
//! let snapshot = calculate_tax_snapshot(&draft, &profile).unwrap();
//! assert_eq!(snapshot.totals().sub_total, 9000);
//! assert_eq!(snapshot.totals().tax, 1080);
//! assert_eq!(snapshot.totals().grand_total, 9000 + 1080 + 900);
//! assert!(verify_snapshot(&snapshot).is_empty());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Types, builders, validation, the calculation engine |
//! | `json` (default) | Load profiles/drafts and persist snapshots as JSON |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod engine;

#[cfg(feature = "json")]
pub mod json;

// Re-export the entry points at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
#[cfg(feature = "core")]
pub use crate::engine::{TaxBreakdown, calculate_breakdown, calculate_tax_snapshot};
