//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the seams between the inventory core and the outside
//! world. Adapters implement them for SQLite, LLM providers and the
//! demand prediction service.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Ledger  │            │  Extractor  │              │ Predictor │
//! │ Adapter │            │  / LLM      │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```

pub mod outbound;
