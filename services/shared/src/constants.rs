/// Shared constants for the wallet integration gateway
///
/// This module centralizes the magic numbers and id conventions used by the
/// reconciliation engine and the provider adapters, so they cannot drift
/// between the engine, the repositories and the tests.

/// Wallet gateway status code that means "operation applied".
///
/// Any other status code in a wallet reply is surfaced as a WalletError; the
/// engine never inspects provider-specific failure codes beyond this.
pub const WALLET_STATUS_OK: i64 = 0;

/// External-id prefix for wager (debit) transactions.
pub const WAGER_PREFIX: &str = "wager-";

/// External-id prefix for payout/settle (credit) transactions.
pub const PAYOUT_PREFIX: &str = "payout-";

/// External-id prefix for refunds issued through the wallet `cancel` call.
pub const CANCEL_PREFIX: &str = "cancel-";

/// External-id prefix for refunds issued through the wallet `resettle` call.
pub const RESETTLE_PREFIX: &str = "resettle-";

/// External-id prefix for atomic combined wager+payout transactions.
pub const WAGER_PAYOUT_PREFIX: &str = "wagerPayout-";

/// Platform reference timezone offset in seconds (UTC+8).
///
/// Bet times in wallet audit reports are normalized to this offset before
/// they are sent to the ledger, regardless of the timezone the provider
/// stamped on the callback.
pub const PLATFORM_UTC_OFFSET_SECS: i32 = 8 * 3600;

/// Smallest accepted wager in minor units (0.01 of the major currency unit).
///
/// Rationale: a zero or negative wager never reaches the ledger; zero-amount
/// legs are legal only inside combined wager+payout calls.
pub const MIN_WAGER_MINOR: i64 = 1;

/// Largest accepted single amount in minor units (10,000,000.00 majors).
///
/// Rationale: caps a single posting so a malformed provider payload cannot
/// move an absurd amount through the ledger in one call.
pub const MAX_AMOUNT_MINOR: i64 = 1_000_000_000;

/// Maximum number of items accepted in one batched wallet request
/// (`multi_withdraw` / `multi_deposit`).
pub const MAX_BATCH_ITEMS: usize = 50;

/// Maximum accepted length of a provider-supplied transaction code.
///
/// Rationale: external ids are built as `<prefix><code>` and used as store
/// keys; unbounded codes would let a provider blow up key sizes.
pub const MAX_TRANSACTION_CODE_LENGTH: usize = 64;
