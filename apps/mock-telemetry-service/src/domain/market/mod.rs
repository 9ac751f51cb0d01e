//! Simulated Market Vocabulary
//!
//! The fixed universe of tickers, venues, and operation kinds the generator
//! draws from, plus the reference prices quotes are jittered around.
//!
//! Every type exposes `as_str()` returning the exact label used for span
//! attributes, metric attributes, and log fields, so the collector sees the
//! same strings regardless of which signal it receives.

use std::fmt;

// =============================================================================
// Reference Prices
// =============================================================================

/// Base price used for any ticker missing from the reference table.
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

/// Reference prices in USD, keyed by ticker.
const BASE_PRICES: [(&str, f64); 8] = [
    ("BTC", 45_000.0),
    ("ETH", 2_500.0),
    ("USDT", 1.0),
    ("BNB", 300.0),
    ("SOL", 100.0),
    ("XRP", 0.6),
    ("ADA", 0.5),
    ("DOGE", 0.08),
];

/// Look up the reference price for a ticker.
///
/// Unknown tickers fall back to [`DEFAULT_BASE_PRICE`].
#[must_use]
pub fn base_price(ticker: &str) -> f64 {
    BASE_PRICES
        .iter()
        .find(|(known, _)| *known == ticker)
        .map_or(DEFAULT_BASE_PRICE, |(_, price)| *price)
}

/// Quote for `ticker`: its reference price scaled by `multiplier`.
#[must_use]
pub fn quote_price(ticker: &str, multiplier: f64) -> f64 {
    base_price(ticker) * multiplier
}

/// Error messages attached to simulated exchange failures.
pub const SIMULATED_ERRORS: [&str; 4] = [
    "Rate limit exceeded",
    "Connection timeout",
    "Invalid API key",
    "Market closed",
];

// =============================================================================
// Symbol
// =============================================================================

/// Cryptocurrency ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Bitcoin.
    Btc,
    /// Ether.
    Eth,
    /// Tether.
    Usdt,
    /// BNB.
    Bnb,
    /// Solana.
    Sol,
    /// XRP.
    Xrp,
    /// Cardano.
    Ada,
    /// Dogecoin.
    Doge,
}

impl Symbol {
    /// Every supported ticker.
    pub const ALL: [Self; 8] = [
        Self::Btc,
        Self::Eth,
        Self::Usdt,
        Self::Bnb,
        Self::Sol,
        Self::Xrp,
        Self::Ada,
        Self::Doge,
    ];

    /// Ticker string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Eth => "ETH",
            Self::Usdt => "USDT",
            Self::Bnb => "BNB",
            Self::Sol => "SOL",
            Self::Xrp => "XRP",
            Self::Ada => "ADA",
            Self::Doge => "DOGE",
        }
    }

    /// Reference price for this ticker.
    #[must_use]
    pub fn base_price(self) -> f64 {
        base_price(self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Exchange
// =============================================================================

/// Trading venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exchange {
    /// Binance.
    Binance,
    /// Coinbase.
    Coinbase,
    /// Kraken.
    Kraken,
    /// Bybit.
    Bybit,
    /// OKX.
    Okx,
}

impl Exchange {
    /// Every supported venue.
    pub const ALL: [Self; 5] = [
        Self::Binance,
        Self::Coinbase,
        Self::Kraken,
        Self::Bybit,
        Self::Okx,
    ];

    /// Venue name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binance => "binance",
            Self::Coinbase => "coinbase",
            Self::Kraken => "kraken",
            Self::Bybit => "bybit",
            Self::Okx => "okx",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Operation Kind
// =============================================================================

/// Kind of simulated exchange call. Doubles as the span name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Spot price lookup.
    FetchPrice,
    /// Order book snapshot.
    FetchOrderbook,
    /// Recent trades.
    FetchTrades,
    /// 24h ticker.
    FetchTicker,
}

impl OperationKind {
    /// Every operation kind.
    pub const ALL: [Self; 4] = [
        Self::FetchPrice,
        Self::FetchOrderbook,
        Self::FetchTrades,
        Self::FetchTicker,
    ];

    /// Operation name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchPrice => "fetch_price",
            Self::FetchOrderbook => "fetch_orderbook",
            Self::FetchTrades => "fetch_trades",
            Self::FetchTicker => "fetch_ticker",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Decision
// =============================================================================

/// Outcome of a simulated trading-signal workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Open or add to a position.
    Buy,
    /// Close or reduce a position.
    Sell,
    /// Do nothing.
    Hold,
}

impl Decision {
    /// Every decision.
    pub const ALL: [Self; 3] = [Self::Buy, Self::Sell, Self::Hold];

    /// Decision label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;

    #[test_case("BTC", 45_000.0)]
    #[test_case("ETH", 2_500.0)]
    #[test_case("USDT", 1.0)]
    #[test_case("BNB", 300.0)]
    #[test_case("SOL", 100.0)]
    #[test_case("XRP", 0.6)]
    #[test_case("ADA", 0.5)]
    #[test_case("DOGE", 0.08)]
    fn base_price_table(ticker: &str, expected: f64) {
        assert_eq!(base_price(ticker), expected);
    }

    #[test_case("PEPE")]
    #[test_case("")]
    #[test_case("btc")]
    fn unknown_ticker_uses_default(ticker: &str) {
        assert_eq!(base_price(ticker), DEFAULT_BASE_PRICE);
    }

    #[test]
    fn every_symbol_has_a_table_entry() {
        for symbol in Symbol::ALL {
            assert!(
                BASE_PRICES.iter().any(|(t, _)| *t == symbol.as_str()),
                "{symbol} missing from base price table"
            );
        }
    }

    proptest! {
        #[test]
        fn unknown_ticker_quotes_around_default(
            ticker in "[a-z]{1,6}",
            multiplier in 0.95f64..=1.05,
        ) {
            let price = quote_price(&ticker, multiplier);
            prop_assert!((95.0..=105.0).contains(&price), "price {}", price);
        }

        #[test]
        fn known_ticker_quotes_within_band(idx in 0usize..8, multiplier in 0.95f64..=1.05) {
            let symbol = Symbol::ALL[idx];
            let base = symbol.base_price();
            let price = quote_price(symbol.as_str(), multiplier);
            prop_assert!(price >= base * 0.95 && price <= base * 1.05);
        }
    }

    #[test]
    fn labels_match_wire_strings() {
        assert_eq!(OperationKind::FetchOrderbook.as_str(), "fetch_orderbook");
        assert_eq!(OperationKind::FetchTicker.to_string(), "fetch_ticker");
        assert_eq!(Exchange::Binance.to_string(), "binance");
        assert_eq!(Decision::Hold.as_str(), "HOLD");
        assert_eq!(Symbol::Usdt.to_string(), "USDT");
    }
}
