use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::market_session::session_model::{Exchange, MarketSession};

/// Markets everywhere are shut on these dates.
const GLOBAL_HOLIDAYS: &[(u32, u32)] = &[(1, 1), (12, 25)];

const NYSE: Exchange = Exchange {
    code: "NYSE",
    open_minutes: 14 * 60 + 30,
    close_minutes: 21 * 60,
    holidays: &[(7, 4)],
};
const LSE: Exchange = Exchange {
    code: "LSE",
    open_minutes: 8 * 60,
    close_minutes: 16 * 60 + 30,
    holidays: &[(12, 26)],
};
const XETRA: Exchange = Exchange {
    code: "XETRA",
    open_minutes: 8 * 60,
    close_minutes: 16 * 60 + 30,
    holidays: &[(5, 1), (12, 26)],
};
const EURONEXT: Exchange = Exchange {
    code: "EURONEXT",
    open_minutes: 8 * 60,
    close_minutes: 16 * 60 + 30,
    holidays: &[(5, 1), (12, 26)],
};
// SIX trades 09:00-17:20 local
const SIX: Exchange = Exchange {
    code: "SIX",
    open_minutes: 8 * 60,
    close_minutes: 16 * 60 + 20,
    holidays: &[(8, 1), (12, 26)],
};
const TSE: Exchange = Exchange {
    code: "TSE",
    open_minutes: 0,
    close_minutes: 6 * 60,
    holidays: &[(1, 2), (1, 3), (12, 31)],
};
const TSX: Exchange = Exchange {
    code: "TSX",
    open_minutes: 14 * 60 + 30,
    close_minutes: 21 * 60,
    holidays: &[(7, 1), (12, 26)],
};
const HKEX: Exchange = Exchange {
    code: "HKEX",
    open_minutes: 60 + 30,
    close_minutes: 8 * 60,
    holidays: &[(10, 1), (12, 26)],
};
const ASX: Exchange = Exchange {
    code: "ASX",
    open_minutes: 0,
    close_minutes: 6 * 60,
    holidays: &[(1, 26), (4, 25), (12, 26)],
};

lazy_static! {
    /// Symbol suffix (market code) to exchange
    static ref SUFFIX_EXCHANGES: HashMap<&'static str, &'static Exchange> = {
        let mut map: HashMap<&'static str, &'static Exchange> = HashMap::new();
        map.insert("L", &LSE);
        map.insert("DE", &XETRA);
        map.insert("F", &XETRA);
        map.insert("PA", &EURONEXT);
        map.insert("AS", &EURONEXT);
        map.insert("MI", &EURONEXT);
        map.insert("SW", &SIX);
        map.insert("T", &TSE);
        map.insert("TO", &TSX);
        map.insert("HK", &HKEX);
        map.insert("AX", &ASX);
        map
    };

    /// Fallback when the symbol carries no market suffix
    static ref CURRENCY_EXCHANGES: HashMap<&'static str, &'static Exchange> = {
        let mut map: HashMap<&'static str, &'static Exchange> = HashMap::new();
        map.insert("USD", &NYSE);
        map.insert("GBP", &LSE);
        map.insert("GBp", &LSE);
        map.insert("GBX", &LSE);
        map.insert("EUR", &XETRA);
        map.insert("CHF", &SIX);
        map.insert("JPY", &TSE);
        map.insert("CAD", &TSX);
        map.insert("HKD", &HKEX);
        map.insert("AUD", &ASX);
        map
    };
}

fn exchange_for(symbol: &str, currency: &str) -> Option<&'static Exchange> {
    if let Some((_, suffix)) = symbol.rsplit_once('.') {
        if let Some(exchange) = SUFFIX_EXCHANGES.get(suffix) {
            return Some(*exchange);
        }
    }
    CURRENCY_EXCHANGES.get(currency).copied()
}

/// Estimates the trading-session state for an instrument at a wall-clock
/// instant. A deterministic approximation: no exchange-calendar service is
/// consulted, and unrecognized symbol/currency combinations report Closed.
pub fn estimate(symbol: &str, currency: &str, now: DateTime<Utc>) -> MarketSession {
    match now.weekday() {
        Weekday::Sat | Weekday::Sun => return MarketSession::Closed,
        _ => {}
    }
    let month_day = (now.month(), now.day());
    if GLOBAL_HOLIDAYS.contains(&month_day) {
        return MarketSession::Closed;
    }

    let Some(exchange) = exchange_for(symbol, currency) else {
        return MarketSession::Closed;
    };
    if exchange.holidays.contains(&month_day) {
        return MarketSession::Closed;
    }

    let minutes = now.hour() * 60 + now.minute();
    if minutes < exchange.open_minutes {
        MarketSession::Pre
    } else if minutes < exchange.close_minutes {
        MarketSession::Regular
    } else {
        MarketSession::Post
    }
}
