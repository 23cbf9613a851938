//! Remote block-explorer access.
//!
//! [`ChainApi`] is the seam the command handlers depend on; [`WhatsOnChain`]
//! is the blocking HTTP implementation.  Every call is a single request with
//! no retry, and any non-2xx status becomes
//! [`SkillError::RemoteRequestFailure`] carrying the status text.

use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{SkillError, SkillResult};

// ─── Response shapes ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExchangeRate {
    pub rate: f64,
    pub currency: String,
}

/// Only the raw hex of a fetched transaction is used.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTransaction {
    pub hex: String,
}

/// Satoshi balances.  `unconfirmed` goes negative while a spend is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Balance {
    pub confirmed: i64,
    pub unconfirmed: i64,
}

impl Balance {
    /// Sum of both balances, pinned at the `i64` bounds.
    pub const fn total(&self) -> i64 {
        self.confirmed.saturating_add(self.unconfirmed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryEntry {
    pub tx_hash: String,
    pub height: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Utxo {
    pub tx_hash: String,
    pub tx_pos: u32,
    pub value: u64,
    pub height: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodeRequest<'a> {
    tx_hex: &'a str,
}

// ─── Trait ────────────────────────────────────────────────────────────────────

pub trait ChainApi {
    fn exchange_rate(&self) -> SkillResult<ExchangeRate>;

    fn transaction(&self, txid: &str) -> SkillResult<RawTransaction>;

    /// Decoded transaction, passed through as arbitrary JSON.
    fn decode(&self, tx_hex: &str) -> SkillResult<Value>;

    fn balance(&self, address: &str) -> SkillResult<Balance>;

    fn history(&self, address: &str) -> SkillResult<Vec<HistoryEntry>>;

    fn unspent(&self, address: &str) -> SkillResult<Vec<Utxo>>;
}

// ─── WhatsOnChain ─────────────────────────────────────────────────────────────

pub struct WhatsOnChain {
    base_url: String,
    client: Client,
}

impl WhatsOnChain {
    pub fn new(base_url: &str) -> SkillResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("bsv-skills/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SkillError::remote("HTTP client setup failed", e))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, context: &str) -> SkillResult<T> {
        let url = self.url(path);
        log::debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| SkillError::remote(context, e))?;
        read_json(response, context)
    }
}

/// Check the status and decode the body.
fn read_json<T: DeserializeOwned>(response: Response, context: &str) -> SkillResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(SkillError::remote(context, status));
    }
    response
        .json()
        .map_err(|e| SkillError::remote(context, format!("invalid response: {e}")))
}

impl ChainApi for WhatsOnChain {
    fn exchange_rate(&self) -> SkillResult<ExchangeRate> {
        self.get("/exchangerate", "Failed to fetch BSV price")
    }

    fn transaction(&self, txid: &str) -> SkillResult<RawTransaction> {
        self.get(&format!("/tx/hash/{txid}"), "Failed to fetch transaction")
    }

    fn decode(&self, tx_hex: &str) -> SkillResult<Value> {
        let context = "Decode failed";
        let url = self.url("/tx/decode");
        log::debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .json(&DecodeRequest { tx_hex })
            .send()
            .map_err(|e| SkillError::remote(context, e))?;
        read_json(response, context)
    }

    fn balance(&self, address: &str) -> SkillResult<Balance> {
        self.get(&format!("/address/{address}/balance"), "Failed to fetch balance")
    }

    fn history(&self, address: &str) -> SkillResult<Vec<HistoryEntry>> {
        self.get(&format!("/address/{address}/history"), "Failed to fetch history")
    }

    fn unspent(&self, address: &str) -> SkillResult<Vec<Utxo>> {
        self.get(&format!("/address/{address}/unspent"), "Failed to fetch UTXOs")
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    const ADDR: &str = "1BoatSLRHtKNngkdXEeobR76b53LETtpyT";

    fn client(server: &MockServer) -> WhatsOnChain {
        WhatsOnChain::new(&server.base_url()).unwrap()
    }

    #[test]
    fn url_joins_without_double_slash() {
        let api = WhatsOnChain::new("https://example.test/v1/bsv/main/").unwrap();
        assert_eq!(
            api.url("/exchangerate"),
            "https://example.test/v1/bsv/main/exchangerate"
        );
    }

    #[test]
    fn exchange_rate_parses_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/exchangerate");
            then.status(200)
                .json_body(json!({ "rate": 42.5, "currency": "USD", "time": 1 }));
        });

        let rate = client(&server).exchange_rate().unwrap();
        mock.assert();
        assert_eq!(rate, ExchangeRate {
            rate: 42.5,
            currency: "USD".into()
        });
    }

    #[test]
    fn non_success_status_carries_status_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(format!("/address/{ADDR}/balance"));
            then.status(404);
        });

        let err = client(&server).balance(ADDR).unwrap_err();
        assert!(matches!(err, SkillError::RemoteRequestFailure { .. }));
        assert_eq!(err.to_string(), "Failed to fetch balance: 404 Not Found");
    }

    #[test]
    fn decode_posts_tx_hex_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/tx/decode")
                .json_body(json!({ "txHex": "0100abcd" }));
            then.status(200).json_body(json!({ "txid": "ff", "vin": [] }));
        });

        let decoded = client(&server).decode("0100abcd").unwrap();
        mock.assert();
        assert_eq!(decoded["txid"], "ff");
    }

    #[test]
    fn history_and_unspent_parse_lists() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(format!("/address/{ADDR}/history"));
            then.status(200)
                .json_body(json!([{ "tx_hash": "aa", "height": 800000 }]));
        });
        server.mock(|when, then| {
            when.method(GET).path(format!("/address/{ADDR}/unspent"));
            then.status(200).json_body(json!([
                { "tx_hash": "bb", "tx_pos": 1, "value": 1500, "height": 800001 }
            ]));
        });

        let api = client(&server);
        assert_eq!(api.history(ADDR).unwrap()[0].tx_hash, "aa");
        let utxos = api.unspent(ADDR).unwrap();
        assert_eq!(utxos[0].tx_pos, 1);
        assert_eq!(utxos[0].value, 1500);
    }

    #[test]
    fn malformed_body_is_a_remote_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/tx/hash/abc");
            then.status(200).body("<html>");
        });

        let err = client(&server).transaction("abc").unwrap_err();
        assert!(err.to_string().starts_with("Failed to fetch transaction: invalid response"));
    }

    #[test]
    fn unreachable_host_is_a_remote_failure() {
        // Port 9 (discard) is closed on any sane test machine.
        let api = WhatsOnChain::new("http://127.0.0.1:9").unwrap();
        assert!(matches!(
            api.exchange_rate(),
            Err(SkillError::RemoteRequestFailure { .. })
        ));
    }

    #[test]
    fn balance_total_handles_pending_spend() {
        let b = Balance {
            confirmed: 5_000,
            unconfirmed: -2_000,
        };
        assert_eq!(b.total(), 3_000);
    }

    #[test]
    fn balance_total_saturates_on_absurd_values() {
        let b = Balance {
            confirmed: i64::MAX,
            unconfirmed: 1,
        };
        assert_eq!(b.total(), i64::MAX);

        let b = Balance {
            confirmed: i64::MIN,
            unconfirmed: -1,
        };
        assert_eq!(b.total(), i64::MIN);
    }
}
