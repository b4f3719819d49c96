//! The hash-chained receipt ledger — distinct from the event log. Links
//! hash together `(receipt_id, canonical hash of receipt data,
//! previous_hash, index, timestamp)`, never the receipt's own signature,
//! so a receipt chain can be re-verified from data alone.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sovkernel_types::ReceiptId;

use crate::error::ReceiptResult;
use crate::receipt::Receipt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptChainLink {
    pub receipt_hash: String,
    pub receipt_id: ReceiptId,
    pub previous_hash: String,
    pub index: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct SignableLink<'a> {
    receipt_id: &'a ReceiptId,
    data_hash: &'a str,
    previous_hash: &'a str,
    index: usize,
    timestamp: &'a DateTime<Utc>,
}

fn link_hash(
    receipt_id: &ReceiptId,
    data_hash: &str,
    previous_hash: &str,
    index: usize,
    timestamp: &DateTime<Utc>,
) -> ReceiptResult<String> {
    let signable = SignableLink {
        receipt_id,
        data_hash,
        previous_hash,
        index,
        timestamp,
    };
    Ok(sovkernel_canon::hash(&signable)?)
}

/// A chain-of-custody proof summarizing the whole ledger without exposing
/// every link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainProof {
    pub root_hash: String,
    pub chain_length: usize,
    pub first_hash: Option<String>,
    pub last_hash: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReceiptChain {
    links: Vec<ReceiptChainLink>,
}

impl ReceiptChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn links(&self) -> &[ReceiptChainLink] {
        &self.links
    }

    /// Appends a link for `receipt_data`, linked to the previous link's
    /// `receipt_hash` — or, for the first entry, to its own computed hash.
    /// Returns the new link's hash.
    pub fn add(&mut self, receipt_id: ReceiptId, receipt_data: &Receipt) -> ReceiptResult<String> {
        let index = self.links.len();
        let timestamp = Utc::now();
        let data_hash = sovkernel_canon::hash(receipt_data)?;

        let receipt_hash = if index == 0 {
            link_hash(&receipt_id, &data_hash, "", index, &timestamp)?
        } else {
            let prev = &self.links[index - 1].receipt_hash;
            link_hash(&receipt_id, &data_hash, prev, index, &timestamp)?
        };

        let previous_hash = if index == 0 {
            receipt_hash.clone()
        } else {
            self.links[index - 1].receipt_hash.clone()
        };

        self.links.push(ReceiptChainLink {
            receipt_hash: receipt_hash.clone(),
            receipt_id,
            previous_hash,
            index,
            timestamp,
        });
        Ok(receipt_hash)
    }

    /// Reconstructs the link at `receipt_id`'s stored position from
    /// `receipt_data` and compares, also checking continuity with the
    /// prior link.
    pub fn verify(&self, receipt_id: &ReceiptId, receipt_data: &Receipt) -> ReceiptResult<bool> {
        let Some(stored) = self.links.iter().find(|l| &l.receipt_id == receipt_id) else {
            return Ok(false);
        };
        let data_hash = sovkernel_canon::hash(receipt_data)?;

        let input_previous = if stored.index == 0 {
            String::new()
        } else {
            stored.previous_hash.clone()
        };
        let recomputed = link_hash(receipt_id, &data_hash, &input_previous, stored.index, &stored.timestamp)?;
        if recomputed != stored.receipt_hash {
            return Ok(false);
        }

        if stored.index == 0 {
            Ok(stored.previous_hash == stored.receipt_hash)
        } else {
            Ok(stored.previous_hash == self.links[stored.index - 1].receipt_hash)
        }
    }

    /// Confirms every link beyond the first points at its predecessor's
    /// hash, and the first link points at itself.
    pub fn verify_chain(&self) -> bool {
        self.links.iter().enumerate().all(|(i, link)| {
            if i == 0 {
                link.previous_hash == link.receipt_hash
            } else {
                link.previous_hash == self.links[i - 1].receipt_hash
            }
        })
    }

    pub fn get_chain_proof(&self) -> ReceiptResult<ChainProof> {
        let concatenated: String = self.links.iter().map(|l| l.receipt_hash.as_str()).collect();
        let root_hash = sovkernel_canon::sha256_hex(concatenated.as_bytes());
        Ok(ChainProof {
            root_hash,
            chain_length: self.links.len(),
            first_hash: self.links.first().map(|l| l.receipt_hash.clone()),
            last_hash: self.links.last().map(|l| l.receipt_hash.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::{issue, IssueReceiptParams};
    use sovkernel_crypto::Keystore;
    use sovkernel_types::ActorId;

    fn sample_receipt(ks: &Keystore) -> Receipt {
        let actor = ActorId::adapter("main").unwrap();
        let key_id = ks.ensure_key(&actor);
        issue(
            IssueReceiptParams {
                mandate_id: None,
                actor,
                action: "invoke:model".to_string(),
                request_hash: "req".to_string(),
                response_hash: Some("resp".to_string()),
                provider_metadata: None,
                mirror_ref: "mirror_1".to_string(),
            },
            ks,
            &key_id,
        )
        .unwrap()
    }

    #[test]
    fn first_link_points_at_itself() {
        let ks = Keystore::new();
        let mut chain = ReceiptChain::new();
        let receipt = sample_receipt(&ks);
        chain.add(receipt.receipt_id, &receipt).unwrap();
        assert_eq!(chain.links()[0].previous_hash, chain.links()[0].receipt_hash);
        assert!(chain.verify_chain());
    }

    #[test]
    fn chain_of_three_verifies_and_proves() {
        let ks = Keystore::new();
        let mut chain = ReceiptChain::new();
        let mut receipts = Vec::new();
        for _ in 0..3 {
            let receipt = sample_receipt(&ks);
            chain.add(receipt.receipt_id, &receipt).unwrap();
            receipts.push(receipt);
        }
        assert!(chain.verify_chain());
        for receipt in &receipts {
            assert!(chain.verify(&receipt.receipt_id, receipt).unwrap());
        }

        let proof = chain.get_chain_proof().unwrap();
        assert_eq!(proof.chain_length, 3);
        let concatenated: String = chain.links().iter().map(|l| l.receipt_hash.as_str()).collect();
        assert_eq!(proof.root_hash, sovkernel_canon::sha256_hex(concatenated.as_bytes()));
    }

    #[test]
    fn verify_detects_data_tampering() {
        let ks = Keystore::new();
        let mut chain = ReceiptChain::new();
        let receipt = sample_receipt(&ks);
        chain.add(receipt.receipt_id, &receipt).unwrap();

        let mut tampered = receipt.clone();
        tampered.response_hash = Some("different".to_string());
        assert!(!chain.verify(&receipt.receipt_id, &tampered).unwrap());
    }
}
