use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hash::LedgerHash;

/// Opaque text payload as returned by the ledger service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueHolder {
    #[serde(rename = "IonText")]
    pub ion_text: String,
}

impl ValueHolder {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            ion_text: text.into(),
        }
    }
}

/// Pretty, unredacted rendering: the held text is printed verbatim.
impl fmt::Display for ValueHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ion_text.is_empty() {
            write!(f, "{{}}")
        } else {
            write!(f, "{{IonText: {}}}", self.ion_text)
        }
    }
}

/// A trusted digest of the whole ledger at some point in time.
///
/// The tip address identifies the last block the digest covers. It is kept
/// for display and never interpreted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerDigest {
    #[serde(rename = "Digest")]
    pub digest: LedgerHash,
    #[serde(rename = "DigestTipAddress", default)]
    pub tip_address: ValueHolder,
}

impl LedgerDigest {
    pub fn new(digest: LedgerHash, tip_address: ValueHolder) -> Self {
        Self {
            digest,
            tip_address,
        }
    }
}

impl fmt::Display for LedgerDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Digest: {}, DigestTipAddress: {}}}",
            self.digest.to_base64(),
            self.tip_address
        )
    }
}
