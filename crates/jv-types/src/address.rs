use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a block in the journal.
///
/// Used as an opaque key when reporting which block failed validation. It
/// never contributes to a hash.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockAddress {
    pub strand_id: String,
    pub sequence_no: u64,
}

impl BlockAddress {
    pub fn new(strand_id: impl Into<String>, sequence_no: u64) -> Self {
        Self {
            strand_id: strand_id.into(),
            sequence_no,
        }
    }
}

impl fmt::Display for BlockAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{strandId: \"{}\", sequenceNo: {}}}",
            self.strand_id, self.sequence_no
        )
    }
}
