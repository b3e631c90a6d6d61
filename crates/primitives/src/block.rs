use crate::{BlockHash, Header, SealedHeader, TransactionSigned};
use alloy_primitives::Address;
use alloy_rlp::{length_of_length, Encodable, EMPTY_LIST_CODE};
use bytes::BufMut;
use std::ops::Deref;

/// Ethereum full block.
///
/// Post-merge blocks never carry ommers, so only the header and the transactions are kept.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    /// Block header.
    pub header: Header,
    /// Transactions in this block.
    pub body: Vec<TransactionSigned>,
}

impl Block {
    /// Create a [`SealedBlock`] that will compute the header hash.
    pub fn seal_slow(self) -> SealedBlock {
        SealedBlock { header: self.header.seal_slow(), body: self.body }
    }

    /// Seal the block with a known hash.
    ///
    /// WARNING: This method does not perform validation whether the hash is correct.
    pub fn seal(self, hash: BlockHash) -> SealedBlock {
        SealedBlock { header: self.header.seal(hash), body: self.body }
    }

    /// Transform into a [`BlockWithSenders`].
    pub fn with_senders(self, senders: Vec<Address>) -> BlockWithSenders {
        BlockWithSenders { block: self, senders }
    }

    fn payload_length(&self) -> usize {
        // the ommers list is always empty
        self.header.length() + self.body.length() + 1
    }
}

impl Encodable for Block {
    fn encode(&self, out: &mut dyn BufMut) {
        alloy_rlp::Header { list: true, payload_length: self.payload_length() }.encode(out);
        self.header.encode(out);
        self.body.encode(out);
        out.put_u8(EMPTY_LIST_CODE);
    }

    fn length(&self) -> usize {
        let payload_length = self.payload_length();
        payload_length + length_of_length(payload_length)
    }
}

impl Deref for Block {
    type Target = Header;
    fn deref(&self) -> &Self::Target {
        &self.header
    }
}

/// A block together with the recovered sender of each of its transactions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockWithSenders {
    /// Block
    pub block: Block,
    /// List of senders that match the transactions in the block
    pub senders: Vec<Address>,
}

impl BlockWithSenders {
    /// The senders as one buffer of concatenated 20 byte addresses.
    pub fn senders_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(20 * self.senders.len());
        for sender in &self.senders {
            out.extend_from_slice(sender.as_slice());
        }
        out
    }
}

/// Sealed Ethereum full block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SealedBlock {
    /// Locked block header.
    pub header: SealedHeader,
    /// Transactions with signatures.
    pub body: Vec<TransactionSigned>,
}

impl SealedBlock {
    /// Create a new sealed block instance using the sealed header and the block body.
    pub fn new(header: SealedHeader, body: Vec<TransactionSigned>) -> Self {
        Self { header, body }
    }

    /// Header hash.
    pub fn hash(&self) -> BlockHash {
        self.header.hash()
    }

    /// Splits the sealed block into underlying components
    pub fn split(self) -> (SealedHeader, Vec<TransactionSigned>) {
        (self.header, self.body)
    }

    /// Unseal the block
    pub fn unseal(self) -> Block {
        Block { header: self.header.unseal(), body: self.body }
    }
}

impl Deref for SealedBlock {
    type Target = SealedHeader;
    fn deref(&self) -> &Self::Target {
        &self.header
    }
}
