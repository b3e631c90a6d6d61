use alloy_eips::eip2718::{Decodable2718, Eip2718Error, Encodable2718};
use alloy_primitives::Bytes;

/// Signed transaction as carried by an execution payload.
///
/// Legacy transactions are plain RLP lists, typed transactions are `type || rlp(payload)` as
/// defined by [EIP-2718](https://eips.ethereum.org/EIPS/eip-2718).
pub type TransactionSigned = alloy_consensus::TxEnvelope;

/// Error returned when an opaque transaction can not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum TransactionDecodeError {
    /// The bytes are not a valid EIP-2718 envelope.
    #[error(transparent)]
    Envelope(#[from] Eip2718Error),
    /// The envelope was decoded but bytes were left over.
    #[error("{0} unexpected trailing bytes after transaction")]
    TrailingBytes(usize),
}

/// Decodes a single EIP-2718 encoded transaction, rejecting any trailing input.
pub fn decode_enveloped(mut data: &[u8]) -> Result<TransactionSigned, TransactionDecodeError> {
    let tx = TransactionSigned::decode_2718(&mut data)?;
    if !data.is_empty() {
        return Err(TransactionDecodeError::TrailingBytes(data.len()))
    }
    Ok(tx)
}

/// Encodes a transaction into the opaque form used by execution payloads.
pub fn encode_enveloped(tx: &TransactionSigned) -> Bytes {
    tx.encoded_2718().into()
}
