// Receipt Module - Receipt number minting and the receipt file contract

pub mod number;
pub mod sequencer;

pub use number::ReceiptNumber;
pub use sequencer::ReceiptSequencer;
