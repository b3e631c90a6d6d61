mod info;

pub use info::ChainInfo;
