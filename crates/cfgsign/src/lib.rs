#![forbid(unsafe_code)]

pub use cfgsign_core as core;
pub use cfgsign_xml as xml;
pub use cfgsign_signer as signer;
pub use cfgsign_config as config;
