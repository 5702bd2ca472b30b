mod kv;
pub use kv::KeyValue;

mod env;
pub use env::Env;

mod flag;
pub use flag::Flag;

mod target;
pub use target::{Target, TargetSet};

mod label;
pub use label::{PALETTE, RESET, TargetLabel};

use serde_json::Value;
use std::collections::BTreeMap;

/// Mapping of remote configuration keys to fetched values.
///
/// Value types depend on the key (address, boolean, string, integer, arrays),
/// so entries are kept as raw JSON values.
pub type KeyValues = BTreeMap<String, Value>;
