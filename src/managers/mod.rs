//! Tool descriptors: which endpoint each tool hits, with which method, and
//! how its validated parameters are reshaped for the wire.

pub mod account;
pub mod ad;
pub mod adgroup;
pub mod audience;
pub mod campaign;
pub mod creative;
pub mod reporting;
pub mod targeting;

use crate::errors::GatewayError;
use crate::services::validation::IdentifierPolicy;
use reqwest::Method;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub type Params = Map<String, Value>;
pub type Transform = fn(Params) -> Params;

#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub method: Method,
    /// Path relative to the API base, e.g. `campaign/get/`.
    pub endpoint: &'static str,
    pub identifier: IdentifierPolicy,
    pub transform: Transform,
}

impl ToolDescriptor {
    pub fn get(name: &'static str, endpoint: &'static str) -> Self {
        Self::new(name, Method::GET, endpoint)
    }

    pub fn post(name: &'static str, endpoint: &'static str) -> Self {
        Self::new(name, Method::POST, endpoint)
    }

    fn new(name: &'static str, method: Method, endpoint: &'static str) -> Self {
        Self {
            name,
            method,
            endpoint,
            identifier: IdentifierPolicy::AdvertiserId,
            transform: passthrough,
        }
    }

    pub fn identifier(mut self, identifier: IdentifierPolicy) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn build_payload(&self, params: Params) -> Params {
        (self.transform)(params)
    }
}

pub fn passthrough(params: Params) -> Params {
    params
}

/// Every tool the gateway serves.
pub fn all_descriptors() -> Vec<ToolDescriptor> {
    [
        account::descriptors(),
        campaign::descriptors(),
        adgroup::descriptors(),
        ad::descriptors(),
        creative::descriptors(),
        reporting::descriptors(),
        audience::descriptors(),
        targeting::descriptors(),
    ]
    .concat()
}

/// Indexes descriptors by tool name, rejecting duplicates.
pub fn index_descriptors(
    descriptors: Vec<ToolDescriptor>,
) -> Result<HashMap<&'static str, ToolDescriptor>, GatewayError> {
    let mut map = HashMap::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let name = descriptor.name;
        if map.insert(name, descriptor).is_some() {
            return Err(GatewayError::config(format!(
                "tool '{}' is registered twice",
                name
            )));
        }
    }
    Ok(map)
}

pub(crate) fn is(params: &Params, key: &str, expected: &str) -> bool {
    params.get(key).and_then(|v| v.as_str()) == Some(expected)
}

/// Keeps `key` only when `condition` holds.
pub(crate) fn retain_if(params: &mut Params, key: &str, condition: bool) {
    if !condition {
        params.remove(key);
    }
}

/// Moves the listed keys (when present) out of `params` into a new map.
pub(crate) fn take_fields(params: &mut Params, keys: &[&str]) -> Params {
    keys.iter()
        .filter_map(|key| params.remove(*key).map(|value| (key.to_string(), value)))
        .collect()
}
