//! JSON test vector loader for provider response tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TestVector {
    pub description: String,
    pub response: serde_json::Value,
    #[serde(default)]
    pub expect: Option<ExpectWeather>,
    #[serde(default)]
    pub expect_error: Option<ExpectError>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectWeather {
    pub temp: i32,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct ExpectError {
    pub code: String,
}

impl TestVector {
    pub fn load(name: &str) -> Self {
        let s = std::fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
        serde_json::from_str(&s).unwrap()
    }

    pub fn body(&self) -> Vec<u8> {
        serde_json::to_vec(&self.response).expect("vector response serializes")
    }
}
