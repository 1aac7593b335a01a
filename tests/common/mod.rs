#![allow(dead_code)]

use scrypt_shim::{BackendKind, Dispatcher, ScryptParams, UserOptions};

/// Standard test password for consistent testing
pub const TEST_PASSWORD: &str = "test_password_123";
pub const TEST_SALT: &str = "test_salt_456";

/// Default maxmem (32 MiB)
pub const DEFAULT_MAXMEM: u64 = 32 << 20;

/// A published RFC 7914 section 12 test vector
pub struct RfcVector {
    pub password: &'static str,
    pub salt: &'static str,
    pub cost: u64,
    pub block_size: u64,
    pub parallelization: u64,
    pub expected_hex: &'static str,
}

impl RfcVector {
    pub fn params(&self) -> ScryptParams {
        ScryptParams::new(self.cost, self.block_size, self.parallelization, DEFAULT_MAXMEM)
    }

    pub fn options(&self) -> UserOptions {
        UserOptions::new()
            .with_cost(self.cost)
            .with_block_size(self.block_size)
            .with_parallelization(self.parallelization)
    }

    pub fn expected(&self) -> Vec<u8> {
        hex::decode(self.expected_hex).expect("Test vector is valid hex")
    }
}

pub const RFC_VECTOR_EMPTY: RfcVector = RfcVector {
    password: "",
    salt: "",
    cost: 16,
    block_size: 1,
    parallelization: 1,
    expected_hex: "77d6576238657b203b19ca42c18a0497f16b4844e3074ae8dfdffa3fede21442\
                   fcd0069ded0948f8326a753a0fc81f17e8d3e0fb2e0d3628cf35e20c38d18906",
};

pub const RFC_VECTOR_NACL: RfcVector = RfcVector {
    password: "password",
    salt: "NaCl",
    cost: 1024,
    block_size: 8,
    parallelization: 16,
    expected_hex: "fdbabe1c9d3472007856e7190d01e9fe7c6ad7cbc8237830e77376634b373162\
                   2eaf30d92e22a3886ff109279d9830dac727afb94a83ee6d8360cbdfa2cc0640",
};

pub const RFC_VECTOR_SODIUM_CHLORIDE: RfcVector = RfcVector {
    password: "pleaseletmein",
    salt: "SodiumChloride",
    cost: 16384,
    block_size: 8,
    parallelization: 1,
    expected_hex: "7023bdcb3afd7348461c06cd81fd38ebfda8fbba904f8e3ea9b543f6545da1f2\
                   d5432955613f0fcf62d49705242a9af9e61e85dc0d651e40dfcf017b45575887",
};

/// Fast parameters for tests that only care about plumbing (N=16, r=1, p=1)
pub fn fast_options() -> UserOptions {
    UserOptions::new().with_n(16).with_r(1).with_p(1)
}

/// A dispatcher for every backend that loads in this build
pub fn available_dispatchers() -> Vec<Dispatcher> {
    BackendKind::PRIORITY
        .into_iter()
        .filter(|kind| kind.is_available())
        .filter_map(|kind| Dispatcher::with_backend(kind).ok())
        .collect()
}

/// Helper to assert that an error matches a specific variant
#[macro_export]
macro_rules! assert_error_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {}
            other => panic!(
                "Expected error variant {}, but got: {:?}",
                stringify!($pattern),
                other
            ),
        }
    };
}
