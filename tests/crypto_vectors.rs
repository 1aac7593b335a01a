mod common;

use common::*;
use scrypt_shim::{
    scrypt_sync, BackendKind, DerivationRequest, Dispatcher, ScryptParams, UserOptions,
};

fn derive_vector(dispatcher: &Dispatcher, vector: &RfcVector) -> Vec<u8> {
    let request = DerivationRequest::new(vector.password, vector.salt, 64, vector.params());
    dispatcher.derive(&request).unwrap()
}

// ==========================
// RFC 7914 Section 12 Vectors
// ==========================

#[test]
fn rfc_vector_empty_password_on_every_backend() {
    for dispatcher in available_dispatchers() {
        assert_eq!(
            derive_vector(&dispatcher, &RFC_VECTOR_EMPTY),
            RFC_VECTOR_EMPTY.expected(),
            "backend {}",
            dispatcher.backend_kind()
        );
    }
}

#[test]
fn rfc_vector_nacl_on_every_backend() {
    for dispatcher in available_dispatchers() {
        assert_eq!(
            derive_vector(&dispatcher, &RFC_VECTOR_NACL),
            RFC_VECTOR_NACL.expected(),
            "backend {}",
            dispatcher.backend_kind()
        );
    }
}

#[test]
fn rfc_vector_sodium_chloride_on_every_backend() {
    for dispatcher in available_dispatchers() {
        assert_eq!(
            derive_vector(&dispatcher, &RFC_VECTOR_SODIUM_CHLORIDE),
            RFC_VECTOR_SODIUM_CHLORIDE.expected(),
            "backend {}",
            dispatcher.backend_kind()
        );
    }
}

// ==========================
// Public Entry Point Vectors
// ==========================

#[test]
fn scrypt_sync_matches_vector_with_long_form_options() {
    let vector = &RFC_VECTOR_NACL;
    let key = scrypt_sync(vector.password, vector.salt, 64, Some(&vector.options())).unwrap();
    assert_eq!(key, vector.expected());
}

#[test]
fn scrypt_sync_matches_vector_with_short_form_options() {
    let vector = &RFC_VECTOR_EMPTY;
    let options = UserOptions::new()
        .with_n(vector.cost)
        .with_r(vector.block_size)
        .with_p(vector.parallelization);
    let key = scrypt_sync(vector.password, vector.salt, 64, Some(&options)).unwrap();
    assert_eq!(key, vector.expected());
}

#[test]
fn defaults_match_sodium_chloride_parameters() {
    // N=16384, r=8, p=1 are the defaults
    let vector = &RFC_VECTOR_SODIUM_CHLORIDE;
    let key = scrypt_sync(vector.password, vector.salt, 64, None).unwrap();
    assert_eq!(key, vector.expected());
}

#[test]
fn json_options_match_vector() {
    let options: UserOptions = r#"{"N": 1024, "r": 8, "p": 16}"#.parse().unwrap();
    let key = scrypt_sync("password", "NaCl", 64, Some(&options)).unwrap();
    assert_eq!(key, RFC_VECTOR_NACL.expected());
}

#[test]
fn truncated_output_is_vector_prefix() {
    let key = scrypt_sync("", "", 16, Some(&RFC_VECTOR_EMPTY.options())).unwrap();
    assert_eq!(hex::encode(key), "77d6576238657b203b19ca42c18a0497");
}

#[test]
fn output_longer_than_one_hash_block() {
    let key = scrypt_sync("", "", 100, Some(&RFC_VECTOR_EMPTY.options())).unwrap();
    assert_eq!(key.len(), 100);
    assert_eq!(&key[..64], RFC_VECTOR_EMPTY.expected().as_slice());
}

// ==========================
// Portable Backend Vectors
// ==========================

#[test]
fn portable_derives_even_non_power_of_two_cost() {
    let dispatcher = Dispatcher::with_backend(BackendKind::Portable).unwrap();
    let params = ScryptParams::new(6, 1, 1, DEFAULT_MAXMEM);
    let request = DerivationRequest::new("pw", "salt", 32, params);
    let key = dispatcher.derive(&request).unwrap();
    assert_eq!(
        hex::encode(key),
        "86434865cdf99bdbd081ca011cffc405e7f69cfd203f0584cbc181dbc862afa7"
    );
}

#[test]
fn portable_small_power_of_two_cost() {
    let dispatcher = Dispatcher::with_backend(BackendKind::Portable).unwrap();
    let params = ScryptParams::new(8, 1, 1, DEFAULT_MAXMEM);
    let request = DerivationRequest::new("pw", "salt", 32, params);
    let key = dispatcher.derive(&request).unwrap();
    assert_eq!(
        hex::encode(key),
        "4796cd04d8e551b26ac2e143cd1dd0b8b8ad1458059937a5f88751593b10950e"
    );
}
