use scrypt_shim::{scrypt_sync, Dispatcher, ScryptError, UserOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let password = "secure_password_123";
    let salt = "per-user-salt";

    println!("Scrypt backend: {}", Dispatcher::global().backend_kind());

    let key = scrypt_sync(password, salt, 32, None)?;
    println!("Key with default parameters: {}", hex::encode(&key));

    let options: UserOptions = r#"{"N": 1024, "r": 8, "p": 16}"#.parse()?;
    let key = scrypt_sync("password", "NaCl", 64, Some(&options))?;
    println!("RFC 7914 vector 2: {}", hex::encode(&key));

    let conflicting = UserOptions::new().with_cost(1024).with_n(1024);
    match scrypt_sync(password, salt, 32, Some(&conflicting)) {
        Err(err @ ScryptError::ConflictingAlias { .. }) => println!("Rejected: {err}"),
        other => println!("Unexpected result: {other:?}"),
    }

    let tight = UserOptions::new().with_maxmem(1 << 20);
    match scrypt_sync(password, salt, 32, Some(&tight)) {
        Err(err @ ScryptError::ResourceExhausted { .. }) => println!("Rejected: {err}"),
        other => println!("Unexpected result: {other:?}"),
    }

    Ok(())
}
